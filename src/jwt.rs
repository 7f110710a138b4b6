use actix_web::body::EitherBody;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest, HttpResponse, HttpResponseBuilder,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{error, warn};

use crate::config::{AppConfig, AuthConfig};
use crate::entity::users;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,      // User id
    pub username: String, // Username at issue time
    pub exp: usize,       // Expiration time
    pub iat: usize,       // Issued at
}

/// Sign a token for `user` with the configured secret and lifetime
pub fn issue_token(
    user: &users::Model,
    auth: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        iat: now.max(0) as usize,
        exp: (now + auth.token_ttl_seconds).max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_ref()),
    )
}

pub fn verify_token(token: &str, auth: &AuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_ref()),
        &Validation::default(),
    )
    .map(|token_data| token_data.claims)
}

/// Guards a scope: resolves the bearer token to a user row and stores both
/// the claims and the user in request extensions. Needs `web::Data` of both
/// `DatabaseConnection` and `AppConfig` registered on the app.
#[derive(Clone, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        Box::pin(async move {
            let db = req.app_data::<web::Data<DatabaseConnection>>().cloned();
            let config = req.app_data::<web::Data<AppConfig>>().cloned();
            let (db, config) = match (db, config) {
                (Some(db), Some(config)) => (db, config),
                _ => {
                    error!("JwtAuth requires DatabaseConnection and AppConfig app data");
                    return Ok(reject(
                        req,
                        HttpResponse::InternalServerError(),
                        "Server is misconfigured",
                    ));
                }
            };

            // Extract the Authorization header
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_owned);

            let Some(token) = token else {
                return Ok(reject(
                    req,
                    HttpResponse::Unauthorized(),
                    "Missing Authorization header",
                ));
            };

            let claims = match verify_token(&token, &config.auth) {
                Ok(claims) => claims,
                Err(e) => {
                    warn!(error = %e, "Rejected bearer token");
                    return Ok(reject(req, HttpResponse::Unauthorized(), "Invalid token"));
                }
            };

            match crate::user_management::find_user_for_claims(&db, &claims).await {
                Ok(Some(user)) => {
                    // Add claims and user to request extensions
                    req.extensions_mut().insert(claims);
                    req.extensions_mut().insert(user);
                    let res = svc.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Ok(None) => Ok(reject(req, HttpResponse::Unauthorized(), "Unknown user")),
                Err(e) => {
                    error!(error = %e, "Failed to load user for token");
                    Ok(reject(
                        req,
                        HttpResponse::InternalServerError(),
                        "Failed to load user",
                    ))
                }
            }
        })
    }
}

fn reject<B>(
    req: ServiceRequest,
    mut builder: HttpResponseBuilder,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let (req, _pl) = req.into_parts();
    let resp = builder
        .content_type("application/json")
        .json(serde_json::json!({ "error": message }));
    ServiceResponse::new(req, resp).map_into_right_body()
}

// Helper function to extract claims from request
pub fn get_claims(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

// Helper function to extract user from request
pub fn get_user(req: &HttpRequest) -> Option<users::Model> {
    req.extensions().get::<users::Model>().cloned()
}
