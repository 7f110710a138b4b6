pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod entity;
pub mod error;
pub mod jwt;
pub mod tournament_management;
pub mod user_management;

pub use bootstrap::{connect_and_migrate, init_tracing, load_dotenv};

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use tracing::warn;

use dto::auth_response::UserSnapshot;
use jwt::{get_claims, get_user, JwtAuth};
use tournament_management::{
    create_tournament, generate_fixtures, get_chat, get_open_tournaments, get_tournament,
    get_tournaments, join_tournament, post_chat, submit_score,
};
use user_management::{get_leaderboard, get_profile, login, register, update_profile};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(hello)
        .service(register)
        .service(login)
        .service(
            web::scope("/api")
                .wrap(JwtAuth::new())
                .service(me)
                .service(get_profile)
                .service(update_profile)
                .service(get_leaderboard)
                .service(create_tournament)
                .service(get_tournaments)
                .service(get_open_tournaments)
                .service(get_tournament)
                .service(join_tournament)
                .service(generate_fixtures)
                .service(submit_score)
                .service(get_chat)
                .service(post_chat),
        );
}

/// Malformed request bodies get the same `{"error": ..}` shape as every
/// other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        let message = err.to_string();
        warn!(path = %req.path(), error = %message, "Rejected request body");
        let response = HttpResponse::BadRequest()
            .content_type("application/json")
            .json(serde_json::json!({ "error": message }));
        InternalError::from_response(err, response).into()
    })
}

#[actix_web::get("/")]
async fn hello() -> impl actix_web::Responder {
    "Hello, tourney!"
}

#[actix_web::get("/me")]
async fn me(req: actix_web::HttpRequest) -> actix_web::Result<actix_web::HttpResponse> {
    // Extract claims and user from the request (set by JWT middleware)
    match (get_claims(&req), get_user(&req)) {
        (Some(claims), Some(user)) => Ok(actix_web::HttpResponse::Ok()
            .content_type("application/json")
            .json(serde_json::json!({
                "user": UserSnapshot::from(&user),
                "token_info": {
                    "issued_at": claims.iat,
                    "expires_at": claims.exp
                }
            }))),
        // This should never happen if middleware is working correctly
        _ => Ok(actix_web::HttpResponse::Unauthorized()
            .content_type("application/json")
            .json(serde_json::json!({
                "error": "No claims found"
            }))),
    }
}
