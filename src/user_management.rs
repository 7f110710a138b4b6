use actix_web::{get, post, web, HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde_json::json;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dto::auth_request::{LoginRequest, RegisterRequest};
use crate::dto::auth_response::{AuthResponse, UserSnapshot};
use crate::dto::profile::{LeaderboardEntry, Profile, ProfileUpdateRequest};
use crate::entity::users::{ActiveModel as UserActiveModel, Column, Entity as Users, Model as User};
use crate::error::AuthError;
use crate::jwt::{get_user, issue_token, Claims};

/// Maximum length of a profile bio, in characters
pub const MAX_BIO_LEN: usize = 500;

/// Create an account. Usernames are trimmed and must be unique.
pub async fn register_user(
    db: &DatabaseConnection,
    request: &RegisterRequest,
    bcrypt_cost: u32,
) -> Result<User, AuthError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidInput("Username is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AuthError::InvalidInput("Password is required".to_string()));
    }

    let taken = Users::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(AuthError::UsernameTaken);
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt_cost)?;
    let new_user = UserActiveModel {
        username: Set(username.to_string()),
        email: Set(request.email.trim().to_string()),
        password_hash: Set(password_hash),
        bio: Set(String::new()),
        wins: Set(0),
        losses: Set(0),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "User registered");
            Ok(user)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AuthError::UsernameTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Check a username/password pair against the stored hash
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = Users::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if bcrypt::verify(password, &user.password_hash)? {
        Ok(user)
    } else {
        warn!(username = %user.username, "Failed login attempt");
        Err(AuthError::InvalidCredentials)
    }
}

/// Resolve the user a verified token was issued to
pub async fn find_user_for_claims(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<Option<User>, DbErr> {
    let Ok(user_id) = claims.sub.parse::<i32>() else {
        return Ok(None);
    };
    Users::find_by_id(user_id).one(db).await
}

/// Replace the user's bio. Surrounding whitespace is dropped and an empty
/// bio clears it.
pub async fn update_bio(
    db: &DatabaseConnection,
    user: &User,
    bio: &str,
) -> Result<User, AuthError> {
    let bio = bio.trim();
    if bio.chars().count() > MAX_BIO_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Bio must be at most {MAX_BIO_LEN} characters"
        )));
    }

    let mut model: UserActiveModel = user.clone().into();
    model.bio = Set(bio.to_string());
    let user = model.update(db).await?;
    info!(user_id = user.id, "Profile updated");
    Ok(user)
}

/// All users ranked by lifetime wins, then fewest losses, then name
pub async fn leaderboard(db: &DatabaseConnection) -> Result<Vec<LeaderboardEntry>, DbErr> {
    let users = Users::find()
        .order_by_desc(Column::Wins)
        .order_by_asc(Column::Losses)
        .order_by_asc(Column::Username)
        .all(db)
        .await?;

    Ok(users
        .into_iter()
        .enumerate()
        .map(|(index, user)| LeaderboardEntry {
            position: index + 1,
            username: user.username,
            wins: user.wins,
            losses: user.losses,
        })
        .collect())
}

fn auth_response(user: &User, config: &AppConfig) -> Result<HttpResponse, AuthError> {
    let token = issue_token(user, &config.auth)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(AuthResponse {
            token,
            user: UserSnapshot::from(user),
        }))
}

#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ActixResult<HttpResponse> {
    let user = register_user(&db, &body, config.auth.bcrypt_cost).await?;
    Ok(auth_response(&user, &config)?)
}

#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ActixResult<HttpResponse> {
    let user = authenticate(&db, &body.username, &body.password).await?;
    info!(user_id = user.id, "User logged in");
    Ok(auth_response(&user, &config)?)
}

fn unauthenticated() -> HttpResponse {
    HttpResponse::Unauthorized()
        .content_type("application/json")
        .json(json!({
            "error": "User not authenticated"
        }))
}

#[get("/profile")]
pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user) = get_user(&req) else {
        return Ok(unauthenticated());
    };

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(Profile::from(user)))
}

#[post("/profile")]
pub async fn update_profile(
    req: HttpRequest,
    body: web::Json<ProfileUpdateRequest>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let Some(user) = get_user(&req) else {
        return Ok(unauthenticated());
    };

    let user = update_bio(&db, &user, &body.bio).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(Profile::from(user)))
}

#[get("/leaderboard")]
pub async fn get_leaderboard(db: web::Data<DatabaseConnection>) -> ActixResult<HttpResponse> {
    let entries = leaderboard(&db).await.map_err(AuthError::from)?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "leaderboard": entries
        })))
}
