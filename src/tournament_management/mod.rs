//! Tournament management module
//!
//! HTTP handlers for tournaments. The round-robin generator and standings
//! arithmetic live in the pure submodules; `orchestration` runs them
//! against the database.

pub mod chat;
pub mod fixtures;
pub mod invite;
pub mod orchestration;
pub mod rules;
pub mod standings;

use actix_web::{get, post, web, HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::info;

use crate::dto::chat_request::ChatRequest;
use crate::dto::score_request::ScoreRequest;
use crate::dto::tournament_request::CreateTournamentRequest;
use crate::entity::users;
use crate::jwt::get_user;
use crate::tournament_management::rules::parse_score;

fn unauthenticated() -> HttpResponse {
    HttpResponse::Unauthorized()
        .content_type("application/json")
        .json(json!({
            "error": "User not authenticated"
        }))
}

/// The resolved caller, or the 401 response to return instead
fn require_user(req: &HttpRequest) -> Result<users::Model, HttpResponse> {
    get_user(req).ok_or_else(unauthenticated)
}

#[post("/tournaments")]
pub async fn create_tournament(
    req: HttpRequest,
    body: web::Json<CreateTournamentRequest>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let tournament = orchestration::create_tournament(&db, &user, &body.name).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "tournament": tournament
        })))
}

#[get("/tournaments")]
pub async fn get_tournaments(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let tournaments = orchestration::list_for_user(&db, user.id).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "user": user.username,
            "tournaments": tournaments
        })))
}

#[get("/tournaments/open")]
pub async fn get_open_tournaments(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = require_user(&req) {
        return Ok(resp);
    }

    let tournaments = orchestration::list_open(&db).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "tournaments": tournaments
        })))
}

#[get("/tournament/{id}")]
pub async fn get_tournament(
    req: HttpRequest,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = require_user(&req) {
        return Ok(resp);
    }

    let snapshot = orchestration::load_snapshot(&db, path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(snapshot))
}

#[post("/join/{invite_code}")]
pub async fn join_tournament(
    req: HttpRequest,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let outcome = orchestration::join_by_invite(&db, &user, &path).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "joined": outcome.is_new_member(),
            "tournament": outcome.tournament()
        })))
}

#[post("/tournament/{id}/generate")]
pub async fn generate_fixtures(
    req: HttpRequest,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let tournament_id = path.into_inner();

    let report = orchestration::generate_for_members(&db, tournament_id).await?;
    info!(tournament_id, requested_by = %user.username, "Fixtures regenerated");

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(report))
}

#[post("/tournament/{id}/score")]
pub async fn submit_score(
    req: HttpRequest,
    path: web::Path<i32>,
    score: web::Json<ScoreRequest>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let tournament_id = path.into_inner();

    let home_score = parse_score(&score.home_score)?;
    let away_score = parse_score(&score.away_score)?;

    let update = orchestration::record_result(
        &db,
        tournament_id,
        score.fixture_id,
        home_score,
        away_score,
    )
    .await?;
    info!(
        tournament_id,
        fixture_id = score.fixture_id,
        submitted_by = %user.username,
        "Score submitted"
    );

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(update))
}

#[get("/tournament/{id}/chat")]
pub async fn get_chat(
    req: HttpRequest,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = require_user(&req) {
        return Ok(resp);
    }

    let messages = chat::list_messages(&db, path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "messages": messages
        })))
}

#[post("/tournament/{id}/chat")]
pub async fn post_chat(
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<ChatRequest>,
    db: web::Data<DatabaseConnection>,
) -> ActixResult<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let message = chat::post_message(&db, path.into_inner(), &user, &body.text).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "message": message
        })))
}
