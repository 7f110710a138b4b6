//! Error types surfaced by the tournament core and the identity layer.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, TransactionError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("At least 2 participants are needed to generate fixtures (found {found})")]
    InsufficientParticipants { found: usize },
    #[error("Fixture {fixture_id} not found in tournament {tournament_id}")]
    FixtureNotFound { tournament_id: i32, fixture_id: i32 },
    #[error("Invalid score: {0}")]
    InvalidScore(String),
    #[error("Tournament {0} not found")]
    TournamentNotFound(i32),
    #[error("Invite code not found")]
    InviteNotFound,
    #[error("Invalid tournament name: {0}")]
    InvalidName(String),
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Only members of tournament {0} can do that")]
    NotAMember(i32),
    #[error("No standing for {player} in tournament {tournament_id}")]
    MissingStanding { tournament_id: i32, player: String },
    #[error("Database operation failed")]
    PersistenceFailure(#[from] DbErr),
}

impl From<TransactionError<TournamentError>> for TournamentError {
    fn from(e: TransactionError<TournamentError>) -> Self {
        match e {
            TransactionError::Connection(db_err) => TournamentError::PersistenceFailure(db_err),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

impl ResponseError for TournamentError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientParticipants { .. }
            | Self::InvalidScore(_)
            | Self::InvalidName(_)
            | Self::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            Self::NotAMember(_) => StatusCode::FORBIDDEN,
            Self::FixtureNotFound { .. } | Self::TournamentNotFound(_) | Self::InviteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::MissingStanding { .. } | Self::PersistenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::PersistenceFailure(db_err) = self {
            error!(error = %db_err, "Tournament operation failed in the database");
        }
        HttpResponse::build(self.status_code())
            .content_type("application/json")
            .json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to hash password")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("Failed to issue token")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Database operation failed")]
    PersistenceFailure(#[from] DbErr),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PasswordHash(_) | Self::Token(_) | Self::PersistenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::PasswordHash(e) => error!(error = %e, "Password hashing failed"),
            Self::Token(e) => error!(error = %e, "Token signing failed"),
            Self::PersistenceFailure(e) => {
                error!(error = %e, "Auth operation failed in the database")
            }
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .content_type("application/json")
            .json(json!({ "error": self.to_string() }))
    }
}
