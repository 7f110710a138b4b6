//! Per-tournament chat
//!
//! Members post plain-text messages; anyone signed in can read them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entity::{chat_messages, tournament_players, tournaments, users};
use crate::error::TournamentError;
use crate::tournament_management::rules::normalize_message;

pub async fn post_message(
    db: &DatabaseConnection,
    tournament_id: i32,
    author: &users::Model,
    text: &str,
) -> Result<chat_messages::Model, TournamentError> {
    let body = normalize_message(text)?;
    ensure_tournament(db, tournament_id).await?;

    let memberships = tournament_players::Entity::find()
        .filter(tournament_players::Column::TournamentId.eq(tournament_id))
        .filter(tournament_players::Column::UserId.eq(author.id))
        .count(db)
        .await?;
    if memberships == 0 {
        return Err(TournamentError::NotAMember(tournament_id));
    }

    let message = chat_messages::ActiveModel {
        tournament_id: Set(tournament_id),
        user_id: Set(author.id),
        username: Set(author.username.clone()),
        body: Set(body),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        tournament_id,
        message_id = message.id,
        username = %author.username,
        "Chat message posted"
    );
    Ok(message)
}

/// Messages of a tournament, oldest first
pub async fn list_messages(
    db: &DatabaseConnection,
    tournament_id: i32,
) -> Result<Vec<chat_messages::Model>, TournamentError> {
    ensure_tournament(db, tournament_id).await?;

    Ok(chat_messages::Entity::find()
        .filter(chat_messages::Column::TournamentId.eq(tournament_id))
        .order_by_asc(chat_messages::Column::Id)
        .all(db)
        .await?)
}

async fn ensure_tournament(
    db: &DatabaseConnection,
    tournament_id: i32,
) -> Result<(), TournamentError> {
    tournaments::Entity::find_by_id(tournament_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(TournamentError::TournamentNotFound(tournament_id))
}
