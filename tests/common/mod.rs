#![allow(dead_code)]

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use tourney::config::{AppConfig, AuthConfig};
use tourney::entity::{tournaments, users};
use tourney::init_tracing;
use tourney::tournament_management::orchestration;

/// Test bootstrap: inits tracing, opens a fresh in-memory database and migrates it.
/// Every call returns an isolated database.
pub async fn test_bootstrap() -> DatabaseConnection {
    init_tracing();

    // One connection: every sqlite::memory: connection is its own database
    let url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("DB connect failed");
    Migrator::up(&db, None).await.expect("Migrator::up failed");
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            token_ttl_seconds: 3600,
            // bcrypt's minimum, keeps tests fast
            bcrypt_cost: 4,
        },
    }
}

/// Insert a user row directly, bypassing registration
pub async fn seed_user(db: &DatabaseConnection, username: &str) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("not-a-real-hash".to_string()),
        bio: Set(String::new()),
        wins: Set(0),
        losses: Set(0),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert test user")
}

/// Create a tournament owned by the first name, with the rest joined in order
pub async fn seed_tournament(db: &DatabaseConnection, usernames: &[&str]) -> tournaments::Model {
    let mut users = Vec::new();
    for name in usernames {
        users.push(seed_user(db, name).await);
    }

    let owner = users.first().expect("at least one user is needed");
    let tournament = orchestration::create_tournament(db, owner, "Test Cup")
        .await
        .expect("Failed to create tournament");

    for user in users.iter().skip(1) {
        orchestration::join_tournament(db, user, tournament.clone())
            .await
            .expect("Failed to join tournament");
    }

    tournament
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub async fn find_user(db: &DatabaseConnection, username: &str) -> users::Model {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
        .expect("Failed to query users")
        .expect("user should exist")
}
