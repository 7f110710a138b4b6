use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entity::users;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<&users::Model> for UserSnapshot {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
