use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entity::users;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub wins: i32,
    pub losses: i32,
    pub created_at: DateTime<FixedOffset>,
}

impl From<users::Model> for Profile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            wins: user.wins,
            losses: user.losses,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub username: String,
    pub wins: i32,
    pub losses: i32,
}
