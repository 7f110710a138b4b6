use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: i32,
    pub name: String,
    pub created_by: String,
    pub invite_code: String,
    pub player_count: u64,
    pub created_at: DateTime<FixedOffset>,
}
