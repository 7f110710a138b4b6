use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entity::{fixtures, standings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub tournament: TournamentInfo,
    pub players: Vec<String>,
    pub fixtures: Vec<fixtures::Model>,
    /// Ranked table, best first
    pub standings: Vec<StandingSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub id: i32,
    pub name: String,
    pub created_by: String,
    pub invite_code: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingSnapshot {
    pub position: usize,
    pub player: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub gf: i32,
    pub ga: i32,
    pub gd: i32,
    pub points: i32,
}

impl StandingSnapshot {
    pub fn from_ranked(position: usize, row: standings::Model) -> Self {
        Self {
            position,
            player: row.player,
            played: row.played,
            won: row.won,
            drawn: row.drawn,
            lost: row.lost,
            gf: row.gf,
            ga: row.ga,
            gd: row.gd,
            points: row.points,
        }
    }
}
