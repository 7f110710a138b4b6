use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub tournament_id: i32,
    pub participants: Vec<String>,
    pub fixtures_created: usize,
    pub standings_created: usize,
}
