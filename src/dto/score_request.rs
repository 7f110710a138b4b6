use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub fixture_id: i32,
    pub home_score: ScoreInput,
    pub away_score: ScoreInput,
}

/// A submitted score before validation. Forms send strings, API clients
/// send numbers; both are accepted here and checked by the rules module.
/// Any other JSON value lands in `Other` so it is reported as a bad score
/// rather than a body parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Integer(i64),
    Fractional(f64),
    Text(String),
    Other(serde_json::Value),
}
