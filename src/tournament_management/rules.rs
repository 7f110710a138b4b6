//! Tournament rules module
//!
//! Constants and input validation that depend only on std and the
//! request payload types.

use crate::dto::score_request::ScoreInput;
use crate::error::TournamentError;

/// Minimum number of participants needed to generate fixtures
pub const MIN_PARTICIPANTS: usize = 2;

/// Points awarded for a win
pub const POINTS_FOR_WIN: i32 = 3;

/// Points awarded for a draw
pub const POINTS_FOR_DRAW: i32 = 1;

/// Highest goal count a single side can be credited with in one fixture
pub const MAX_SCORE: i32 = 999;

/// Maximum length of a tournament name, in characters
pub const MAX_TOURNAMENT_NAME_LEN: usize = 100;

/// Maximum length of a chat message, in characters
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Number of fixtures a double round-robin produces for `participant_count` players
pub fn fixture_count(participant_count: usize) -> usize {
    participant_count * participant_count.saturating_sub(1)
}

/// Reject scores outside `0..=MAX_SCORE` before anything is written
pub fn validate_score(home_score: i32, away_score: i32) -> Result<(), TournamentError> {
    if home_score < 0 || away_score < 0 {
        return Err(TournamentError::InvalidScore(format!(
            "scores must be non-negative (got {home_score}-{away_score})"
        )));
    }
    if home_score > MAX_SCORE || away_score > MAX_SCORE {
        return Err(TournamentError::InvalidScore(format!(
            "scores must be at most {MAX_SCORE} (got {home_score}-{away_score})"
        )));
    }
    Ok(())
}

/// Convert a submitted score into a goal count.
///
/// Accepts JSON integers, whole-valued floats (`3.0`) and numeric strings
/// (form-style input). Fractions, negative numbers, non-numeric values and
/// anything above [`MAX_SCORE`] are rejected.
pub fn parse_score(input: &ScoreInput) -> Result<i32, TournamentError> {
    let value = match input {
        ScoreInput::Integer(v) => *v,
        ScoreInput::Fractional(v) if v.is_finite() && v.fract() == 0.0 => *v as i64,
        ScoreInput::Fractional(v) => {
            return Err(TournamentError::InvalidScore(format!(
                "{v} is not a whole number"
            )))
        }
        ScoreInput::Text(raw) => raw.trim().parse::<i64>().map_err(|_| {
            TournamentError::InvalidScore(format!("'{raw}' is not a whole number"))
        })?,
        ScoreInput::Other(v) => {
            return Err(TournamentError::InvalidScore(format!("{v} is not a number")))
        }
    };

    if value < 0 {
        return Err(TournamentError::InvalidScore(format!(
            "{value} is negative"
        )));
    }
    if value > i64::from(MAX_SCORE) {
        return Err(TournamentError::InvalidScore(format!(
            "{value} is above the maximum of {MAX_SCORE}"
        )));
    }
    i32::try_from(value)
        .map_err(|_| TournamentError::InvalidScore(format!("{value} is too large")))
}

/// Trim and validate a chat message
pub fn normalize_message(text: &str) -> Result<String, TournamentError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::InvalidMessage("message must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(TournamentError::InvalidMessage(format!(
            "message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate a tournament name
pub fn normalize_tournament_name(name: &str) -> Result<String, TournamentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::InvalidName("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TOURNAMENT_NAME_LEN {
        return Err(TournamentError::InvalidName(format!(
            "name must be at most {MAX_TOURNAMENT_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_count() {
        assert_eq!(fixture_count(0), 0);
        assert_eq!(fixture_count(1), 0);
        assert_eq!(fixture_count(2), 2);
        assert_eq!(fixture_count(3), 6);
        assert_eq!(fixture_count(8), 56);
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(0, 0).is_ok());
        assert!(validate_score(7, 2).is_ok());
        assert!(matches!(
            validate_score(-1, 2),
            Err(TournamentError::InvalidScore(_))
        ));
        assert!(matches!(
            validate_score(1, -2),
            Err(TournamentError::InvalidScore(_))
        ));
        assert!(validate_score(MAX_SCORE, MAX_SCORE).is_ok());
        assert!(matches!(
            validate_score(MAX_SCORE + 1, 0),
            Err(TournamentError::InvalidScore(_))
        ));
        assert!(matches!(
            validate_score(0, i32::MAX),
            Err(TournamentError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_parse_score_integers_and_text() {
        assert_eq!(parse_score(&ScoreInput::Integer(3)).unwrap(), 3);
        assert_eq!(parse_score(&ScoreInput::Text(" 4 ".to_string())).unwrap(), 4);
        assert_eq!(parse_score(&ScoreInput::Text("0".to_string())).unwrap(), 0);
        assert_eq!(parse_score(&ScoreInput::Fractional(3.0)).unwrap(), 3);
        assert_eq!(parse_score(&ScoreInput::Integer(999)).unwrap(), MAX_SCORE);
    }

    #[test]
    fn test_parse_score_rejects_bad_input() {
        for input in [
            ScoreInput::Integer(-1),
            ScoreInput::Fractional(2.5),
            ScoreInput::Text("two".to_string()),
            ScoreInput::Text("-3".to_string()),
            ScoreInput::Text("1.5".to_string()),
            ScoreInput::Integer(i64::from(MAX_SCORE) + 1),
            ScoreInput::Integer(i64::from(i32::MAX) + 1),
            ScoreInput::Fractional(1e12),
            ScoreInput::Fractional(f64::NAN),
            ScoreInput::Text("1000".to_string()),
            ScoreInput::Other(serde_json::Value::Null),
            ScoreInput::Other(serde_json::json!(true)),
            ScoreInput::Other(serde_json::json!({ "goals": 2 })),
        ] {
            assert!(
                matches!(parse_score(&input), Err(TournamentError::InvalidScore(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_tournament_name() {
        assert_eq!(
            normalize_tournament_name("  Sunday League ").unwrap(),
            "Sunday League"
        );
        assert!(normalize_tournament_name("   ").is_err());
        assert!(normalize_tournament_name(&"x".repeat(MAX_TOURNAMENT_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_normalize_message() {
        assert_eq!(normalize_message(" gg \n").unwrap(), "gg");
        assert!(matches!(
            normalize_message(""),
            Err(TournamentError::InvalidMessage(_))
        ));
        assert!(normalize_message(&"a".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(normalize_message(&"a".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }
}
