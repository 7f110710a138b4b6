//! Fixture generation module
//!
//! Pure double round-robin generation. Persistence of the generated
//! schedule lives in the orchestration module.

use crate::error::TournamentError;
use crate::tournament_management::rules::MIN_PARTICIPANTS;

/// A fixture to be created, before it has an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub home: String,
    pub away: String,
}

/// Everything a (re)generation writes for one tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub pairings: Vec<Pairing>,
    /// One zeroed standing row is created per entry
    pub participants: Vec<String>,
}

/// Build a double round-robin schedule.
///
/// Every unordered pair {A, B} (taken in input order) yields A-B followed by
/// B-A. Repeated identifiers are collapsed to their first occurrence, so
/// `home != away` holds for every pairing.
pub fn double_round_robin(participants: &[String]) -> Result<Schedule, TournamentError> {
    let mut unique: Vec<String> = Vec::with_capacity(participants.len());
    for participant in participants {
        if !unique.contains(participant) {
            unique.push(participant.clone());
        }
    }

    if unique.len() < MIN_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            found: unique.len(),
        });
    }

    let mut pairings = Vec::with_capacity(unique.len() * (unique.len() - 1));
    for (i, first) in unique.iter().enumerate() {
        for second in &unique[i + 1..] {
            pairings.push(Pairing {
                home: first.clone(),
                away: second.clone(),
            });
            pairings.push(Pairing {
                home: second.clone(),
                away: first.clone(),
            });
        }
    }

    Ok(Schedule {
        pairings,
        participants: unique,
    })
}
