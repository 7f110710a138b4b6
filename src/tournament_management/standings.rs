//! Standings module
//!
//! Pure standings arithmetic and ranking. A standing is only ever changed by
//! applying or reverting one fixture result, after which goal difference and
//! points are re-derived from the cumulative counters.

use std::cmp::Ordering;

use sea_orm::Set;
use serde::Serialize;

use crate::entity::{standings, users};
use crate::tournament_management::rules::{POINTS_FOR_DRAW, POINTS_FOR_WIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Classify a result from one side's point of view
    pub fn classify(goals_for: i32, goals_against: i32) -> Self {
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandingStats {
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub gf: i32,
    pub ga: i32,
    pub gd: i32,
    pub points: i32,
}

impl StandingStats {
    /// Add one result with `goals_for` scored and `goals_against` conceded
    pub fn apply(&mut self, goals_for: i32, goals_against: i32) {
        self.shift(goals_for, goals_against, 1);
    }

    /// Remove a result previously added with [`StandingStats::apply`]
    pub fn revert(&mut self, goals_for: i32, goals_against: i32) {
        self.shift(goals_for, goals_against, -1);
    }

    fn shift(&mut self, goals_for: i32, goals_against: i32, sign: i32) {
        self.played += sign;
        match Outcome::classify(goals_for, goals_against) {
            Outcome::Win => self.won += sign,
            Outcome::Draw => self.drawn += sign,
            Outcome::Loss => self.lost += sign,
        }
        self.gf += sign * goals_for;
        self.ga += sign * goals_against;

        // Derived columns are recomputed, never accumulated
        self.gd = self.gf - self.ga;
        self.points = self.won * POINTS_FOR_WIN + self.drawn * POINTS_FOR_DRAW;
    }

    /// `played == won + drawn + lost`, `gd == gf - ga` and points match the record
    pub fn is_consistent(&self) -> bool {
        self.played == self.won + self.drawn + self.lost
            && self.gd == self.gf - self.ga
            && self.points == self.won * POINTS_FOR_WIN + self.drawn * POINTS_FOR_DRAW
    }

    /// Copy the counters onto an active model for update
    pub fn write_to(&self, active: &mut standings::ActiveModel) {
        active.played = Set(self.played);
        active.won = Set(self.won);
        active.drawn = Set(self.drawn);
        active.lost = Set(self.lost);
        active.gf = Set(self.gf);
        active.ga = Set(self.ga);
        active.gd = Set(self.gd);
        active.points = Set(self.points);
    }
}

impl From<&standings::Model> for StandingStats {
    fn from(row: &standings::Model) -> Self {
        Self {
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

/// A user's win/loss tally across every tournament
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LifetimeRecord {
    pub wins: i32,
    pub losses: i32,
}

impl LifetimeRecord {
    pub fn apply(&mut self, goals_for: i32, goals_against: i32) {
        self.shift(goals_for, goals_against, 1);
    }

    pub fn revert(&mut self, goals_for: i32, goals_against: i32) {
        self.shift(goals_for, goals_against, -1);
    }

    fn shift(&mut self, goals_for: i32, goals_against: i32, sign: i32) {
        match Outcome::classify(goals_for, goals_against) {
            Outcome::Win => self.wins += sign,
            Outcome::Loss => self.losses += sign,
            Outcome::Draw => {}
        }
    }

    pub fn write_to(&self, active: &mut users::ActiveModel) {
        active.wins = Set(self.wins);
        active.losses = Set(self.losses);
    }
}

impl From<&users::Model> for LifetimeRecord {
    fn from(user: &users::Model) -> Self {
        Self {
            wins: user.wins,
            losses: user.losses,
        }
    }
}

/// Table order: points, then goal difference, then goals scored (all
/// descending), then player name ascending so the order is total.
pub fn compare_standings(a: &standings::Model, b: &standings::Model) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.gd.cmp(&a.gd))
        .then_with(|| b.gf.cmp(&a.gf))
        .then_with(|| a.player.cmp(&b.player))
}

pub fn rank_standings(rows: &mut [standings::Model]) {
    rows.sort_by(compare_standings);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, points: i32, gd: i32, gf: i32) -> standings::Model {
        standings::Model {
            id: 0,
            tournament_id: 1,
            player: player.to_string(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            gf,
            ga: gf - gd,
            gd,
            points,
        }
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(Outcome::classify(3, 1), Outcome::Win);
        assert_eq!(Outcome::classify(2, 2), Outcome::Draw);
        assert_eq!(Outcome::classify(0, 4), Outcome::Loss);
    }

    #[test]
    fn test_apply_win_and_loss() {
        let mut home = StandingStats::default();
        let mut away = StandingStats::default();

        home.apply(3, 1);
        away.apply(1, 3);

        assert_eq!(
            home,
            StandingStats {
                played: 1,
                won: 1,
                drawn: 0,
                lost: 0,
                gf: 3,
                ga: 1,
                gd: 2,
                points: 3,
            }
        );
        assert_eq!(
            away,
            StandingStats {
                played: 1,
                won: 0,
                drawn: 0,
                lost: 1,
                gf: 1,
                ga: 3,
                gd: -2,
                points: 0,
            }
        );
    }

    #[test]
    fn test_apply_draw() {
        let mut stats = StandingStats::default();
        stats.apply(2, 2);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.points, 1);
        assert_eq!(stats.gf, 2);
        assert_eq!(stats.ga, 2);
        assert_eq!(stats.gd, 0);
    }

    #[test]
    fn test_goal_difference_is_cumulative() {
        let mut stats = StandingStats::default();
        stats.apply(4, 0);
        stats.apply(1, 2);
        stats.apply(0, 0);
        assert_eq!(stats.gf, 5);
        assert_eq!(stats.ga, 2);
        assert_eq!(stats.gd, 3);
        assert_eq!(stats.points, 4);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_revert_undoes_apply() {
        let mut stats = StandingStats::default();
        stats.apply(2, 1);
        let before = stats;

        stats.apply(0, 3);
        stats.revert(0, 3);

        assert_eq!(stats, before);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_rescoring_replaces_previous_contribution() {
        // A 1-0 win corrected to a 1-1 draw
        let mut stats = StandingStats::default();
        stats.apply(1, 0);
        stats.revert(1, 0);
        stats.apply(1, 1);

        assert_eq!(stats.played, 1);
        assert_eq!(stats.won, 0);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.points, 1);
    }

    #[test]
    fn test_invariants_hold_over_a_season() {
        let results = [(3, 1), (0, 0), (2, 5), (1, 1), (4, 4), (6, 0), (0, 1)];
        let mut stats = StandingStats::default();
        for (gf, ga) in results {
            stats.apply(gf, ga);
            assert!(stats.is_consistent());
        }
        assert_eq!(stats.played, results.len() as i32);
    }

    #[test]
    fn test_rank_by_points_then_goal_difference() {
        let mut rows = vec![row("C", 7, 1, 5), row("B", 9, 2, 6), row("A", 9, 4, 6)];
        rank_standings(&mut rows);

        let order: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rank_tiebreaks_on_goals_for_then_name() {
        let mut rows = vec![
            row("zed", 4, 1, 3),
            row("amy", 4, 1, 3),
            row("max", 4, 1, 7),
        ];
        rank_standings(&mut rows);

        let order: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["max", "amy", "zed"]);
    }

    #[test]
    fn test_lifetime_record_ignores_draws() {
        let mut record = LifetimeRecord::default();
        record.apply(2, 0);
        record.apply(1, 1);
        record.apply(0, 3);
        assert_eq!(record, LifetimeRecord { wins: 1, losses: 1 });
    }

    #[test]
    fn test_lifetime_record_revert_swaps_outcome() {
        // A recorded win corrected to a loss
        let mut record = LifetimeRecord { wins: 4, losses: 2 };
        record.revert(2, 1);
        record.apply(1, 2);
        assert_eq!(record, LifetimeRecord { wins: 3, losses: 3 });
    }
}
