//! Tournament orchestration module
//!
//! Database-coupled operations. Every write runs inside a single
//! transaction that commits on `Ok` and rolls back on any error, and every
//! row that is read-modified-written is selected `FOR UPDATE`.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::{LockType, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::dto::generation_report::GenerationReport;
use crate::dto::result_update::ResultUpdate;
use crate::dto::tournament_snapshot::{StandingSnapshot, TournamentInfo, TournamentSnapshot};
use crate::dto::tournament_summary::TournamentSummary;
use crate::entity::{fixtures, standings, tournament_players, tournaments, users};
use crate::error::TournamentError;
use crate::tournament_management::fixtures::{double_round_robin, Schedule};
use crate::tournament_management::invite::{generate_invite_code, looks_like_invite_code};
use crate::tournament_management::rules::{normalize_tournament_name, validate_score};
use crate::tournament_management::standings::{rank_standings, LifetimeRecord, StandingStats};

const INVITE_CODE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(tournaments::Model),
    AlreadyMember(tournaments::Model),
}

impl JoinOutcome {
    pub fn tournament(&self) -> &tournaments::Model {
        match self {
            JoinOutcome::Joined(t) | JoinOutcome::AlreadyMember(t) => t,
        }
    }

    pub fn is_new_member(&self) -> bool {
        matches!(self, JoinOutcome::Joined(_))
    }
}

/// Usernames of a tournament's members, in join order
pub async fn member_usernames<C: ConnectionTrait>(
    conn: &C,
    tournament_id: i32,
) -> Result<Vec<String>, DbErr> {
    let rows = tournament_players::Entity::find()
        .filter(tournament_players::Column::TournamentId.eq(tournament_id))
        .order_by_asc(tournament_players::Column::Id)
        .find_also_related(users::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(_, user)| user.map(|u| u.username))
        .collect())
}

/// Create a tournament with a fresh invite code and enrol its creator
pub async fn create_tournament(
    db: &DatabaseConnection,
    creator: &users::Model,
    name: &str,
) -> Result<tournaments::Model, TournamentError> {
    let name = normalize_tournament_name(name)?;
    let creator = creator.clone();

    let tournament = db
        .transaction(|txn| Box::pin(create_tournament_transaction(creator, name, txn)))
        .await?;

    info!(
        tournament_id = tournament.id,
        created_by = %tournament.created_by,
        "Tournament created"
    );
    Ok(tournament)
}

async fn create_tournament_transaction(
    creator: users::Model,
    name: String,
    txn: &DatabaseTransaction,
) -> Result<tournaments::Model, TournamentError> {
    let invite_code = unused_invite_code(txn).await?;
    let now: DateTime<FixedOffset> = Utc::now().into();

    let tournament = tournaments::ActiveModel {
        name: Set(name),
        created_by: Set(creator.username.clone()),
        invite_code: Set(invite_code),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    tournament_players::ActiveModel {
        tournament_id: Set(tournament.id),
        user_id: Set(creator.id),
        joined_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(tournament)
}

async fn unused_invite_code<C: ConnectionTrait>(conn: &C) -> Result<String, DbErr> {
    for _ in 0..INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code();
        let taken = tournaments::Entity::find()
            .filter(tournaments::Column::InviteCode.eq(code.as_str()))
            .count(conn)
            .await?;
        if taken == 0 {
            return Ok(code);
        }
        warn!("Invite code collision, drawing another");
    }
    Err(DbErr::Custom(
        "could not allocate a unique invite code".to_string(),
    ))
}

/// Join the tournament an invite code points at. Joining twice is not an error.
pub async fn join_by_invite(
    db: &DatabaseConnection,
    user: &users::Model,
    invite_code: &str,
) -> Result<JoinOutcome, TournamentError> {
    let invite_code = invite_code.trim();
    if !looks_like_invite_code(invite_code) {
        return Err(TournamentError::InviteNotFound);
    }

    let tournament = tournaments::Entity::find()
        .filter(tournaments::Column::InviteCode.eq(invite_code))
        .one(db)
        .await?
        .ok_or(TournamentError::InviteNotFound)?;

    join_tournament(db, user, tournament).await
}

pub async fn join_tournament(
    db: &DatabaseConnection,
    user: &users::Model,
    tournament: tournaments::Model,
) -> Result<JoinOutcome, TournamentError> {
    let existing = tournament_players::Entity::find()
        .filter(tournament_players::Column::TournamentId.eq(tournament.id))
        .filter(tournament_players::Column::UserId.eq(user.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(JoinOutcome::AlreadyMember(tournament));
    }

    let membership = tournament_players::ActiveModel {
        tournament_id: Set(tournament.id),
        user_id: Set(user.id),
        joined_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match membership.insert(db).await {
        Ok(_) => {
            info!(
                tournament_id = tournament.id,
                username = %user.username,
                "Player joined tournament"
            );
            Ok(JoinOutcome::Joined(tournament))
        }
        // Lost a race with a concurrent join of the same user
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(JoinOutcome::AlreadyMember(tournament))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace the tournament's fixtures and standings with a fresh double
/// round-robin over `participants`.
///
/// With fewer than two distinct participants nothing is touched and
/// `InsufficientParticipants` is returned.
pub async fn generate_fixtures(
    db: &DatabaseConnection,
    tournament_id: i32,
    participants: Vec<String>,
) -> Result<GenerationReport, TournamentError> {
    let schedule = match double_round_robin(&participants) {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!(tournament_id, error = %e, "Fixture generation refused");
            return Err(e);
        }
    };

    let report = db
        .transaction(|txn| {
            Box::pin(async move {
                lock_tournament(tournament_id, txn).await?;
                write_schedule(tournament_id, schedule, txn).await
            })
        })
        .await?;

    log_generation(&report);
    Ok(report)
}

/// Regenerate fixtures over the tournament's current members
pub async fn generate_for_members(
    db: &DatabaseConnection,
    tournament_id: i32,
) -> Result<GenerationReport, TournamentError> {
    let result = db
        .transaction(|txn| Box::pin(generate_for_members_transaction(tournament_id, txn)))
        .await
        .map_err(TournamentError::from);

    match result {
        Ok(report) => {
            log_generation(&report);
            Ok(report)
        }
        Err(e) => {
            warn!(tournament_id, error = %e, "Fixture generation refused");
            Err(e)
        }
    }
}

async fn generate_for_members_transaction(
    tournament_id: i32,
    txn: &DatabaseTransaction,
) -> Result<GenerationReport, TournamentError> {
    lock_tournament(tournament_id, txn).await?;
    let participants = member_usernames(txn, tournament_id).await?;
    let schedule = double_round_robin(&participants)?;
    write_schedule(tournament_id, schedule, txn).await
}

async fn lock_tournament(
    tournament_id: i32,
    txn: &DatabaseTransaction,
) -> Result<tournaments::Model, TournamentError> {
    tournaments::Entity::find_by_id(tournament_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))
}

async fn write_schedule(
    tournament_id: i32,
    schedule: Schedule,
    txn: &DatabaseTransaction,
) -> Result<GenerationReport, TournamentError> {
    // Regeneration is destructive: previous results are discarded
    fixtures::Entity::delete_many()
        .filter(fixtures::Column::TournamentId.eq(tournament_id))
        .exec(txn)
        .await?;
    standings::Entity::delete_many()
        .filter(standings::Column::TournamentId.eq(tournament_id))
        .exec(txn)
        .await?;

    let fixture_rows = schedule.pairings.iter().map(|pairing| fixtures::ActiveModel {
        tournament_id: Set(tournament_id),
        home: Set(pairing.home.clone()),
        away: Set(pairing.away.clone()),
        home_score: Set(0),
        away_score: Set(0),
        played: Set(false),
        ..Default::default()
    });
    fixtures::Entity::insert_many(fixture_rows).exec(txn).await?;

    let standing_rows = schedule.participants.iter().map(|player| {
        let mut row = standings::ActiveModel {
            tournament_id: Set(tournament_id),
            player: Set(player.clone()),
            ..Default::default()
        };
        StandingStats::default().write_to(&mut row);
        row
    });
    standings::Entity::insert_many(standing_rows).exec(txn).await?;

    Ok(GenerationReport {
        tournament_id,
        fixtures_created: schedule.pairings.len(),
        standings_created: schedule.participants.len(),
        participants: schedule.participants,
    })
}

fn log_generation(report: &GenerationReport) {
    info!(
        tournament_id = report.tournament_id,
        fixtures = report.fixtures_created,
        standings = report.standings_created,
        "Generated double round-robin fixtures"
    );
}

/// Record a fixture's final score and update both players' standings.
///
/// If the fixture already had a result, that result's contribution is
/// removed from both standings before the new one is applied. The players'
/// lifetime win/loss records move with it.
pub async fn record_result(
    db: &DatabaseConnection,
    tournament_id: i32,
    fixture_id: i32,
    home_score: i32,
    away_score: i32,
) -> Result<ResultUpdate, TournamentError> {
    if let Err(e) = validate_score(home_score, away_score) {
        warn!(tournament_id, fixture_id, error = %e, "Score rejected");
        return Err(e);
    }

    let update = db
        .transaction(|txn| {
            Box::pin(record_result_transaction(
                tournament_id,
                fixture_id,
                home_score,
                away_score,
                txn,
            ))
        })
        .await?;

    info!(
        tournament_id,
        fixture_id,
        home = %update.fixture.home,
        away = %update.fixture.away,
        home_score,
        away_score,
        rescored = update.rescored,
        "Result recorded"
    );
    Ok(update)
}

async fn record_result_transaction(
    tournament_id: i32,
    fixture_id: i32,
    home_score: i32,
    away_score: i32,
    txn: &DatabaseTransaction,
) -> Result<ResultUpdate, TournamentError> {
    let fixture = fixtures::Entity::find_by_id(fixture_id)
        .filter(fixtures::Column::TournamentId.eq(tournament_id))
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(TournamentError::FixtureNotFound {
            tournament_id,
            fixture_id,
        })?;

    let previous = fixture
        .played
        .then_some((fixture.home_score, fixture.away_score));

    // Both rows locked in name order so concurrent updates cannot deadlock
    let rows = standings::Entity::find()
        .filter(standings::Column::TournamentId.eq(tournament_id))
        .filter(standings::Column::Player.is_in([fixture.home.clone(), fixture.away.clone()]))
        .order_by_asc(standings::Column::Player)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    let home_row = find_row(&rows, tournament_id, &fixture.home)?;
    let away_row = find_row(&rows, tournament_id, &fixture.away)?;

    let mut home_stats = StandingStats::from(&home_row);
    let mut away_stats = StandingStats::from(&away_row);

    if let Some((old_home, old_away)) = previous {
        home_stats.revert(old_home, old_away);
        away_stats.revert(old_away, old_home);
    }
    home_stats.apply(home_score, away_score);
    away_stats.apply(away_score, home_score);

    let mut fixture_model: fixtures::ActiveModel = fixture.into();
    fixture_model.home_score = Set(home_score);
    fixture_model.away_score = Set(away_score);
    fixture_model.played = Set(true);
    let fixture = fixture_model.update(txn).await?;

    let home = save_standing(home_row, home_stats, txn).await?;
    let away = save_standing(away_row, away_stats, txn).await?;

    update_lifetime_records(&fixture, previous, txn).await?;

    Ok(ResultUpdate {
        fixture,
        home,
        away,
        rescored: previous.is_some(),
    })
}

fn find_row(
    rows: &[standings::Model],
    tournament_id: i32,
    player: &str,
) -> Result<standings::Model, TournamentError> {
    rows.iter()
        .find(|row| row.player == player)
        .cloned()
        .ok_or_else(|| TournamentError::MissingStanding {
            tournament_id,
            player: player.to_string(),
        })
}

async fn save_standing(
    row: standings::Model,
    stats: StandingStats,
    txn: &DatabaseTransaction,
) -> Result<standings::Model, DbErr> {
    let mut model: standings::ActiveModel = row.into();
    stats.write_to(&mut model);
    model.update(txn).await
}

/// Move the lifetime records of the fixture's players from `previous` (if
/// the fixture had been played) to its current score. Participants without
/// a user account have no record and are skipped.
async fn update_lifetime_records(
    fixture: &fixtures::Model,
    previous: Option<(i32, i32)>,
    txn: &DatabaseTransaction,
) -> Result<(), DbErr> {
    // Same lock order as the standings rows
    let accounts = users::Entity::find()
        .filter(users::Column::Username.is_in([fixture.home.clone(), fixture.away.clone()]))
        .order_by_asc(users::Column::Username)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    for account in accounts {
        let (goals_for, goals_against) = if account.username == fixture.home {
            (fixture.home_score, fixture.away_score)
        } else {
            (fixture.away_score, fixture.home_score)
        };

        let before = LifetimeRecord::from(&account);
        let mut record = before;
        if let Some((old_home, old_away)) = previous {
            if account.username == fixture.home {
                record.revert(old_home, old_away);
            } else {
                record.revert(old_away, old_home);
            }
        }
        record.apply(goals_for, goals_against);

        if record != before {
            debug!(
                username = %account.username,
                wins = record.wins,
                losses = record.losses,
                "Lifetime record updated"
            );
            let mut model: users::ActiveModel = account.into();
            record.write_to(&mut model);
            model.update(txn).await?;
        }
    }
    Ok(())
}

/// Standings of a tournament in table order
pub async fn ranked_standings<C: ConnectionTrait>(
    conn: &C,
    tournament_id: i32,
) -> Result<Vec<standings::Model>, DbErr> {
    let mut rows = standings::Entity::find()
        .filter(standings::Column::TournamentId.eq(tournament_id))
        .order_by_desc(standings::Column::Points)
        .order_by_desc(standings::Column::Gd)
        .all(conn)
        .await?;
    rank_standings(&mut rows);
    Ok(rows)
}

/// Everything the tournament page shows
pub async fn load_snapshot(
    db: &DatabaseConnection,
    tournament_id: i32,
) -> Result<TournamentSnapshot, TournamentError> {
    let tournament = tournaments::Entity::find_by_id(tournament_id)
        .one(db)
        .await?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

    let players = member_usernames(db, tournament_id).await?;

    let fixtures = fixtures::Entity::find()
        .filter(fixtures::Column::TournamentId.eq(tournament_id))
        .order_by_asc(fixtures::Column::Id)
        .all(db)
        .await?;

    let standings = ranked_standings(db, tournament_id)
        .await?
        .into_iter()
        .enumerate()
        .map(|(index, row)| StandingSnapshot::from_ranked(index + 1, row))
        .collect();

    Ok(TournamentSnapshot {
        tournament: TournamentInfo {
            id: tournament.id,
            name: tournament.name,
            created_by: tournament.created_by,
            invite_code: tournament.invite_code,
            created_at: tournament.created_at,
        },
        players,
        fixtures,
        standings,
    })
}

/// Dashboard listing: tournaments the user belongs to, with player counts
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<TournamentSummary>, TournamentError> {
    let memberships = tournament_players::Entity::find()
        .filter(tournament_players::Column::UserId.eq(user_id))
        .order_by_asc(tournament_players::Column::Id)
        .find_also_related(tournaments::Entity)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(memberships.len());
    for (_, tournament) in memberships {
        let Some(tournament) = tournament else {
            continue;
        };
        summaries.push(summarize(db, tournament).await?);
    }

    Ok(summaries)
}

/// Calendar listing: tournaments whose fixtures have not been generated yet,
/// oldest first. These are the ones still gathering players.
pub async fn list_open(
    db: &DatabaseConnection,
) -> Result<Vec<TournamentSummary>, TournamentError> {
    let scheduled = Query::select()
        .column(fixtures::Column::TournamentId)
        .from(fixtures::Entity)
        .to_owned();

    let open = tournaments::Entity::find()
        .filter(tournaments::Column::Id.not_in_subquery(scheduled))
        .order_by_asc(tournaments::Column::CreatedAt)
        .order_by_asc(tournaments::Column::Id)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(open.len());
    for tournament in open {
        summaries.push(summarize(db, tournament).await?);
    }
    Ok(summaries)
}

async fn summarize(
    db: &DatabaseConnection,
    tournament: tournaments::Model,
) -> Result<TournamentSummary, DbErr> {
    let player_count = tournament_players::Entity::find()
        .filter(tournament_players::Column::TournamentId.eq(tournament.id))
        .count(db)
        .await?;

    Ok(TournamentSummary {
        id: tournament.id,
        name: tournament.name,
        created_by: tournament.created_by,
        invite_code: tournament.invite_code,
        player_count,
        created_at: tournament.created_at,
    })
}
