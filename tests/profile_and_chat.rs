mod common;

use common::{seed_tournament, seed_user, test_bootstrap};
use sea_orm::{ActiveModelTrait, Set};
use tourney::entity::users;
use tourney::error::{AuthError, TournamentError};
use tourney::tournament_management::chat::{list_messages, post_message};
use tourney::user_management::{leaderboard, update_bio, MAX_BIO_LEN};

#[actix_web::test]
async fn bio_is_trimmed_and_bounded() -> anyhow::Result<()> {
    let db = test_bootstrap().await;
    let user = seed_user(&db, "ana").await;

    let updated = update_bio(&db, &user, "  Keeper, weekends only \n").await?;
    assert_eq!(updated.bio, "Keeper, weekends only");

    let err = update_bio(&db, &updated, &"b".repeat(MAX_BIO_LEN + 1)).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));

    let cleared = update_bio(&db, &updated, "   ").await?;
    assert_eq!(cleared.bio, "");
    Ok(())
}

#[actix_web::test]
async fn leaderboard_orders_by_wins_then_losses_then_name() -> anyhow::Result<()> {
    let db = test_bootstrap().await;
    for (name, wins, losses) in [("dan", 2, 5), ("eve", 4, 1), ("bea", 2, 1), ("cal", 2, 1)] {
        let mut user: users::ActiveModel = seed_user(&db, name).await.into();
        user.wins = Set(wins);
        user.losses = Set(losses);
        user.update(&db).await?;
    }

    let board = leaderboard(&db).await?;
    let order: Vec<(usize, &str)> = board
        .iter()
        .map(|entry| (entry.position, entry.username.as_str()))
        .collect();
    assert_eq!(order, vec![(1, "eve"), (2, "bea"), (3, "cal"), (4, "dan")]);
    Ok(())
}

#[actix_web::test]
async fn members_post_and_everyone_reads_chat() -> anyhow::Result<()> {
    let db = test_bootstrap().await;
    let tournament = seed_tournament(&db, &["host", "guest"]).await;
    let host = common::find_user(&db, "host").await;
    let guest = common::find_user(&db, "guest").await;
    let outsider = seed_user(&db, "outsider").await;

    post_message(&db, tournament.id, &host, "  kick-off at 8  ").await?;
    post_message(&db, tournament.id, &guest, "see you there").await?;

    let err = post_message(&db, tournament.id, &outsider, "hi").await.unwrap_err();
    assert!(matches!(err, TournamentError::NotAMember(id) if id == tournament.id));

    let err = post_message(&db, tournament.id, &host, "   ").await.unwrap_err();
    assert!(matches!(err, TournamentError::InvalidMessage(_)));

    let messages = list_messages(&db, tournament.id).await?;
    let lines: Vec<(&str, &str)> = messages
        .iter()
        .map(|m| (m.username.as_str(), m.body.as_str()))
        .collect();
    assert_eq!(lines, vec![("host", "kick-off at 8"), ("guest", "see you there")]);

    let err = list_messages(&db, 777).await.unwrap_err();
    assert!(matches!(err, TournamentError::TournamentNotFound(777)));
    let err = post_message(&db, 777, &host, "anyone?").await.unwrap_err();
    assert!(matches!(err, TournamentError::TournamentNotFound(777)));
    Ok(())
}
