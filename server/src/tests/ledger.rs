use chrono::Duration;
use futures::future::join_all;
use shared::{GameStatus, UserStat};

use super::*;
use crate::{error::Error, store::Store};

#[rocket::async_test]
async fn coins_follow_the_fixed_rate() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let user = server.user("Alice").await;

    let submission = server.submit(user.id, 120).await;

    assert_eq!(submission.game.coins_earned, 12);
    assert_eq!(submission.game.status, GameStatus::End);
    assert_eq!(submission.game.ended_at, Some(server.now()));
    assert_eq!(submission.game.started_at, server.now() - Duration::seconds(35));
    assert_eq!(submission.user_stat.total_coin_earned, 12);
    assert_eq!(
        submission.current_tier.map(|tier| tier.title),
        Some("Rookie 2".to_string())
    );
}

#[rocket::async_test]
async fn best_score_only_moves_up() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let user = server.user("Alice").await;

    assert_eq!(server.submit(user.id, 300).await.user_stat.best_score, 300);
    assert_eq!(server.submit(user.id, 300).await.user_stat.best_score, 300);
    assert_eq!(server.submit(user.id, 500).await.user_stat.best_score, 500);

    let stat = server.submit(user.id, 100).await.user_stat;
    assert_eq!(stat.best_score, 500);
    assert_eq!(stat.total_game_played, 4);
    assert_eq!(stat.total_coin_earned, 30 + 30 + 50 + 10);
}

#[rocket::async_test]
async fn current_tier_never_regresses() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let user = server.user("Alice").await;

    let mut previous = 0;
    for score in [600, 20, 250, 900, 0, 4500, 10] {
        server.submit(user.id, score).await;
        let order = server.current_tier_order(user.id).await.unwrap();
        assert!(order >= previous, "tier regressed after score {score}");
        previous = order;
    }

    let ladder = server.backend.ladder().await.unwrap();
    assert_eq!(previous, ladder.resolve(4500).unwrap().overall_order);
}

#[rocket::async_test]
async fn resubmission_overwrites_the_session() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let user = server.user("Alice").await;

    let started = server.backend.start_session(user.id).await.unwrap();
    assert_eq!(started.status, GameStatus::InProgress);

    let submit = |score| SubmitResult {
        game_id: Some(started.id),
        user_id: user.id,
        season_id: None,
        result: result(score),
    };
    let first = server.backend.submit_result(submit(400)).await.unwrap();
    assert_eq!(first.game.id, started.id);
    assert_eq!(first.game.coins_earned, 40);

    let second = server.backend.submit_result(submit(90)).await.unwrap();
    assert_eq!(second.game.id, started.id);
    assert_eq!(second.game.score, 90);
    assert_eq!(second.game.coins_earned, 9);
    assert_eq!(second.user_stat.best_score, 400);

    let games = server.backend.user_games(user.id).await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].score, 90);
}

#[rocket::async_test]
async fn foreign_game_id_starts_a_new_session() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let alice = server.user("Alice").await;
    let bob = server.user("Bob").await;

    let game = server.backend.start_session(alice.id).await.unwrap();
    let submission = server
        .backend
        .submit_result(SubmitResult {
            game_id: Some(game.id),
            user_id: bob.id,
            season_id: None,
            result: result(70),
        })
        .await
        .unwrap();

    assert_ne!(submission.game.id, game.id);
    assert_eq!(submission.game.user_id, bob.id);
    assert_eq!(
        server.backend.game(game.id).await.unwrap().status,
        GameStatus::InProgress
    );
}

#[rocket::async_test]
async fn sessions_need_a_season() {
    let server = ServerExt::new().await;
    let user = server.user("Alice").await;

    assert!(matches!(
        server.backend.start_session(user.id).await,
        Err(Error::Domain(_))
    ));
    let missing = server
        .backend
        .submit_result(SubmitResult {
            game_id: None,
            user_id: user.id,
            season_id: None,
            result: result(10),
        })
        .await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    let unknown = server
        .backend
        .submit_result(SubmitResult {
            game_id: None,
            user_id: user.id,
            season_id: Some(999),
            result: result(10),
        })
        .await;
    assert!(matches!(unknown, Err(Error::NotFound(_))));
}

#[rocket::async_test]
async fn unknown_user_is_rejected() {
    let server = ServerExt::new().await;
    server.active_season().await;

    assert!(matches!(
        server.backend.start_session(42).await,
        Err(Error::NotFound(_))
    ));
    let submission = server
        .backend
        .submit_result(SubmitResult {
            game_id: None,
            user_id: 42,
            season_id: None,
            result: result(10),
        })
        .await;
    assert!(matches!(submission, Err(Error::NotFound(_))));
}

#[rocket::async_test]
async fn explicit_past_season_keeps_global_tier() {
    let server = ServerExt::new().await;
    let past = server.season("Winter", -60, -30).await;
    server.active_season().await;
    let user = server.user("Alice").await;

    let submission = server
        .backend
        .submit_result(SubmitResult {
            game_id: None,
            user_id: user.id,
            season_id: Some(past.id),
            result: result(2500),
        })
        .await
        .unwrap();

    assert_eq!(submission.game.season_id, Some(past.id));
    assert_eq!(submission.user_stat.season_id, past.id);
    assert!(submission.user_stat.highest_tier_reached.is_some());
    assert_eq!(
        submission.current_tier.map(|tier| tier.title),
        Some("Elite 2".to_string())
    );
    assert_eq!(server.current_tier_order(user.id).await, None);
}

#[rocket::async_test]
async fn user_stat_is_unique_per_season() {
    let server = ServerExt::new().await;
    let season = server.active_season().await;
    let user = server.user("Alice").await;

    let stat = UserStat::new(user.id, season.id);
    server.store.insert_user_stat(&stat).await.unwrap();
    assert!(matches!(
        server.store.insert_user_stat(&stat).await,
        Err(Error::Conflict(_))
    ));
}

#[rocket::async_test]
async fn stale_stat_versions_are_rejected() {
    let server = ServerExt::new().await;
    let season = server.active_season().await;
    let user = server.user("Alice").await;
    server.submit(user.id, 100).await;

    let mut stale = server.store.user_stat(user.id, season.id).await.unwrap().unwrap();
    server.submit(user.id, 200).await;

    stale.best_score = 5;
    assert!(!server.store.save_user_stat(&stale).await.unwrap());
    let stored = server.backend.user_stat(user.id, season.id).await.unwrap();
    assert_eq!(stored.best_score, 200);
    assert_eq!(stored.version, 1);
}

#[rocket::async_test]
async fn concurrent_submissions_are_all_counted() {
    let server = ServerExt::new().await;
    let season = server.active_season().await;
    let user = server.user("Alice").await;

    let submissions = [100, 700, 300, 50].map(|score| {
        server.backend.submit_result(SubmitResult {
            game_id: None,
            user_id: user.id,
            season_id: None,
            result: result(score),
        })
    });
    for submission in join_all(submissions).await {
        submission.unwrap();
    }

    let stat = server.backend.user_stat(user.id, season.id).await.unwrap();
    assert_eq!(stat.total_game_played, 4);
    assert_eq!(stat.best_score, 700);
    assert_eq!(stat.total_coin_earned, 10 + 70 + 30 + 5);
}

#[rocket::async_test]
async fn leaderboard_orders_by_best_score() {
    let server = ServerExt::new().await;
    server.active_season().await;

    let mut users = vec![];
    for (name, score) in [("A", 50), ("B", 90), ("C", 90), ("D", 30)] {
        let user = server.user(name).await;
        server.submit(user.id, score).await;
        users.push(user);
    }
    // Unfinished sessions do not count.
    server.backend.start_session(users[3].id).await.unwrap();

    let leaderboard = server.backend.leaderboard().await.unwrap();
    let ranking: Vec<_> = leaderboard
        .iter()
        .map(|entry| (entry.name.as_str(), entry.max_score))
        .collect();
    assert_eq!(ranking, [("B", 90), ("C", 90), ("A", 50), ("D", 30)]);
}

#[rocket::async_test]
async fn leaderboard_keeps_top_ten() {
    let server = ServerExt::new().await;
    server.active_season().await;

    for i in 0..12 {
        let user = server.user(&format!("Player{i}")).await;
        server.submit(user.id, 10 * i).await;
        server.submit(user.id, 5).await;
    }

    let leaderboard = server.backend.leaderboard().await.unwrap();
    assert_eq!(leaderboard.len(), 10);
    assert_eq!(leaderboard[0].max_score, 110);
    assert_eq!(leaderboard[9].max_score, 20);
}

#[rocket::async_test]
async fn user_games_are_newest_first() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let user = server.user("Alice").await;

    server.submit(user.id, 10).await;
    server.advance(Duration::minutes(5));
    server.submit(user.id, 20).await;

    let scores: Vec<_> = server
        .backend
        .user_games(user.id)
        .await
        .unwrap()
        .iter()
        .map(|game| game.score)
        .collect();
    assert_eq!(scores, [20, 10]);
    assert!(matches!(
        server.backend.user_games(999).await,
        Err(Error::NotFound(_))
    ));
}
