use rocket::http::{ContentType, Header, Status};
use serde_json::{json, Value};
use shared::{Game, Season, Tier};

use super::*;
use crate::entrypoints::auth::USER_ID_HEADER;

fn as_user(id: UserId) -> Header<'static> {
    Header::new(USER_ID_HEADER, id.to_string())
}

#[rocket::async_test]
async fn game_flow_over_http() {
    let server = ServerExt::new().await;
    let admin = server.admin().await;
    let client = server.client().await;

    let response = client
        .post("/users")
        .header(ContentType::JSON)
        .body(json!({ "name": "Alice", "email": "alice@flappy.test" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let alice: User = response.into_json().await.unwrap();

    let response = client.post("/game/start").header(as_user(alice.id)).dispatch().await;
    assert_eq!(response.status(), Status::PaymentRequired);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "No current season is active");

    let now = server.now();
    let response = client
        .post("/seasons")
        .header(as_user(admin.id))
        .header(ContentType::JSON)
        .body(
            json!({
                "title": "Spring",
                "start_date": now - chrono::Duration::days(1),
                "end_date": now + chrono::Duration::days(30),
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let season: Season = response.into_json().await.unwrap();

    let response = client.post("/game/start").header(as_user(alice.id)).dispatch().await;
    assert_eq!(response.status(), Status::Created);
    let game: Game = response.into_json().await.unwrap();
    assert_eq!(game.season_id, Some(season.id));

    let response = client
        .post("/games")
        .header(as_user(alice.id))
        .header(ContentType::JSON)
        .body(json!({ "game_id": game.id, "score": 120, "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["game"]["id"], game.id);
    assert_eq!(body["game"]["coins_earned"], 12);
    assert_eq!(body["game"]["status"], "end");
    assert_eq!(body["user_stat"]["best_score"], 120);
    assert_eq!(body["current_tier"]["title"], "Rookie 2");

    let response = client.get("/games/leaderboard").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["leaderboard"][0]["user_id"], alice.id);
    assert_eq!(body["leaderboard"][0]["max_score"], 120);

    let response = client
        .get(format!("/games/user/{}", alice.id))
        .dispatch()
        .await;
    let games: Vec<Game> = response.into_json().await.unwrap();
    assert_eq!(games.len(), 1);

    let response = client
        .get(format!("/users/{}/stats/{}", alice.id, season.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn invalid_results_are_client_errors() {
    let server = ServerExt::new().await;
    server.active_season().await;
    let alice = server.user("Alice").await;
    let client = server.client().await;

    let response = client
        .post("/games")
        .header(as_user(alice.id))
        .header(ContentType::JSON)
        .body(json!({ "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "score is required");

    let response = client
        .post("/games")
        .header(as_user(alice.id))
        .header(ContentType::JSON)
        .body(json!({ "score": -5, "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/games")
        .header(as_user(alice.id))
        .header(ContentType::JSON)
        .body(json!({ "score": "lots", "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert!(response.status().class().is_client_error());
    let body: Value = response.into_json().await.unwrap();
    assert!(body["message"].is_string());

    let response = client
        .post("/games")
        .header(ContentType::JSON)
        .body(json!({ "score": 10, "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .post("/games")
        .header(as_user(999))
        .header(ContentType::JSON)
        .body(json!({ "score": 10, "duration": 35 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn tier_administration() {
    let server = ServerExt::new().await;
    let admin = server.admin().await;
    let alice = server.user("Alice").await;
    let client = server.client().await;
    let tier = json!({
        "category": "Legend",
        "level": 2,
        "min_score": 0,
        "max_score": 10,
        "overall_order": 11,
        "tier_multiplier": 4.0,
    });

    let response = client
        .post("/tiers")
        .header(as_user(alice.id))
        .header(ContentType::JSON)
        .body(tier.to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .post("/tiers")
        .header(as_user(admin.id))
        .header(ContentType::JSON)
        .body(tier.to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client.get("/tiers").dispatch().await;
    let tiers: Vec<Tier> = response.into_json().await.unwrap();
    assert_eq!(tiers.len(), 10);

    let response = client
        .put(format!("/tiers/{}", tiers[9].id))
        .header(as_user(admin.id))
        .header(ContentType::JSON)
        .body(json!({ "level": 2 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Tier = response.into_json().await.unwrap();
    assert_eq!(updated.title, "Legend 2");
}

#[rocket::async_test]
async fn season_administration() {
    let server = ServerExt::new().await;
    let admin = server.admin().await;
    let client = server.client().await;

    let response = client.get("/seasons/active").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let spring = server.season("Spring", 1, 30).await;
    server.advance(chrono::Duration::days(2));

    let response = client
        .post("/seasons/status/refresh")
        .header(as_user(admin.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["updated"], 1);

    let response = client.get("/seasons/active").dispatch().await;
    let active: Season = response.into_json().await.unwrap();
    assert_eq!(active.id, spring.id);

    let response = client
        .post("/seasons/rollover")
        .header(as_user(admin.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["season_id"], spring.id);
    assert_eq!(body["stats_inserted"], 1);

    let response = client
        .delete(format!("/seasons/{}", spring.id))
        .header(as_user(admin.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let response = client.get(format!("/seasons/{}", spring.id)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn ads_and_profile() {
    let server = ServerExt::new().await;
    let alice = server.user("Alice").await;
    let client = server.client().await;

    let response = client
        .post(format!("/users/{}/ads/rewarded", alice.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let user: User = response.into_json().await.unwrap();
    assert_eq!(user.ads_watched_today.rewarded, 1);

    let response = client
        .post(format!("/users/{}/ads/popup", alice.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/users")
        .header(ContentType::JSON)
        .body(json!({ "name": "Copy", "email": "alice@flappy.test" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client.get("/users/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "User 999 not found");
}
