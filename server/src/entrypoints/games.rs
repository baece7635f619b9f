use rocket::{response::status::Created, serde::json::Json, State};
use shared::{Game, GameId, UserId};

use super::{
    auth::AuthenticatedUser,
    types::{LeaderboardResponse, SubmitGameRequest},
};
use crate::{error::Result, ledger::Submission, Backend};

#[post("/game/start")]
async fn start_game(
    user: AuthenticatedUser,
    backend: &State<Backend>,
) -> Result<Created<Json<Game>>> {
    let game = backend.start_session(user.0).await?;
    Ok(Created::new(format!("/games/{}", game.id)).body(Json(game)))
}

#[post("/games", data = "<request>")]
async fn submit_game(
    user: AuthenticatedUser,
    request: Json<SubmitGameRequest>,
    backend: &State<Backend>,
) -> Result<Created<Json<Submission>>> {
    let submit = request.into_inner().into_submit(user.0)?;
    let submission = backend.submit_result(submit).await?;
    Ok(Created::new(format!("/games/{}", submission.game.id)).body(Json(submission)))
}

#[get("/games/leaderboard")]
async fn leaderboard(backend: &State<Backend>) -> Result<Json<LeaderboardResponse>> {
    Ok(Json(LeaderboardResponse {
        leaderboard: backend.leaderboard().await?,
    }))
}

#[get("/games/user/<user>")]
async fn user_games(user: UserId, backend: &State<Backend>) -> Result<Json<Vec<Game>>> {
    Ok(Json(backend.user_games(user).await?))
}

#[get("/games/<id>")]
async fn game(id: GameId, backend: &State<Backend>) -> Result<Json<Game>> {
    Ok(Json(backend.game(id).await?))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing game entrypoints", |rocket| async {
        rocket.mount(
            "/",
            routes![start_game, submit_game, leaderboard, user_games, game],
        )
    })
}
