use rocket::{response::status::Created, serde::json::Json, State};
use shared::{NewSeason, Season, SeasonId};

use super::{auth::AdminUser, types::RefreshResponse};
use crate::{
    error::{Error, Result},
    seasons::{RolloverReport, SeasonPatch},
    Backend,
};

#[post("/seasons", data = "<season>")]
async fn create_season(
    _admin: AdminUser,
    season: Json<NewSeason>,
    backend: &State<Backend>,
) -> Result<Created<Json<Season>>> {
    let season = backend.create_season(season.into_inner()).await?;
    Ok(Created::new(format!("/seasons/{}", season.id)).body(Json(season)))
}

#[get("/seasons")]
async fn seasons(backend: &State<Backend>) -> Result<Json<Vec<Season>>> {
    Ok(Json(backend.seasons().await?))
}

#[get("/seasons/active")]
async fn active_season(backend: &State<Backend>) -> Result<Json<Season>> {
    backend
        .active_season()
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("No current season is active".to_string()))
}

#[get("/seasons/<id>")]
async fn season(id: SeasonId, backend: &State<Backend>) -> Result<Json<Season>> {
    Ok(Json(backend.season(id).await?))
}

#[put("/seasons/<id>", data = "<patch>")]
async fn update_season(
    _admin: AdminUser,
    id: SeasonId,
    patch: Json<SeasonPatch>,
    backend: &State<Backend>,
) -> Result<Json<Season>> {
    Ok(Json(backend.update_season(id, patch.into_inner()).await?))
}

#[delete("/seasons/<id>")]
async fn delete_season(
    _admin: AdminUser,
    id: SeasonId,
    backend: &State<Backend>,
) -> Result<Json<Season>> {
    Ok(Json(backend.delete_season(id).await?))
}

#[post("/seasons/status/refresh")]
async fn refresh_statuses(
    _admin: AdminUser,
    backend: &State<Backend>,
) -> Result<Json<RefreshResponse>> {
    Ok(Json(RefreshResponse {
        updated: backend.refresh_statuses().await?,
    }))
}

#[post("/seasons/rollover")]
async fn rollover(_admin: AdminUser, backend: &State<Backend>) -> Result<Json<RolloverReport>> {
    Ok(Json(backend.rollover().await?))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing season entrypoints", |rocket| async {
        rocket.mount(
            "/",
            routes![
                create_season,
                seasons,
                active_season,
                season,
                update_season,
                delete_season,
                refresh_statuses,
                rollover
            ],
        )
    })
}
