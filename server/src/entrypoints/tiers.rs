use rocket::{response::status::Created, serde::json::Json, State};
use shared::{NewTier, Tier, TierId};

use super::auth::AdminUser;
use crate::{error::Result, tiers::TierPatch, Backend};

#[post("/tiers", data = "<tier>")]
async fn create_tier(
    _admin: AdminUser,
    tier: Json<NewTier>,
    backend: &State<Backend>,
) -> Result<Created<Json<Tier>>> {
    let tier = backend.create_tier(tier.into_inner()).await?;
    Ok(Created::new(format!("/tiers/{}", tier.id)).body(Json(tier)))
}

#[get("/tiers")]
async fn tiers(backend: &State<Backend>) -> Result<Json<Vec<Tier>>> {
    Ok(Json(backend.tiers().await?))
}

#[get("/tiers/<id>")]
async fn tier(id: TierId, backend: &State<Backend>) -> Result<Json<Tier>> {
    Ok(Json(backend.tier(id).await?))
}

#[put("/tiers/<id>", data = "<patch>")]
async fn update_tier(
    _admin: AdminUser,
    id: TierId,
    patch: Json<TierPatch>,
    backend: &State<Backend>,
) -> Result<Json<Tier>> {
    Ok(Json(backend.update_tier(id, patch.into_inner()).await?))
}

#[delete("/tiers/<id>")]
async fn delete_tier(
    _admin: AdminUser,
    id: TierId,
    backend: &State<Backend>,
) -> Result<Json<Tier>> {
    Ok(Json(backend.delete_tier(id).await?))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing tier entrypoints", |rocket| async {
        rocket.mount(
            "/",
            routes![create_tier, tiers, tier, update_tier, delete_tier],
        )
    })
}
