use rocket::{response::status::Created, serde::json::Json, State};
use shared::{AdKind, BirdId, NewUser, SeasonId, User, UserId, UserItem, UserStat};

use crate::{
    error::{Error, Result},
    Backend,
};

#[post("/users", data = "<user>")]
async fn register(user: Json<NewUser>, backend: &State<Backend>) -> Result<Created<Json<User>>> {
    let user = backend.register_user(user.into_inner()).await?;
    Ok(Created::new(format!("/users/{}", user.id)).body(Json(user)))
}

#[get("/users/<id>")]
async fn profile(id: UserId, backend: &State<Backend>) -> Result<Json<User>> {
    Ok(Json(backend.user(id).await?))
}

#[post("/users/<id>/ads/<kind>")]
async fn record_ad(id: UserId, kind: &str, backend: &State<Backend>) -> Result<Json<User>> {
    let kind: AdKind = kind
        .parse()
        .map_err(|_| Error::Validation(format!("Unknown ad kind: {kind}")))?;
    Ok(Json(backend.record_ad_view(id, kind).await?))
}

#[get("/users/<id>/stats/<season>")]
async fn season_stats(
    id: UserId,
    season: SeasonId,
    backend: &State<Backend>,
) -> Result<Json<UserStat>> {
    Ok(Json(backend.user_stat(id, season).await?))
}

#[put("/users/<id>/bird/<bird>")]
async fn equip_bird(id: UserId, bird: BirdId, backend: &State<Backend>) -> Result<Json<User>> {
    Ok(Json(backend.equip_bird(id, bird).await?))
}

#[get("/users/<id>/items")]
async fn items(id: UserId, backend: &State<Backend>) -> Result<Json<Vec<UserItem>>> {
    Ok(Json(backend.user_items(id).await?))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing user entrypoints", |rocket| async {
        rocket.mount(
            "/",
            routes![register, profile, record_ad, season_stats, equip_bird, items],
        )
    })
}
