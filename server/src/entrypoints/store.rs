use rocket::{response::status::Created, serde::json::Json, State};
use shared::{Bird, BirdId, NewBird, NewStoreItem, StoreItem, StoreItemId, UserItem};

use super::auth::{AdminUser, AuthenticatedUser};
use crate::{error::Result, Backend};

#[post("/birds", data = "<bird>")]
async fn create_bird(
    _admin: AdminUser,
    bird: Json<NewBird>,
    backend: &State<Backend>,
) -> Result<Created<Json<Bird>>> {
    let bird = backend.create_bird(bird.into_inner()).await?;
    Ok(Created::new(format!("/birds/{}", bird.id)).body(Json(bird)))
}

#[get("/birds")]
async fn birds(backend: &State<Backend>) -> Result<Json<Vec<Bird>>> {
    Ok(Json(backend.birds().await?))
}

#[get("/birds/<id>")]
async fn bird(id: BirdId, backend: &State<Backend>) -> Result<Json<Bird>> {
    Ok(Json(backend.bird(id).await?))
}

#[post("/store", data = "<item>")]
async fn create_item(
    _admin: AdminUser,
    item: Json<NewStoreItem>,
    backend: &State<Backend>,
) -> Result<Created<Json<StoreItem>>> {
    let item = backend.create_store_item(item.into_inner()).await?;
    Ok(Created::new(format!("/store/{}", item.id)).body(Json(item)))
}

#[get("/store")]
async fn items(backend: &State<Backend>) -> Result<Json<Vec<StoreItem>>> {
    Ok(Json(backend.store_items().await?))
}

#[get("/store/<id>")]
async fn item(id: StoreItemId, backend: &State<Backend>) -> Result<Json<StoreItem>> {
    Ok(Json(backend.store_item(id).await?))
}

#[post("/store/<id>/purchase")]
async fn purchase(
    user: AuthenticatedUser,
    id: StoreItemId,
    backend: &State<Backend>,
) -> Result<Created<Json<UserItem>>> {
    let owned = backend.purchase(user.0, id).await?;
    Ok(Created::new(format!("/users/{}/items", user.0)).body(Json(owned)))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing store entrypoints", |rocket| async {
        rocket.mount(
            "/",
            routes![create_bird, birds, bird, create_item, items, item, purchase],
        )
    })
}
