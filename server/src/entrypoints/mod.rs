use rocket::{fairing::AdHoc, serde::json::Json, Request};

use crate::error::Message;

pub mod auth;
pub mod games;
pub mod seasons;
pub mod store;
pub mod tiers;
pub mod types;
pub mod users;

#[catch(400)]
fn bad_request(_req: &Request) -> Json<Message> {
    Message::new("Bad request")
}

#[catch(401)]
fn unauthorized(_req: &Request) -> Json<Message> {
    Message::new("Missing or unknown X-User-Id header")
}

#[catch(403)]
fn forbidden(_req: &Request) -> Json<Message> {
    Message::new("Admin role required")
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Message> {
    Message::new(format!("{} not found", req.uri().path()))
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Json<Message> {
    Message::new("Request body is missing required fields or has invalid values")
}

#[catch(500)]
fn internal(_req: &Request) -> Json<Message> {
    Message::new("Internal server error")
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket
            .register(
                "/",
                catchers![
                    bad_request,
                    unauthorized,
                    forbidden,
                    not_found,
                    unprocessable,
                    internal
                ],
            )
            .attach(games::stage())
            .attach(seasons::stage())
            .attach(tiers::stage())
            .attach(users::stage())
            .attach(store::stage())
    })
}
