use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};
use shared::{Role, UserId};

use crate::Backend;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Caller identity resolved by the authentication layer in front of the
/// service, passed on as the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req
            .headers()
            .get_one(USER_ID_HEADER)
            .and_then(|value| value.parse().ok())
        {
            Some(id) => Outcome::Success(Self(id)),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// An authenticated caller holding the admin or super admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub UserId);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let AuthenticatedUser(id) = match req.guard::<AuthenticatedUser>().await {
            Outcome::Success(user) => user,
            Outcome::Error(e) => return Outcome::Error(e),
            Outcome::Forward(status) => return Outcome::Forward(status),
        };
        let Some(backend) = req.rocket().state::<Backend>() else {
            return Outcome::Error((Status::InternalServerError, ()));
        };

        match backend.user(id).await {
            Ok(user) if matches!(user.role, Role::Admin | Role::SuperAdmin) => {
                Outcome::Success(Self(id))
            }
            Ok(_) => Outcome::Error((Status::Forbidden, ())),
            Err(crate::error::Error::NotFound(_)) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                tracing::error!("Failed to resolve user {}: {:#?}", id, e);
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}
