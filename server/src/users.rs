use shared::{AdKind, NewUser, SeasonId, User, UserId, UserStat};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    Backend,
};

impl Backend {
    #[instrument(skip(self))]
    pub async fn register_user(&self, user: NewUser) -> Result<User> {
        user.validate()?;
        let user = self.store.insert_user(user, self.now()).await?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn user(&self, id: UserId) -> Result<User> {
        self.store
            .user(id)
            .await?
            .ok_or_else(|| Error::not_found("User", id))
    }

    #[instrument(skip(self))]
    pub async fn record_ad_view(&self, user: UserId, kind: AdKind) -> Result<User> {
        if !self.store.record_ad_view(user, kind).await? {
            return Err(Error::not_found("User", user));
        }
        self.user(user).await
    }

    pub async fn user_stat(&self, user: UserId, season: SeasonId) -> Result<UserStat> {
        self.store.user_stat(user, season).await?.ok_or_else(|| {
            Error::NotFound(format!(
                "UserStat for user {user} in season {season} not found"
            ))
        })
    }
}
