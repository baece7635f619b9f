use shared::{
    Bird, BirdId, NewBird, NewStoreItem, StoreItem, StoreItemId, StoreItemKind, User, UserId,
    UserItem,
};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    Backend,
};

impl Backend {
    #[instrument(skip(self))]
    pub async fn create_bird(&self, bird: NewBird) -> Result<Bird> {
        bird.validate()?;
        self.store.insert_bird(bird).await
    }

    pub async fn birds(&self) -> Result<Vec<Bird>> {
        self.store.birds().await
    }

    pub async fn bird(&self, id: BirdId) -> Result<Bird> {
        self.store
            .bird(id)
            .await?
            .ok_or_else(|| Error::not_found("Bird", id))
    }

    #[instrument(skip(self))]
    pub async fn create_store_item(&self, item: NewStoreItem) -> Result<StoreItem> {
        item.validate()?;
        match item.kind {
            StoreItemKind::Bird(bird) => {
                self.bird(bird).await?;
            }
        }
        self.store.insert_store_item(item).await
    }

    pub async fn store_items(&self) -> Result<Vec<StoreItem>> {
        self.store.store_items().await
    }

    pub async fn store_item(&self, id: StoreItemId) -> Result<StoreItem> {
        self.store
            .store_item(id)
            .await?
            .ok_or_else(|| Error::not_found("Store item", id))
    }

    /// Buys `item` at its current price.
    #[instrument(skip(self))]
    pub async fn purchase(&self, user: UserId, item: StoreItemId) -> Result<UserItem> {
        self.user(user).await?;
        let item = self.store_item(item).await?;
        if !item.is_available {
            return Err(Error::Validation(format!(
                "Store item {} is not available",
                item.name
            )));
        }

        let now = self.now();
        let price = item.price_at(now);
        let owned = self.store.purchase(user, item.id, price, now).await?;
        tracing::info!("User {} bought {} for {} coins", user, item.name, price);
        Ok(owned)
    }

    pub async fn user_items(&self, user: UserId) -> Result<Vec<UserItem>> {
        self.user(user).await?;
        self.store.user_items(user).await
    }

    /// Makes `bird` the user's active bird. Starter birds need no purchase.
    #[instrument(skip(self))]
    pub async fn equip_bird(&self, user: UserId, bird: BirdId) -> Result<User> {
        self.user(user).await?;
        let bird = self.bird(bird).await?;
        if !bird.is_starter() {
            let owned = self.store.user_items(user).await?;
            let mut owns = false;
            for owned in owned {
                if let Some(item) = self.store.store_item(owned.store_item_id).await? {
                    if item.kind == StoreItemKind::Bird(bird.id) {
                        owns = true;
                        break;
                    }
                }
            }
            if !owns {
                return Err(Error::Validation(format!(
                    "User {} does not own bird {}",
                    user, bird.name
                )));
            }
        }

        if !self.store.set_active_bird(user, bird.id).await? {
            return Err(Error::not_found("User", user));
        }
        self.user(user).await
    }
}
