use std::sync::Arc;

use rocket::tokio::sync::RwLock;
use serde::Deserialize;
use shared::{default_ladder, NewTier, Tier, TierCategory, TierId, TierLadder};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    Backend,
};

/// In-memory copy of the ladder. Filled lazily, dropped on every tier write.
#[derive(Debug, Clone, Default)]
pub struct TierCache(Arc<RwLock<Option<Arc<TierLadder>>>>);

impl TierCache {
    async fn get(&self) -> Option<Arc<TierLadder>> {
        self.0.read().await.clone()
    }

    async fn set(&self, ladder: Arc<TierLadder>) {
        *self.0.write().await = Some(ladder);
    }

    async fn invalidate(&self) {
        *self.0.write().await = None;
    }
}

/// Partial update of a tier. The title is recomputed from the merged values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TierPatch {
    pub category: Option<TierCategory>,
    pub level: Option<u32>,
    pub min_score: Option<u32>,
    pub max_score: Option<u32>,
    pub overall_order: Option<u32>,
    pub tier_multiplier: Option<f64>,
}

impl TierPatch {
    pub fn apply(self, tier: Tier) -> NewTier {
        let current = NewTier::from(tier);
        NewTier {
            category: self.category.unwrap_or(current.category),
            level: self.level.unwrap_or(current.level),
            min_score: self.min_score.unwrap_or(current.min_score),
            max_score: self.max_score.unwrap_or(current.max_score),
            overall_order: self.overall_order.unwrap_or(current.overall_order),
            tier_multiplier: self.tier_multiplier.unwrap_or(current.tier_multiplier),
        }
    }
}

impl Backend {
    pub async fn ladder(&self) -> Result<Arc<TierLadder>> {
        if let Some(ladder) = self.tiers.get().await {
            return Ok(ladder);
        }
        let ladder = Arc::new(TierLadder::new(self.store.tiers().await?));
        self.tiers.set(ladder.clone()).await;
        Ok(ladder)
    }

    pub async fn tiers(&self) -> Result<Vec<Tier>> {
        Ok(self.ladder().await?.tiers().to_vec())
    }

    pub async fn tier(&self, id: TierId) -> Result<Tier> {
        self.ladder()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("Tier", id))
    }

    #[instrument(skip(self))]
    pub async fn create_tier(&self, tier: NewTier) -> Result<Tier> {
        tier.validate()?;
        if let Some(conflict) = self.ladder().await?.conflict(&tier, None) {
            return Err(Error::Conflict(conflict.to_string()));
        }

        let created = self.store.insert_tier(tier).await;
        self.tiers.invalidate().await;
        let created = created?;
        tracing::info!("Created tier {} ({})", created.title, created.id);
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_tier(&self, id: TierId, patch: TierPatch) -> Result<Tier> {
        let ladder = self.ladder().await?;
        let current = ladder
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("Tier", id))?;
        let tier = patch.apply(current);
        tier.validate()?;
        if let Some(conflict) = ladder.conflict(&tier, Some(id)) {
            return Err(Error::Conflict(conflict.to_string()));
        }

        let updated = self.store.update_tier(id, tier).await;
        self.tiers.invalidate().await;
        updated?.ok_or_else(|| Error::not_found("Tier", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_tier(&self, id: TierId) -> Result<Tier> {
        let deleted = self.store.delete_tier(id).await;
        self.tiers.invalidate().await;
        deleted?.ok_or_else(|| Error::not_found("Tier", id))
    }

    /// Installs the default ladder when no tier exists yet. Returns the number
    /// of tiers inserted.
    #[instrument(skip(self))]
    pub async fn seed_default_tiers(&self) -> Result<usize> {
        if !self.store.tiers().await?.is_empty() {
            let ladder = self.ladder().await?;
            for issue in ladder.issues() {
                tracing::warn!("Tier ladder is not contiguous: {:?}", issue);
            }
            if ladder.default_tier().is_none() {
                tracing::warn!("No default tier configured, season rollover will fail");
            }
            return Ok(0);
        }

        let defaults = default_ladder();
        let count = defaults.len();
        for tier in defaults {
            self.store.insert_tier(tier).await?;
        }
        self.tiers.invalidate().await;
        tracing::info!("Seeded {count} default tiers");
        Ok(count)
    }
}
