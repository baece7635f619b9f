use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use shared::{NewSeason, Season, SeasonId, SeasonStatus, UserId};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    Backend,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeasonPatch {
    pub title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl SeasonPatch {
    pub fn apply(self, season: Season) -> NewSeason {
        NewSeason {
            title: self.title.unwrap_or(season.title),
            start_date: self.start_date.unwrap_or(season.start_date),
            end_date: self.end_date.unwrap_or(season.end_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    pub season_id: SeasonId,
    pub season_created: bool,
    pub statuses_updated: usize,
    pub users: usize,
    pub stats_inserted: u64,
    pub tiers_reset: u64,
}

impl Backend {
    async fn check_season_window(&self, season: &NewSeason, except: Option<SeasonId>) -> Result<()> {
        season.validate()?;
        let seasons = self.store.seasons().await?;
        let others = seasons.iter().filter(|existing| Some(existing.id) != except);

        for existing in others {
            if existing.title == season.title {
                return Err(Error::Conflict(format!(
                    "Season {} already exists",
                    season.title
                )));
            }
            if existing.overlaps(season.start_date, season.end_date) {
                return Err(Error::Conflict(format!(
                    "Season window overlaps with {}",
                    existing.title
                )));
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_season(&self, season: NewSeason) -> Result<Season> {
        self.check_season_window(&season, None).await?;
        let status = SeasonStatus::at(self.now(), season.start_date, season.end_date);
        let season = self.store.insert_season(season, status).await?;
        tracing::info!("Created season {} ({}), {}", season.title, season.id, status);
        Ok(season)
    }

    pub async fn seasons(&self) -> Result<Vec<Season>> {
        self.store.seasons().await
    }

    pub async fn season(&self, id: SeasonId) -> Result<Season> {
        self.store
            .season(id)
            .await?
            .ok_or_else(|| Error::not_found("Season", id))
    }

    /// The season running right now, judged by the clock rather than the
    /// stored status. The latest start wins if windows overlap.
    pub async fn active_season(&self) -> Result<Option<Season>> {
        let now = self.now();
        Ok(self
            .store
            .seasons()
            .await?
            .into_iter()
            .filter(|season| season.status_at(now) == SeasonStatus::Active)
            .max_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id))))
    }

    #[instrument(skip(self))]
    pub async fn update_season(&self, id: SeasonId, patch: SeasonPatch) -> Result<Season> {
        let season = patch.apply(self.season(id).await?);
        self.check_season_window(&season, Some(id)).await?;
        let status = SeasonStatus::at(self.now(), season.start_date, season.end_date);
        self.store
            .update_season(id, season, status)
            .await?
            .ok_or_else(|| Error::not_found("Season", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_season(&self, id: SeasonId) -> Result<Season> {
        self.store
            .delete_season(id)
            .await?
            .ok_or_else(|| Error::not_found("Season", id))
    }

    /// Writes the clock-derived status of every season whose stored status is
    /// stale. Returns the number of seasons updated.
    #[instrument(skip(self))]
    pub async fn refresh_statuses(&self) -> Result<usize> {
        let now = self.now();
        let mut updated = 0;
        for season in self.store.seasons().await? {
            if let Some(status) = season.pending_transition(now) {
                self.store.set_season_status(season.id, status).await?;
                tracing::info!(
                    "Season {} ({}) moved from {} to {}",
                    season.title,
                    season.id,
                    season.status,
                    status
                );
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn ensure_active_season(&self) -> Result<(Season, bool)> {
        if let Some(season) = self.active_season().await? {
            return Ok((season, false));
        }

        let now = self.now();
        let next_start = self
            .store
            .seasons()
            .await?
            .into_iter()
            .filter(|season| season.start_date > now)
            .map(|season| season.start_date)
            .min();
        let season = NewSeason::automatic(now, next_start)?;
        let status = SeasonStatus::at(now, season.start_date, season.end_date);
        let season = self.store.insert_season(season, status).await?;
        tracing::info!(
            "No active season, created {} ({}) until {}",
            season.title,
            season.id,
            season.end_date
        );
        Ok((season, true))
    }

    /// Prepares every user for the active season: a fresh stat seeded at the
    /// default tier and the current tier reset once per season. Batches that
    /// already match are no-ops, so reruns are safe after a partial failure.
    #[instrument(skip(self))]
    pub async fn rollover(&self) -> Result<RolloverReport> {
        let statuses_updated = self.refresh_statuses().await?;
        let (season, season_created) = self.ensure_active_season().await?;
        let default_tier = self
            .ladder()
            .await?
            .default_tier()
            .cloned()
            .ok_or_else(|| Error::Domain("No default tier configured".to_string()))?;

        let mut report = RolloverReport {
            season_id: season.id,
            season_created,
            statuses_updated,
            ..Default::default()
        };

        let mut batches = self
            .store
            .user_ids()
            .chunks(self.settings.rollover_batch_size);
        while let Some(batch) = batches.next().await {
            let users = batch.into_iter().collect::<Result<Vec<UserId>>>()?;
            let existing = self.store.existing_stat_users(season.id, &users).await?;
            let missing: Vec<UserId> = users
                .iter()
                .copied()
                .filter(|user| !existing.contains(user))
                .collect();

            let inserted = if missing.is_empty() {
                0
            } else {
                self.store
                    .insert_seeded_stats(season.id, default_tier.id, &missing)
                    .await?
            };
            let reset = self
                .store
                .reset_current_tier(&users, default_tier.id, season.id)
                .await?;

            tracing::info!(
                "Rollover batch for season {}: {} users, {} stats inserted, {} tiers reset",
                season.id,
                users.len(),
                inserted,
                reset
            );
            report.users += users.len();
            report.stats_inserted += inserted;
            report.tiers_reset += reset;
        }

        Ok(report)
    }
}
