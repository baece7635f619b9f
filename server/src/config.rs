use std::time::Duration;

use serde::Deserialize;
use shared::DayBoundary;

pub const DEFAULT_SEASON_JOB_INTERVAL_IN_MINUTES: u64 = 1;
pub const DEFAULT_REWARD_JOB_INTERVAL_IN_MINUTES: u64 = 10;
pub const DEFAULT_ROLLOVER_BATCH_SIZE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

/// Process environment, read with `envy`.
#[derive(Debug, Default, Deserialize)]
pub struct Env {
    pub season_job_interval_in_minutes: Option<u64>,
    pub reward_job_interval_in_minutes: Option<u64>,
    pub rollover_batch_size: Option<usize>,
    pub reward_day_offset_in_minutes: Option<i32>,
    pub seed_default_tiers: Option<bool>,
    pub store: Option<StoreKind>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub season_job_interval: Duration,
    pub reward_job_interval: Duration,
    pub rollover_batch_size: usize,
    pub day_boundary: DayBoundary,
    pub seed_default_tiers: bool,
    pub store: StoreKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            season_job_interval: minutes(DEFAULT_SEASON_JOB_INTERVAL_IN_MINUTES),
            reward_job_interval: minutes(DEFAULT_REWARD_JOB_INTERVAL_IN_MINUTES),
            rollover_batch_size: DEFAULT_ROLLOVER_BATCH_SIZE,
            day_boundary: DayBoundary::utc(),
            seed_default_tiers: true,
            store: StoreKind::default(),
        }
    }
}

impl TryFrom<Env> for Settings {
    type Error = anyhow::Error;

    fn try_from(env: Env) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let day_boundary = match env.reward_day_offset_in_minutes {
            Some(offset) => DayBoundary::from_offset_minutes(offset).ok_or_else(|| {
                anyhow::anyhow!("Reward day offset must be within a day, got {offset} minutes")
            })?,
            None => defaults.day_boundary,
        };
        let rollover_batch_size = env
            .rollover_batch_size
            .unwrap_or(defaults.rollover_batch_size);
        anyhow::ensure!(rollover_batch_size > 0, "Rollover batch size must be positive");

        Ok(Self {
            season_job_interval: env
                .season_job_interval_in_minutes
                .map_or(defaults.season_job_interval, minutes),
            reward_job_interval: env
                .reward_job_interval_in_minutes
                .map_or(defaults.reward_job_interval, minutes),
            rollover_batch_size,
            day_boundary,
            seed_default_tiers: env.seed_default_tiers.unwrap_or(defaults.seed_default_tiers),
            store: env.store.unwrap_or_default(),
        })
    }
}

fn minutes(value: u64) -> Duration {
    Duration::from_secs(value.max(1) * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_env_uses_defaults() {
        let settings = Settings::try_from(Env::default()).unwrap();
        assert_eq!(settings.season_job_interval, Duration::from_secs(60));
        assert_eq!(settings.reward_job_interval, Duration::from_secs(600));
        assert_eq!(settings.rollover_batch_size, 200);
        assert_eq!(settings.day_boundary, DayBoundary::utc());
        assert_eq!(settings.store, StoreKind::Postgres);
        assert!(settings.seed_default_tiers);
    }

    #[test]
    fn env_overrides() {
        let env = Env {
            reward_day_offset_in_minutes: Some(-300),
            rollover_batch_size: Some(50),
            store: Some(StoreKind::Memory),
            seed_default_tiers: Some(false),
            ..Default::default()
        };
        let settings = Settings::try_from(env).unwrap();
        assert_eq!(
            Some(settings.day_boundary),
            DayBoundary::from_offset_minutes(-300)
        );
        assert_eq!(settings.rollover_batch_size, 50);
        assert_eq!(settings.store, StoreKind::Memory);
        assert!(!settings.seed_default_tiers);
    }

    #[test]
    fn invalid_env_is_rejected() {
        let offset = Env {
            reward_day_offset_in_minutes: Some(24 * 60),
            ..Default::default()
        };
        assert!(Settings::try_from(offset).is_err());

        let batch = Env {
            rollover_batch_size: Some(0),
            ..Default::default()
        };
        assert!(Settings::try_from(batch).is_err());
    }
}
