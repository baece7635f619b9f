use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::*;

pub const DEFAULT_SEASON_LENGTH_IN_MONTHS: u32 = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeasonStatus {
    Upcoming,
    Active,
    Ended,
}

impl SeasonStatus {
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start > now {
            Self::Upcoming
        } else if now < end {
            Self::Active
        } else {
            Self::Ended
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: SeasonStatus,
}

impl Season {
    pub fn status_at(&self, now: DateTime<Utc>) -> SeasonStatus {
        SeasonStatus::at(now, self.start_date, self.end_date)
    }

    /// The status this season should move to, if the stored one is stale.
    pub fn pending_transition(&self, now: DateTime<Utc>) -> Option<SeasonStatus> {
        let status = self.status_at(now);
        (status != self.status).then_some(status)
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date < end && start < self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeason {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl NewSeason {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Missing("title"));
        }
        if self.end_date <= self.start_date {
            return Err(ModelError::InvalidSeasonWindow);
        }
        Ok(())
    }

    /// Season created automatically when nothing is active. It never runs past
    /// the start of the next scheduled season.
    pub fn automatic(
        now: DateTime<Utc>,
        next_start: Option<DateTime<Utc>>,
    ) -> Result<Self, ModelError> {
        let end = now
            .checked_add_months(Months::new(DEFAULT_SEASON_LENGTH_IN_MONTHS))
            .ok_or(ModelError::InvalidSeasonWindow)?;
        let end_date = next_start.map_or(end, |next| next.min(end));
        let season = Self {
            title: format!("Season {}", now.timestamp_millis()),
            start_date: now,
            end_date,
        };
        season.validate()?;
        Ok(season)
    }

    pub fn with_id(self, id: SeasonId, now: DateTime<Utc>) -> Season {
        let status = SeasonStatus::at(now, self.start_date, self.end_date);
        Season {
            id,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            status,
        }
    }
}
