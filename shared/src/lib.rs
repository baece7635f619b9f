use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

mod catalog;
mod day;
mod game;
mod reward;
mod season;
mod tier;

pub use catalog::*;
pub use day::*;
pub use game::*;
pub use reward::*;
pub use season::*;
pub use tier::*;

pub type UserId = i32;
pub type TierId = i32;
pub type SeasonId = i32;
pub type GameId = i32;
pub type BirdId = i32;
pub type StoreItemId = i32;
pub type UserItemId = i32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a non-negative integer, got {value}")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("Tier min_score ({min}) must not exceed max_score ({max})")]
    InvalidTierBounds { min: u32, max: u32 },
    #[error("End date must be after start date")]
    InvalidSeasonWindow,
    #[error("Offer percentage must be between 0 and 100, got {0}")]
    InvalidOffer(u32),
    #[error("Bird multiplier must be at least 1, got {0}")]
    InvalidMultiplier(f64),
    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
    #[error("{0}")]
    Invalid(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub coin_earned: u64,
    pub current_tier: Option<TierId>,
    /// Season in which `current_tier` was last assigned.
    pub tier_season: Option<SeasonId>,
    pub active_bird: Option<BirdId>,
    pub ads_watched_today: AdsWatched,
    /// Last local day whose ad/gameplay reward has been credited.
    pub last_reward_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Missing("name"));
        }
        if !self.email.contains('@') {
            return Err(ModelError::Invalid(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

/// Converts an optional raw numeric input into a `u32`, rejecting absent,
/// negative or oversized values.
pub fn required_count(field: &'static str, value: Option<i64>) -> Result<u32, ModelError> {
    let value = value.ok_or(ModelError::Missing(field))?;
    u32::try_from(value).map_err(|_| ModelError::OutOfRange { field, value })
}
