use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BirdKind {
    #[default]
    Rookie,
    Pro,
    Elite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub id: BirdId,
    pub name: String,
    pub kind: BirdKind,
    pub level: u32,
    pub multiplier: f64,
    pub image_url: Option<String>,
    pub points: u64,
}

impl Bird {
    /// Starter birds can be equipped without being purchased.
    pub fn is_starter(&self) -> bool {
        self.kind == BirdKind::Rookie && self.level <= 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBird {
    pub name: String,
    #[serde(default)]
    pub kind: BirdKind,
    #[serde(default = "default_level")]
    pub level: u32,
    pub multiplier: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub points: u64,
}

const fn default_level() -> u32 {
    1
}

impl NewBird {
    pub fn starter() -> Self {
        Self {
            name: "Default Rookie".to_string(),
            kind: BirdKind::Rookie,
            level: 1,
            multiplier: 1.0,
            image_url: None,
            points: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Missing("name"));
        }
        if !(self.multiplier >= 1.0) {
            return Err(ModelError::InvalidMultiplier(self.multiplier));
        }
        Ok(())
    }

    pub fn with_id(self, id: BirdId) -> Bird {
        Bird {
            id,
            name: self.name,
            kind: self.kind,
            level: self.level,
            multiplier: self.multiplier,
            image_url: self.image_url,
            points: self.points,
        }
    }
}

/// What a store listing sells. Each variant carries the id of the concrete
/// item it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "item_id")]
pub enum StoreItemKind {
    Bird(BirdId),
}

impl StoreItemKind {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bird(_) => "Bird",
        }
    }

    pub const fn item_id(&self) -> i32 {
        match self {
            Self::Bird(id) => *id,
        }
    }

    pub fn from_parts(item_type: &str, item_id: i32) -> Result<Self, ModelError> {
        match item_type {
            "Bird" => Ok(Self::Bird(item_id)),
            other => Err(ModelError::Unknown {
                kind: "item type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Percent off, 0 to 100.
    pub percentage: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Offer {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.percentage > 100 {
            return Err(ModelError::InvalidOffer(self.percentage));
        }
        if self.end_date <= self.start_date {
            return Err(ModelError::InvalidSeasonWindow);
        }
        Ok(())
    }

    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now < self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: StoreItemId,
    pub name: String,
    pub price: u64,
    pub kind: StoreItemKind,
    pub is_available: bool,
    pub offer: Option<Offer>,
}

impl StoreItem {
    /// Price after any offer running at `now`, rounded down.
    pub fn price_at(&self, now: DateTime<Utc>) -> u64 {
        match self.offer {
            Some(offer) if offer.is_running(now) => {
                self.price * (100 - offer.percentage.min(100) as u64) / 100
            }
            _ => self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStoreItem {
    pub name: String,
    pub price: u64,
    pub kind: StoreItemKind,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub offer: Option<Offer>,
}

const fn default_available() -> bool {
    true
}

impl NewStoreItem {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Missing("name"));
        }
        if let Some(offer) = &self.offer {
            offer.validate()?;
        }
        Ok(())
    }

    pub fn with_id(self, id: StoreItemId) -> StoreItem {
        StoreItem {
            id,
            name: self.name,
            price: self.price,
            kind: self.kind,
            is_available: self.is_available,
            offer: self.offer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserItem {
    pub id: UserItemId,
    pub user_id: UserId,
    pub store_item_id: StoreItemId,
    pub purchased_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn store_item_kind_serialization() {
        let item = NewStoreItem {
            name: "Golden wings".to_string(),
            price: 500,
            kind: StoreItemKind::Bird(3),
            is_available: true,
            offer: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"]["item_type"], "Bird");
        assert_eq!(json["kind"]["item_id"], 3);

        let parsed: NewStoreItem = serde_json::from_value(serde_json::json!({
            "name": "Golden wings",
            "price": 500,
            "kind": { "item_type": "Bird", "item_id": 3 }
        }))
        .unwrap();
        assert_eq!(parsed, item);

        assert_eq!(
            StoreItemKind::from_parts("Bird", 3),
            Ok(StoreItemKind::Bird(3))
        );
        assert!(StoreItemKind::from_parts("Hat", 3).is_err());
    }

    #[test]
    fn offer_discounts_only_while_running() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).single().unwrap();
        let item = NewStoreItem {
            name: "Phoenix".to_string(),
            price: 999,
            kind: StoreItemKind::Bird(1),
            is_available: true,
            offer: Some(Offer {
                percentage: 25,
                start_date: now,
                end_date: now + Duration::days(2),
            }),
        }
        .with_id(1);

        assert_eq!(item.price_at(now), 749);
        assert_eq!(item.price_at(now + Duration::days(3)), 999);
        assert_eq!(item.price_at(now - Duration::days(1)), 999);
    }

    #[test]
    fn bird_validation() {
        let mut bird = NewBird::starter();
        assert_eq!(bird.validate(), Ok(()));
        assert!(bird.clone().with_id(1).is_starter());

        bird.multiplier = 0.5;
        assert_eq!(bird.validate(), Err(ModelError::InvalidMultiplier(0.5)));
    }
}
