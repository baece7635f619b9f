use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::*;

pub const DEFAULT_TIER_CATEGORY: TierCategory = TierCategory::Rookie;
pub const DEFAULT_TIER_LEVEL: u32 = 1;
pub const DEFAULT_TIER_ORDER: u32 = 1;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum TierCategory {
    Rookie,
    Pro,
    Elite,
    Legend,
}

pub fn tier_title(category: TierCategory, level: u32) -> String {
    format!("{category} {level}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub category: TierCategory,
    pub level: u32,
    pub title: String,
    pub min_score: u32,
    pub max_score: u32,
    pub overall_order: u32,
    pub tier_multiplier: f64,
}

impl Tier {
    pub const fn contains(&self, score: u32) -> bool {
        self.min_score <= score && score <= self.max_score
    }

    /// The starting rung every user is placed on when a season begins.
    pub fn is_default(&self) -> bool {
        self.category == DEFAULT_TIER_CATEGORY
            && self.level == DEFAULT_TIER_LEVEL
            && self.overall_order == DEFAULT_TIER_ORDER
    }
}

/// `true` when moving from `current` to `candidate` is a strict promotion.
pub fn is_advancement(candidate: &Tier, current: Option<&Tier>) -> bool {
    current.map_or(true, |current| {
        candidate.overall_order > current.overall_order
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTier {
    pub category: TierCategory,
    pub level: u32,
    pub min_score: u32,
    pub max_score: u32,
    pub overall_order: u32,
    pub tier_multiplier: f64,
}

impl NewTier {
    pub fn title(&self) -> String {
        tier_title(self.category, self.level)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.level == 0 {
            return Err(ModelError::Missing("level"));
        }
        if self.overall_order == 0 {
            return Err(ModelError::Missing("overall_order"));
        }
        if self.min_score > self.max_score {
            return Err(ModelError::InvalidTierBounds {
                min: self.min_score,
                max: self.max_score,
            });
        }
        if !self.tier_multiplier.is_finite() || self.tier_multiplier < 0.0 {
            return Err(ModelError::Invalid(format!(
                "Invalid tier multiplier: {}",
                self.tier_multiplier
            )));
        }
        Ok(())
    }

    pub fn with_id(self, id: TierId) -> Tier {
        let title = self.title();
        Tier {
            id,
            category: self.category,
            level: self.level,
            title,
            min_score: self.min_score,
            max_score: self.max_score,
            overall_order: self.overall_order,
            tier_multiplier: self.tier_multiplier,
        }
    }
}

impl From<Tier> for NewTier {
    fn from(tier: Tier) -> Self {
        Self {
            category: tier.category,
            level: tier.level,
            min_score: tier.min_score,
            max_score: tier.max_score,
            overall_order: tier.overall_order,
            tier_multiplier: tier.tier_multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierConflict {
    Title(String),
    Order(u32),
    Overlap(String),
}

impl std::fmt::Display for TierConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title(title) => write!(f, "Tier {title} already exists"),
            Self::Order(order) => write!(f, "Tier with overall order {order} already exists"),
            Self::Overlap(title) => write!(f, "Score range overlaps with tier {title}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LadderIssue {
    /// Scores strictly between the two tiers resolve to nothing.
    Gap { below: String, above: String },
    Overlap { below: String, above: String },
}

/// In-memory view of every configured tier, ordered by `overall_order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierLadder {
    tiers: Vec<Tier>,
}

impl TierLadder {
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        tiers.sort_by_key(|tier| tier.overall_order);
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, id: TierId) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.id == id)
    }

    pub fn default_tier(&self) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.is_default())
    }

    /// Finds the tier whose interval holds `score`. Should intervals ever
    /// overlap, the one with the highest `min_score` wins.
    pub fn resolve(&self, score: u32) -> Option<&Tier> {
        self.tiers
            .iter()
            .filter(|tier| tier.contains(score))
            .max_by_key(|tier| (tier.min_score, tier.overall_order))
    }

    /// Checks a candidate tier against the ladder. `except` skips the tier
    /// being edited.
    pub fn conflict(&self, candidate: &NewTier, except: Option<TierId>) -> Option<TierConflict> {
        let title = candidate.title();
        let others = self
            .tiers
            .iter()
            .filter(|tier| Some(tier.id) != except)
            .collect_vec();

        if others.iter().any(|tier| tier.title == title) {
            return Some(TierConflict::Title(title));
        }
        if others
            .iter()
            .any(|tier| tier.overall_order == candidate.overall_order)
        {
            return Some(TierConflict::Order(candidate.overall_order));
        }
        others
            .iter()
            .find(|tier| {
                tier.min_score <= candidate.max_score && candidate.min_score <= tier.max_score
            })
            .map(|tier| TierConflict::Overlap(tier.title.clone()))
    }

    /// Reports gaps and overlaps between neighbouring rungs.
    pub fn issues(&self) -> Vec<LadderIssue> {
        self.tiers
            .iter()
            .tuple_windows()
            .filter_map(|(below, above)| {
                let expected = below.max_score.checked_add(1)?;
                if above.min_score > expected {
                    Some(LadderIssue::Gap {
                        below: below.title.clone(),
                        above: above.title.clone(),
                    })
                } else if above.min_score < expected {
                    Some(LadderIssue::Overlap {
                        below: below.title.clone(),
                        above: above.title.clone(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Ladder installed on a fresh deployment.
pub fn default_ladder() -> Vec<NewTier> {
    const RUNGS: [(TierCategory, u32, u32, f64); 10] = [
        (TierCategory::Rookie, 1, 0, 1.0),
        (TierCategory::Rookie, 2, 100, 1.1),
        (TierCategory::Rookie, 3, 250, 1.2),
        (TierCategory::Pro, 1, 500, 1.3),
        (TierCategory::Pro, 2, 800, 1.4),
        (TierCategory::Pro, 3, 1200, 1.5),
        (TierCategory::Elite, 1, 1700, 1.6),
        (TierCategory::Elite, 2, 2300, 1.7),
        (TierCategory::Elite, 3, 3000, 1.85),
        (TierCategory::Legend, 1, 4000, 2.0),
    ];

    RUNGS
        .iter()
        .enumerate()
        .map(|(index, (category, level, min_score, multiplier))| {
            let max_score = RUNGS
                .get(index + 1)
                .map(|(_, _, next_min, _)| next_min - 1)
                .unwrap_or(i32::MAX as u32);
            NewTier {
                category: *category,
                level: *level,
                min_score: *min_score,
                max_score,
                overall_order: index as u32 + 1,
                tier_multiplier: *multiplier,
            }
        })
        .collect()
}
