use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 10 points = 1 coin.
pub const POINTS_TO_COINS: u32 = 10;
/// Daily score at which ad earnings stop being scaled down.
pub const MAX_SCORE: f64 = 1000.0;
/// Ad earnings may never exceed this fraction of the day's score.
pub const AD_EARNING_FRACTION: f64 = 0.4;

pub const BANNER_AD_VALUE: f64 = 0.08;
pub const INTERSTITIAL_AD_VALUE: f64 = 0.25;
pub const REWARDED_AD_VALUE: f64 = 0.4;

pub const fn coins_for_score(score: u32) -> u64 {
    (score / POINTS_TO_COINS) as u64
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdKind {
    Banner,
    Interstitial,
    Rewarded,
}

impl AdKind {
    pub const fn value(&self) -> f64 {
        match self {
            Self::Banner => BANNER_AD_VALUE,
            Self::Interstitial => INTERSTITIAL_AD_VALUE,
            Self::Rewarded => REWARDED_AD_VALUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdsWatched {
    pub banner: u32,
    pub interstitial: u32,
    pub rewarded: u32,
}

impl AdsWatched {
    pub fn record(&mut self, kind: AdKind) {
        let counter = match kind {
            AdKind::Banner => &mut self.banner,
            AdKind::Interstitial => &mut self.interstitial,
            AdKind::Rewarded => &mut self.rewarded,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn estimated_earnings(&self) -> f64 {
        self.banner as f64 * AdKind::Banner.value()
            + self.interstitial as f64 * AdKind::Interstitial.value()
            + self.rewarded as f64 * AdKind::Rewarded.value()
    }
}

/// Breakdown of one user's daily ad/gameplay settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReward {
    pub total_score: u64,
    pub estimated_ad_earnings: f64,
    pub scaled_ad_earnings: f64,
    pub capped_ad_earnings: f64,
    pub total_points: f64,
    pub coins_earned: u64,
}

impl DailyReward {
    pub fn calculate(total_score: u64, ads: &AdsWatched) -> Self {
        let score = total_score as f64;
        let estimated_ad_earnings = ads.estimated_earnings();
        // Players who watch ads without playing earn proportionally less.
        let scaled_ad_earnings = estimated_ad_earnings * (score / MAX_SCORE).min(1.0);
        let capped_ad_earnings = scaled_ad_earnings.min(score * AD_EARNING_FRACTION);
        let total_points = score + capped_ad_earnings;
        let coins_earned = (total_points / POINTS_TO_COINS as f64).floor() as u64;

        Self {
            total_score,
            estimated_ad_earnings,
            scaled_ad_earnings,
            capped_ad_earnings,
            total_points,
            coins_earned,
        }
    }
}
