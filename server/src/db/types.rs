use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    AdsWatched, Bird, Game, LeaderboardEntry, Offer, Season, StoreItem, StoreItemKind, Tier,
    User, UserItem, UserStat,
};

fn count(field: &'static str, value: i64) -> anyhow::Result<u32> {
    u32::try_from(value).with_context(|| format!("Column {field} out of range: {value}"))
}

fn amount(field: &'static str, value: i64) -> anyhow::Result<u64> {
    u64::try_from(value).with_context(|| format!("Column {field} out of range: {value}"))
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub coin_earned: i64,
    pub current_tier: Option<i32>,
    pub tier_season: Option<i32>,
    pub active_bird: Option<i32>,
    pub banner_ads: i64,
    pub interstitial_ads: i64,
    pub rewarded_ads: i64,
    pub last_reward_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role.parse()?,
            coin_earned: amount("coin_earned", record.coin_earned)?,
            current_tier: record.current_tier,
            tier_season: record.tier_season,
            active_bird: record.active_bird,
            ads_watched_today: AdsWatched {
                banner: count("banner_ads", record.banner_ads)?,
                interstitial: count("interstitial_ads", record.interstitial_ads)?,
                rewarded: count("rewarded_ads", record.rewarded_ads)?,
            },
            last_reward_day: record.last_reward_day,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TierRecord {
    pub id: i32,
    pub category: String,
    pub level: i64,
    pub title: String,
    pub min_score: i64,
    pub max_score: i64,
    pub overall_order: i64,
    pub tier_multiplier: f64,
}

impl TryFrom<TierRecord> for Tier {
    type Error = anyhow::Error;

    fn try_from(record: TierRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            category: record.category.parse()?,
            level: count("level", record.level)?,
            title: record.title,
            min_score: count("min_score", record.min_score)?,
            max_score: count("max_score", record.max_score)?,
            overall_order: count("overall_order", record.overall_order)?,
            tier_multiplier: record.tier_multiplier,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SeasonRecord {
    pub id: i32,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

impl TryFrom<SeasonRecord> for Season {
    type Error = anyhow::Error;

    fn try_from(record: SeasonRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            title: record.title,
            start_date: record.start_date,
            end_date: record.end_date,
            status: record.status.parse()?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRecord {
    pub id: i32,
    pub user_id: i32,
    pub season_id: Option<i32>,
    pub score: i64,
    pub duration: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub coins_earned: i64,
    pub ads_viewed: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GameRecord> for Game {
    type Error = anyhow::Error;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            season_id: record.season_id,
            score: count("score", record.score)?,
            duration: count("duration", record.duration)?,
            started_at: record.started_at,
            ended_at: record.ended_at,
            coins_earned: amount("coins_earned", record.coins_earned)?,
            ads_viewed: count("ads_viewed", record.ads_viewed)?,
            status: record.status.parse()?,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStatRecord {
    pub user_id: i32,
    pub season_id: i32,
    pub total_game_played: i64,
    pub total_ads_watched: i64,
    pub total_coin_earned: i64,
    pub best_score: i64,
    pub highest_tier_reached: Option<i32>,
    pub version: i64,
}

impl TryFrom<UserStatRecord> for UserStat {
    type Error = anyhow::Error;

    fn try_from(record: UserStatRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: record.user_id,
            season_id: record.season_id,
            total_game_played: count("total_game_played", record.total_game_played)?,
            total_ads_watched: count("total_ads_watched", record.total_ads_watched)?,
            total_coin_earned: amount("total_coin_earned", record.total_coin_earned)?,
            best_score: count("best_score", record.best_score)?,
            highest_tier_reached: record.highest_tier_reached,
            version: count("version", record.version)?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaderboardRecord {
    pub user_id: i32,
    pub name: String,
    pub max_score: i64,
}

impl TryFrom<LeaderboardRecord> for LeaderboardEntry {
    type Error = anyhow::Error;

    fn try_from(record: LeaderboardRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: record.user_id,
            name: record.name,
            max_score: count("max_score", record.max_score)?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BirdRecord {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub level: i64,
    pub multiplier: f64,
    pub image_url: Option<String>,
    pub points: i64,
}

impl TryFrom<BirdRecord> for Bird {
    type Error = anyhow::Error;

    fn try_from(record: BirdRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            name: record.name,
            kind: record.kind.parse()?,
            level: count("level", record.level)?,
            multiplier: record.multiplier,
            image_url: record.image_url,
            points: amount("points", record.points)?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreItemRecord {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub item_type: String,
    pub item_id: i32,
    pub is_available: bool,
    pub offer_percentage: Option<i64>,
    pub offer_start_date: Option<DateTime<Utc>>,
    pub offer_end_date: Option<DateTime<Utc>>,
}

impl TryFrom<StoreItemRecord> for StoreItem {
    type Error = anyhow::Error;

    fn try_from(record: StoreItemRecord) -> Result<Self, Self::Error> {
        let offer = match (
            record.offer_percentage,
            record.offer_start_date,
            record.offer_end_date,
        ) {
            (Some(percentage), Some(start_date), Some(end_date)) => Some(Offer {
                percentage: count("offer_percentage", percentage)?,
                start_date,
                end_date,
            }),
            _ => None,
        };
        Ok(Self {
            id: record.id,
            name: record.name,
            price: amount("price", record.price)?,
            kind: StoreItemKind::from_parts(&record.item_type, record.item_id)?,
            is_available: record.is_available,
            offer,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserItemRecord {
    pub id: i32,
    pub user_id: i32,
    pub store_item_id: i32,
    pub purchased_at: DateTime<Utc>,
}

impl From<UserItemRecord> for UserItem {
    fn from(record: UserItemRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            store_item_id: record.store_item_id,
            purchased_at: record.purchased_at,
        }
    }
}
