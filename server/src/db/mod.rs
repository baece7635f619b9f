use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use futures::{stream::BoxStream, StreamExt};
use rocket::{fairing, Build, Rocket};
use rocket_db_pools::Database;
use shared::{
    AdKind, AdsWatched, Bird, BirdId, Game, GameId, GameStatus, LeaderboardEntry, NewBird,
    NewGame, NewSeason, NewStoreItem, NewTier, NewUser, Season, SeasonId, SeasonStatus,
    StoreItem, StoreItemId, Tier, TierId, User, UserId, UserItem, UserStat,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::{
    error::{Error, Result},
    store::Store,
};

#[derive(Database, Clone, Debug)]
#[database("flappy")]
pub struct DB(PgPool);

pub mod types;

use types::{
    BirdRecord, GameRecord, LeaderboardRecord, SeasonRecord, StoreItemRecord, TierRecord,
    UserItemRecord, UserRecord, UserStatRecord,
};

const USER_COLUMNS: &str = "id, name, email, role, coin_earned, current_tier, tier_season, \
    active_bird, banner_ads, interstitial_ads, rewarded_ads, last_reward_day, created_at";
const TIER_COLUMNS: &str =
    "id, category, level, title, min_score, max_score, overall_order, tier_multiplier";
const SEASON_COLUMNS: &str = "id, title, start_date, end_date, status";
const GAME_COLUMNS: &str = "id, user_id, season_id, score, duration, started_at, ended_at, \
    coins_earned, ads_viewed, status, created_at";
const USER_STAT_COLUMNS: &str = "user_id, season_id, total_game_played, total_ads_watched, \
    total_coin_earned, best_score, highest_tier_reached, version";
const BIRD_COLUMNS: &str = "id, name, kind, level, multiplier, image_url, points";
const STORE_ITEM_COLUMNS: &str = "id, name, price, item_type, item_id, is_available, \
    offer_percentage, offer_start_date, offer_end_date";

fn convert<R, T>(records: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    records
        .into_iter()
        .map(|record| T::try_from(record).map_err(Error::from))
        .collect()
}

fn convert_one<R, T>(record: Option<R>) -> Result<Option<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    Ok(record.map(T::try_from).transpose()?)
}

#[async_trait::async_trait]
impl Store for DB {
    #[instrument(skip(self))]
    async fn insert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (name, email, role, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_ref())
        .bind(now)
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self))]
    async fn user(&self, id: UserId) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    fn user_ids(&self) -> BoxStream<'_, Result<UserId>> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM users ORDER BY id")
            .fetch(&self.0)
            .map(|row| row.map_err(Error::from))
            .boxed()
    }

    #[instrument(skip(self, tier), fields(tier = tier.id))]
    async fn advance_current_tier(
        &self,
        user: UserId,
        tier: &Tier,
        season: SeasonId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users u
            SET current_tier = $2, tier_season = $3
            WHERE u.id = $1
              AND (
                u.tier_season IS DISTINCT FROM $3
                OR u.current_tier IS NULL
                OR COALESCE(
                    (SELECT t.overall_order FROM tiers t WHERE t.id = u.current_tier),
                    0
                ) < $4
              )
            "#,
        )
        .bind(user)
        .bind(tier.id)
        .bind(season)
        .bind(tier.overall_order as i64)
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, users), fields(users = users.len()))]
    async fn reset_current_tier(
        &self,
        users: &[UserId],
        tier: TierId,
        season: SeasonId,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET current_tier = $2, tier_season = $3
            WHERE id = ANY($1) AND tier_season IS DISTINCT FROM $3
            "#,
        )
        .bind(users)
        .bind(tier)
        .bind(season)
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn record_ad_view(&self, user: UserId, kind: AdKind) -> Result<bool> {
        let query = match kind {
            AdKind::Banner => "UPDATE users SET banner_ads = banner_ads + 1 WHERE id = $1",
            AdKind::Interstitial => {
                "UPDATE users SET interstitial_ads = interstitial_ads + 1 WHERE id = $1"
            }
            AdKind::Rewarded => "UPDATE users SET rewarded_ads = rewarded_ads + 1 WHERE id = $1",
        };
        let result = sqlx::query(query).bind(user).execute(&self.0).await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn settle_daily_reward(
        &self,
        user: UserId,
        day: NaiveDate,
        coins: u64,
        counted: &AdsWatched,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET coin_earned = coin_earned + $3,
                banner_ads = GREATEST(banner_ads - $4, 0),
                interstitial_ads = GREATEST(interstitial_ads - $5, 0),
                rewarded_ads = GREATEST(rewarded_ads - $6, 0),
                last_reward_day = $2
            WHERE id = $1 AND (last_reward_day IS NULL OR last_reward_day < $2)
            "#,
        )
        .bind(user)
        .bind(day)
        .bind(coins as i64)
        .bind(i64::from(counted.banner))
        .bind(i64::from(counted.interstitial))
        .bind(i64::from(counted.rewarded))
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn set_active_bird(&self, user: UserId, bird: BirdId) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET active_bird = $2 WHERE id = $1")
            .bind(user)
            .bind(bird)
            .execute(&self.0)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn tiers(&self) -> Result<Vec<Tier>> {
        let records = sqlx::query_as::<_, TierRecord>(&format!(
            "SELECT {TIER_COLUMNS} FROM tiers ORDER BY overall_order"
        ))
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn insert_tier(&self, tier: NewTier) -> Result<Tier> {
        let record = sqlx::query_as::<_, TierRecord>(&format!(
            r#"
            INSERT INTO tiers (category, level, title, min_score, max_score, overall_order, tier_multiplier)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(tier.category.as_ref())
        .bind(tier.level as i64)
        .bind(tier.title())
        .bind(tier.min_score as i64)
        .bind(tier.max_score as i64)
        .bind(tier.overall_order as i64)
        .bind(tier.tier_multiplier)
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self))]
    async fn update_tier(&self, id: TierId, tier: NewTier) -> Result<Option<Tier>> {
        let record = sqlx::query_as::<_, TierRecord>(&format!(
            r#"
            UPDATE tiers
            SET category = $2, level = $3, title = $4, min_score = $5, max_score = $6,
                overall_order = $7, tier_multiplier = $8
            WHERE id = $1
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(tier.category.as_ref())
        .bind(tier.level as i64)
        .bind(tier.title())
        .bind(tier.min_score as i64)
        .bind(tier.max_score as i64)
        .bind(tier.overall_order as i64)
        .bind(tier.tier_multiplier)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn delete_tier(&self, id: TierId) -> Result<Option<Tier>> {
        let record = sqlx::query_as::<_, TierRecord>(&format!(
            "DELETE FROM tiers WHERE id = $1 RETURNING {TIER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn seasons(&self) -> Result<Vec<Season>> {
        let records = sqlx::query_as::<_, SeasonRecord>(&format!(
            "SELECT {SEASON_COLUMNS} FROM seasons ORDER BY start_date DESC, id DESC"
        ))
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn season(&self, id: SeasonId) -> Result<Option<Season>> {
        let record = sqlx::query_as::<_, SeasonRecord>(&format!(
            "SELECT {SEASON_COLUMNS} FROM seasons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn insert_season(&self, season: NewSeason, status: SeasonStatus) -> Result<Season> {
        let record = sqlx::query_as::<_, SeasonRecord>(&format!(
            r#"
            INSERT INTO seasons (title, start_date, end_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {SEASON_COLUMNS}
            "#
        ))
        .bind(&season.title)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(status.as_ref())
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self))]
    async fn update_season(
        &self,
        id: SeasonId,
        season: NewSeason,
        status: SeasonStatus,
    ) -> Result<Option<Season>> {
        let record = sqlx::query_as::<_, SeasonRecord>(&format!(
            r#"
            UPDATE seasons
            SET title = $2, start_date = $3, end_date = $4, status = $5
            WHERE id = $1
            RETURNING {SEASON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&season.title)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(status.as_ref())
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn delete_season(&self, id: SeasonId) -> Result<Option<Season>> {
        let record = sqlx::query_as::<_, SeasonRecord>(&format!(
            "DELETE FROM seasons WHERE id = $1 RETURNING {SEASON_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn set_season_status(&self, id: SeasonId, status: SeasonStatus) -> Result<()> {
        sqlx::query("UPDATE seasons SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_ref())
            .execute(&self.0)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_game(&self, game: NewGame, now: DateTime<Utc>) -> Result<Game> {
        let record = sqlx::query_as::<_, GameRecord>(&format!(
            r#"
            INSERT INTO games (user_id, season_id, score, duration, started_at, ended_at,
                               coins_earned, ads_viewed, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {GAME_COLUMNS}
            "#
        ))
        .bind(game.user_id)
        .bind(game.season_id)
        .bind(game.score as i64)
        .bind(game.duration as i64)
        .bind(game.started_at)
        .bind(game.ended_at)
        .bind(game.coins_earned as i64)
        .bind(game.ads_viewed as i64)
        .bind(game.status.as_ref())
        .bind(now)
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self, game), fields(game = game.id))]
    async fn update_game(&self, game: &Game) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE games
            SET season_id = $2, score = $3, duration = $4, started_at = $5, ended_at = $6,
                coins_earned = $7, ads_viewed = $8, status = $9
            WHERE id = $1
            "#,
        )
        .bind(game.id)
        .bind(game.season_id)
        .bind(game.score as i64)
        .bind(game.duration as i64)
        .bind(game.started_at)
        .bind(game.ended_at)
        .bind(game.coins_earned as i64)
        .bind(game.ads_viewed as i64)
        .bind(game.status.as_ref())
        .execute(&self.0)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Game", game.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn game(&self, id: GameId) -> Result<Option<Game>> {
        let record = sqlx::query_as::<_, GameRecord>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn games_for_user(&self, user: UserId) -> Result<Vec<Game>> {
        let records = sqlx::query_as::<_, GameRecord>(&format!(
            r#"
            SELECT {GAME_COLUMNS}
            FROM games
            WHERE user_id = $1
            ORDER BY ended_at DESC NULLS LAST, created_at DESC, id DESC
            "#
        ))
        .bind(user)
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn total_score_between(
        &self,
        user: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(score), 0)::BIGINT
            FROM games
            WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
            "#,
        )
        .bind(user)
        .bind(from)
        .bind(to)
        .fetch_one(&self.0)
        .await?;

        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let records = sqlx::query_as::<_, LeaderboardRecord>(
            r#"
            SELECT u.id AS user_id, u.name, MAX(g.score) AS max_score
            FROM games g
            JOIN users u ON u.id = g.user_id
            WHERE g.status = $1
            GROUP BY u.id, u.name
            ORDER BY max_score DESC, u.id ASC
            LIMIT $2
            "#,
        )
        .bind(GameStatus::End.as_ref())
        .bind(limit as i64)
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn user_stat(&self, user: UserId, season: SeasonId) -> Result<Option<UserStat>> {
        let record = sqlx::query_as::<_, UserStatRecord>(&format!(
            "SELECT {USER_STAT_COLUMNS} FROM user_stats WHERE user_id = $1 AND season_id = $2"
        ))
        .bind(user)
        .bind(season)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn insert_user_stat(&self, stat: &UserStat) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_stats (user_id, season_id, total_game_played, total_ads_watched,
                                    total_coin_earned, best_score, highest_tier_reached, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(stat.user_id)
        .bind(stat.season_id)
        .bind(stat.total_game_played as i64)
        .bind(stat.total_ads_watched as i64)
        .bind(stat.total_coin_earned as i64)
        .bind(stat.best_score as i64)
        .bind(stat.highest_tier_reached)
        .bind(stat.version as i64)
        .execute(&self.0)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn save_user_stat(&self, stat: &UserStat) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_stats
            SET total_game_played = $3,
                total_ads_watched = $4,
                total_coin_earned = $5,
                best_score = $6,
                highest_tier_reached = $7,
                version = version + 1
            WHERE user_id = $1 AND season_id = $2 AND version = $8
            "#,
        )
        .bind(stat.user_id)
        .bind(stat.season_id)
        .bind(stat.total_game_played as i64)
        .bind(stat.total_ads_watched as i64)
        .bind(stat.total_coin_earned as i64)
        .bind(stat.best_score as i64)
        .bind(stat.highest_tier_reached)
        .bind(stat.version as i64)
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, users), fields(users = users.len()))]
    async fn existing_stat_users(
        &self,
        season: SeasonId,
        users: &[UserId],
    ) -> Result<HashSet<UserId>> {
        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT user_id FROM user_stats WHERE season_id = $1 AND user_id = ANY($2)",
        )
        .bind(season)
        .bind(users)
        .fetch_all(&self.0)
        .await?;

        Ok(existing.into_iter().collect())
    }

    #[instrument(skip(self, users), fields(users = users.len()))]
    async fn insert_seeded_stats(
        &self,
        season: SeasonId,
        tier: TierId,
        users: &[UserId],
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_stats (user_id, season_id, highest_tier_reached)
            SELECT u, $2, $3 FROM unnest($1::int[]) AS u
            ON CONFLICT (user_id, season_id) DO NOTHING
            "#,
        )
        .bind(users)
        .bind(season)
        .bind(tier)
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn insert_bird(&self, bird: NewBird) -> Result<Bird> {
        let record = sqlx::query_as::<_, BirdRecord>(&format!(
            r#"
            INSERT INTO birds (name, kind, level, multiplier, image_url, points)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BIRD_COLUMNS}
            "#
        ))
        .bind(&bird.name)
        .bind(bird.kind.as_ref())
        .bind(bird.level as i64)
        .bind(bird.multiplier)
        .bind(&bird.image_url)
        .bind(bird.points as i64)
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self))]
    async fn birds(&self) -> Result<Vec<Bird>> {
        let records = sqlx::query_as::<_, BirdRecord>(&format!(
            "SELECT {BIRD_COLUMNS} FROM birds ORDER BY id"
        ))
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn bird(&self, id: BirdId) -> Result<Option<Bird>> {
        let record = sqlx::query_as::<_, BirdRecord>(&format!(
            "SELECT {BIRD_COLUMNS} FROM birds WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn insert_store_item(&self, item: NewStoreItem) -> Result<StoreItem> {
        let record = sqlx::query_as::<_, StoreItemRecord>(&format!(
            r#"
            INSERT INTO store_items (name, price, item_type, item_id, is_available,
                                     offer_percentage, offer_start_date, offer_end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {STORE_ITEM_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(item.price as i64)
        .bind(item.kind.type_name())
        .bind(item.kind.item_id())
        .bind(item.is_available)
        .bind(item.offer.map(|offer| offer.percentage as i64))
        .bind(item.offer.map(|offer| offer.start_date))
        .bind(item.offer.map(|offer| offer.end_date))
        .fetch_one(&self.0)
        .await?;

        Ok(record.try_into()?)
    }

    #[instrument(skip(self))]
    async fn store_items(&self) -> Result<Vec<StoreItem>> {
        let records = sqlx::query_as::<_, StoreItemRecord>(&format!(
            "SELECT {STORE_ITEM_COLUMNS} FROM store_items ORDER BY id DESC"
        ))
        .fetch_all(&self.0)
        .await?;

        convert(records)
    }

    #[instrument(skip(self))]
    async fn store_item(&self, id: StoreItemId) -> Result<Option<StoreItem>> {
        let record = sqlx::query_as::<_, StoreItemRecord>(&format!(
            "SELECT {STORE_ITEM_COLUMNS} FROM store_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.0)
        .await?;

        convert_one(record)
    }

    #[instrument(skip(self))]
    async fn purchase(
        &self,
        user: UserId,
        item: StoreItemId,
        price: u64,
        now: DateTime<Utc>,
    ) -> Result<UserItem> {
        let mut tx = self.0.begin().await?;

        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_items WHERE user_id = $1 AND store_item_id = $2)",
        )
        .bind(user)
        .bind(item)
        .fetch_one(tx.as_mut())
        .await?;
        if owned {
            return Err(Error::Conflict("User already owns this item".to_string()));
        }

        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET coin_earned = coin_earned - $2
            WHERE id = $1 AND coin_earned >= $2
            RETURNING coin_earned
            "#,
        )
        .bind(user)
        .bind(price as i64)
        .fetch_optional(tx.as_mut())
        .await?;
        if balance.is_none() {
            let available =
                sqlx::query_scalar::<_, i64>("SELECT coin_earned FROM users WHERE id = $1")
                    .bind(user)
                    .fetch_optional(tx.as_mut())
                    .await?;
            return Err(match available {
                Some(available) => Error::Validation(format!(
                    "Not enough coins: {price} required, {available} available"
                )),
                None => Error::not_found("User", user),
            });
        }

        let record = sqlx::query_as::<_, UserItemRecord>(
            r#"
            INSERT INTO user_items (user_id, store_item_id, purchased_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, store_item_id, purchased_at
            "#,
        )
        .bind(user)
        .bind(item)
        .bind(now)
        .fetch_one(tx.as_mut())
        .await?;

        tx.commit().await?;
        Ok(record.into())
    }

    #[instrument(skip(self))]
    async fn user_items(&self, user: UserId) -> Result<Vec<UserItem>> {
        let records = sqlx::query_as::<_, UserItemRecord>(
            r#"
            SELECT id, user_id, store_item_id, purchased_at
            FROM user_items
            WHERE user_id = $1
            ORDER BY purchased_at DESC, id DESC
            "#,
        )
        .bind(user)
        .fetch_all(&self.0)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

pub async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::migrate!("./migrations").run(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                rocket::error!("Failed to initialize SQLx database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}
