use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::BoxStream;
use shared::{
    AdKind, AdsWatched, Bird, BirdId, Game, GameId, LeaderboardEntry, NewBird, NewGame,
    NewSeason, NewStoreItem, NewTier, NewUser, Season, SeasonId, SeasonStatus, StoreItem,
    StoreItemId, Tier, TierId, User, UserId, UserItem, UserStat,
};

use crate::error::Result;

/// Persistence consumed by the backend. Implemented by [`crate::db::DB`] for
/// Postgres and by [`crate::memory::MemoryStore`].
///
/// Every method is atomic on its own; nothing spans calls.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<User>;

    async fn user(&self, id: UserId) -> Result<Option<User>>;

    /// Streams every user id in ascending order without loading the whole
    /// collection.
    fn user_ids(&self) -> BoxStream<'_, Result<UserId>>;

    /// Moves the user onto `tier` unless they already hold a tier at least as
    /// high in `season`. A tier assigned in another season never blocks.
    async fn advance_current_tier(&self, user: UserId, tier: &Tier, season: SeasonId)
        -> Result<bool>;

    /// Puts every listed user whose tier was not assigned in `season` on
    /// `tier`. Returns the number of users changed.
    async fn reset_current_tier(
        &self,
        users: &[UserId],
        tier: TierId,
        season: SeasonId,
    ) -> Result<u64>;

    async fn record_ad_view(&self, user: UserId, kind: AdKind) -> Result<bool>;

    /// Credits `coins`, takes the `counted` ad views off the user's counters
    /// and moves the reward watermark to `day`. Views recorded after `counted`
    /// was read stay for the next settlement. Does nothing and returns `false`
    /// when the user was already settled for `day` or later.
    async fn settle_daily_reward(
        &self,
        user: UserId,
        day: NaiveDate,
        coins: u64,
        counted: &AdsWatched,
    ) -> Result<bool>;

    async fn set_active_bird(&self, user: UserId, bird: BirdId) -> Result<bool>;

    async fn tiers(&self) -> Result<Vec<Tier>>;

    async fn insert_tier(&self, tier: NewTier) -> Result<Tier>;

    async fn update_tier(&self, id: TierId, tier: NewTier) -> Result<Option<Tier>>;

    async fn delete_tier(&self, id: TierId) -> Result<Option<Tier>>;

    /// Newest first.
    async fn seasons(&self) -> Result<Vec<Season>>;

    async fn season(&self, id: SeasonId) -> Result<Option<Season>>;

    async fn insert_season(&self, season: NewSeason, status: SeasonStatus) -> Result<Season>;

    async fn update_season(
        &self,
        id: SeasonId,
        season: NewSeason,
        status: SeasonStatus,
    ) -> Result<Option<Season>>;

    async fn delete_season(&self, id: SeasonId) -> Result<Option<Season>>;

    async fn set_season_status(&self, id: SeasonId, status: SeasonStatus) -> Result<()>;

    async fn insert_game(&self, game: NewGame, now: DateTime<Utc>) -> Result<Game>;

    async fn update_game(&self, game: &Game) -> Result<()>;

    async fn game(&self, id: GameId) -> Result<Option<Game>>;

    /// Newest first.
    async fn games_for_user(&self, user: UserId) -> Result<Vec<Game>>;

    /// Sum of the scores of games created in `[from, to)`.
    async fn total_score_between(
        &self,
        user: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64>;

    /// Best finished game per user, highest first, ties by user id.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>>;

    async fn user_stat(&self, user: UserId, season: SeasonId) -> Result<Option<UserStat>>;

    /// Fails with `Conflict` if the pair already has a stat.
    async fn insert_user_stat(&self, stat: &UserStat) -> Result<()>;

    /// Writes `stat` only if the stored version still equals `stat.version`.
    async fn save_user_stat(&self, stat: &UserStat) -> Result<bool>;

    async fn existing_stat_users(
        &self,
        season: SeasonId,
        users: &[UserId],
    ) -> Result<HashSet<UserId>>;

    /// Bulk insert of fresh stats starting at `tier`. Pairs that already exist
    /// are skipped. Returns the number of inserted rows.
    async fn insert_seeded_stats(
        &self,
        season: SeasonId,
        tier: TierId,
        users: &[UserId],
    ) -> Result<u64>;

    async fn insert_bird(&self, bird: NewBird) -> Result<Bird>;

    async fn birds(&self) -> Result<Vec<Bird>>;

    async fn bird(&self, id: BirdId) -> Result<Option<Bird>>;

    async fn insert_store_item(&self, item: NewStoreItem) -> Result<StoreItem>;

    async fn store_items(&self) -> Result<Vec<StoreItem>>;

    async fn store_item(&self, id: StoreItemId) -> Result<Option<StoreItem>>;

    /// Debits `price` and records ownership in one step. Fails with
    /// `Validation` on insufficient coins and `Conflict` if already owned.
    async fn purchase(
        &self,
        user: UserId,
        item: StoreItemId,
        price: u64,
        now: DateTime<Utc>,
    ) -> Result<UserItem>;

    /// Newest purchase first.
    async fn user_items(&self, user: UserId) -> Result<Vec<UserItem>>;
}
