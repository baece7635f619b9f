use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use futures::{stream::BoxStream, StreamExt};
use rocket::tokio::sync::RwLock;
use shared::{
    AdKind, AdsWatched, Bird, BirdId, Game, GameId, GameStatus, LeaderboardEntry, NewBird,
    NewGame, NewSeason, NewStoreItem, NewTier, NewUser, Season, SeasonId, SeasonStatus,
    StoreItem, StoreItemId, Tier, TierId, User, UserId, UserItem, UserStat,
};

use crate::{
    error::{Error, Result},
    store::Store,
};

#[derive(Debug, Default)]
struct Collections {
    next_id: i32,
    users: BTreeMap<UserId, User>,
    tiers: BTreeMap<TierId, Tier>,
    seasons: BTreeMap<SeasonId, Season>,
    games: BTreeMap<GameId, Game>,
    user_stats: BTreeMap<(UserId, SeasonId), UserStat>,
    birds: BTreeMap<BirdId, Bird>,
    store_items: BTreeMap<StoreItemId, StoreItem>,
    user_items: Vec<UserItem>,
}

impl Collections {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_tier_uniqueness(&self, tier: &NewTier, except: Option<TierId>) -> Result<()> {
        let title = tier.title();
        let clash = self.tiers.values().find(|existing| {
            Some(existing.id) != except
                && (existing.title == title || existing.overall_order == tier.overall_order)
        });
        match clash {
            Some(existing) => Err(Error::Conflict(format!(
                "Tier {} conflicts with {}",
                title, existing.title
            ))),
            None => Ok(()),
        }
    }

    fn check_season_title(&self, title: &str, except: Option<SeasonId>) -> Result<()> {
        if self
            .seasons
            .values()
            .any(|season| Some(season.id) != except && season.title == title)
        {
            return Err(Error::Conflict(format!("Season {title} already exists")));
        }
        Ok(())
    }

    fn tier_order(&self, id: Option<TierId>) -> u32 {
        id.and_then(|id| self.tiers.get(&id))
            .map_or(0, |tier| tier.overall_order)
    }
}

/// Keeps every collection in process memory. Used by tests and for running
/// the server without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|existing| existing.email == user.email) {
            return Err(Error::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }
        let id = inner.next_id();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            role: user.role,
            coin_earned: 0,
            current_tier: None,
            tier_season: None,
            active_bird: None,
            ads_watched_today: AdsWatched::default(),
            last_reward_day: None,
            created_at: now,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    fn user_ids(&self) -> BoxStream<'_, Result<UserId>> {
        futures::stream::once(async move {
            let ids: Vec<Result<UserId>> =
                self.inner.read().await.users.keys().copied().map(Ok).collect();
            futures::stream::iter(ids)
        })
        .flatten()
        .boxed()
    }

    async fn advance_current_tier(
        &self,
        user: UserId,
        tier: &Tier,
        season: SeasonId,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.users.get(&user) else {
            return Ok(false);
        };
        let same_season = current.tier_season == Some(season);
        if same_season && inner.tier_order(current.current_tier) >= tier.overall_order {
            return Ok(false);
        }
        if let Some(record) = inner.users.get_mut(&user) {
            record.current_tier = Some(tier.id);
            record.tier_season = Some(season);
        }
        Ok(true)
    }

    async fn reset_current_tier(
        &self,
        users: &[UserId],
        tier: TierId,
        season: SeasonId,
    ) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut changed = 0;
        for id in users {
            if let Some(user) = inner.users.get_mut(id) {
                if user.tier_season != Some(season) {
                    user.current_tier = Some(tier);
                    user.tier_season = Some(season);
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn record_ad_view(&self, user: UserId, kind: AdKind) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(&user) {
            Some(user) => {
                user.ads_watched_today.record(kind);
                true
            }
            None => false,
        })
    }

    async fn settle_daily_reward(
        &self,
        user: UserId,
        day: NaiveDate,
        coins: u64,
        counted: &AdsWatched,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&user) else {
            return Ok(false);
        };
        if user.last_reward_day.is_some_and(|settled| settled >= day) {
            return Ok(false);
        }
        user.coin_earned = user.coin_earned.saturating_add(coins);
        let ads = &mut user.ads_watched_today;
        ads.banner = ads.banner.saturating_sub(counted.banner);
        ads.interstitial = ads.interstitial.saturating_sub(counted.interstitial);
        ads.rewarded = ads.rewarded.saturating_sub(counted.rewarded);
        user.last_reward_day = Some(day);
        Ok(true)
    }

    async fn set_active_bird(&self, user: UserId, bird: BirdId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(&user) {
            Some(user) => {
                user.active_bird = Some(bird);
                true
            }
            None => false,
        })
    }

    async fn tiers(&self) -> Result<Vec<Tier>> {
        let mut tiers: Vec<Tier> = self.inner.read().await.tiers.values().cloned().collect();
        tiers.sort_by_key(|tier| tier.overall_order);
        Ok(tiers)
    }

    async fn insert_tier(&self, tier: NewTier) -> Result<Tier> {
        let mut inner = self.inner.write().await;
        inner.check_tier_uniqueness(&tier, None)?;
        let id = inner.next_id();
        let tier = tier.with_id(id);
        inner.tiers.insert(id, tier.clone());
        Ok(tier)
    }

    async fn update_tier(&self, id: TierId, tier: NewTier) -> Result<Option<Tier>> {
        let mut inner = self.inner.write().await;
        if !inner.tiers.contains_key(&id) {
            return Ok(None);
        }
        inner.check_tier_uniqueness(&tier, Some(id))?;
        let tier = tier.with_id(id);
        inner.tiers.insert(id, tier.clone());
        Ok(Some(tier))
    }

    async fn delete_tier(&self, id: TierId) -> Result<Option<Tier>> {
        let mut inner = self.inner.write().await;
        let removed = inner.tiers.remove(&id);
        if removed.is_some() {
            for user in inner.users.values_mut() {
                if user.current_tier == Some(id) {
                    user.current_tier = None;
                }
            }
            for stat in inner.user_stats.values_mut() {
                if stat.highest_tier_reached == Some(id) {
                    stat.highest_tier_reached = None;
                }
            }
        }
        Ok(removed)
    }

    async fn seasons(&self) -> Result<Vec<Season>> {
        let mut seasons: Vec<Season> = self.inner.read().await.seasons.values().cloned().collect();
        seasons.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(seasons)
    }

    async fn season(&self, id: SeasonId) -> Result<Option<Season>> {
        Ok(self.inner.read().await.seasons.get(&id).cloned())
    }

    async fn insert_season(&self, season: NewSeason, status: SeasonStatus) -> Result<Season> {
        let mut inner = self.inner.write().await;
        inner.check_season_title(&season.title, None)?;
        let id = inner.next_id();
        let season = Season {
            id,
            title: season.title,
            start_date: season.start_date,
            end_date: season.end_date,
            status,
        };
        inner.seasons.insert(id, season.clone());
        Ok(season)
    }

    async fn update_season(
        &self,
        id: SeasonId,
        season: NewSeason,
        status: SeasonStatus,
    ) -> Result<Option<Season>> {
        let mut inner = self.inner.write().await;
        if !inner.seasons.contains_key(&id) {
            return Ok(None);
        }
        inner.check_season_title(&season.title, Some(id))?;
        let season = Season {
            id,
            title: season.title,
            start_date: season.start_date,
            end_date: season.end_date,
            status,
        };
        inner.seasons.insert(id, season.clone());
        Ok(Some(season))
    }

    async fn delete_season(&self, id: SeasonId) -> Result<Option<Season>> {
        let mut inner = self.inner.write().await;
        let removed = inner.seasons.remove(&id);
        if removed.is_some() {
            inner.user_stats.retain(|(_, season), _| *season != id);
            for game in inner.games.values_mut() {
                if game.season_id == Some(id) {
                    game.season_id = None;
                }
            }
            for user in inner.users.values_mut() {
                if user.tier_season == Some(id) {
                    user.tier_season = None;
                }
            }
        }
        Ok(removed)
    }

    async fn set_season_status(&self, id: SeasonId, status: SeasonStatus) -> Result<()> {
        if let Some(season) = self.inner.write().await.seasons.get_mut(&id) {
            season.status = status;
        }
        Ok(())
    }

    async fn insert_game(&self, game: NewGame, now: DateTime<Utc>) -> Result<Game> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let game = game.with_id(id, now);
        inner.games.insert(id, game.clone());
        Ok(game)
    }

    async fn update_game(&self, game: &Game) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.games.get_mut(&game.id) {
            Some(stored) => {
                *stored = game.clone();
                Ok(())
            }
            None => Err(Error::not_found("Game", game.id)),
        }
    }

    async fn game(&self, id: GameId) -> Result<Option<Game>> {
        Ok(self.inner.read().await.games.get(&id).cloned())
    }

    async fn games_for_user(&self, user: UserId) -> Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .inner
            .read()
            .await
            .games
            .values()
            .filter(|game| game.user_id == user)
            .cloned()
            .collect();
        games.sort_by(|a, b| {
            b.ended_at
                .cmp(&a.ended_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(games)
    }

    async fn total_score_between(
        &self,
        user: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64> {
        Ok(self
            .inner
            .read()
            .await
            .games
            .values()
            .filter(|game| game.user_id == user && from <= game.created_at && game.created_at < to)
            .map(|game| game.score as u64)
            .sum())
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let inner = self.inner.read().await;
        let mut best: BTreeMap<UserId, u32> = BTreeMap::new();
        for game in inner.games.values() {
            if game.status != GameStatus::End {
                continue;
            }
            let entry = best.entry(game.user_id).or_default();
            *entry = (*entry).max(game.score);
        }

        let mut entries: Vec<LeaderboardEntry> = best
            .into_iter()
            .filter_map(|(user_id, max_score)| {
                inner.users.get(&user_id).map(|user| LeaderboardEntry {
                    user_id,
                    name: user.name.clone(),
                    max_score,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            b.max_score
                .cmp(&a.max_score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn user_stat(&self, user: UserId, season: SeasonId) -> Result<Option<UserStat>> {
        Ok(self
            .inner
            .read()
            .await
            .user_stats
            .get(&(user, season))
            .cloned())
    }

    async fn insert_user_stat(&self, stat: &UserStat) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = (stat.user_id, stat.season_id);
        if inner.user_stats.contains_key(&key) {
            return Err(Error::Conflict(format!(
                "UserStat for user {} in season {} already exists",
                stat.user_id, stat.season_id
            )));
        }
        inner.user_stats.insert(key, stat.clone());
        Ok(())
    }

    async fn save_user_stat(&self, stat: &UserStat) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.user_stats.get_mut(&(stat.user_id, stat.season_id)) {
            Some(stored) if stored.version == stat.version => {
                *stored = UserStat {
                    version: stat.version + 1,
                    ..stat.clone()
                };
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn existing_stat_users(
        &self,
        season: SeasonId,
        users: &[UserId],
    ) -> Result<HashSet<UserId>> {
        let inner = self.inner.read().await;
        Ok(users
            .iter()
            .copied()
            .filter(|user| inner.user_stats.contains_key(&(*user, season)))
            .collect())
    }

    async fn insert_seeded_stats(
        &self,
        season: SeasonId,
        tier: TierId,
        users: &[UserId],
    ) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut inserted = 0;
        for user in users {
            if let std::collections::btree_map::Entry::Vacant(entry) =
                inner.user_stats.entry((*user, season))
            {
                entry.insert(UserStat::seeded(*user, season, tier));
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn insert_bird(&self, bird: NewBird) -> Result<Bird> {
        let mut inner = self.inner.write().await;
        if inner.birds.values().any(|existing| existing.name == bird.name) {
            return Err(Error::Conflict(format!("Bird {} already exists", bird.name)));
        }
        let id = inner.next_id();
        let bird = bird.with_id(id);
        inner.birds.insert(id, bird.clone());
        Ok(bird)
    }

    async fn birds(&self) -> Result<Vec<Bird>> {
        Ok(self.inner.read().await.birds.values().cloned().collect())
    }

    async fn bird(&self, id: BirdId) -> Result<Option<Bird>> {
        Ok(self.inner.read().await.birds.get(&id).cloned())
    }

    async fn insert_store_item(&self, item: NewStoreItem) -> Result<StoreItem> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let item = item.with_id(id);
        inner.store_items.insert(id, item.clone());
        Ok(item)
    }

    async fn store_items(&self) -> Result<Vec<StoreItem>> {
        Ok(self
            .inner
            .read()
            .await
            .store_items
            .values()
            .rev()
            .cloned()
            .collect())
    }

    async fn store_item(&self, id: StoreItemId) -> Result<Option<StoreItem>> {
        Ok(self.inner.read().await.store_items.get(&id).cloned())
    }

    async fn purchase(
        &self,
        user: UserId,
        item: StoreItemId,
        price: u64,
        now: DateTime<Utc>,
    ) -> Result<UserItem> {
        let mut inner = self.inner.write().await;
        if inner
            .user_items
            .iter()
            .any(|owned| owned.user_id == user && owned.store_item_id == item)
        {
            return Err(Error::Conflict("User already owns this item".to_string()));
        }
        let Some(buyer) = inner.users.get_mut(&user) else {
            return Err(Error::not_found("User", user));
        };
        if buyer.coin_earned < price {
            return Err(Error::Validation(format!(
                "Not enough coins: {} required, {} available",
                price, buyer.coin_earned
            )));
        }
        buyer.coin_earned -= price;

        let id = inner.next_id();
        let owned = UserItem {
            id,
            user_id: user,
            store_item_id: item,
            purchased_at: now,
        };
        inner.user_items.push(owned.clone());
        Ok(owned)
    }

    async fn user_items(&self, user: UserId) -> Result<Vec<UserItem>> {
        let mut items: Vec<UserItem> = self
            .inner
            .read()
            .await
            .user_items
            .iter()
            .filter(|owned| owned.user_id == user)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }
}
