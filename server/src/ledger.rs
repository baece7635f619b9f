use serde::Serialize;
use shared::{
    Game, GameId, GameResult, LeaderboardEntry, NewGame, SeasonId, Tier, UserId, UserStat,
};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    Backend,
};

pub const LEADERBOARD_SIZE: u32 = 10;
const STAT_SAVE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub game_id: Option<GameId>,
    pub user_id: UserId,
    pub season_id: Option<SeasonId>,
    pub result: GameResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub game: Game,
    pub user_stat: UserStat,
    /// Tier of the season's best score after this result.
    pub current_tier: Option<Tier>,
}

impl Backend {
    /// Opens an in-progress session in the active season.
    #[instrument(skip(self))]
    pub async fn start_session(&self, user: UserId) -> Result<Game> {
        self.user(user).await?;
        let season = self
            .active_season()
            .await?
            .ok_or_else(|| Error::Domain("No current season is active".to_string()))?;

        let now = self.now();
        self.store
            .insert_game(NewGame::started(user, season.id, now), now)
            .await
    }

    /// Saves a finished session and settles it against the user's season stat.
    /// A known `game_id` owned by the user is overwritten in place.
    #[instrument(skip(self))]
    pub async fn submit_result(&self, submit: SubmitResult) -> Result<Submission> {
        let SubmitResult {
            game_id,
            user_id,
            season_id,
            result,
        } = submit;

        self.user(user_id).await?;
        let season = match season_id {
            Some(id) => self.season(id).await?,
            None => self
                .active_season()
                .await?
                .ok_or_else(|| Error::NotFound("No current season is active".to_string()))?,
        };

        let now = self.now();
        let existing = match game_id {
            Some(id) => self
                .store
                .game(id)
                .await?
                .filter(|game| game.user_id == user_id),
            None => None,
        };
        let game = match existing {
            Some(mut game) => {
                game.finish(season.id, &result, now);
                self.store.update_game(&game).await?;
                game
            }
            None => {
                self.store
                    .insert_game(NewGame::finished(user_id, season.id, &result, now), now)
                    .await?
            }
        };

        let (user_stat, resolved) = self.settle(user_id, season.id, &result).await?;

        // The global tier follows the running season only.
        let running = self
            .active_season()
            .await?
            .is_some_and(|active| active.id == season.id);
        if let (Some(tier), true) = (&resolved, running) {
            if self.store.advance_current_tier(user_id, tier, season.id).await? {
                tracing::info!("User {} advanced to {}", user_id, tier.title);
            }
        }

        Ok(Submission {
            game,
            user_stat,
            current_tier: resolved,
        })
    }

    /// Folds `result` into the (user, season) stat with compare-and-swap,
    /// re-reading and re-applying on a concurrent write.
    async fn settle(
        &self,
        user: UserId,
        season: SeasonId,
        result: &GameResult,
    ) -> Result<(UserStat, Option<Tier>)> {
        let ladder = self.ladder().await?;

        for _ in 0..STAT_SAVE_ATTEMPTS {
            match self.store.user_stat(user, season).await? {
                Some(mut stat) => {
                    let resolved = stat.record(result, &ladder).cloned();
                    if self.store.save_user_stat(&stat).await? {
                        stat.version += 1;
                        return Ok((stat, resolved));
                    }
                }
                None => {
                    let mut stat = UserStat::new(user, season);
                    let resolved = stat.record(result, &ladder).cloned();
                    match self.store.insert_user_stat(&stat).await {
                        Ok(()) => return Ok((stat, resolved)),
                        // Created concurrently, retry as an update.
                        Err(Error::Conflict(_)) => {}
                        Err(e) => return Err(e),
                    }
                }
            }
            tracing::debug!("UserStat for user {user} in season {season} changed, retrying");
        }

        Err(Error::Internal(anyhow::anyhow!(
            "Failed to save UserStat for user {user} in season {season} after {STAT_SAVE_ATTEMPTS} attempts"
        )))
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.store.leaderboard(LEADERBOARD_SIZE).await
    }

    pub async fn user_games(&self, user: UserId) -> Result<Vec<Game>> {
        self.user(user).await?;
        self.store.games_for_user(user).await
    }

    pub async fn game(&self, id: GameId) -> Result<Game> {
        self.store
            .game(id)
            .await?
            .ok_or_else(|| Error::not_found("Game", id))
    }
}
