use serde::{Deserialize, Serialize};
use shared::{GameId, GameResult, LeaderboardEntry, ModelError, SeasonId, UserId};

use crate::ledger::SubmitResult;

/// Raw result body. Numbers stay loose here so absent or negative values are
/// reported as validation errors instead of parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitGameRequest {
    pub game_id: Option<GameId>,
    pub score: Option<i64>,
    pub duration: Option<i64>,
    pub ads_viewed: Option<i64>,
    pub season_id: Option<SeasonId>,
}

impl SubmitGameRequest {
    pub fn into_submit(self, user_id: UserId) -> Result<SubmitResult, ModelError> {
        Ok(SubmitResult {
            game_id: self.game_id,
            user_id,
            season_id: self.season_id,
            result: GameResult::new(self.score, self.duration, self.ads_viewed)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub updated: usize,
}
