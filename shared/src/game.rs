use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameStatus {
    InProgress,
    End,
}

/// A validated game result as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u32,
    /// Seconds.
    pub duration: u32,
    pub ads_viewed: u32,
}

impl GameResult {
    pub fn new(
        score: Option<i64>,
        duration: Option<i64>,
        ads_viewed: Option<i64>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            score: required_count("score", score)?,
            duration: required_count("duration", duration)?,
            ads_viewed: required_count("ads_viewed", Some(ads_viewed.unwrap_or_default()))?,
        })
    }

    pub const fn coins_earned(&self) -> u64 {
        coins_for_score(self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub user_id: UserId,
    pub season_id: Option<SeasonId>,
    pub score: u32,
    pub duration: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub coins_earned: u64,
    pub ads_viewed: u32,
    pub status: GameStatus,
}

impl NewGame {
    pub fn started(user_id: UserId, season_id: SeasonId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            season_id: Some(season_id),
            score: 0,
            duration: 0,
            started_at: now,
            ended_at: None,
            coins_earned: 0,
            ads_viewed: 0,
            status: GameStatus::InProgress,
        }
    }

    pub fn finished(
        user_id: UserId,
        season_id: SeasonId,
        result: &GameResult,
        now: DateTime<Utc>,
    ) -> Self {
        let mut game = Self::started(user_id, season_id, now);
        game.apply_result(result, now);
        game
    }

    fn apply_result(&mut self, result: &GameResult, now: DateTime<Utc>) {
        self.score = result.score;
        self.duration = result.duration;
        self.started_at = now - Duration::seconds(result.duration as i64);
        self.ended_at = Some(now);
        self.coins_earned = result.coins_earned();
        self.ads_viewed = result.ads_viewed;
        self.status = GameStatus::End;
    }

    pub fn with_id(self, id: GameId, created_at: DateTime<Utc>) -> Game {
        Game {
            id,
            user_id: self.user_id,
            season_id: self.season_id,
            score: self.score,
            duration: self.duration,
            started_at: self.started_at,
            ended_at: self.ended_at,
            coins_earned: self.coins_earned,
            ads_viewed: self.ads_viewed,
            status: self.status,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    pub season_id: Option<SeasonId>,
    pub score: u32,
    pub duration: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub coins_earned: u64,
    pub ads_viewed: u32,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Overwrites the session with a (re)submitted result. Last write wins.
    pub fn finish(&mut self, season_id: SeasonId, result: &GameResult, now: DateTime<Utc>) {
        let mut session = NewGame::started(self.user_id, season_id, now);
        session.apply_result(result, now);

        self.season_id = session.season_id;
        self.score = session.score;
        self.duration = session.duration;
        self.started_at = session.started_at;
        self.ended_at = session.ended_at;
        self.coins_earned = session.coins_earned;
        self.ads_viewed = session.ads_viewed;
        self.status = session.status;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub name: String,
    pub max_score: u32,
}

/// Per user and season aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStat {
    pub user_id: UserId,
    pub season_id: SeasonId,
    pub total_game_played: u32,
    pub total_ads_watched: u32,
    pub total_coin_earned: u64,
    pub best_score: u32,
    pub highest_tier_reached: Option<TierId>,
    /// Bumped on every successful write, used for compare-and-swap saves.
    pub version: u32,
}

impl UserStat {
    pub fn new(user_id: UserId, season_id: SeasonId) -> Self {
        Self {
            user_id,
            season_id,
            total_game_played: 0,
            total_ads_watched: 0,
            total_coin_earned: 0,
            best_score: 0,
            highest_tier_reached: None,
            version: 0,
        }
    }

    pub fn seeded(user_id: UserId, season_id: SeasonId, tier: TierId) -> Self {
        Self {
            highest_tier_reached: Some(tier),
            ..Self::new(user_id, season_id)
        }
    }

    /// Folds one finished game into the aggregate and resolves the tier for
    /// the season's best score. `highest_tier_reached` only moves up.
    pub fn record<'a>(&mut self, result: &GameResult, ladder: &'a TierLadder) -> Option<&'a Tier> {
        self.total_game_played = self.total_game_played.saturating_add(1);
        self.total_ads_watched = self.total_ads_watched.saturating_add(result.ads_viewed);
        self.total_coin_earned = self
            .total_coin_earned
            .saturating_add(result.coins_earned());
        self.best_score = self.best_score.max(result.score);

        let resolved = ladder.resolve(self.best_score)?;
        let highest = self.highest_tier_reached.and_then(|id| ladder.get(id));
        if is_advancement(resolved, highest) {
            self.highest_tier_reached = Some(resolved.id);
        }
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ladder() -> TierLadder {
        TierLadder::new(
            default_ladder()
                .into_iter()
                .enumerate()
                .map(|(id, tier)| tier.with_id(id as TierId + 1))
                .collect(),
        )
    }

    fn result(score: u32) -> GameResult {
        GameResult {
            score,
            duration: 35,
            ads_viewed: 1,
        }
    }

    #[test]
    fn result_validation() {
        assert_eq!(
            GameResult::new(Some(120), Some(35), None),
            Ok(GameResult {
                score: 120,
                duration: 35,
                ads_viewed: 0
            })
        );
        assert_eq!(
            GameResult::new(None, Some(35), None),
            Err(ModelError::Missing("score"))
        );
        assert_eq!(
            GameResult::new(Some(10), None, None),
            Err(ModelError::Missing("duration"))
        );
    }

    #[test]
    fn finished_game_derives_times_and_coins() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).single().unwrap();
        let game = NewGame::finished(1, 2, &result(120), now);

        assert_eq!(game.coins_earned, 12);
        assert_eq!(game.status, GameStatus::End);
        assert_eq!(game.ended_at, Some(now));
        assert_eq!(game.started_at, now - Duration::seconds(35));
    }

    #[test]
    fn resubmission_overwrites_previous_values() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).single().unwrap();
        let mut game = NewGame::started(1, 2, now).with_id(7, now);
        assert_eq!(game.status, GameStatus::InProgress);

        game.finish(2, &result(300), now);
        assert_eq!(game.coins_earned, 30);
        game.finish(2, &result(55), now);
        assert_eq!(game.score, 55);
        assert_eq!(game.coins_earned, 5);
        assert_eq!(game.id, 7);
    }

    #[test]
    fn best_score_drives_tier() {
        let ladder = ladder();
        let mut stat = UserStat::new(1, 1);

        let tier = stat.record(&result(600), &ladder).unwrap();
        assert_eq!(tier.title, "Pro 1");
        assert_eq!(stat.best_score, 600);

        // A weaker session still resolves against the season best.
        let tier = stat.record(&result(20), &ladder).unwrap();
        assert_eq!(tier.title, "Pro 1");
        assert_eq!(stat.best_score, 600);

        let tier = stat.record(&result(600), &ladder).unwrap();
        assert_eq!(tier.title, "Pro 1");
        assert_eq!(stat.best_score, 600);

        stat.record(&result(900), &ladder);
        assert_eq!(stat.best_score, 900);
        assert_eq!(stat.total_game_played, 4);
        assert_eq!(stat.total_ads_watched, 4);
        assert_eq!(stat.total_coin_earned, 60 + 2 + 60 + 90);
        assert_eq!(
            stat.highest_tier_reached,
            ladder.resolve(900).map(|tier| tier.id)
        );
    }

    #[test]
    fn highest_tier_never_regresses() {
        let ladder = ladder();
        let legend = ladder.resolve(5000).unwrap().id;
        let mut stat = UserStat::seeded(1, 1, legend);

        stat.record(&result(10), &ladder);
        assert_eq!(stat.highest_tier_reached, Some(legend));
    }

    #[test]
    fn game_status_strings() {
        assert_eq!(GameStatus::InProgress.to_string(), "in-progress");
        assert_eq!("end".parse::<GameStatus>(), Ok(GameStatus::End));
    }
}
