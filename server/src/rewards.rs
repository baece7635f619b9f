use chrono::{Days, NaiveDate};
use futures::TryStreamExt;
use serde::Serialize;
use shared::DailyReward;
use tracing::instrument;

use crate::{error::Result, Backend};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardReport {
    pub day: Option<NaiveDate>,
    pub users_settled: usize,
    pub coins_awarded: u64,
}

impl Backend {
    /// Credits ad and gameplay rewards up to the last completed local day.
    /// Every day since the user's watermark, or since they joined, is settled
    /// in one step, so missed ticks lose nothing and repeated ticks pay nothing.
    #[instrument(skip(self))]
    pub async fn settle_daily_rewards(&self) -> Result<RewardReport> {
        let boundary = self.settings.day_boundary;
        let Some(day) = boundary.last_completed_day(self.now()) else {
            return Ok(RewardReport::default());
        };

        let mut report = RewardReport {
            day: Some(day),
            ..Default::default()
        };
        let mut users = self.store.user_ids();
        while let Some(id) = users.try_next().await? {
            let Some(user) = self.store.user(id).await? else {
                continue;
            };
            let first = match user.last_reward_day {
                Some(settled) if settled >= day => continue,
                Some(settled) => settled.checked_add_days(Days::new(1)),
                None => Some(boundary.day_of(user.created_at)),
            };
            // Joined today, nothing has completed yet.
            let Some((from, to)) = first.and_then(|first| boundary.span(first, day)) else {
                continue;
            };

            let counted = user.ads_watched_today;
            let total_score = self.store.total_score_between(id, from, to).await?;
            let reward = DailyReward::calculate(total_score, &counted);
            if self
                .store
                .settle_daily_reward(id, day, reward.coins_earned, &counted)
                .await?
            {
                tracing::debug!("Settled user {} through {} with {:?}", id, day, reward);
                report.users_settled += 1;
                report.coins_awarded += reward.coins_earned;
            }
        }

        if report.users_settled > 0 {
            tracing::info!(
                "Daily rewards through {}: {} users, {} coins",
                day,
                report.users_settled,
                report.coins_awarded
            );
        }
        Ok(report)
    }
}
