use std::time::Duration;

use rocket::{
    fairing::AdHoc,
    tokio::time::{interval, MissedTickBehavior},
    Shutdown,
};

use crate::{error::Result, Backend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    SeasonRollover,
    DailyRewards,
}

impl Job {
    pub const ALL: [Job; 2] = [Job::SeasonRollover, Job::DailyRewards];

    pub const fn name(self) -> &'static str {
        match self {
            Self::SeasonRollover => "Season rollover",
            Self::DailyRewards => "Daily rewards",
        }
    }

    fn period(self, backend: &Backend) -> Duration {
        match self {
            Self::SeasonRollover => backend.settings().season_job_interval,
            Self::DailyRewards => backend.settings().reward_job_interval,
        }
    }

    /// Runs one tick of the job.
    pub async fn run(self, backend: &Backend) -> Result<()> {
        match self {
            Self::SeasonRollover => {
                let report = backend.rollover().await?;
                tracing::debug!("Season rollover finished: {:?}", report);
            }
            Self::DailyRewards => {
                let report = backend.settle_daily_rewards().await?;
                tracing::debug!("Daily rewards finished: {:?}", report);
            }
        }
        Ok(())
    }
}

/// Ticks `job` until shutdown. A tick is awaited before the next one starts and
/// ticks missed in the meantime are dropped.
async fn run_loop(job: Job, backend: Backend, shutdown: Shutdown) {
    let mut interval = interval(job.period(&backend));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    rocket::tokio::pin!(shutdown);

    loop {
        rocket::tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        rocket::tokio::select! {
            _ = &mut shutdown => break,
            result = job.run(&backend) => {
                if let Err(e) = result {
                    tracing::error!("{} failed: {:#?}", job.name(), e);
                }
            }
        }
    }
    tracing::info!("{} stopped", job.name());
}

pub fn stage() -> AdHoc {
    AdHoc::on_liftoff("Background jobs", |rocket| {
        Box::pin(async move {
            let Some(backend) = rocket.state::<Backend>().cloned() else {
                tracing::error!("Backend is not managed, background jobs are disabled");
                return;
            };

            for job in Job::ALL {
                rocket::tokio::spawn(run_loop(job, backend.clone(), rocket.shutdown()));
            }
        })
    })
}
