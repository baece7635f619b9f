use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rocket::local::asynchronous::Client;
use shared::{GameResult, NewSeason, NewUser, Role, Season, User, UserId};

use crate::{
    clock::Clock,
    config::{Settings, StoreKind},
    entrypoints,
    ledger::{SubmitResult, Submission},
    memory::MemoryStore,
    Backend,
};

mod http;
mod ledger;
mod tiers;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).single().unwrap()
}

pub fn result(score: u32) -> GameResult {
    GameResult {
        score,
        duration: 35,
        ads_viewed: 0,
    }
}

#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct ServerExt {
    pub backend: Backend,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl ServerExt {
    /// Backend over an empty in-memory store with the default ladder seeded.
    pub async fn new() -> Self {
        Self::with_settings(Settings {
            store: StoreKind::Memory,
            ..Default::default()
        })
        .await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::new(start_time()));
        let seed = settings.seed_default_tiers;
        let backend = Backend::new(store.clone(), clock.clone(), settings);
        if seed {
            backend.seed_default_tiers().await.unwrap();
        }
        Self {
            backend,
            store,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance(&self, duration: Duration) {
        self.clock.set(self.now() + duration);
    }

    pub async fn user(&self, name: &str) -> User {
        self.backend
            .register_user(NewUser {
                name: name.to_string(),
                email: format!("{}@flappy.test", name.to_lowercase()),
                role: Role::User,
            })
            .await
            .unwrap()
    }

    pub async fn admin(&self) -> User {
        self.backend
            .register_user(NewUser {
                name: "Admin".to_string(),
                email: "admin@flappy.test".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap()
    }

    /// Season spanning `[now + start_days, now + end_days)`.
    pub async fn season(&self, title: &str, start_days: i64, end_days: i64) -> Season {
        self.backend
            .create_season(NewSeason {
                title: title.to_string(),
                start_date: self.now() + Duration::days(start_days),
                end_date: self.now() + Duration::days(end_days),
            })
            .await
            .unwrap()
    }

    pub async fn active_season(&self) -> Season {
        self.season("Spring", -1, 30).await
    }

    pub async fn submit(&self, user: UserId, score: u32) -> Submission {
        self.backend
            .submit_result(SubmitResult {
                game_id: None,
                user_id: user,
                season_id: None,
                result: result(score),
            })
            .await
            .unwrap()
    }

    pub async fn current_tier_order(&self, user: UserId) -> Option<u32> {
        let user = self.backend.user(user).await.unwrap();
        let ladder = self.backend.ladder().await.unwrap();
        user.current_tier
            .and_then(|id| ladder.get(id))
            .map(|tier| tier.overall_order)
    }

    pub async fn client(&self) -> Client {
        let rocket = rocket::build()
            .manage(self.backend.clone())
            .attach(entrypoints::stage());
        Client::tracked(rocket).await.unwrap()
    }
}
