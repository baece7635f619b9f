#[macro_use]
extern crate rocket;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod entrypoints;
pub mod error;
pub mod jobs;
pub mod ledger;
pub mod memory;
pub mod rewards;
pub mod seasons;
pub mod store;
pub mod tiers;
pub mod users;

#[cfg(test)]
mod tests;

use clock::{Clock, SystemClock};
use config::{Settings, StoreKind};
use db::DB;
use memory::MemoryStore;
use store::Store;
use tiers::TierCache;

/// Shared handle to everything a request or a job needs. Cheap to clone.
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    tiers: TierCache,
    settings: Arc<Settings>,
}

impl Backend {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, settings: Settings) -> Self {
        Self {
            store,
            clock,
            tiers: TierCache::default(),
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

async fn install(rocket: Rocket<Build>, backend: Backend) -> fairing::Result {
    if backend.settings().seed_default_tiers {
        if let Err(e) = backend.seed_default_tiers().await {
            rocket::error!("Failed to seed the default tier ladder: {:#?}", e);
            return Err(rocket);
        }
    }
    Ok(rocket.manage(backend))
}

/// Sets up the configured store and manages a [`Backend`] on top of it.
pub fn stage(settings: Settings) -> AdHoc {
    AdHoc::on_ignite("Backend Stage", move |rocket| async move {
        match settings.store {
            StoreKind::Postgres => rocket
                .attach(DB::init())
                .attach(AdHoc::try_on_ignite("SQLx Migrations", db::run_migrations))
                .attach(AdHoc::try_on_ignite("Install backend", move |rocket| async move {
                    let Some(db) = DB::fetch(&rocket).cloned() else {
                        return Err(rocket);
                    };
                    let backend = Backend::new(Arc::new(db), Arc::new(SystemClock), settings);
                    install(rocket, backend).await
                })),
            StoreKind::Memory => rocket.attach(AdHoc::try_on_ignite(
                "Install backend",
                move |rocket| async move {
                    let backend = Backend::new(
                        Arc::new(MemoryStore::default()),
                        Arc::new(SystemClock),
                        settings,
                    );
                    install(rocket, backend).await
                },
            )),
        }
    })
}
