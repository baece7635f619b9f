#[macro_use]
extern crate rocket;

use rocket_prometheus::PrometheusMetrics;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use flappy_server::{
    config::{Env, Settings},
    entrypoints, jobs,
};

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");
    let settings = Settings::try_from(env).expect("Invalid configuration");

    let span = tracing::info_span!("Starting Rocket");
    let _enter = span.enter();
    tracing::info!("Using {:?} store", settings.store);

    let prometheus = PrometheusMetrics::new();
    let cors = rocket_cors::CorsOptions::default()
        .to_cors()
        .expect("Failed to create CORS fairing");

    rocket::build()
        .attach(flappy_server::stage(settings))
        .attach(jobs::stage())
        .attach(entrypoints::stage())
        .attach(prometheus.clone())
        .attach(cors)
        .mount("/metrics", prometheus)
}
