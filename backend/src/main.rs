#[macro_use]
extern crate rocket;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use crate::config::{create_cors, init_logger, load_environment, Config};
use crate::services::database::ensure_schema;
use crate::services::youtube_client::{VideoSearchApi, YoutubeClient};
use anyhow::Result;
use log::info;
use rocket::{Build, Rocket};
use std::sync::Arc;

/// Process-wide state handed to every handler. Built once at startup.
pub struct AppState {
    pub config: Config,
    pub youtube: Arc<dyn VideoSearchApi>,
}

pub fn build_rocket(state: AppState) -> Result<Rocket<Build>> {
    let cors = create_cors(&state.config)?;
    let figment = rocket::Config::figment()
        .merge(("address", state.config.address))
        .merge(("port", state.config.port));

    Ok(rocket::custom(figment)
        .manage(state)
        .attach(cors)
        .mount("/", routes![api::search_youtube])
        .mount("/api", routes![api::register, api::login])
        .register("/", catchers![api::json_error]))
}

#[rocket::main]
async fn main() -> Result<()> {
    load_environment();
    init_logger();

    let config = Config::from_env()?;
    info!("Loaded configuration: {config:?}");

    ensure_schema(&config.database_url).await?;
    let youtube = Arc::new(YoutubeClient::new(&config)?);

    let rocket = build_rocket(AppState { config, youtube })?;
    rocket
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;
    Ok(())
}
