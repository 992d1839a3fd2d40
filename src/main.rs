#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::unreadable_literal)]

use std::sync::Arc;

use serenity::{prelude::GatewayIntents, Client};
use tracing::{error, info};

use crate::{
    commands::giveaway::end::{resume_giveaways, GiveawayAnnouncer},
    database::store::Store,
    models::config::Config,
};

mod commands;
mod common;
mod database;
mod events;
mod models;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(err) => {
                error!("Could not listen for SIGTERM, only Ctrl-C will stop the bot: {err}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    let log_level = match &config {
        Ok(config) if config.debug => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!("Could not start the bot: {err}");
            std::process::exit(1);
        }
    };

    let store = Arc::new(Store::load(&config.data_file));

    // Discord client connection
    let handler = models::handler::Handler {
        store: store.clone(),
    };
    let intents = GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS;
    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!("Attempted to build the Discord client, but failed with error: {err}");
            std::process::exit(1);
        }
    };

    let announcer: Arc<dyn GiveawayAnnouncer> = client.http.clone();
    resume_giveaways(&store, &announcer, time::OffsetDateTime::now_utc());

    let shard_manager = client.shard_manager.clone();
    let shutdown_store = store.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down, saving state to {}", shutdown_store.path().display());
        shutdown_store.save();
        shard_manager.shutdown_all().await;
    });

    if let Err(err) = client.start_autosharded().await {
        error!("Attempted to start the Discord client, but failed with error: {err}");
        store.save();
        std::process::exit(1);
    }
}
