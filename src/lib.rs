#![allow(clippy::missing_errors_doc)]

use axum::Router;
use axum::routing::{get, post};
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use state::SharedState;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::instrument;

pub mod auth;
pub mod config;
pub mod endpoints;
pub mod error_layer;
pub mod identity;
pub mod models;
pub mod repository;
pub mod state;

#[derive(Parser, Clone, Debug)]
#[must_use]
pub struct Settings {
    #[arg(default_value_t = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000))]
    pub socket_addr: SocketAddr,

    #[arg(long, default_value = "sqlite://messagely.db?mode=rwc")]
    pub database_url: String,

    /// Signing secret for session tokens. Read from the environment so it
    /// stays out of shell history and process listings.
    #[arg(long, env = "MESSAGELY_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    #[arg(long, default_value_t = 3600)]
    pub token_ttl_seconds: i64,
}

#[instrument(skip_all)]
pub async fn run(settings: Settings) -> Result<(), color_eyre::eyre::Report> {
    let connect_options =
        SqliteConnectOptions::from_str(&settings.database_url)?.foreign_keys(true);
    let db_pool = SqlitePoolOptions::new().connect_with(connect_options).await?;
    repository::apply_schema(&db_pool).await?;

    let auth_config = config::AuthConfig::new(settings.token_secret)
        .with_token_ttl(chrono::Duration::seconds(settings.token_ttl_seconds));
    let shared_state = SharedState::new(db_pool, &auth_config)
        .map_err(|error| color_eyre::eyre::eyre!("Invalid password hashing parameters: {error}"))?;

    let listener = TcpListener::bind(settings.socket_addr).await?;
    tracing::info!(listen_addr = ?listener.local_addr()?, "Bound to local socket");

    axum::serve(listener, router(shared_state))
        .with_graceful_shutdown(self::shutdown_signal())
        .await?;

    Ok(())
}

#[must_use]
pub fn router(shared_state: SharedState) -> Router {
    Router::new()
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/users", get(endpoints::users::list))
        .route("/users/{username}", get(endpoints::users::get))
        .route("/users/{username}/to", get(endpoints::users::messages_to))
        .route("/users/{username}/from", get(endpoints::users::messages_from))
        .layer(error_layer::trace_layer())
        .with_state(shared_state)
}

#[instrument]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c()
        .await
        .inspect(|()| tracing::info!("Caught CTRL+C signal, shutting down"))
        .inspect_err(|error| tracing::error!(?error, "Failed to await CTRL+C signal"));
}
