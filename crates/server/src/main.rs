mod admin;
mod api;
mod auth;
mod db;
mod metrics;
mod pages;
mod state;
mod views;

use crate::db::init_db;
use crate::state::AppState;
use anyhow::Result;
use certverify_common::config::AppConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    let db = init_db(&config.database_url, config.db_max_connections).await?;
    let state = AppState::new(db, &config);

    info!(
        public_base_url = %config.public_base_url,
        "verification links use public base url"
    );

    let listen_addr = config.listen_addr.clone();
    let server_task = tokio::spawn(async move {
        let app = api::router(state);
        match tokio::net::TcpListener::bind(&listen_addr).await {
            Ok(listener) => {
                info!("certverify listening on {}", listen_addr);
                if let Err(err) = axum::serve(listener, app).await {
                    warn!("http server exited: {}", err);
                }
            }
            Err(err) => warn!("failed to bind {}: {}", listen_addr, err),
        }
    });

    tokio::select! {
        _ = server_task => {},
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
        }
    }

    Ok(())
}
