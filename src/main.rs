mod app;
mod config;
mod db;
mod error;
mod exercises;
mod payload;
mod state;
#[cfg(test)]
mod test_support;
mod users;

use crate::{config::AppConfig, state::AppState};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "exercise_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // read while still single-threaded, see `detect_local_offset`
    let local_offset = config::detect_local_offset();
    let config = AppConfig::from_env(local_offset)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("starting application");
    let (host, port) = (config.host.clone(), config.port);

    let app_state = AppState::init(config).await?;
    let app = app::build_app(app_state);

    app::serve(app, &host, port).await
}
