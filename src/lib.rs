pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::telegram_bot::TelegramBotRuntime;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Fails on a missing TELEGRAM_TOKEN before anything binds or spawns.
    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    let state = AppState::new(settings);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let bot = TelegramBotRuntime::new(state.clone());
    let bot_task = tokio::spawn(async move { bot.run(shutdown_rx).await });

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        webapp_url = %state.settings().webapp().url,
        "Tuner mini-app bridge listening"
    );

    let result =
        axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await;

    // The web loop is done; tell the bot loop to stop and give it a moment.
    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(Duration::from_secs(5), bot_task).await {
        Ok(Ok(Ok(()))) => tracing::info!("Telegram bot runtime stopped"),
        Ok(Ok(Err(error))) => {
            tracing::error!(error = %error, "Telegram bot runtime exited with error")
        }
        Ok(Err(error)) => tracing::error!(error = %error, "Telegram bot task panicked"),
        Err(_) => tracing::warn!("Telegram bot task did not stop in time"),
    }

    result?;

    Ok(())
}
