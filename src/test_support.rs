use std::sync::{Arc, OnceLock};

use axum::Router;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, state::AppState};

const TEST_TOKEN: &str = "123456:test-token";

/// Serializes tests that mutate process environment variables.
pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) async fn test_state() -> AppState {
    let guard = env_lock().await;
    std::env::set_var("TELEGRAM_TOKEN", TEST_TOKEN);
    std::env::remove_var("WEBAPP_URL");
    std::env::remove_var("TUNER_HOST");
    std::env::remove_var("TUNER_PORT");
    let settings = Settings::load().expect("test settings");
    drop(guard);

    AppState::new(settings)
}

pub(crate) async fn test_app() -> Router {
    api::router::router(test_state().await)
}
