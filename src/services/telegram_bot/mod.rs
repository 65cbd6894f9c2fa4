use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::core::state::AppState;

#[cfg(test)]
mod tests;

const FETCH_RETRY_DELAY: Duration = Duration::from_secs(3);
const START_REPLY_TEXT: &str = "Открой мини-апп тюнера:";
const START_BUTTON_LABEL: &str = "Открыть тюнер";

/// Long-polls the Telegram Bot API and answers `/start` with a reply keyboard
/// whose single button opens the tuner page inside Telegram.
#[derive(Clone)]
pub(crate) struct TelegramBotRuntime {
    state: AppState,
    client: Client,
    token: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct TgGetUpdatesResponse {
    ok: bool,
    result: Vec<TgUpdate>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgOkResponse {
    ok: bool,
    description: Option<String>,
}

/// A planned reply. Planning is separated from sending so the `/start`
/// decision is testable without a network.
#[derive(Debug, PartialEq)]
struct OutgoingMessage {
    chat_id: i64,
    text: String,
    reply_markup: Option<Value>,
}

impl TelegramBotRuntime {
    pub(crate) fn new(state: AppState) -> Self {
        let telegram = state.settings().telegram();
        Self {
            token: telegram.token.clone(),
            api_url: telegram.api_url.clone(),
            state,
            client: Client::new(),
        }
    }

    /// Runs the long-poll loop until `shutdown` flips or its sender is dropped.
    pub(crate) async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        tracing::info!("Telegram bot runtime started");

        let mut offset = 0i64;

        loop {
            let fetched = tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("Telegram bot runtime stopping");
                    return Ok(());
                }
                fetched = self.get_updates(offset) => fetched,
            };

            let updates = match fetched {
                Ok(updates) => updates,
                Err(error) => {
                    tracing::error!(error = %error, "Failed to fetch Telegram updates");
                    tokio::time::sleep(FETCH_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = update.update_id + 1;

                let Some(message) = update.message else {
                    continue;
                };

                let webapp_url = &self.state.settings().webapp().url;
                let Some(reply) = reply_for_message(webapp_url, &message) else {
                    continue;
                };

                if let Err(error) = self.send_message(&reply).await {
                    tracing::error!(
                        error = %error,
                        chat_id = reply.chat_id,
                        "Failed to send Telegram reply"
                    );
                }
            }
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<TgUpdate>> {
        let timeout = self.state.settings().telegram().poll_timeout_seconds;
        let response = self
            .client
            .get(format!("{}/bot{}/getUpdates", self.api_url, self.token))
            .query(&[("timeout", timeout.to_string()), ("offset", offset.to_string())])
            .send()
            .await
            .context("Telegram getUpdates request failed")?;

        let parsed: TgGetUpdatesResponse =
            response.json().await.context("Failed to decode Telegram getUpdates payload")?;

        if !parsed.ok {
            return Err(anyhow!("Telegram API returned ok=false for getUpdates"));
        }

        Ok(parsed.result)
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<()> {
        let mut payload = json!({
            "chat_id": message.chat_id,
            "text": message.text,
        });
        if let Some(reply_markup) = &message.reply_markup {
            payload["reply_markup"] = reply_markup.clone();
        }

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.api_url, self.token))
            .json(&payload)
            .send()
            .await
            .context("Failed to send Telegram message")?;

        let parsed: TgOkResponse =
            response.json().await.context("Failed to decode Telegram sendMessage payload")?;

        if parsed.ok {
            return Ok(());
        }

        let description =
            parsed.description.unwrap_or_else(|| "unknown Telegram API error".to_string());
        Err(anyhow!("Telegram sendMessage returned ok=false: {description}"))
    }
}

/// `/start` (optionally `/start@BotName`, with or without arguments) gets one
/// reply carrying the web-app keyboard. Everything else is ignored.
fn reply_for_message(webapp_url: &str, message: &TgMessage) -> Option<OutgoingMessage> {
    let text = message.text.as_deref()?;
    if !is_start_command(text) {
        return None;
    }

    Some(OutgoingMessage {
        chat_id: message.chat.id,
        text: START_REPLY_TEXT.to_string(),
        reply_markup: Some(start_keyboard(webapp_url)),
    })
}

fn is_start_command(text: &str) -> bool {
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };
    let command = first.split('@').next().unwrap_or(first);
    command == "/start"
}

fn start_keyboard(webapp_url: &str) -> Value {
    json!({
        "keyboard": [[{
            "text": START_BUTTON_LABEL,
            "web_app": { "url": webapp_url },
        }]],
        "resize_keyboard": true,
    })
}
