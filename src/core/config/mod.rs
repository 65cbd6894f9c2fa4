use thiserror::Error;

mod parsing;

use self::parsing::{env_optional, env_or_default, parse_bool, parse_u64};

pub(crate) const DEFAULT_WEBAPP_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    server: ServerSettings,
    telegram: TelegramSettings,
    webapp: WebAppSettings,
    telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    host: ServerHost,
    port: ServerPort,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerHost(String);

#[derive(Debug, Clone, Copy)]
pub(crate) struct ServerPort(u16);

#[derive(Debug, Clone)]
pub(crate) struct TelegramSettings {
    /// Bot credential. Never logged.
    pub(crate) token: String,
    /// Bot API base URL without a trailing slash. Overridable for tests.
    pub(crate) api_url: String,
    pub(crate) poll_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct WebAppSettings {
    /// URL the reply-keyboard button opens inside Telegram.
    pub(crate) url: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid server host: {0}")]
    InvalidHost(String),
    #[error("invalid server port: {0}")]
    InvalidPort(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("missing required secret for {0}")]
    MissingSecret(&'static str),
}

impl ServerHost {
    fn parse(value: String) -> Result<Self, ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidHost(value));
        }
        Ok(Self(value))
    }
}

impl ServerPort {
    fn parse(value: String) -> Result<Self, ConfigError> {
        value.parse::<u16>().map(Self).map_err(|_| ConfigError::InvalidPort(value))
    }
}

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("TUNER_HOST", "0.0.0.0");
        let port = env_or_default("TUNER_PORT", "8000");

        let token = env_or_default("TELEGRAM_TOKEN", "");
        let api_url = env_or_default("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL);
        let poll_timeout_seconds =
            parse_u64("TELEGRAM_POLL_TIMEOUT", env_or_default("TELEGRAM_POLL_TIMEOUT", "30"))?;

        let webapp_url = env_or_default("WEBAPP_URL", DEFAULT_WEBAPP_URL);

        let log_level = env_or_default("TUNER_LOG_LEVEL", "info");
        let json = env_optional("TUNER_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            telegram: TelegramSettings {
                token,
                api_url: api_url.trim_end_matches('/').to_string(),
                poll_timeout_seconds,
            },
            webapp: WebAppSettings { url: webapp_url },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn telegram(&self) -> &TelegramSettings {
        &self.telegram
    }

    pub(crate) fn webapp(&self) -> &WebAppSettings {
        &self.webapp
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.token.is_empty() {
            return Err(ConfigError::MissingSecret("TELEGRAM_TOKEN"));
        }

        if self.telegram.poll_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TELEGRAM_POLL_TIMEOUT",
                value: String::from("0"),
            });
        }

        Ok(())
    }
}
