use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::endpoints::BASE_URL;

pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Routed for every scheme, e.g. `http://localhost:8080`.
    pub proxy: Option<String>,
    pub timeout: Duration,
    /// Minimum time between two requests sent by the same client.
    pub delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
        }
    }
}

impl ClientConfig {
    /// Reads `STARTPAGE_*` variables, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: get("STARTPAGE_BASE_URL").unwrap_or(defaults.base_url),
            proxy: get("STARTPAGE_PROXY"),
            timeout: get("STARTPAGE_TIMEOUT_SECS")
                .and_then(|v| parse_secs("STARTPAGE_TIMEOUT_SECS", &v))
                .unwrap_or(defaults.timeout),
            delay: get("STARTPAGE_DELAY_SECS")
                .and_then(|v| parse_secs("STARTPAGE_DELAY_SECS", &v))
                .unwrap_or(defaults.delay),
        }
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_secs(key: &str, value: &str) -> Option<Duration> {
    match value.trim().parse::<f64>() {
        Ok(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(duration) => Some(duration),
            Err(_) => {
                tracing::warn!("ignoring {key}={value:?}: out of range for a duration");
                None
            }
        },
        Err(_) => {
            tracing::warn!("ignoring {key}={value:?}: expected a non-negative number of seconds");
            None
        }
    }
}
