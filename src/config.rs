use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PREDICT_URL: &str = "https://cardioml-1.onrender.com/predict";
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    pub predict_url: String,
    /// `None` leaves the request unbounded; a hung backend keeps the
    /// loading indicator up until the transport gives up.
    pub request_timeout: Option<Duration>,
    pub notification_delay: Duration,
    pub fallback_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Invalid values
    /// are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let predict_url = lookup("PREDICT_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string());

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("[cardioml] Invalid REQUEST_TIMEOUT_SECS value, leaving requests unbounded");
                    None
                }
            },
            None => None,
        };

        let notification_ms: u64 = match lookup("NOTIFICATION_MS") {
            Some(s) => s.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "[cardioml] Invalid NOTIFICATION_MS value, defaulting to {}",
                    DEFAULT_NOTIFICATION_MS
                );
                DEFAULT_NOTIFICATION_MS
            }),
            None => DEFAULT_NOTIFICATION_MS,
        };

        let fallback_seed = lookup("FALLBACK_SEED").and_then(|s| match s.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("[cardioml] Invalid FALLBACK_SEED value, seeding from entropy");
                None
            }
        });

        Self {
            predict_url,
            request_timeout,
            notification_delay: Duration::from_millis(notification_ms),
            fallback_seed,
        }
    }
}
