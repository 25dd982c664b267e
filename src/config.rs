use std::time::Duration;

/// Environment variable that overrides the rate provider's base URL, mainly
/// so the tool can be pointed at a local stub.
const API_URL_ENV: &str = "EXCHANGE_RATE_API_URL";

const DEFAULT_API_URL: &str = "https://api.exchangerate.host";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_base: String,
    pub default_target: String,
    pub default_amount: f64,
    pub history_window_days: i64,
}

impl Config {
    pub fn builtin() -> Self {
        let api_base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_base_url,
            request_timeout: Duration::from_secs(10),
            default_base: "USD".to_string(),
            default_target: "EUR".to_string(),
            default_amount: 1.0,
            history_window_days: 365,
        }
    }
}
