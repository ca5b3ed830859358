use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub notification_poll_secs: u64,
    pub google_client_id: Option<String>,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Missing keys use defaults; keys that
    /// fail to parse fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_base_url: non_empty("API_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:5000".to_string())
                .trim_end_matches('/')
                .to_string(),
            api_timeout: Duration::from_secs(parse_or(&lookup, "API_TIMEOUT_SECS", 15)),
            session_key: non_empty("SESSION_KEY"),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false),
            notification_poll_secs: parse_or::<u64>(&lookup, "NOTIFICATION_POLL_SECS", 30).max(5),
            google_client_id: non_empty("GOOGLE_CLIENT_ID"),
            app_name: non_empty("APP_NAME").unwrap_or_else(|| "DormSync".to_string()),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{key}={raw:?} is not valid, using the default");
                default
            }
        },
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.api_timeout, Duration::from_secs(15));
        assert_eq!(cfg.notification_poll_secs, 30);
        assert!(!cfg.cookie_secure);
        assert!(cfg.google_client_id.is_none());
        assert_eq!(cfg.app_name, "DormSync");
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config_from(&[("API_TIMEOUT_SECS", "soon"), ("COOKIE_SECURE", "yes")]);
        assert_eq!(cfg.api_timeout, Duration::from_secs(15));
        assert!(!cfg.cookie_secure);
    }

    #[test]
    fn trailing_slash_is_trimmed_and_poll_has_floor() {
        let cfg = config_from(&[
            ("API_BASE_URL", "https://dorm.example.com/"),
            ("NOTIFICATION_POLL_SECS", "1"),
            ("GOOGLE_CLIENT_ID", "  "),
        ]);
        assert_eq!(cfg.api_base_url, "https://dorm.example.com");
        assert_eq!(cfg.notification_poll_secs, 5);
        assert!(cfg.google_client_id.is_none());
    }
}
