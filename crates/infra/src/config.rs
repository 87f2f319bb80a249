use chrono_tz::Tz;
use coursebell_utils::create_random_secret;
use tracing::{info, warn};
use url::Url;

const WEBHOOK_KEY_LEN: usize = 24;

/// Process-level configuration read from the environment once at startup.
/// The per-cycle reminder settings live in the settings repository instead,
/// so they can change between cycles without a restart.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint the rendered messages are posted to. Delivery is disabled
    /// when unset, which only makes sense for local development.
    pub webhook_url: Option<String>,
    /// Shared secret sent along with every webhook delivery.
    pub webhook_key: String,
    /// Base url used for the calendar links embedded in message bodies.
    pub calendar_url: String,
    /// Fallback timezone for recipients without a preference.
    pub site_timezone: Tz,
    /// Seconds between scheduled reminder cycles.
    pub cycle_interval_secs: u64,
    /// Seconds between overdue follow-up cycles.
    pub overdue_interval_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        let webhook_url = match std::env::var("REMINDER_WEBHOOK_URL") {
            Ok(url) if Url::parse(&url).is_ok() => Some(url),
            Ok(url) => {
                warn!(
                    "The given REMINDER_WEBHOOK_URL: {} is not a valid url, message delivery is disabled.",
                    url
                );
                None
            }
            Err(_) => None,
        };

        let webhook_key = match std::env::var("REMINDER_WEBHOOK_KEY") {
            Ok(key) => key,
            Err(_) => {
                let key = create_random_secret(WEBHOOK_KEY_LEN);
                info!(
                    "Did not find REMINDER_WEBHOOK_KEY environment variable. Generated one: {}",
                    key
                );
                key
            }
        };

        let default_calendar_url = "http://localhost/calendar";
        let calendar_url = std::env::var("CALENDAR_BASE_URL")
            .unwrap_or_else(|_| default_calendar_url.to_string());
        let calendar_url = match Url::parse(&calendar_url) {
            Ok(_) => calendar_url.trim_end_matches('/').to_string(),
            Err(_) => {
                warn!(
                    "The given CALENDAR_BASE_URL: {} is not valid, falling back to the default: {}.",
                    calendar_url, default_calendar_url
                );
                default_calendar_url.to_string()
            }
        };

        let site_timezone = match std::env::var("SITE_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!("The given SITE_TIMEZONE: {} is unknown, using UTC.", tz);
                    Tz::UTC
                }
            },
            Err(_) => Tz::UTC,
        };

        Self {
            webhook_url,
            webhook_key,
            calendar_url,
            site_timezone,
            cycle_interval_secs: env_interval("REMINDER_CYCLE_INTERVAL_SECS", 15 * 60),
            overdue_interval_secs: env_interval("OVERDUE_CYCLE_INTERVAL_SECS", 15 * 60),
        }
    }
}

fn env_interval(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given {}: {} is not a valid interval, falling back to {} seconds.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
