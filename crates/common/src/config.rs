use chrono_tz::Tz;

/// Runtime configuration loaded from environment variables at startup.
///
/// Everything has a sensible default for the NSE index setup the bot was
/// built around. Telegram credentials are optional: without both token and
/// chat id the bot degrades to logging-only delivery. Malformed values
/// cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instrument symbol as the data provider knows it.
    pub symbol: String,
    /// Bar interval, e.g. "15m".
    pub bar_interval: String,
    /// Lookback range fetched each invocation, e.g. "5d".
    pub lookback: String,
    /// Venue timezone for session and cutoff checks.
    pub venue_tz: Tz,

    pub telegram: Option<TelegramConfig>,

    /// Directory holding the per-symbol state slots.
    pub state_dir: String,
    /// Commit and push the state file after each write.
    pub git_sync: bool,

    /// Path to the TOML policy file (session hours, lifecycle times).
    pub policy_path: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: i64,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram = match (env_var("TELEGRAM_TOKEN"), env_var("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat)) => {
                let chat_id = chat.parse::<i64>().unwrap_or_else(|_| {
                    panic!("TELEGRAM_CHAT_ID must be a numeric chat id, got: '{chat}'")
                });
                Some(TelegramConfig { token, chat_id })
            }
            _ => None,
        };

        let tz_name = env_var("VENUE_TZ").unwrap_or_else(|| "Asia/Kolkata".to_string());
        let venue_tz: Tz = tz_name.parse().unwrap_or_else(|_| {
            panic!("VENUE_TZ is not a valid IANA timezone name: '{tz_name}'")
        });

        Config {
            symbol: env_var("SYMBOL").unwrap_or_else(|| "^NSEI".to_string()),
            bar_interval: env_var("BAR_INTERVAL").unwrap_or_else(|| "15m".to_string()),
            lookback: env_var("LOOKBACK").unwrap_or_else(|| "5d".to_string()),
            venue_tz,
            telegram,
            state_dir: env_var("STATE_DIR").unwrap_or_else(|| "state".to_string()),
            git_sync: env_var("GIT_SYNC")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            policy_path: env_var("POLICY_PATH").unwrap_or_else(|| "config/policy.toml".to_string()),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
