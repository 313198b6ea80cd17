use chrono::NaiveTime;
use serde::Deserialize;
use tracing::info;

use crate::{LedgerConfig, SessionHours, SignalBar};

/// Lifecycle policy file (`config/policy.toml`). Times are "HH:MM" strings
/// in venue-local time.
///
/// ```toml
/// [session]
/// open = "09:15"
/// close = "15:30"
/// enforce = true
///
/// [lifecycle]
/// square_off = "15:15"
/// entry_cutoff = "14:30"   # empty string disables the cutoff
/// signal_bar = "closed"    # "closed" | "forming"
/// ```
///
/// The file is optional — compiled-in defaults apply when it is absent.
/// A file that exists but does not parse fails loudly at startup, same as
/// malformed env config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyFileConfig {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub lifecycle: LifecycleSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub open: String,
    pub close: String,
    pub enforce: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            open: "09:15".into(),
            close: "15:30".into(),
            enforce: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleSection {
    pub square_off: String,
    /// Empty string disables the no-new-entries cutoff.
    pub entry_cutoff: String,
    pub signal_bar: String,
}

impl Default for LifecycleSection {
    fn default() -> Self {
        Self {
            square_off: "15:15".into(),
            entry_cutoff: "14:30".into(),
            signal_bar: "closed".into(),
        }
    }
}

impl PolicyFileConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse policy file at '{path}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path, "No policy file — using built-in defaults");
                Self::default()
            }
            Err(e) => panic!("Failed to read policy file at '{path}': {e}"),
        }
    }

    pub fn session_hours(&self) -> SessionHours {
        SessionHours::new(
            parse_time(&self.session.open, "session.open"),
            parse_time(&self.session.close, "session.close"),
        )
    }

    pub fn enforce_session(&self) -> bool {
        self.session.enforce
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        let cutoff = self.lifecycle.entry_cutoff.trim();
        let entry_cutoff = if cutoff.is_empty() {
            None
        } else {
            Some(parse_time(cutoff, "lifecycle.entry_cutoff"))
        };

        let signal_bar = match self.lifecycle.signal_bar.as_str() {
            "closed" => SignalBar::Closed,
            "forming" => SignalBar::Forming,
            other => panic!("lifecycle.signal_bar must be 'closed' or 'forming', got '{other}'"),
        };

        LedgerConfig {
            square_off: parse_time(&self.lifecycle.square_off, "lifecycle.square_off"),
            entry_cutoff,
            signal_bar,
        }
    }
}

fn parse_time(s: &str, field: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M")
        .unwrap_or_else(|_| panic!("{field} must be HH:MM, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_safe_variant() {
        let policy = PolicyFileConfig::default();
        let cfg = policy.ledger_config();
        assert_eq!(cfg.signal_bar, SignalBar::Closed);
        assert_eq!(
            cfg.entry_cutoff,
            Some(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
        );
        assert_eq!(cfg.square_off, NaiveTime::from_hms_opt(15, 15, 0).unwrap());
        assert!(policy.enforce_session());
    }

    #[test]
    fn partial_file_falls_back_per_field() {
        let policy: PolicyFileConfig = toml::from_str(
            r#"
            [lifecycle]
            square_off = "15:00"
            "#,
        )
        .unwrap();
        let cfg = policy.ledger_config();
        assert_eq!(cfg.square_off, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        // Untouched fields keep their defaults.
        assert!(cfg.entry_cutoff.is_some());
        assert_eq!(policy.session_hours(), SessionHours::default());
    }

    #[test]
    fn empty_cutoff_disables_the_entry_gate() {
        let policy: PolicyFileConfig = toml::from_str(
            r#"
            [lifecycle]
            entry_cutoff = ""
            "#,
        )
        .unwrap();
        assert_eq!(policy.ledger_config().entry_cutoff, None);
    }

    #[test]
    fn forming_bar_variant_is_selectable() {
        let policy: PolicyFileConfig = toml::from_str(
            r#"
            [lifecycle]
            signal_bar = "forming"
            "#,
        )
        .unwrap();
        assert_eq!(policy.ledger_config().signal_bar, SignalBar::Forming);
    }

    #[test]
    #[should_panic(expected = "signal_bar")]
    fn unknown_signal_bar_fails_loudly() {
        let policy: PolicyFileConfig = toml::from_str(
            r#"
            [lifecycle]
            signal_bar = "both"
            "#,
        )
        .unwrap();
        let _ = policy.ledger_config();
    }

    #[test]
    #[should_panic(expected = "must be HH:MM")]
    fn malformed_time_fails_loudly() {
        let policy: PolicyFileConfig = toml::from_str(
            r#"
            [lifecycle]
            square_off = "quarter past three"
            "#,
        )
        .unwrap();
        let _ = policy.ledger_config();
    }
}
