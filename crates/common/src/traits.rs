use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::{Bar, Result, TradeEvent, TradeRecord};

/// Abstraction over the market-data provider.
///
/// Returns the recent bar window for a symbol, oldest-first. The interval
/// and lookback range are fixed at construction; the implementation must
/// fail closed (`DataUnavailable`) on empty or malformed responses.
#[async_trait]
pub trait BarFeed: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<Vec<Bar>>;
}

/// Single-slot durable persistence, keyed by symbol.
///
/// The slot must survive process exit and be visible to the next
/// independent invocation, wherever it runs. One slot per symbol keeps a
/// multi-instrument extension a capability addition rather than a rewrite.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// `None` means no trade has ever been recorded for this symbol.
    async fn load(&self, symbol: &str) -> Result<Option<TradeRecord>>;

    async fn save(&self, symbol: &str, record: &TradeRecord) -> Result<()>;
}

/// Outbound notification channel for state transitions.
///
/// Delivery is fire-and-forget: callers log failures and move on; a failed
/// send never blocks the transition it was announcing.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, event: &TradeEvent) -> Result<()>;
}

/// Venue-local wall clock, injected so the state machine is deterministic
/// under test without real time passing.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real clock for a venue timezone.
pub struct VenueClock {
    tz: Tz,
}

impl VenueClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for VenueClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}
