use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC interval fetched from the market-data provider.
/// Bars arrive oldest-first and are immutable once fetched; the last bar
/// in a window is the still-forming one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Direction of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeKind {
    Call,
    Put,
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Call => write!(f, "CALL"),
            TradeKind::Put => write!(f, "PUT"),
        }
    }
}

/// Detector output: a fully-priced recommendation, ready to become the
/// OPEN record verbatim. All levels live in the integer point domain so
/// later live-price comparisons use the same units as the state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub kind: TradeKind,
    pub entry: i64,
    pub stop_loss: i64,
    pub target: i64,
}

/// The single persisted slot, tagged by `status` on the wire:
///
/// ```json
/// {"status":"OPEN","type":"CALL","entry":102,"sl":93,"target":120}
/// {"status":"CLOSED"}
/// ```
///
/// `Closed` is a tombstone, not history — the next entry overwrites it.
/// Only the trade ledger mutates this record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum TradeRecord {
    Open {
        #[serde(rename = "type")]
        kind: TradeKind,
        entry: i64,
        #[serde(rename = "sl")]
        stop_loss: i64,
        target: i64,
    },
    Closed,
}

impl TradeRecord {
    pub fn is_open(&self) -> bool {
        matches!(self, TradeRecord::Open { .. })
    }
}

impl From<Proposal> for TradeRecord {
    fn from(p: Proposal) -> Self {
        TradeRecord::Open {
            kind: p.kind,
            entry: p.entry,
            stop_loss: p.stop_loss,
            target: p.target,
        }
    }
}

/// Why an open recommendation was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Forced time-based close. Takes priority over both price exits.
    SquareOff,
    Target,
    StopLoss,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::SquareOff => write!(f, "time"),
            ExitReason::Target => write!(f, "target"),
            ExitReason::StopLoss => write!(f, "stop"),
        }
    }
}

/// A state transition worth announcing. Rendered by the notifier layer;
/// the ledger only decides that a transition happened.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Entered {
        symbol: String,
        proposal: Proposal,
        /// Venue-local time of the tick.
        time: NaiveTime,
    },
    Exited {
        symbol: String,
        kind: TradeKind,
        entry: i64,
        exit_price: i64,
        reason: ExitReason,
        time: NaiveTime,
    },
}

/// What a single ledger tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new recommendation was opened.
    Entered(Proposal),
    /// The open recommendation was closed.
    Exited {
        kind: TradeKind,
        entry: i64,
        exit_price: i64,
        reason: ExitReason,
    },
    /// An open recommendation rode through unchanged.
    Holding,
    /// No open recommendation and no setup on the signal bar.
    NoSetup,
    /// Entry hunt skipped: past the no-new-entries cutoff.
    EntryCutoff,
}
