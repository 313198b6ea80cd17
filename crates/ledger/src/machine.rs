use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{error, info, warn};

use common::{
    Bar, Clock, Error, ExitReason, Notifier, Result, StateStore, TickOutcome, TradeEvent,
    TradeKind, TradeRecord,
};
use strategy::{detect, IndicatorSeries};

/// Which bar the detector reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalBar {
    /// The most recently completed bar, one behind the forming bar.
    Closed,
    /// The still-forming bar. Faster, noisier.
    Forming,
}

/// Lifecycle policy injected into the ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Venue-local time at which any open recommendation is force-closed,
    /// regardless of price.
    pub square_off: NaiveTime,
    /// No new entries at or after this venue-local time. `None` disables
    /// the cutoff.
    pub entry_cutoff: Option<NaiveTime>,
    pub signal_bar: SignalBar,
}

/// The trade lifecycle state machine.
///
/// One record slot per symbol; a tick either manages the open
/// recommendation or hunts for a new one — never both. The exclusivity is
/// structural: the two paths are arms of a match on the loaded record.
/// Every transition makes exactly one notifier call and one store write,
/// and both failures are absorbed (logged) rather than escalated.
pub struct TradeLedger {
    symbol: String,
    config: LedgerConfig,
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl TradeLedger {
    pub fn new(
        symbol: impl Into<String>,
        config: LedgerConfig,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            config,
            store,
            notifier,
            clock,
        }
    }

    /// Evaluate one invocation against the fetched window.
    ///
    /// `bars` is the full chronological window; the last bar is the forming
    /// one and its close is the live price. `indicators` must be aligned
    /// one-to-one with `bars`.
    pub async fn tick(&self, bars: &[Bar], indicators: &IndicatorSeries) -> Result<TickOutcome> {
        debug_assert_eq!(bars.len(), indicators.len());

        let live_price = bars
            .last()
            .ok_or_else(|| Error::DataUnavailable("empty bar window".into()))?
            .close;
        let now = self.clock.now().time();

        // Read once at tick start; written at most once at the end. An
        // unreadable slot aborts before any side effect can duplicate.
        let record = self.store.load(&self.symbol).await?;

        match record {
            Some(TradeRecord::Open {
                kind,
                entry,
                stop_loss,
                target,
            }) => {
                self.manage_open(kind, entry, stop_loss, target, live_price, now)
                    .await
            }
            // The tombstone and the never-traded state are the same thing.
            Some(TradeRecord::Closed) | None => self.hunt(bars, indicators, now).await,
        }
    }

    /// Exit checks in strict priority order: square-off time beats target
    /// beats stop. At most one fires per tick.
    async fn manage_open(
        &self,
        kind: TradeKind,
        entry: i64,
        stop_loss: i64,
        target: i64,
        live_price: f64,
        now: NaiveTime,
    ) -> Result<TickOutcome> {
        let reason = if now >= self.config.square_off {
            Some(ExitReason::SquareOff)
        } else if hit_target(kind, live_price, target) {
            Some(ExitReason::Target)
        } else if hit_stop(kind, live_price, stop_loss) {
            Some(ExitReason::StopLoss)
        } else {
            None
        };

        let Some(reason) = reason else {
            info!(
                symbol = %self.symbol,
                %kind,
                entry,
                live = live_price,
                "Recommendation open — waiting on target, stop or square-off"
            );
            return Ok(TickOutcome::Holding);
        };

        let exit_price = live_price.floor() as i64;
        info!(
            symbol = %self.symbol,
            %kind,
            entry,
            exit = exit_price,
            %reason,
            "Closing recommendation"
        );

        self.announce(&TradeEvent::Exited {
            symbol: self.symbol.clone(),
            kind,
            entry,
            exit_price,
            reason,
            time: now,
        })
        .await;
        self.persist(&TradeRecord::Closed).await;

        Ok(TickOutcome::Exited {
            kind,
            entry,
            exit_price,
            reason,
        })
    }

    /// Entry hunt: cutoff gate, then the detector on the signal bar.
    async fn hunt(
        &self,
        bars: &[Bar],
        indicators: &IndicatorSeries,
        now: NaiveTime,
    ) -> Result<TickOutcome> {
        if let Some(cutoff) = self.config.entry_cutoff {
            if now >= cutoff {
                info!(symbol = %self.symbol, time = %now, "Past entry cutoff — not hunting");
                return Ok(TickOutcome::EntryCutoff);
            }
        }

        let idx = match self.config.signal_bar {
            SignalBar::Closed => bars.len().checked_sub(2).ok_or_else(|| {
                Error::DataUnavailable("window too short for a closed signal bar".into())
            })?,
            SignalBar::Forming => bars.len() - 1,
        };
        let bar = &bars[idx];
        let (ema20, ema50) = indicators.at(idx);

        let Some(proposal) = detect(bar, ema20, ema50) else {
            info!(symbol = %self.symbol, "No setup on the signal bar");
            return Ok(TickOutcome::NoSetup);
        };

        info!(
            symbol = %self.symbol,
            kind = %proposal.kind,
            entry = proposal.entry,
            sl = proposal.stop_loss,
            target = proposal.target,
            "New recommendation"
        );

        self.announce(&TradeEvent::Entered {
            symbol: self.symbol.clone(),
            proposal,
            time: now,
        })
        .await;
        self.persist(&TradeRecord::from(proposal)).await;

        Ok(TickOutcome::Entered(proposal))
    }

    /// Fire-and-forget announcement. Failure is logged, never escalated,
    /// never retried.
    async fn announce(&self, event: &TradeEvent) {
        if let Err(e) = self.notifier.send(event).await {
            warn!(symbol = %self.symbol, error = %e, "Notification failed — continuing");
        }
    }

    /// Persist the slot. On failure the next invocation re-reads stale
    /// state; that gap is accepted rather than retried.
    async fn persist(&self, record: &TradeRecord) {
        if let Err(e) = self.store.save(&self.symbol, record).await {
            error!(
                symbol = %self.symbol,
                error = %e,
                "State write failed — next tick may see stale state"
            );
        }
    }
}

fn hit_target(kind: TradeKind, live: f64, target: i64) -> bool {
    match kind {
        TradeKind::Call => live >= target as f64,
        TradeKind::Put => live <= target as f64,
    }
}

fn hit_stop(kind: TradeKind, live: f64, stop_loss: i64) -> bool {
    match kind {
        TradeKind::Call => live <= stop_loss as f64,
        TradeKind::Put => live >= stop_loss as f64,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
