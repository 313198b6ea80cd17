use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use proptest::prelude::*;

use common::{
    Bar, Clock, ExitReason, Notifier, Result, StateStore, TickOutcome, TradeEvent, TradeKind,
    TradeRecord,
};
use ledger::{LedgerConfig, SignalBar, TradeLedger};
use store::MemoryStore;
use strategy::IndicatorSeries;

/// Notifier double that only counts deliveries.
#[derive(Default)]
struct CountingNotifier {
    sent: Mutex<usize>,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _event: &TradeEvent) -> Result<()> {
        *self.sent.lock().unwrap() += 1;
        Ok(())
    }
}

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn window(live: f64) -> Vec<Bar> {
    let flat = Bar {
        timestamp: Utc::now(),
        open: 100.0,
        high: 100.0,
        low: 100.0,
        close: 100.0,
    };
    let mut bars = vec![flat; 59];
    bars.push(Bar { close: live, ..flat });
    bars
}

fn config() -> LedgerConfig {
    LedgerConfig {
        square_off: NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
        entry_cutoff: Some(NaiveTime::from_hms_opt(14, 30, 0).unwrap()),
        signal_bar: SignalBar::Closed,
    }
}

proptest! {
    /// A tick against an open recommendation never panics, produces at
    /// most one transition, and honors the square-off priority, whatever
    /// the live price and wall-clock time.
    #[test]
    fn open_trade_tick_is_total_and_single_shot(
        live in 1.0f64..1_000_000.0,
        entry in 1i64..1_000_000,
        stop_offset in 1i64..10_000,
        target_offset in 1i64..10_000,
        is_call in any::<bool>(),
        hour in 9u32..16,
        minute in 0u32..60,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (kind, stop_loss, target) = if is_call {
                (TradeKind::Call, entry - stop_offset, entry + target_offset)
            } else {
                (TradeKind::Put, entry + stop_offset, entry - target_offset)
            };
            let record = TradeRecord::Open { kind, entry, stop_loss, target };

            let store = Arc::new(MemoryStore::new());
            store.seed("^NSEI", record).await;
            let notifier = Arc::new(CountingNotifier::default());
            let now = NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap();

            let ledger = TradeLedger::new(
                "^NSEI",
                config(),
                store.clone(),
                notifier.clone(),
                Arc::new(FixedClock(now)),
            );

            let bars = window(live);
            let indicators = IndicatorSeries::compute(&bars).unwrap();
            let outcome = ledger.tick(&bars, &indicators).await.unwrap();

            let sent = *notifier.sent.lock().unwrap();
            let slot = store.load("^NSEI").await.unwrap().unwrap();

            match outcome {
                TickOutcome::Exited { reason, .. } => {
                    // Exactly one notification and the tombstone landed.
                    assert_eq!(sent, 1);
                    assert_eq!(slot, TradeRecord::Closed);

                    // Time always outranks price.
                    let past_square_off =
                        now.time() >= NaiveTime::from_hms_opt(15, 15, 0).unwrap();
                    if past_square_off {
                        assert_eq!(reason, ExitReason::SquareOff);
                    } else {
                        assert_ne!(reason, ExitReason::SquareOff);
                    }
                }
                TickOutcome::Holding => {
                    // No transition, no side effects, record untouched.
                    assert_eq!(sent, 0);
                    assert_eq!(slot, record);
                }
                other => panic!("open record can only hold or exit, got {other:?}"),
            }
        });
    }

    /// With no open recommendation a flat window never produces side
    /// effects, whatever the clock says.
    #[test]
    fn flat_market_hunt_is_quiet(
        live in 1.0f64..1_000_000.0,
        hour in 9u32..16,
        minute in 0u32..60,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let notifier = Arc::new(CountingNotifier::default());
            let now = NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap();

            let ledger = TradeLedger::new(
                "^NSEI",
                config(),
                store.clone(),
                notifier.clone(),
                Arc::new(FixedClock(now)),
            );

            let bars = window(live);
            let indicators = IndicatorSeries::compute(&bars).unwrap();
            let outcome = ledger.tick(&bars, &indicators).await.unwrap();

            // The closed signal bar is flat, so nothing can trigger.
            assert!(matches!(
                outcome,
                TickOutcome::NoSetup | TickOutcome::EntryCutoff
            ));
            assert_eq!(*notifier.sent.lock().unwrap(), 0);
            assert!(store.load("^NSEI").await.unwrap().is_none());
        });
    }
}
