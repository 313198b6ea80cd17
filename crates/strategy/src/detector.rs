use common::{Bar, Proposal, TradeKind};

/// Points added beyond the pullback extreme for the protective stop.
const STOP_BUFFER: i64 = 5;

/// Target distance is exactly twice the stop distance. Design constant.
const RISK_REWARD: f64 = 2.0;

/// Directional regime from comparing the two averages.
/// Derived per bar, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendBias {
    Bullish,
    Bearish,
}

impl TrendBias {
    pub fn from_emas(ema20: f64, ema50: f64) -> Self {
        if ema20 >= ema50 {
            TrendBias::Bullish
        } else {
            TrendBias::Bearish
        }
    }
}

/// Truncate a positive price into the integer point domain of the state
/// file, so entry/stop/target and later live-price checks share units.
fn to_points(price: f64) -> i64 {
    price.floor() as i64
}

/// Pullback-and-rejection detector.
///
/// Pure: the same bar and averages always produce the same answer. Must be
/// fed a fully-closed bar in the default configuration — a forming bar
/// lets the pattern flicker mid-candle.
///
/// Bullish regime: the bar dipped to the fast average intrabar but closed
/// back above it, and closed up — a CALL with the stop under the pullback
/// low. Bearish regime is the mirror image.
pub fn detect(bar: &Bar, ema20: f64, ema50: f64) -> Option<Proposal> {
    match TrendBias::from_emas(ema20, ema50) {
        TrendBias::Bullish => {
            if bar.low <= ema20 && bar.close > ema20 && bar.close > bar.open {
                let stop_loss = to_points(bar.low) - STOP_BUFFER;
                let target = to_points(bar.close + RISK_REWARD * (bar.close - stop_loss as f64));
                Some(Proposal {
                    kind: TradeKind::Call,
                    entry: to_points(bar.close),
                    stop_loss,
                    target,
                })
            } else {
                None
            }
        }
        TrendBias::Bearish => {
            if bar.high >= ema20 && bar.close < ema20 && bar.close < bar.open {
                let stop_loss = to_points(bar.high) + STOP_BUFFER;
                let target = to_points(bar.close - RISK_REWARD * (stop_loss as f64 - bar.close));
                Some(Proposal {
                    kind: TradeKind::Put,
                    entry: to_points(bar.close),
                    stop_loss,
                    target,
                })
            } else {
                None
            }
        }
    }
}
