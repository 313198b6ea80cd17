use common::{Bar, Error, Result};

/// Fast and slow spans of the trend filter. Design constants, not tunables.
pub const FAST_SPAN: usize = 20;
pub const SLOW_SPAN: usize = 50;

/// Minimum bars before the slow average is considered warmed up.
/// A hard precondition, not a soft warning.
pub const MIN_BARS: usize = 50;

/// Exponential moving average with smoothing `k = 2/(span+1)`, seeded with
/// the first close. Causal: each element depends only on prices at or
/// before its index. Matches a pandas `ewm(span, adjust=False)` series.
pub fn ema_series(closes: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EMA span must be >= 1");
    let k = 2.0 / (span as f64 + 1.0);
    let mut out: Vec<f64> = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            out.push(close);
        } else {
            out.push(close * k + out[i - 1] * (1.0 - k));
        }
    }
    out
}

/// EMA(20) / EMA(50) aligned one-to-one with the source bars.
///
/// Recomputed fresh from the fetched window each invocation; no indicator
/// state is carried between runs.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub ema20: Vec<f64>,
    pub ema50: Vec<f64>,
}

impl IndicatorSeries {
    /// Compute both series over the close prices of `bars`.
    /// Fails with `DataUnavailable` below [`MIN_BARS`] bars.
    pub fn compute(bars: &[Bar]) -> Result<Self> {
        if bars.len() < MIN_BARS {
            return Err(Error::DataUnavailable(format!(
                "need at least {MIN_BARS} bars for the slow average, got {}",
                bars.len()
            )));
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Ok(Self {
            ema20: ema_series(&closes, FAST_SPAN),
            ema50: ema_series(&closes, SLOW_SPAN),
        })
    }

    /// Both averages at bar index `i`.
    pub fn at(&self, i: usize) -> (f64, f64) {
        (self.ema20[i], self.ema50[i])
    }

    pub fn len(&self) -> usize {
        self.ema20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema20.is_empty()
    }
}
