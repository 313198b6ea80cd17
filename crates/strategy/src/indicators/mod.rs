pub mod ema;

pub use ema::{ema_series, IndicatorSeries, FAST_SPAN, MIN_BARS, SLOW_SPAN};
