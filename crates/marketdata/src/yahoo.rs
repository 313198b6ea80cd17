use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Bar, BarFeed, Error, Result};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Network timeout. The job would rather lose a tick than hang past its
/// schedule slot.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Bar feed backed by the Yahoo Finance v8 chart endpoint.
///
/// One GET per invocation returns the whole lookback window; the last row
/// is the still-forming bar. The endpoint pads halted intervals with
/// nulls, which are dropped during validation.
pub struct YahooClient {
    interval: String,
    range: String,
    http: Client,
}

impl YahooClient {
    pub fn new(interval: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            range: range.into(),
            http: Client::builder()
                .use_rustls_tls()
                .timeout(HTTP_TIMEOUT)
                // The endpoint rejects requests without a browser-ish agent.
                .user_agent("Mozilla/5.0 (compatible; pulsebot/0.1)")
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl BarFeed for YahooClient {
    async fn fetch(&self, symbol: &str) -> Result<Vec<Bar>> {
        // Index symbols carry a caret ("^NSEI") that must be escaped in the path.
        let path_symbol = symbol.replace('^', "%5E");
        let url = format!(
            "{BASE_URL}/v8/finance/chart/{path_symbol}?interval={}&range={}",
            self.interval, self.range
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::DataUnavailable(format!("HTTP {status}: {body}")));
        }

        let chart: ChartResponse = serde_json::from_str(&body)
            .map_err(|e| Error::DataUnavailable(format!("unexpected chart schema: {e}")))?;

        let bars = parse_bars(chart)?;
        debug!(symbol, bars = bars.len(), "Fetched bar window");
        Ok(bars)
    }
}

/// Validate the chart payload and flatten it into bars, oldest-first.
/// Fails closed on anything malformed: no signal beats a wrong one.
fn parse_bars(chart: ChartResponse) -> Result<Vec<Bar>> {
    let result = chart
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| Error::DataUnavailable("chart response carried no result".into()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(Error::DataUnavailable("empty bar sequence".into()));
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| Error::DataUnavailable("chart response carried no quote block".into()))?;

    for (name, arr) in [
        ("open", &quote.open),
        ("high", &quote.high),
        ("low", &quote.low),
        ("close", &quote.close),
    ] {
        if arr.len() != timestamps.len() {
            return Err(Error::DataUnavailable(format!(
                "{name} array has {} rows against {} timestamps",
                arr.len(),
                timestamps.len()
            )));
        }
    }

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // A row missing any OHLC field is a null-padded gap, not a bar.
        if let (Some(open), Some(high), Some(low), Some(close)) =
            (quote.open[i], quote.high[i], quote.low[i], quote.close[i])
        {
            let timestamp = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| Error::DataUnavailable(format!("bad bar timestamp {ts}")))?;
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
            });
        }
    }

    if bars.is_empty() {
        return Err(Error::DataUnavailable("every bar row was null-padded".into()));
    }
    Ok(bars)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}
