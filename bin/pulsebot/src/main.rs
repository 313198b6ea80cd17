use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{
    BarFeed, Clock, Config, Error, Notifier, StateStore, TickOutcome, VenueClock,
};
use ledger::{PolicyFileConfig, TradeLedger};
use marketdata::YahooClient;
use notify::{LogNotifier, TelegramNotifier};
use store::{FileStore, GitStore};
use strategy::IndicatorSeries;

/// One scheduled invocation: fetch, compute, tick, exit. The scheduler
/// (cron, CI workflow) provides the periodicity; this process holds no
/// long-running state.
#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ───────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let policy = PolicyFileConfig::load(&cfg.policy_path);
    info!(symbol = %cfg.symbol, interval = %cfg.bar_interval, "pulsebot tick starting");

    match run(&cfg, &policy).await {
        Ok(Some(outcome)) => info!(?outcome, "Tick complete"),
        Ok(None) => info!("Tick skipped"),
        Err(e) => {
            error!(error = ?e, "Tick failed");
            std::process::exit(1);
        }
    }
}

async fn run(cfg: &Config, policy: &PolicyFileConfig) -> anyhow::Result<Option<TickOutcome>> {
    // ── Clock & session gate ─────────────────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(VenueClock::new(cfg.venue_tz));
    let now = clock.now();
    if policy.enforce_session() && !policy.session_hours().is_open(now) {
        info!(time = %now, "Market closed — nothing to do");
        return Ok(None);
    }

    // ── Collaborators (injected by config) ───────────────────────────────────
    let notifier: Arc<dyn Notifier> = match &cfg.telegram {
        Some(tg) => Arc::new(TelegramNotifier::new(tg.token.clone(), tg.chat_id)),
        None => {
            warn!("Telegram credentials absent — logging-only mode");
            Arc::new(LogNotifier)
        }
    };

    let store: Arc<dyn StateStore> = if cfg.git_sync {
        Arc::new(GitStore::new(FileStore::new(&cfg.state_dir), "."))
    } else {
        Arc::new(FileStore::new(&cfg.state_dir))
    };

    let feed = YahooClient::new(&cfg.bar_interval, &cfg.lookback);
    let ledger = TradeLedger::new(&cfg.symbol, policy.ledger_config(), store, notifier, clock);

    // ── Fetch → indicators → tick ────────────────────────────────────────────
    let bars = match feed.fetch(&cfg.symbol).await {
        Ok(bars) => bars,
        Err(Error::DataUnavailable(why)) => {
            warn!(%why, "Bar window unusable — ending with no side effects");
            return Ok(None);
        }
        Err(e) => return Err(e).context("bar fetch failed"),
    };

    let indicators = match IndicatorSeries::compute(&bars) {
        Ok(series) => series,
        Err(Error::DataUnavailable(why)) => {
            warn!(%why, "Too few bars — ending with no side effects");
            return Ok(None);
        }
        Err(e) => return Err(e).context("indicator computation failed"),
    };

    let outcome = ledger
        .tick(&bars, &indicators)
        .await
        .context("ledger tick failed")?;
    Ok(Some(outcome))
}
