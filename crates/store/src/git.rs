use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use common::{Result, StateStore, TradeRecord};

/// Decorates another store with a git commit-and-push after every save, so
/// independent invocations on fresh checkouts (CI runners) see the
/// previous state.
///
/// Git failures never escalate: the local write already succeeded, and the
/// worst outcome of a failed push is a stale read on the next run — the
/// same gap as any other persistence failure.
pub struct GitStore<S> {
    inner: S,
    repo_dir: PathBuf,
}

impl<S: StateStore> GitStore<S> {
    pub fn new(inner: S, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            repo_dir: repo_dir.into(),
        }
    }

    async fn sync(&self, symbol: &str) {
        let steps: [&[&str]; 3] = [
            &["add", "--all"],
            &[
                "-c",
                "user.name=pulsebot",
                "-c",
                "user.email=pulsebot@users.noreply.github.com",
                "commit",
                "-m",
                "Update trade state",
            ],
            &["push"],
        ];

        for args in steps {
            match Command::new("git")
                .args(args)
                .current_dir(&self.repo_dir)
                .output()
                .await
            {
                Ok(out) if out.status.success() => {}
                Ok(out) => {
                    warn!(
                        symbol,
                        step = args.join(" "),
                        status = %out.status,
                        stderr = %String::from_utf8_lossy(&out.stderr),
                        "git step failed — state not pushed"
                    );
                    return;
                }
                Err(e) => {
                    warn!(symbol, error = %e, "git unavailable — state not pushed");
                    return;
                }
            }
        }

        info!(symbol, "State slot committed and pushed");
    }
}

#[async_trait]
impl<S: StateStore> StateStore for GitStore<S> {
    async fn load(&self, symbol: &str) -> Result<Option<TradeRecord>> {
        self.inner.load(symbol).await
    }

    async fn save(&self, symbol: &str, record: &TradeRecord) -> Result<()> {
        self.inner.save(symbol, record).await?;
        self.sync(symbol).await;
        Ok(())
    }
}
