use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use common::{Error, Result, StateStore, TradeRecord};

/// One JSON slot per symbol under a state directory.
///
/// A missing file means no trade has ever been recorded. Saves overwrite
/// the whole slot; the job is the only writer and invocations are
/// serialized by the external scheduler, so there is no locking.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, symbol: &str) -> PathBuf {
        // Index symbols ("^NSEI") are not filesystem-friendly.
        let safe: String = symbol
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, symbol: &str) -> Result<Option<TradeRecord>> {
        let path = self.slot_path(symbol);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let record = serde_json::from_str(&content).map_err(|e| {
                    Error::Persistence(format!("corrupt slot {}: {e}", path.display()))
                })?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Persistence(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn save(&self, symbol: &str, record: &TradeRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::Persistence(format!("create {}: {e}", self.dir.display())))?;

        let path = self.slot_path(symbol);
        let json = serde_json::to_string(record)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| Error::Persistence(format!("write {}: {e}", path.display())))?;

        debug!(symbol, path = %path.display(), "State slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TradeKind;

    fn temp_store(tag: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!("pulsebot-store-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        FileStore::new(dir)
    }

    #[tokio::test]
    async fn missing_slot_reads_as_no_trade() {
        let store = temp_store("missing");
        assert_eq!(store.load("^NSEI").await.unwrap(), None);
    }

    #[tokio::test]
    async fn slot_round_trips_and_overwrites() {
        let store = temp_store("roundtrip");
        let open = TradeRecord::Open {
            kind: TradeKind::Call,
            entry: 102,
            stop_loss: 93,
            target: 120,
        };

        store.save("^NSEI", &open).await.unwrap();
        assert_eq!(store.load("^NSEI").await.unwrap(), Some(open));

        store.save("^NSEI", &TradeRecord::Closed).await.unwrap();
        assert_eq!(
            store.load("^NSEI").await.unwrap(),
            Some(TradeRecord::Closed)
        );
    }

    #[tokio::test]
    async fn slots_are_keyed_by_symbol() {
        let store = temp_store("keyed");
        store.save("^NSEI", &TradeRecord::Closed).await.unwrap();
        assert!(store.load("^NSEBANK").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_slot_surfaces_a_persistence_error() {
        let store = temp_store("corrupt");
        store.save("^NSEI", &TradeRecord::Closed).await.unwrap();
        std::fs::write(store.slot_path("^NSEI"), "not json at all").unwrap();

        let err = store.load("^NSEI").await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
