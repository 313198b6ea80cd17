use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{Result, StateStore, TradeRecord};

/// In-process store for tests and dry runs. Nothing survives process exit.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, TradeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a slot. Test setup helper.
    pub async fn seed(&self, symbol: &str, record: TradeRecord) {
        self.slots.write().await.insert(symbol.to_string(), record);
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, symbol: &str) -> Result<Option<TradeRecord>> {
        Ok(self.slots.read().await.get(symbol).copied())
    }

    async fn save(&self, symbol: &str, record: &TradeRecord) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(symbol.to_string(), *record);
        Ok(())
    }
}
