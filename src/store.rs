use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::weather::types::WeatherRecord;

/// In-memory map of record id to record. Contents live as long as the
/// process; records are inserted once and never updated or removed.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<HashMap<String, WeatherRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: WeatherRecord) {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
    }

    pub async fn get(&self, id: &str) -> Option<WeatherRecord> {
        let records = self.records.read().await;
        records.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
