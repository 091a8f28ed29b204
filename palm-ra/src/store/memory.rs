//! In-memory analysis store

use async_trait::async_trait;
use palm_common::{AnalysisRecord, AnalysisUpdate, NewAnalysis, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AnalysisStore;

/// Process-local store; records are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn create(&self, new: NewAnalysis) -> Result<AnalysisRecord> {
        let record = AnalysisRecord::new(new);
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, update: AnalysisUpdate) -> Result<Option<AnalysisRecord>> {
        let mut records = self.records.write().await;
        let Some(existing) = records.get_mut(&id) else {
            return Ok(None);
        };

        existing.apply(update)?;
        Ok(Some(existing.clone()))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
