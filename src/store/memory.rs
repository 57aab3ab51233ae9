//! In-memory conversation store, used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::dialog::ConversationRecord;
use crate::error::StoreError;
use crate::store::traits::ConversationStore;

/// HashMap-backed store. Not durable; same contract as the libSQL
/// backend otherwise.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ConversationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at a record without creating one (test helper).
    pub async fn peek(&self, customer_id: &str) -> Option<ConversationRecord> {
        self.records.read().await.get(customer_id).cloned()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get_or_create(&self, customer_id: &str) -> Result<ConversationRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .entry(customer_id.to_string())
            .or_insert_with(|| ConversationRecord::new(customer_id, Utc::now()));
        Ok(record.clone())
    }

    async fn save(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.customer_id.clone(), record.clone());
        Ok(())
    }

    async fn reset(&self, customer_id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(customer_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Stage;

    #[tokio::test]
    async fn same_contract_as_durable_store() {
        let store = MemoryStore::new();
        let mut rec = store.get_or_create("111").await.unwrap();
        assert_eq!(rec.stage, Stage::Start);

        rec.stage = Stage::Menu;
        store.save(&rec).await.unwrap();
        assert_eq!(store.get_or_create("111").await.unwrap().stage, Stage::Menu);

        store.reset("111").await.unwrap();
        assert!(store.peek("111").await.is_none());
        assert_eq!(store.get_or_create("111").await.unwrap().stage, Stage::Start);
    }
}
