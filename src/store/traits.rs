//! The `ConversationStore` trait — one durable record per customer.

use async_trait::async_trait;

use crate::dialog::ConversationRecord;
use crate::error::StoreError;

/// Backend-agnostic persistence for conversation records.
///
/// `save` must be durable before the inbound webhook call is
/// acknowledged: a replayed delivery whose prior effects already reached
/// the customer must find the committed stage, not the one before it.
/// Per-customer get-mutate-save serialization is the dispatcher's job,
/// not the store's.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the record for `customer_id`, creating and persisting a
    /// fresh `Start` record if none exists.
    async fn get_or_create(&self, customer_id: &str) -> Result<ConversationRecord, StoreError>;

    /// Persist the record, replacing any previous version.
    async fn save(&self, record: &ConversationRecord) -> Result<(), StoreError>;

    /// Delete the record. The customer re-enters at `Start` on next
    /// contact.
    async fn reset(&self, customer_id: &str) -> Result<(), StoreError>;
}
