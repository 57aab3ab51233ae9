//! libSQL backend — async `ConversationStore` over a local database file.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use tracing::{debug, info};

use crate::dialog::{ConversationRecord, Stage};
use crate::error::StoreError;
use crate::store::traits::ConversationStore;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS conversations (
        customer_id TEXT PRIMARY KEY,
        stage       TEXT NOT NULL DEFAULT 'start',
        plan        TEXT,
        email       TEXT,
        updated_at  TEXT NOT NULL
    );
";

/// libSQL conversation store.
///
/// Holds a single connection reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async
/// use.
pub struct LibSqlStore {
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;

        let store = Self { conn };
        store.init_schema().await?;
        info!(path = %path.display(), "Conversation store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to create in-memory db: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;

        let store = Self { conn };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(SCHEMA)
            .await
            .map_err(|e| StoreError::Schema(e.to_string()))?;
        Ok(())
    }
}

/// Parse the stored RFC 3339 timestamp, defaulting to the epoch floor.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn row_to_record(row: &libsql::Row) -> Result<ConversationRecord, libsql::Error> {
    let customer_id: String = row.get(0)?;
    let stage_str: String = row.get(1)?;
    let plan_str: Option<String> = row.get(2).ok();
    let email: Option<String> = row.get(3).ok();
    let updated_str: String = row.get(4)?;

    let stage = Stage::from_tokens(&stage_str, plan_str.as_deref());
    let selected_plan = match stage {
        // Only Done carries a committed plan; AwaitingEmail keeps its
        // pending plan in the stage payload.
        Stage::Done => plan_str.as_deref().and_then(crate::dialog::Plan::from_token),
        _ => None,
    };

    Ok(ConversationRecord {
        customer_id,
        stage,
        selected_plan,
        captured_email: email.filter(|e| !e.is_empty()),
        updated_at: parse_datetime(&updated_str),
    })
}

/// The `plan` column holds either the pending plan (AwaitingEmail) or
/// the committed one (Done).
fn plan_column(record: &ConversationRecord) -> Option<&'static str> {
    match record.stage {
        Stage::AwaitingEmail(p) => Some(p.as_token()),
        _ => record.selected_plan.map(|p| p.as_token()),
    }
}

fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

const RECORD_COLUMNS: &str = "customer_id, stage, plan, email, updated_at";

#[async_trait]
impl ConversationStore for LibSqlStore {
    async fn get_or_create(&self, customer_id: &str) -> Result<ConversationRecord, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {RECORD_COLUMNS} FROM conversations WHERE customer_id = ?1"),
                params![customer_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get_or_create: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => row_to_record(&row)
                .map_err(|e| StoreError::Query(format!("get_or_create row parse: {e}"))),
            Ok(None) => {
                let record = ConversationRecord::new(customer_id, Utc::now());
                self.save(&record).await?;
                debug!(customer_id, "Created conversation record at start");
                Ok(record)
            }
            Err(e) => Err(StoreError::Query(format!("get_or_create: {e}"))),
        }
    }

    async fn save(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO conversations (customer_id, stage, plan, email, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (customer_id) DO UPDATE SET
                     stage = excluded.stage,
                     plan = excluded.plan,
                     email = excluded.email,
                     updated_at = excluded.updated_at",
                params![
                    record.customer_id.clone(),
                    record.stage.as_token(),
                    opt_text(plan_column(record)),
                    opt_text(record.captured_email.as_deref()),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("save: {e}")))?;

        debug!(customer_id = %record.customer_id, stage = %record.stage, "Record saved");
        Ok(())
    }

    async fn reset(&self, customer_id: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "DELETE FROM conversations WHERE customer_id = ?1",
                params![customer_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("reset: {e}")))?;

        debug!(customer_id, "Record deleted");
        Ok(())
    }
}
