use std::sync::Arc;

use crate::dao::{
    database::{Database, fetch_optional},
    models::{IntegrationConfig, NewApiLog},
    query::Query,
    storage::{StorageError, StorageResult},
};

const CONFIG_TABLE: &str = "casino_integration_configs";
const API_LOG_TABLE: &str = "integration_api_logs";

/// Data access for per-casino integration settings and their call log.
#[derive(Clone)]
pub struct IntegrationRepository {
    db: Arc<dyn Database>,
}

impl IntegrationRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// First enabled integration configuration for the casino.
    pub async fn enabled_config(&self, casino_id: &str) -> StorageResult<Option<IntegrationConfig>> {
        let query = Query::table(CONFIG_TABLE)
            .select("id, credentials, is_enabled, casino_id")
            .eq("casino_id", casino_id)
            .eq("is_enabled", true);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Append one row to the integration call log.
    pub async fn log_call(&self, entry: &NewApiLog) -> StorageResult<()> {
        let row = serde_json::to_value(entry).map_err(|err| StorageError::decode(API_LOG_TABLE, err))?;
        self.db.insert(API_LOG_TABLE, vec![row]).await?;
        Ok(())
    }
}
