use std::sync::Arc;

use serde_json::{Value, json};

use crate::dao::{
    database::{Database, fetch_all},
    models::{LicensedModule, SoftwareModule},
    query::Query,
    storage::{StorageError, StorageResult},
};

const CATALOGUE_TABLE: &str = "software_modules";
/// Procedure listing the modules enabled for one casino.
pub const CASINO_MODULES_RPC: &str = "get_casino_modules";

/// Software module catalogue and per-casino licences.
#[derive(Clone)]
pub struct ModuleRepository {
    db: Arc<dyn Database>,
}

impl ModuleRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Modules enabled for `casino_id` through [`CASINO_MODULES_RPC`].
    pub async fn licensed_for_casino(&self, casino_id: &str) -> StorageResult<Vec<LicensedModule>> {
        let rows = match self
            .db
            .rpc(CASINO_MODULES_RPC, json!({ "p_casino_id": casino_id }))
            .await?
        {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            row => vec![row],
        };
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|err| StorageError::decode(CASINO_MODULES_RPC, err))
            })
            .collect()
    }

    /// Every active module in the catalogue.
    pub async fn active_catalogue(&self) -> StorageResult<Vec<SoftwareModule>> {
        let query = Query::table(CATALOGUE_TABLE)
            .select("id, name, slug, description, category")
            .eq("is_active", true);
        fetch_all(self.db.as_ref(), query).await
    }
}
