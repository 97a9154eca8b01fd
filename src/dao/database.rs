use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::dao::{
    query::Query,
    storage::{StorageError, StorageResult},
};

/// Abstraction over the managed relational database: table selects, inserts,
/// updates and remote procedure calls, all speaking JSON rows.
pub trait Database: Send + Sync {
    /// Rows matched by `query`.
    fn select(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Value>>>;
    /// Insert `rows` into `table` and return the rows as persisted.
    fn insert(&self, table: &str, rows: Vec<Value>) -> BoxFuture<'static, StorageResult<Vec<Value>>>;
    /// Apply `patch` to every row matched by `query` and return the updated rows.
    fn update(&self, query: Query, patch: Value) -> BoxFuture<'static, StorageResult<Vec<Value>>>;
    /// Call a stored procedure with named JSON arguments.
    fn rpc(&self, function: &str, args: Value) -> BoxFuture<'static, StorageResult<Value>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Select rows and decode them into `T`.
pub async fn fetch_all<T>(db: &dyn Database, query: Query) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let table = query.table.clone();
    db.select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|err| StorageError::decode(&table, err)))
        .collect()
}

/// Select at most one row.
pub async fn fetch_optional<T>(db: &dyn Database, query: Query) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
{
    let mut rows = fetch_all(db, query.limit(1)).await?;
    Ok(rows.pop())
}

/// Insert a single row and decode the persisted representation.
pub async fn insert_returning<N, T>(db: &dyn Database, table: &str, row: &N) -> StorageResult<T>
where
    N: Serialize,
    T: DeserializeOwned,
{
    let value = serde_json::to_value(row).map_err(|err| StorageError::decode(table, err))?;
    let persisted = db
        .insert(table, vec![value])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StorageError::rejected(table, "insert returned no row"))?;
    serde_json::from_value(persisted).map_err(|err| StorageError::decode(table, err))
}
