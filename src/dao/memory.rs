//! In-process database and auth provider used for local runs and tests.
//!
//! Rows live in a [`DashMap`] keyed by table name; queries are evaluated with
//! the same [`Query`] description the REST backend forwards to the database.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dao::{
    auth::{AuthError, AuthProvider, AuthSession, AuthUser},
    database::Database,
    modules::CASINO_MODULES_RPC,
    people::PROFILE_BY_EMAIL_RPC,
    query::Query,
    storage::{StorageError, StorageResult},
};
use crate::dto::now_rfc3339;

/// Tables whose insert timestamp column is not `created_at`.
const TIMESTAMP_COLUMNS: &[(&str, &str)] = &[("behavioral_risk_profiles", "analyzed_at")];

/// Table store backed by `DashMap`, for tests and local runs.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<DashMap<String, Vec<Value>>>,
}

impl MemoryDatabase {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows verbatim, without generating ids or timestamps.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Snapshot of every row currently stored in `table`.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .get(table)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    fn select_now(&self, query: &Query) -> Vec<Value> {
        let mut rows = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.matches(row))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        query.sort(&mut rows);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        match query.columns.as_deref() {
            Some(columns) => rows
                .into_iter()
                .map(|row| project(row, columns))
                .collect(),
            None => rows,
        }
    }

    fn insert_now(&self, table: &str, rows: Vec<Value>) -> StorageResult<Vec<Value>> {
        let timestamp_column = TIMESTAMP_COLUMNS
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, column)| *column)
            .unwrap_or("created_at");

        let mut persisted = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut object) = row else {
                return Err(StorageError::rejected(table, "row must be a JSON object"));
            };
            object
                .entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            object
                .entry(timestamp_column)
                .or_insert_with(|| Value::String(now_rfc3339()));
            persisted.push(Value::Object(object));
        }

        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(persisted.iter().cloned());
        Ok(persisted)
    }

    fn update_now(&self, query: &Query, patch: Value) -> StorageResult<Vec<Value>> {
        let Value::Object(patch) = patch else {
            return Err(StorageError::rejected(&query.table, "patch must be a JSON object"));
        };
        let Some(mut rows) = self.tables.get_mut(&query.table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| query.matches(row)) {
            if let Value::Object(object) = row {
                for (key, value) in &patch {
                    object.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    fn profile_by_email(&self, email: &str) -> Value {
        let by_email = Query::table("users").eq("email", email);
        if let Some(user) = self.select_now(&by_email).into_iter().next() {
            let mut profile = user;
            if let Value::Object(object) = &mut profile {
                object.insert("source".into(), Value::String("users".into()));
            }
            return profile;
        }

        let by_email = Query::table("staff").eq("email", email);
        let Some(Value::Object(staff)) = self.select_now(&by_email).into_iter().next() else {
            return Value::Null;
        };
        let full_name = ["first_name", "last_name"]
            .iter()
            .filter_map(|key| staff.get(*key).and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        let mut profile = Map::new();
        for key in ["id", "email", "user_role", "casino_id", "is_active", "last_login", "created_at"] {
            if let Some(value) = staff.get(key) {
                profile.insert(key.into(), value.clone());
            }
        }
        profile.insert("full_name".into(), Value::String(full_name));
        profile.insert(
            "role".into(),
            staff
                .get("role")
                .cloned()
                .unwrap_or_else(|| Value::String("staff".into())),
        );
        profile.insert("source".into(), Value::String("staff".into()));
        Value::Object(profile)
    }
}

impl MemoryDatabase {
    /// `casino_modules` joined with active `software_modules` rows.
    fn casino_modules(&self, casino_id: &str) -> Value {
        let licences = self.select_now(&Query::table("casino_modules").eq("casino_id", casino_id));
        let catalogue = self.select_now(&Query::table("software_modules").eq("is_active", true));

        let modules = licences
            .iter()
            .filter_map(|licence| {
                let module_id = licence.get("module_id")?;
                let module = catalogue
                    .iter()
                    .find(|module| module.get("id") == Some(module_id))?;
                let mut row = Map::new();
                row.insert("module_id".into(), module_id.clone());
                for key in ["name", "slug", "description", "category"] {
                    if let Some(value) = module.get(key) {
                        row.insert(key.into(), value.clone());
                    }
                }
                for key in ["enabled_at", "expires_at"] {
                    if let Some(value) = licence.get(key) {
                        row.insert(key.into(), value.clone());
                    }
                }
                Some(Value::Object(row))
            })
            .collect();
        Value::Array(modules)
    }
}

fn project(row: Value, columns: &str) -> Value {
    let Value::Object(object) = row else {
        return row;
    };
    let wanted: Vec<&str> = columns.split(',').map(str::trim).collect();
    if wanted.contains(&"*") {
        return Value::Object(object);
    }
    Value::Object(
        object
            .into_iter()
            .filter(|(key, _)| wanted.contains(&key.as_str()))
            .collect(),
    )
}

impl Database for MemoryDatabase {
    fn select(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let rows = self.select_now(&query);
        Box::pin(async move { Ok(rows) })
    }

    fn insert(&self, table: &str, rows: Vec<Value>) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let result = self.insert_now(table, rows);
        Box::pin(async move { result })
    }

    fn update(&self, query: Query, patch: Value) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let result = self.update_now(&query, patch);
        Box::pin(async move { result })
    }

    fn rpc(&self, function: &str, args: Value) -> BoxFuture<'static, StorageResult<Value>> {
        let result = if function == PROFILE_BY_EMAIL_RPC {
            match args.get("user_email").and_then(Value::as_str) {
                Some(email) => Ok(self.profile_by_email(email)),
                None => Err(StorageError::rejected(function, "missing argument `user_email`")),
            }
        } else if function == CASINO_MODULES_RPC {
            match args.get("p_casino_id").and_then(Value::as_str) {
                Some(casino_id) => Ok(self.casino_modules(casino_id)),
                None => Err(StorageError::rejected(function, "missing argument `p_casino_id`")),
            }
        } else {
            Err(StorageError::rejected(
                function,
                format!("function `{function}` does not exist"),
            ))
        };
        Box::pin(async move { result })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone)]
struct MemoryAccount {
    id: String,
    email: String,
    password: String,
}

/// Auth provider keeping accounts and issued tokens in memory.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    accounts: Arc<DashMap<String, MemoryAccount>>,
    tokens: Arc<DashMap<String, String>>,
}

impl MemoryAuth {
    /// No accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace an account.
    pub fn register(&self, id: &str, email: &str, password: &str) {
        self.accounts.insert(
            email.to_lowercase(),
            MemoryAccount {
                id: id.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        );
    }

    /// Issue a token for a registered account without checking its password.
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let key = email.to_lowercase();
        if !self.accounts.contains_key(&key) {
            return None;
        }
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), key);
        Some(token)
    }

    /// Current password of an account.
    pub fn password_of(&self, email: &str) -> Option<String> {
        self.accounts
            .get(&email.to_lowercase())
            .map(|account| account.password.clone())
    }

    fn user_of(account: &MemoryAccount) -> AuthUser {
        AuthUser {
            id: account.id.clone(),
            email: Some(account.email.clone()),
        }
    }
}

impl AuthProvider for MemoryAuth {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> BoxFuture<'static, Result<AuthSession, AuthError>> {
        let result = match self.accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => {
                let user = Self::user_of(&account);
                drop(account);
                let token = self.issue_token(email).unwrap_or_default();
                Ok(AuthSession {
                    access_token: token,
                    user,
                })
            }
            _ => Err(AuthError::Rejected("Invalid login credentials".into())),
        };
        Box::pin(async move { result })
    }

    fn user_for_token(&self, token: &str) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>> {
        let user = self
            .tokens
            .get(token)
            .and_then(|email| self.accounts.get(email.value()).map(|a| Self::user_of(&a)));
        Box::pin(async move { Ok(user) })
    }

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>> {
        let user = self
            .accounts
            .get(&email.to_lowercase())
            .map(|account| Self::user_of(&account));
        Box::pin(async move { Ok(user) })
    }

    fn update_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> BoxFuture<'static, Result<(), AuthError>> {
        let result = match self
            .accounts
            .iter_mut()
            .find(|account| account.id == user_id)
        {
            Some(mut account) => {
                account.password = password.to_string();
                Ok(())
            }
            None => Err(AuthError::Rejected("User not found".into())),
        };
        Box::pin(async move { result })
    }

    fn sign_out(&self, token: &str) -> BoxFuture<'static, Result<(), AuthError>> {
        self.tokens.remove(token);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_generates_id_and_table_timestamp() {
        let db = MemoryDatabase::new();
        let rows = db
            .insert("behavioral_risk_profiles", vec![json!({"player_id": "p-1"})])
            .await
            .unwrap();

        assert!(rows[0]["id"].is_string());
        assert!(rows[0]["analyzed_at"].is_string());
        assert!(rows[0].get("created_at").is_none());
        assert_eq!(db.rows("behavioral_risk_profiles").len(), 1);
    }

    #[tokio::test]
    async fn update_patches_matching_rows_only() {
        let db = MemoryDatabase::new();
        db.seed("users", [json!({"id": "u1", "role": "staff"}), json!({"id": "u2", "role": "staff"})]);

        let updated = db
            .update(Query::table("users").eq("id", "u2"), json!({"role": "regulator"}))
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        let rows = db.rows("users");
        assert_eq!(rows[0]["role"], "staff");
        assert_eq!(rows[1]["role"], "regulator");
    }

    #[tokio::test]
    async fn profile_rpc_falls_back_to_staff() {
        let db = MemoryDatabase::new();
        db.seed(
            "staff",
            [json!({"id": "s1", "email": "ana@casino.test", "first_name": "Ana", "last_name": "Lee", "casino_id": "c1"})],
        );

        let profile = db
            .rpc(PROFILE_BY_EMAIL_RPC, json!({"user_email": "ana@casino.test"}))
            .await
            .unwrap();
        assert_eq!(profile["source"], "staff");
        assert_eq!(profile["role"], "staff");
        assert_eq!(profile["full_name"], "Ana Lee");

        let missing = db
            .rpc(PROFILE_BY_EMAIL_RPC, json!({"user_email": "nobody@casino.test"}))
            .await
            .unwrap();
        assert!(missing.is_null());
    }

    #[tokio::test]
    async fn auth_rejects_wrong_password_and_resolves_tokens() {
        let auth = MemoryAuth::new();
        auth.register("u1", "admin@casino.test", "secret1");

        assert!(matches!(
            auth.sign_in("admin@casino.test", "nope").await,
            Err(AuthError::Rejected(_))
        ));

        let session = auth.sign_in("admin@casino.test", "secret1").await.unwrap();
        let user = auth.user_for_token(&session.access_token).await.unwrap();
        assert_eq!(user.map(|u| u.id), Some("u1".to_string()));

        auth.sign_out(&session.access_token).await.unwrap();
        assert!(auth.user_for_token(&session.access_token).await.unwrap().is_none());
    }
}
