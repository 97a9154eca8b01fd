use std::sync::Arc;

use serde_json::{Value, json};

use crate::dao::{
    database::{Database, fetch_optional},
    models::{Player, StaffRecord, UserProfile, UserRecord},
    query::Query,
    storage::{StorageError, StorageResult},
};

const USER_TABLE: &str = "users";
const STAFF_TABLE: &str = "staff";
const PLAYER_TABLE: &str = "players";
/// Procedure resolving an email to a profile from either `users` or `staff`.
pub const PROFILE_BY_EMAIL_RPC: &str = "get_user_by_email_fast";

/// Data access for platform users, casino staff and players.
#[derive(Clone)]
pub struct PeopleRepository {
    db: Arc<dyn Database>,
}

impl PeopleRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Platform account by id.
    pub async fn user_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let query = Query::table(USER_TABLE)
            .select("id, email, role, casino_id")
            .eq("id", id);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Staff row by email address.
    pub async fn staff_by_email(&self, email: &str) -> StorageResult<Option<StaffRecord>> {
        let query = Query::table(STAFF_TABLE)
            .select("id, email, first_name, last_name, casino_id")
            .eq("email", email);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Casino of the staff row linked to an auth account.
    pub async fn staff_casino(&self, auth_user_id: &str) -> StorageResult<Option<String>> {
        let query = Query::table(STAFF_TABLE)
            .select("casino_id")
            .eq("auth_user_id", auth_user_id);
        let row: Option<Value> = fetch_optional(self.db.as_ref(), query).await?;
        Ok(row.and_then(|row| row.get("casino_id").and_then(Value::as_str).map(str::to_string)))
    }

    /// Player by id.
    pub async fn player(&self, id: &str) -> StorageResult<Option<Player>> {
        let query = Query::table(PLAYER_TABLE)
            .select("id, first_name, email, phone, casino_id")
            .eq("id", id);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Resolve a profile through [`PROFILE_BY_EMAIL_RPC`]; `None` when the
    /// procedure returns nothing for the email.
    pub async fn profile_by_email(&self, email: &str) -> StorageResult<Option<UserProfile>> {
        let result = self
            .db
            .rpc(PROFILE_BY_EMAIL_RPC, json!({ "user_email": email }))
            .await?;
        let row = match result {
            Value::Null => return Ok(None),
            Value::Array(rows) => match rows.into_iter().next() {
                Some(row) => row,
                None => return Ok(None),
            },
            row => row,
        };
        serde_json::from_value(row)
            .map(Some)
            .map_err(|err| StorageError::decode(PROFILE_BY_EMAIL_RPC, err))
    }

    /// Stamp `users.last_login` for the given account.
    pub async fn touch_last_login(&self, user_id: &str, at: &str) -> StorageResult<()> {
        self.db
            .update(
                Query::table(USER_TABLE).eq("id", user_id),
                json!({ "last_login": at }),
            )
            .await?;
        Ok(())
    }
}
