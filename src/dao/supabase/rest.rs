use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

use crate::dao::{database::Database, query::Query, storage::StorageResult};

use super::{
    config::SupabaseConfig,
    error::{SupabaseError, SupabaseResult, error_message},
};

const REST_PREFIX: &str = "rest/v1";

/// [`Database`] backed by the project's PostgREST endpoint.
#[derive(Clone)]
pub struct SupabaseDatabase {
    client: Client,
    base_url: Arc<str>,
    service_key: Arc<str>,
}

impl SupabaseDatabase {
    /// Build the HTTP client for the project's REST endpoints.
    pub fn connect(config: &SupabaseConfig) -> SupabaseResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| SupabaseError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url()),
            service_key: Arc::from(config.service_role_key.as_str()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{REST_PREFIX}/{path}", self.base_url);
        self.client
            .request(method, url)
            .header("apikey", self.service_key.as_ref())
            .bearer_auth(self.service_key.as_ref())
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> SupabaseResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SupabaseError::RequestStatus {
            path: path.to_string(),
            status,
            message: error_message(&body),
        })
    }

    async fn send_json(&self, path: &str, builder: RequestBuilder) -> SupabaseResult<Value> {
        let response = self.send(path, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| SupabaseError::DecodeResponse {
                path: path.to_string(),
                source,
            })?;
        parse_body(path, &bytes)
    }

    async fn send_rows(&self, path: &str, builder: RequestBuilder) -> SupabaseResult<Vec<Value>> {
        Ok(match self.send_json(path, builder).await? {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            row => vec![row],
        })
    }
}

/// An empty body (`return=minimal`, `204`) reads as `null`; anything else must be JSON.
fn parse_body(path: &str, bytes: &[u8]) -> SupabaseResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|source| SupabaseError::InvalidJson {
        path: path.to_string(),
        source,
    })
}

impl Database for SupabaseDatabase {
    fn select(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let db = self.clone();
        Box::pin(async move {
            let builder = db
                .request(Method::GET, &query.table)
                .query(&query.to_params());
            db.send_rows(&query.table, builder).await.map_err(Into::into)
        })
    }

    fn insert(&self, table: &str, rows: Vec<Value>) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let db = self.clone();
        let table = table.to_string();
        Box::pin(async move {
            let builder = db
                .request(Method::POST, &table)
                .header("Prefer", "return=representation")
                .json(&rows);
            db.send_rows(&table, builder).await.map_err(Into::into)
        })
    }

    fn update(&self, query: Query, patch: Value) -> BoxFuture<'static, StorageResult<Vec<Value>>> {
        let db = self.clone();
        Box::pin(async move {
            let builder = db
                .request(Method::PATCH, &query.table)
                .query(&query.to_params())
                .header("Prefer", "return=representation")
                .json(&patch);
            db.send_rows(&query.table, builder).await.map_err(Into::into)
        })
    }

    fn rpc(&self, function: &str, args: Value) -> BoxFuture<'static, StorageResult<Value>> {
        let db = self.clone();
        let path = format!("rpc/{function}");
        Box::pin(async move {
            let builder = db.request(Method::POST, &path).json(&args);
            db.send_json(&path, builder).await.map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let db = self.clone();
        Box::pin(async move {
            let builder = db.request(Method::GET, "");
            db.send(REST_PREFIX, builder).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_reads_as_null() {
        assert_eq!(parse_body("players", b"").unwrap(), Value::Null);
        assert_eq!(parse_body("players", b" \n").unwrap(), Value::Null);
    }

    #[test]
    fn rows_are_parsed() {
        let rows = parse_body("players", br#"[{"id":"p1"}]"#).unwrap();
        assert_eq!(rows[0]["id"], "p1");
    }

    #[test]
    fn garbled_body_is_an_error() {
        let err = parse_body("players", b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, SupabaseError::InvalidJson { ref path, .. } if path == "players"));
    }
}
