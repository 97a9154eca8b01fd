use std::sync::Arc;

use serde::Serialize;

use crate::dao::{
    database::{Database, fetch_all, insert_returning},
    models::RiskProfile,
    query::Query,
    storage::StorageResult,
};

const RISK_PROFILE_TABLE: &str = "behavioral_risk_profiles";

/// Data access for behavioural risk profiles.
#[derive(Clone)]
pub struct RiskRepository {
    db: Arc<dyn Database>,
}

impl RiskRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Insert a profile and return the row as stored.
    pub async fn insert_profile<N: Serialize>(&self, profile: &N) -> StorageResult<RiskProfile> {
        insert_returning(self.db.as_ref(), RISK_PROFILE_TABLE, profile).await
    }

    /// Most recent profiles for a player, newest first.
    pub async fn recent_for_player(
        &self,
        player_id: &str,
        limit: usize,
    ) -> StorageResult<Vec<RiskProfile>> {
        let query = Query::table(RISK_PROFILE_TABLE)
            .eq("player_id", player_id)
            .order("analyzed_at", false)
            .limit(limit);
        fetch_all(self.db.as_ref(), query).await
    }
}
