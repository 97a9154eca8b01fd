use std::sync::Arc;

use serde_json::{Value, json};

use crate::dao::{
    database::{Database, fetch_all, fetch_optional, insert_returning},
    models::{GameConcept, Invitation, NewInvitation, TelemetryEvent, WellbeingSession},
    query::Query,
    storage::StorageResult,
};

const SESSION_TABLE: &str = "wellbeing_game_sessions";
const TELEMETRY_TABLE: &str = "wellbeing_game_telemetry";
const RISK_SCORE_TABLE: &str = "wellbeing_risk_scores";
const CONCEPT_TABLE: &str = "wellbeing_game_concepts";
const INVITATION_TABLE: &str = "wellbeing_game_invitations";

/// Data access for wellbeing mini-game sessions, telemetry and invitations.
#[derive(Clone)]
pub struct WellbeingRepository {
    db: Arc<dyn Database>,
}

impl WellbeingRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Game session by id.
    pub async fn session(&self, id: &str) -> StorageResult<Option<WellbeingSession>> {
        let query = Query::table(SESSION_TABLE).eq("id", id);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Telemetry for a session in capture order.
    pub async fn telemetry(&self, session_id: &str) -> StorageResult<Vec<TelemetryEvent>> {
        let query = Query::table(TELEMETRY_TABLE)
            .eq("session_id", session_id)
            .order("event_sequence", true);
        fetch_all(self.db.as_ref(), query).await
    }

    /// Store a computed session risk score.
    pub async fn insert_risk_score(&self, row: Value) -> StorageResult<()> {
        self.db.insert(RISK_SCORE_TABLE, vec![row]).await?;
        Ok(())
    }

    /// Copy the computed index onto the session row.
    pub async fn set_session_risk_index(&self, session_id: &str, index: f64) -> StorageResult<()> {
        self.db
            .update(
                Query::table(SESSION_TABLE).eq("id", session_id),
                json!({ "behaviour_risk_index": index }),
            )
            .await?;
        Ok(())
    }

    /// Game catalogue entry by id.
    pub async fn game_concept(&self, id: &str) -> StorageResult<Option<GameConcept>> {
        let query = Query::table(CONCEPT_TABLE)
            .select("id, name, slug, description, duration_minutes")
            .eq("id", id);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Store a pending invitation and return it with its id.
    pub async fn insert_invitation(&self, invitation: &NewInvitation) -> StorageResult<Invitation> {
        insert_returning(self.db.as_ref(), INVITATION_TABLE, invitation).await
    }

    /// Set the invitation status after a delivery attempt.
    pub async fn record_delivery(
        &self,
        invitation_id: &str,
        status: &str,
        delivery_status: &str,
    ) -> StorageResult<()> {
        self.db
            .update(
                Query::table(INVITATION_TABLE).eq("id", invitation_id),
                json!({ "status": status, "delivery_status": delivery_status }),
            )
            .await?;
        Ok(())
    }
}
