use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::dao::{
    database::{Database, fetch_all, fetch_optional, insert_returning},
    models::{
        Casino, ComplianceStatus, EsgComplianceScore, EsgMetrics, EsgReportStatus,
        PreviousEsgScore, PrincipleRef, ProtectionIntervention, SelfExclusion,
    },
    query::Query,
    storage::{StorageError, StorageResult},
};

const CASINO_TABLE: &str = "casinos";
const COMPLIANCE_SCORE_TABLE: &str = "esg_compliance_scores";
const METRICS_TABLE: &str = "esg_metrics";
const SCORE_TABLE: &str = "esg_scores";
const EVIDENCE_TABLE: &str = "esg_evidence_trail";
const REPORT_TABLE: &str = "esg_reports";
const SELF_EXCLUSION_TABLE: &str = "self_exclusion_registry";
const INTERVENTION_TABLE: &str = "player_protection_interventions";
const PRINCIPLE_TABLE: &str = "king_iv_principles";
const PRINCIPLE_STATUS_TABLE: &str = "king_iv_compliance_status";
const CONTRIBUTION_TABLE: &str = "responsible_gambling_contributions";
const TRAINING_TABLE: &str = "employee_rg_training";

/// Reporting window shared by the period-scoped lookups.
#[derive(Debug, Clone, Copy)]
pub struct Period<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

/// Data access for ESG scores, their inputs and the ingest tables.
#[derive(Clone)]
pub struct EsgRepository {
    db: Arc<dyn Database>,
}

impl EsgRepository {
    /// Repository over the given backend.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Casino by id, `None` when unknown.
    pub async fn casino(&self, id: &str) -> StorageResult<Option<Casino>> {
        let query = Query::table(CASINO_TABLE).select("id, name").eq("id", id);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Store a compliance score and return it with its generated fields.
    pub async fn insert_compliance_score<N: Serialize>(
        &self,
        score: &N,
    ) -> StorageResult<EsgComplianceScore> {
        insert_returning(self.db.as_ref(), COMPLIANCE_SCORE_TABLE, score).await
    }

    /// Most recent compliance score of the casino.
    pub async fn latest_compliance_score(
        &self,
        casino_id: &str,
    ) -> StorageResult<Option<EsgComplianceScore>> {
        let query = Query::table(COMPLIANCE_SCORE_TABLE)
            .eq("casino_id", casino_id)
            .order("created_at", false);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Operational metrics reported for the casino inside the period.
    pub async fn metrics_for_period(
        &self,
        casino_id: &str,
        period: Period<'_>,
    ) -> StorageResult<Option<EsgMetrics>> {
        let query = Query::table(METRICS_TABLE)
            .eq("casino_id", casino_id)
            .gte("reporting_period", period.start)
            .lte("reporting_period", period.end);
        fetch_optional(self.db.as_ref(), query).await
    }

    /// Self-exclusions registered at the casino inside the period.
    pub async fn self_exclusions(
        &self,
        casino_id: &str,
        period: Period<'_>,
    ) -> StorageResult<Vec<SelfExclusion>> {
        let query = Query::table(SELF_EXCLUSION_TABLE)
            .select("counseling_sessions_completed, counseling_sessions_required")
            .eq("casino_id", casino_id)
            .gte("exclusion_start_date", period.start)
            .lte("exclusion_start_date", period.end);
        fetch_all(self.db.as_ref(), query).await
    }

    /// Protection interventions opened at the casino inside the period.
    pub async fn interventions(
        &self,
        casino_id: &str,
        period: Period<'_>,
    ) -> StorageResult<Vec<ProtectionIntervention>> {
        let query = Query::table(INTERVENTION_TABLE)
            .select("intervention_date, created_at")
            .eq("casino_id", casino_id)
            .gte("intervention_date", period.start)
            .lte("intervention_date", period.end);
        fetch_all(self.db.as_ref(), query).await
    }

    /// Report submissions of the casino inside the period.
    pub async fn reports(
        &self,
        casino_id: &str,
        period: Period<'_>,
    ) -> StorageResult<Vec<EsgReportStatus>> {
        let query = Query::table(REPORT_TABLE)
            .select("status")
            .eq("casino_id", casino_id)
            .gte("report_period_start", period.start)
            .lte("report_period_end", period.end);
        fetch_all(self.db.as_ref(), query).await
    }

    /// Average compliance score of the casino over the given King IV principle numbers.
    pub async fn principle_compliance(
        &self,
        casino_id: &str,
        principle_numbers: &[u32],
    ) -> StorageResult<Vec<ComplianceStatus>> {
        let principles: Vec<PrincipleRef> = fetch_all(
            self.db.as_ref(),
            Query::table(PRINCIPLE_TABLE)
                .select("id")
                .in_list("principle_number", principle_numbers.iter().copied()),
        )
        .await?;
        if principles.is_empty() {
            return Ok(Vec::new());
        }

        let query = Query::table(PRINCIPLE_STATUS_TABLE)
            .select("compliance_score")
            .eq("casino_id", casino_id)
            .in_list(
                "king_iv_principle_id",
                principles.into_iter().map(|principle| principle.id),
            );
        fetch_all(self.db.as_ref(), query).await
    }

    /// Composite score of the latest period that ended before `before`.
    pub async fn previous_composite(
        &self,
        casino_id: &str,
        before: &str,
    ) -> StorageResult<Option<f64>> {
        let query = Query::table(SCORE_TABLE)
            .select("composite_score")
            .eq("casino_id", casino_id)
            .lt("scoring_period_end", before)
            .order("scoring_period_end", false);
        let previous: Option<PreviousEsgScore> = fetch_optional(self.db.as_ref(), query).await?;
        Ok(previous.and_then(|row| row.composite_score))
    }

    /// Store a King IV score row and return it as persisted.
    pub async fn insert_score(&self, row: Value) -> StorageResult<Value> {
        self.insert_one(SCORE_TABLE, row).await
    }

    /// Attach evidence rows to a stored score.
    pub async fn insert_evidence(&self, rows: Vec<Value>) -> StorageResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.db.insert(EVIDENCE_TABLE, rows).await?;
        Ok(())
    }

    /// Store an ESG contribution and return it as persisted.
    pub async fn insert_contribution(&self, row: Value) -> StorageResult<Value> {
        self.insert_one(CONTRIBUTION_TABLE, row).await
    }

    /// Store training completion rows.
    pub async fn insert_training(&self, rows: Vec<Value>) -> StorageResult<Vec<Value>> {
        self.db.insert(TRAINING_TABLE, rows).await
    }

    /// Identifier of the metrics row for (casino, period, period type), if any.
    pub async fn metrics_id(
        &self,
        casino_id: &str,
        reporting_period: &str,
        period_type: &str,
    ) -> StorageResult<Option<String>> {
        let query = Query::table(METRICS_TABLE)
            .select("id")
            .eq("casino_id", casino_id)
            .eq("reporting_period", reporting_period)
            .eq("period_type", period_type);
        let existing: Option<EsgMetrics> = fetch_optional(self.db.as_ref(), query).await?;
        Ok(existing.and_then(|row| row.id))
    }

    /// Store a metrics row and return it as persisted.
    pub async fn insert_metrics(&self, row: Value) -> StorageResult<Value> {
        self.insert_one(METRICS_TABLE, row).await
    }

    /// Patch the metrics row `id` and return the updated row.
    pub async fn update_metrics(&self, id: &str, patch: Value) -> StorageResult<Value> {
        self.db
            .update(Query::table(METRICS_TABLE).eq("id", id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::rejected(METRICS_TABLE, "update matched no row"))
    }

    async fn insert_one(&self, table: &str, row: Value) -> StorageResult<Value> {
        self.db
            .insert(table, vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::rejected(table, "insert returned no row"))
    }
}
