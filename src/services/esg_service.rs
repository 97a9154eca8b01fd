use tracing::debug;

use crate::{
    dto::esg::{CasinoEsgSummary, EsgScoreCreated, NewEsgScore},
    error::ServiceError,
    state::SharedState,
};

/// Store a submitted compliance score.
pub async fn record_score(
    state: &SharedState,
    score: NewEsgScore,
) -> Result<EsgScoreCreated, ServiceError> {
    let score = state.esg().insert_compliance_score(&score).await?;
    debug!(score_id = %score.id, casino_id = %score.casino_id, "ESG compliance score stored");
    Ok(EsgScoreCreated {
        success: true,
        score,
    })
}

/// Latest compliance score of a casino; 404 when the casino does not exist.
pub async fn casino_summary(
    state: &SharedState,
    casino_id: &str,
) -> Result<CasinoEsgSummary, ServiceError> {
    let repo = state.esg();
    let casino = repo
        .casino(casino_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Casino not found"))?;
    let latest = repo.latest_compliance_score(casino_id).await?;

    Ok(CasinoEsgSummary {
        success: true,
        casino_id: casino.id,
        casino_name: casino.name,
        grade: latest
            .as_ref()
            .and_then(|score| score.esg_grade.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        total_score: latest
            .as_ref()
            .and_then(|score| score.total_esg_score)
            .unwrap_or(0.0),
        latest_score: latest,
    })
}
