//! Authenticated ingestion of ESG inputs: contributions, staff training and period metrics.

use serde_json::{Value, json};
use tracing::info;

use crate::{
    dao::storage::StorageError,
    dto::{
        ingest::{
            CONTRIBUTION_TYPES, ContributionRequest, IngestResponse, MetricsRequest,
            PERIOD_TYPES, TrainingPayload,
        },
        now_rfc3339,
    },
    error::ServiceError,
    state::SharedState,
};

/// Sub-paths served under `/esg-data-ingest`.
pub const AVAILABLE_ENDPOINTS: &[&str] = &["/contributions", "/training", "/metrics"];

/// Ingest result and whether a new row was created (as opposed to updated).
#[derive(Debug)]
pub struct Ingested {
    pub created: bool,
    pub response: IngestResponse,
}

impl Ingested {
    fn created(message: String, count: Option<usize>, data: Value) -> Self {
        Self {
            created: true,
            response: IngestResponse {
                success: true,
                message,
                count,
                data,
            },
        }
    }
}

/// The database refusing the row is the client's fault; connectivity problems are not.
fn as_client_error(err: StorageError) -> ServiceError {
    match err {
        StorageError::Unavailable { .. } => ServiceError::Storage(err),
        other => ServiceError::invalid_input(other.to_string()),
    }
}

fn check_member(value: Option<&str>, allowed: &[&str], message: &str) -> Result<(), ServiceError> {
    if value.is_some_and(|value| allowed.contains(&value)) {
        Ok(())
    } else {
        Err(ServiceError::invalid_input(message).with_details(json!({ "valid_types": allowed })))
    }
}

/// 404 listing the ingest routes.
pub fn unknown_endpoint() -> ServiceError {
    ServiceError::not_found("Invalid endpoint")
        .with_details(json!({ "available_endpoints": AVAILABLE_ENDPOINTS }))
}

/// Store an ESG contribution.
pub async fn record_contribution(
    state: &SharedState,
    request: ContributionRequest,
) -> Result<Ingested, ServiceError> {
    check_member(
        request.contribution_type.as_deref(),
        CONTRIBUTION_TYPES,
        "Invalid contribution_type",
    )?;

    let row = json!({
        "casino_id": request.casino_id,
        "contribution_type": request.contribution_type,
        "contribution_amount": request.contribution_amount,
        "contribution_date": request.contribution_date,
        "recipient_organization": request.recipient_organization,
        "program_name": request.program_name,
        "notes": request.notes.unwrap_or_default(),
    });
    let data = state
        .esg()
        .insert_contribution(row)
        .await
        .map_err(as_client_error)?;

    info!(casino_id = ?request.casino_id, "responsible gambling contribution recorded");
    Ok(Ingested::created(
        "Contribution recorded successfully".into(),
        None,
        data,
    ))
}

/// Store staff training completions.
pub async fn record_training(
    state: &SharedState,
    payload: TrainingPayload,
) -> Result<Ingested, ServiceError> {
    let records = payload.into_records();
    let submitted = records.len();
    let rows = records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .map_err(|err| ServiceError::invalid_input(format!("Invalid training record: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = state
        .esg()
        .insert_training(rows)
        .await
        .map_err(as_client_error)?;

    info!(submitted, stored = data.len(), "training records ingested");
    Ok(Ingested::created(
        format!("{submitted} training record(s) recorded successfully"),
        Some(data.len()),
        Value::Array(data),
    ))
}

/// Insert the period's metrics or update the existing row for (casino, period, type).
pub async fn record_metrics(
    state: &SharedState,
    request: MetricsRequest,
) -> Result<Ingested, ServiceError> {
    check_member(
        request.period_type.as_deref(),
        PERIOD_TYPES,
        "Invalid period_type",
    )?;
    let casino_id = request.casino_id.unwrap_or_default();
    let reporting_period = request.reporting_period.unwrap_or_default();
    let period_type = request.period_type.unwrap_or_default();

    let mut values = serde_json::to_value(&request.values)
        .map_err(|err| ServiceError::invalid_input(format!("Invalid metrics: {err}")))?;
    let repo = state.esg();

    match repo
        .metrics_id(&casino_id, &reporting_period, &period_type)
        .await?
    {
        Some(id) => {
            if let Value::Object(fields) = &mut values {
                fields.insert("updated_at".into(), Value::String(now_rfc3339()));
            }
            let data = repo
                .update_metrics(&id, values)
                .await
                .map_err(as_client_error)?;
            info!(%casino_id, %reporting_period, "ESG metrics updated");
            Ok(Ingested {
                created: false,
                response: IngestResponse {
                    success: true,
                    message: "ESG metrics updated successfully".into(),
                    count: None,
                    data,
                },
            })
        }
        None => {
            if let Value::Object(fields) = &mut values {
                fields.insert("casino_id".into(), Value::String(casino_id.clone()));
                fields.insert("reporting_period".into(), Value::String(reporting_period.clone()));
                fields.insert("period_type".into(), Value::String(period_type));
            }
            let data = repo
                .insert_metrics(values)
                .await
                .map_err(as_client_error)?;
            info!(%casino_id, %reporting_period, "ESG metrics recorded");
            Ok(Ingested::created(
                "ESG metrics recorded successfully".into(),
                None,
                data,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_check_lists_valid_types() {
        assert!(check_member(Some("nrgp"), CONTRIBUTION_TYPES, "Invalid contribution_type").is_ok());

        match check_member(Some("lottery"), CONTRIBUTION_TYPES, "Invalid contribution_type") {
            Err(ServiceError::InvalidInput {
                message,
                details: Some(details),
            }) => {
                assert_eq!(message, "Invalid contribution_type");
                assert_eq!(details["valid_types"][0], "nrgp");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(check_member(None, PERIOD_TYPES, "Invalid period_type").is_err());
    }

    #[test]
    fn refused_rows_are_client_errors() {
        let err = as_client_error(StorageError::rejected("esg_metrics", "invalid input syntax"));
        assert!(matches!(err, ServiceError::InvalidInput { ref message, .. } if message == "invalid input syntax"));

        let err = as_client_error(StorageError::unavailable(
            "timeout".into(),
            std::io::Error::other("timeout"),
        ));
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}
