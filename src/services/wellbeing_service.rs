//! Behavioural risk scoring of wellbeing mini-game sessions.
//!
//! Four sub-scores are accumulated over the ordered telemetry of a session:
//! impulsivity and risk escalation start at 0 and grow with risky play, while
//! patience and recovery response start at 100 and drop with it. The combined
//! behaviour risk index weights them 0.30 / 0.35 / 0.20 / 0.15.

use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    dao::models::TelemetryEvent,
    dto::{
        round2,
        wellbeing::{RiskCalculationResponse, RiskExplanation, WellbeingRiskScore},
    },
    error::ServiceError,
    state::SharedState,
};

const DECISION: &str = "decision_made";
const COLLECTION: &str = "object_collected";
const TRAP_COLLISION: &str = "trap_collision";
const HAZARD_COLLISION: &str = "hazard_collision";
const SETBACK: &str = "setback_occurred";
const PAUSE: &str = "pause_action";
const RESET: &str = "reset_triggered";

/// Decision speed, in milliseconds, under which a choice counts as hasty.
const FAST_DECISION_MS: f64 = 2000.0;
/// Average decision speed assumed when no event carries one.
const DEFAULT_DECISION_MS: f64 = 3000.0;

impl TelemetryEvent {
    fn data(&self, key: &str) -> Option<f64> {
        self.event_data.get(key).and_then(|value| value.as_f64())
    }

    fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }

    fn is_collision(&self) -> bool {
        self.is(TRAP_COLLISION) || self.is(HAZARD_COLLISION)
    }

    /// Collected while a trap or hazard was nearby.
    fn near_danger(&self) -> bool {
        self.data("nearbyTraps").is_some_and(|n| n > 0.0)
            || self.data("nearbyHazards").is_some_and(|n| n > 0.0)
    }

    fn difficulty(&self) -> f64 {
        self.data("difficultyLevel")
            .filter(|level| *level != 0.0)
            .unwrap_or(1.0)
    }

    /// A decision without a recorded speed counts as fast.
    fn is_fast_decision(&self) -> bool {
        self.decision_speed_ms.is_none_or(|ms| ms < FAST_DECISION_MS)
    }
}

/// Longest run of consecutive `high` choices among the events that chose a risk level.
fn longest_high_streak(levels: &[&str]) -> usize {
    levels
        .iter()
        .fold((0, 0), |(current, longest), level| {
            if *level == "high" {
                (current + 1, longest.max(current + 1))
            } else {
                (0, longest)
            }
        })
        .1
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Score an ordered telemetry stream.
pub fn calculate_risk_score(telemetry: &[TelemetryEvent]) -> WellbeingRiskScore {
    let mut impulsivity = 0.0_f64;
    let mut escalation = 0.0_f64;
    let mut patience = 100.0_f64;
    let mut recovery = 100.0_f64;

    let count = |event_type: &str| telemetry.iter().filter(|e| e.is(event_type)).count();
    let pauses = count(PAUSE);
    let resets = count(RESET);
    let decisions = count(DECISION);
    let collisions = telemetry.iter().filter(|e| e.is_collision()).count();
    let collections: Vec<&TelemetryEvent> = telemetry.iter().filter(|e| e.is(COLLECTION)).collect();
    let risky_collections = collections.iter().filter(|e| e.near_danger()).count();

    let speeds: Vec<f64> = telemetry
        .iter()
        .filter_map(|e| e.decision_speed_ms)
        .filter(|ms| *ms != 0.0)
        .collect();
    let levels: Vec<&str> = telemetry
        .iter()
        .filter_map(|e| e.risk_level_chosen.as_deref())
        .filter(|level| !level.is_empty() && *level != "none")
        .collect();

    for (index, event) in telemetry.iter().enumerate() {
        let next = telemetry.get(index + 1);

        if event.is(DECISION) {
            if event.is_fast_decision() {
                impulsivity += 10.0;
            } else if event.decision_speed_ms.is_some_and(|ms| ms > 5000.0) {
                patience = (patience + 5.0).min(100.0);
            }
        }

        if event.is(COLLECTION) {
            let reaction = event.data("reactionTime");
            if reaction.is_some_and(|ms| ms < 500.0) {
                impulsivity += 5.0;
            }
            if event.near_danger() {
                escalation += 8.0;
            }
            if event.data("combo").is_some_and(|combo| combo > 5.0) {
                patience = (patience + 3.0).min(100.0);
            }
            if event.difficulty() > 1.5 && reaction.is_some_and(|ms| ms < 600.0) {
                impulsivity += 8.0;
            }
        }

        if event.is_collision() {
            if let Some(next) = next.filter(|next| next.is(COLLECTION)) {
                if next.data("reactionTime").unwrap_or(0.0) < 800.0 {
                    recovery -= 10.0;
                } else {
                    recovery = (recovery + 5.0).min(100.0);
                }
            }
        }

        if event.is(SETBACK) {
            if let Some(next) = next.filter(|next| next.is(DECISION)) {
                if next.is_fast_decision() {
                    recovery -= 15.0;
                } else {
                    recovery = (recovery + 5.0).min(100.0);
                }
            }
        }
    }

    // Escalation is driven by streaks of high-risk choices, not by the running total.
    escalation = (longest_high_streak(&levels) as f64 * 20.0).min(100.0);

    let average_speed = if speeds.is_empty() {
        DEFAULT_DECISION_MS
    } else {
        speeds.iter().sum::<f64>() / speeds.len() as f64
    };
    if average_speed < FAST_DECISION_MS {
        impulsivity += 20.0;
    } else if average_speed > 6000.0 {
        patience = (patience + 10.0).min(100.0);
    }

    let high_choices = levels.iter().filter(|level| **level == "high").count();
    escalation += (ratio(high_choices, decisions) * 100.0).min(30.0);

    let risky_ratio = ratio(risky_collections, collections.len());
    if !collections.is_empty() {
        escalation += (risky_ratio * 100.0).min(25.0);
        if risky_ratio > 0.5 {
            impulsivity += 15.0;
        }
    }

    if collisions > 5 {
        recovery -= 10.0;
    }

    let average_difficulty = if collections.is_empty() {
        1.0
    } else {
        collections.iter().map(|e| e.difficulty()).sum::<f64>() / collections.len() as f64
    };
    if average_difficulty > 1.5 && escalation > 50.0 {
        escalation += 10.0;
    }

    if pauses > 0 {
        patience = (patience + pauses as f64 * 10.0).min(100.0);
        impulsivity = (impulsivity - pauses as f64 * 5.0).max(0.0);
    }
    if resets > 0 {
        recovery = (recovery + resets as f64 * 15.0).min(100.0);
    }

    let impulsivity = impulsivity.clamp(0.0, 100.0);
    let escalation = escalation.clamp(0.0, 100.0);
    let patience = patience.clamp(0.0, 100.0);
    let recovery = recovery.clamp(0.0, 100.0);

    let index = impulsivity * 0.3
        + escalation * 0.35
        + (100.0 - patience) * 0.2
        + (100.0 - recovery) * 0.15;

    let mut factors = Vec::new();
    let mut recommendations = Vec::new();
    let mut note = |factor: &str, recommendation: Option<&str>| {
        factors.push(factor.to_string());
        if let Some(recommendation) = recommendation {
            recommendations.push(recommendation.to_string());
        }
    };

    if impulsivity > 60.0 {
        note(
            "High impulsivity detected in decision-making",
            Some("Consider taking more time before making decisions"),
        );
    }
    if escalation > 60.0 {
        note(
            "Pattern of escalating risk-taking observed",
            Some("Be aware of the tendency to increase risk over time"),
        );
    }
    if patience < 40.0 {
        note(
            "Limited patience shown during gameplay",
            Some("Practice waiting and evaluating options carefully"),
        );
    }
    if recovery < 40.0 {
        note(
            "Reactive responses to setbacks observed",
            Some("Take breaks after unexpected events"),
        );
    }
    if pauses > 2 {
        note("Good use of pause function demonstrates self-awareness", None);
    }
    if risky_ratio > 0.6 {
        note(
            "High-risk collection pattern detected",
            Some("Consider more cautious decision-making"),
        );
    }
    if collisions > 5 {
        note(
            "Multiple collision events observed",
            Some("Take time to assess risks before acting"),
        );
    }
    if average_difficulty > 1.5 {
        note("Strong performance maintained as challenge increased", None);
    }
    if factors.is_empty() {
        factors.push("Balanced gameplay patterns observed".to_string());
        recommendations.push("Continue maintaining balanced play habits".to_string());
    }

    let confidence = (telemetry.len() as f64 / 10.0 * 100.0).min(100.0);

    WellbeingRiskScore {
        behaviour_risk_index: round2(index),
        impulsivity_score: round2(impulsivity),
        risk_escalation_score: round2(escalation),
        patience_score: round2(patience),
        recovery_response_score: round2(recovery),
        explanation: RiskExplanation {
            factors,
            confidence: round2(confidence),
            recommendations,
        },
    }
}

/// Score a stored session, persist the result and stamp the session's index.
pub async fn score_session(
    state: &SharedState,
    session_id: &str,
) -> Result<RiskCalculationResponse, ServiceError> {
    let repo = state.wellbeing();
    let session = repo
        .session(session_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Session not found"))?;

    let telemetry = repo.telemetry(session_id).await?;
    if telemetry.is_empty() {
        return Err(ServiceError::not_found("No telemetry data found"));
    }

    let score = calculate_risk_score(&telemetry);

    let row = json!({
        "player_id": session.player_id,
        "casino_id": session.casino_id,
        "session_id": session_id,
        "behaviour_risk_index": score.behaviour_risk_index,
        "impulsivity_score": score.impulsivity_score,
        "risk_escalation_score": score.risk_escalation_score,
        "patience_score": score.patience_score,
        "recovery_response_score": score.recovery_response_score,
        "explanation": score.explanation,
    });
    if let Err(err) = repo.insert_risk_score(row).await {
        error!(error = %err, session_id, "failed to store wellbeing risk score");
        return Err(ServiceError::upstream("Failed to save risk score", err));
    }

    if let Err(err) = repo
        .set_session_risk_index(session_id, score.behaviour_risk_index)
        .await
    {
        warn!(error = %err, session_id, "failed to update session risk index");
    }

    info!(
        session_id,
        events = telemetry.len(),
        index = score.behaviour_risk_index,
        "wellbeing session scored"
    );

    Ok(RiskCalculationResponse {
        success: true,
        risk_score: score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn event(event_type: &str, speed: Option<f64>, level: Option<&str>, data: Value) -> TelemetryEvent {
        TelemetryEvent {
            event_type: event_type.into(),
            decision_speed_ms: speed,
            risk_level_chosen: level.map(str::to_string),
            event_data: data,
            event_sequence: None,
        }
    }

    fn calm_session() -> Vec<TelemetryEvent> {
        vec![
            event(DECISION, Some(6500.0), Some("low"), Value::Null),
            event(COLLECTION, None, None, json!({"reactionTime": 900, "combo": 6})),
            event(PAUSE, None, None, Value::Null),
            event(DECISION, Some(7000.0), Some("medium"), Value::Null),
            event(SETBACK, None, None, Value::Null),
            event(DECISION, Some(6000.0), Some("low"), Value::Null),
        ]
    }

    fn impulsive_session() -> Vec<TelemetryEvent> {
        let mut events = Vec::new();
        for _ in 0..4 {
            events.push(event(DECISION, Some(800.0), Some("high"), Value::Null));
            events.push(event(
                COLLECTION,
                None,
                None,
                json!({"reactionTime": 300, "nearbyTraps": 2, "difficultyLevel": 2}),
            ));
            events.push(event(TRAP_COLLISION, None, None, Value::Null));
        }
        events.push(event(SETBACK, None, None, Value::Null));
        events.push(event(DECISION, Some(900.0), Some("high"), Value::Null));
        events
    }

    #[test]
    fn calm_session_scores_lower_than_impulsive_one() {
        let calm = calculate_risk_score(&calm_session());
        let impulsive = calculate_risk_score(&impulsive_session());

        assert!(calm.behaviour_risk_index < impulsive.behaviour_risk_index);
        assert_eq!(calm.impulsivity_score, 0.0);
        assert_eq!(calm.patience_score, 100.0);
        assert_eq!(impulsive.impulsivity_score, 100.0);
        assert!(
            impulsive
                .explanation
                .factors
                .contains(&"High impulsivity detected in decision-making".to_string())
        );
    }

    #[test]
    fn balanced_play_gets_default_explanation() {
        let score = calculate_risk_score(&[event(DECISION, Some(3000.0), None, Value::Null)]);

        assert_eq!(score.behaviour_risk_index, 0.0);
        assert_eq!(score.explanation.factors, vec!["Balanced gameplay patterns observed"]);
        assert_eq!(
            score.explanation.recommendations,
            vec!["Continue maintaining balanced play habits"]
        );
        assert_eq!(score.explanation.confidence, 10.0);
    }

    #[test]
    fn high_streak_sets_escalation() {
        let events: Vec<_> = ["high", "high", "none", "high", "low", "high", "high", "high"]
            .into_iter()
            .map(|level| event(DECISION, Some(3000.0), Some(level), Value::Null))
            .collect();
        let score = calculate_risk_score(&events);

        // Longest streak of three gives 60, plus the capped share of high choices.
        assert_eq!(score.risk_escalation_score, 90.0);
        assert_eq!(score.explanation.confidence, 80.0);
    }

    #[test]
    fn pauses_and_resets_restore_scores() {
        let mut events = vec![event(SETBACK, None, None, Value::Null)];
        events.push(event(DECISION, Some(1000.0), None, Value::Null));
        events.extend((0..3).map(|_| event(PAUSE, None, None, Value::Null)));
        events.push(event(RESET, None, None, Value::Null));
        let score = calculate_risk_score(&events);

        assert_eq!(score.recovery_response_score, 100.0);
        assert_eq!(score.impulsivity_score, 15.0);
        assert!(
            score
                .explanation
                .factors
                .contains(&"Good use of pause function demonstrates self-awareness".to_string())
        );
    }

    #[test]
    fn decision_without_speed_counts_as_fast() {
        let score = calculate_risk_score(&[
            event(DECISION, None, None, Value::Null),
            event(SETBACK, None, None, Value::Null),
            event(DECISION, None, None, Value::Null),
        ]);

        assert_eq!(score.impulsivity_score, 20.0);
        assert_eq!(score.recovery_response_score, 85.0);
    }
}
