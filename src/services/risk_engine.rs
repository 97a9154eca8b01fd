//! Rule-based player risk predictor.
//!
//! Five factors are scored in points from fixed thresholds, summed, scaled by
//! a game-type multiplier and clamped to 0..=100.

use serde_json::{Value, json};

use crate::{
    dto::{
        engine::{
            BatchPlayer, BatchPredictResponse, EngineHealth, ModelInfo, PlayerFeatures,
            PlayerPrediction, PredictResponse, Prediction, RiskFactors, RiskLabel,
        },
        now_rfc3339, round2,
    },
    error::ServiceError,
};

/// Routes served under `/safeplay-ai-risk-engine`.
pub const ENDPOINTS: &[&str] = &[
    "GET /safeplay-ai-risk-engine/health",
    "POST /safeplay-ai-risk-engine/predict",
    "POST /safeplay-ai-risk-engine/batch-predict",
];

/// Version reported by the engine health check, independent of the crate release.
pub const ENGINE_VERSION: &str = "1.0.0";

/// Multiplier applied to the summed factor points for a game type.
pub fn game_multiplier(game_type: &str) -> f64 {
    match game_type.to_ascii_lowercase().as_str() {
        "slots" => 1.2,
        "roulette" => 1.1,
        "blackjack" => 0.9,
        _ => 1.0,
    }
}

/// Band of a score.
pub fn risk_label(score: u32) -> RiskLabel {
    match score {
        80.. => RiskLabel::Critical,
        60..=79 => RiskLabel::High,
        40..=59 => RiskLabel::Medium,
        _ => RiskLabel::Low,
    }
}

fn tiered(value: f64, tiers: [(f64, u32); 3], floor: u32) -> u32 {
    tiers
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(floor)
}

/// Points of each factor before the game multiplier.
pub fn score_factors(features: &PlayerFeatures) -> RiskFactors {
    let loss_ratio = if features.total_bet > 0.0 {
        (features.total_bet - features.withdrawals) / features.total_bet
    } else {
        0.0
    };

    RiskFactors {
        visits_risk: tiered(features.visits, [(150.0, 20), (100.0, 15), (50.0, 10)], 5),
        bet_size_risk: tiered(
            features.avg_bet_size,
            [(2000.0, 25), (1000.0, 18), (500.0, 12)],
            5,
        ),
        session_risk: tiered(
            features.session_minutes,
            [(180.0, 20), (120.0, 15), (60.0, 10)],
            5,
        ),
        loss_risk: tiered(loss_ratio, [(0.5, 20), (0.3, 15), (0.1, 10)], 5),
        behavior_risk: if features.risky_behavior == 1.0 { 15 } else { 0 },
    }
}

fn recommendations(features: &PlayerFeatures, factors: &RiskFactors) -> Vec<String> {
    let rules = [
        (
            factors.session_risk >= 15,
            "Take regular breaks - session duration is high",
        ),
        (factors.bet_size_risk >= 18, "Consider reducing bet sizes"),
        (
            factors.loss_risk >= 15,
            "Set a loss limit - net losses are significant",
        ),
        (
            factors.visits_risk >= 15,
            "Monitor play frequency - visit count is elevated",
        ),
        (
            features.risky_behavior == 1.0,
            "Previous risk indicators detected - exercise caution",
        ),
    ];
    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// Score a single player.
pub fn predict(features: &PlayerFeatures) -> Prediction {
    let factors = score_factors(features);
    let points = factors.visits_risk
        + factors.bet_size_risk
        + factors.session_risk
        + factors.loss_risk
        + factors.behavior_risk;
    let risk_score = (f64::from(points) * game_multiplier(&features.game_type))
        .round()
        .clamp(0.0, 100.0) as u32;
    let confidence = (0.7 + features.visits / 500.0).min(0.95);

    Prediction {
        risk_score,
        risk_label: risk_label(risk_score),
        confidence: round2(confidence),
        recommendations: recommendations(features, &factors),
        factors,
    }
}

/// Static engine metadata with the current time.
pub fn health() -> EngineHealth {
    EngineHealth {
        status: "healthy",
        service: "SafeBet IQ Risk Engine",
        version: ENGINE_VERSION,
        model: "Demo Risk Predictor",
        timestamp: now_rfc3339(),
    }
}

fn model_info() -> ModelInfo {
    ModelInfo {
        name: "SafePlay Risk Predictor v1.0",
        kind: "rule-based ensemble",
        training_samples: 250,
    }
}

/// Payload clients can copy when `features` is missing.
fn example_request() -> Value {
    json!({
        "example": {
            "features": {
                "visits": 120,
                "total_bet": 50000,
                "avg_bet_size": 417,
                "winnings": 45000,
                "withdrawals": 40000,
                "session_minutes": 145,
                "game_type": "slots",
                "risky_behavior": 0
            }
        }
    })
}

/// Score one feature set; a missing set is rejected with an example.
pub fn predict_one(features: Option<PlayerFeatures>) -> Result<PredictResponse, ServiceError> {
    let features = features.ok_or_else(|| {
        ServiceError::invalid_input("Missing required field: features")
            .with_details(example_request())
    })?;

    Ok(PredictResponse {
        success: true,
        prediction: predict(&features),
        model_info: model_info(),
        timestamp: now_rfc3339(),
    })
}

/// Score every entry of `players`, which must be an array.
pub fn predict_batch(players: Option<Value>) -> Result<BatchPredictResponse, ServiceError> {
    let Some(Value::Array(players)) = players else {
        return Err(ServiceError::invalid_input(
            "Missing or invalid field: players (must be an array)",
        ));
    };

    let predictions = players
        .into_iter()
        .enumerate()
        .map(|(index, player)| {
            let player: BatchPlayer = serde_json::from_value(player).map_err(|err| {
                ServiceError::invalid_input(format!("Invalid player at index {index}: {err}"))
            })?;
            Ok(PlayerPrediction {
                prediction: predict(&player.features),
                player_id: player.player_id,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    Ok(BatchPredictResponse {
        success: true,
        count: predictions.len(),
        predictions,
        timestamp: now_rfc3339(),
    })
}
