use tracing::debug;

use crate::error::PredictError;
use crate::types::{
    CombinedPrediction, OverUnderSubPrediction, ScoreSubPrediction, WinnerSubPrediction,
};

const WINNER_WEIGHT: f64 = 0.6;
const SCORE_BONUS: f64 = 0.2;

const BASE_CONFIDENCE: f64 = 0.7;
const CLEAR_FAVORITE_GAP: f64 = 0.3;
const CLEAR_FAVORITE_BONUS: f64 = 0.2;
const MAX_CONFIDENCE: f64 = 0.95;

/// Blend the market sub-predictions into one distribution.
///
/// Order matters: scale the classifier, add the score bonus, normalize, then
/// score confidence on the unrounded result. Confidence lands in [0.7, 0.95].
/// The over/under market is carried through and does not move the blend.
pub fn combine(
    winner: &WinnerSubPrediction,
    score: &ScoreSubPrediction,
    over_under: &OverUnderSubPrediction,
) -> Result<CombinedPrediction, PredictError> {
    let raw = [winner.home_win_prob, winner.draw_prob, winner.away_win_prob];
    if raw.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(PredictError::InvalidDistribution(raw));
    }

    let mut home = winner.home_win_prob * WINNER_WEIGHT;
    let mut draw = winner.draw_prob * WINNER_WEIGHT;
    let mut away = winner.away_win_prob * WINNER_WEIGHT;

    if score.home_score > score.away_score {
        home += SCORE_BONUS;
    } else if score.home_score < score.away_score {
        away += SCORE_BONUS;
    } else {
        draw += SCORE_BONUS;
    }

    let total = home + draw + away;
    home /= total;
    draw /= total;
    away /= total;

    let mut confidence = BASE_CONFIDENCE;
    if (home - away).abs() > CLEAR_FAVORITE_GAP {
        confidence += CLEAR_FAVORITE_BONUS;
    }
    let confidence = confidence.min(MAX_CONFIDENCE);

    debug!(home, draw, away, confidence, "ensemble blended");

    Ok(CombinedPrediction {
        home_win_prob: round3(home),
        draw_prob: round3(draw),
        away_win_prob: round3(away),
        home_score: score.home_score,
        away_score: score.away_score,
        confidence,
        over_under: Some(*over_under),
    })
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
