//! Per-market predictors. Each one is bound at construction to either a
//! loaded model or its rule-based path and never switches afterwards.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Market, PredictError};
use crate::features::to_vector;
use crate::models::{ModelSet, OutcomeClassifier, ScoreRegressor};
use crate::types::{
    FeatureRecord, OverUnderSubPrediction, ScoreSubPrediction, WinnerSubPrediction,
};

const BASE_SIDE_STRENGTH: f64 = 0.33;
const DRAW_STRENGTH: f64 = 0.34;
const FORM_WEIGHT: f64 = 0.1;
const H2H_WEIGHT: f64 = 0.05;

const HOME_SCORE_BASE: f64 = 1.5;
const AWAY_SCORE_BASE: f64 = 1.0;
const SCORE_FORM_WEIGHT: f64 = 0.5;

// The goal line doubles as the form-to-goals multiplier.
const GOAL_LINE: f64 = 2.5;

pub struct WinnerPredictor {
    model: Option<Arc<dyn OutcomeClassifier>>,
}

pub struct ScorePredictor {
    model: Option<Arc<dyn ScoreRegressor>>,
}

pub struct OverUnderPredictor {
    model: Option<Arc<dyn OutcomeClassifier>>,
}

impl WinnerPredictor {
    pub fn new(model: Option<Arc<dyn OutcomeClassifier>>) -> Self {
        Self { model }
    }

    pub fn predict(&self, features: &FeatureRecord) -> Result<WinnerSubPrediction, PredictError> {
        let Some(model) = self.model.as_ref() else {
            return Ok(rule_based_winner(features));
        };
        let probs = classify(model.as_ref(), Market::Winner, features, 3)?;
        debug!(?probs, "winner model output");
        Ok(WinnerSubPrediction {
            home_win_prob: probs[0],
            draw_prob: probs[1],
            away_win_prob: probs[2],
        })
    }
}

impl ScorePredictor {
    pub fn new(model: Option<Arc<dyn ScoreRegressor>>) -> Self {
        Self { model }
    }

    pub fn predict(&self, features: &FeatureRecord) -> Result<ScoreSubPrediction, PredictError> {
        let Some(model) = self.model.as_ref() else {
            return Ok(rule_based_score(features));
        };
        let raw = model
            .predict(&to_vector(features))
            .map_err(|source| PredictError::Model {
                market: Market::Score,
                source,
            })?;
        debug!(?raw, "score model output");
        Ok(ScoreSubPrediction {
            home_score: goals_from_model(raw[0])?,
            away_score: goals_from_model(raw[1])?,
        })
    }
}

impl OverUnderPredictor {
    pub fn new(model: Option<Arc<dyn OutcomeClassifier>>) -> Self {
        Self { model }
    }

    pub fn predict(
        &self,
        features: &FeatureRecord,
    ) -> Result<OverUnderSubPrediction, PredictError> {
        let Some(model) = self.model.as_ref() else {
            return Ok(rule_based_over_under(features));
        };
        let probs = classify(model.as_ref(), Market::OverUnder, features, 2)?;
        debug!(?probs, "over/under model output");
        Ok(OverUnderSubPrediction {
            over_prob: probs[1],
            under_prob: probs[0],
        })
    }
}

/// The three market predictors, wired from one model set.
pub struct MarketPredictors {
    pub winner: WinnerPredictor,
    pub score: ScorePredictor,
    pub over_under: OverUnderPredictor,
}

impl MarketPredictors {
    pub fn from_models(models: &ModelSet) -> Self {
        Self {
            winner: WinnerPredictor::new(models.winner.clone()),
            score: ScorePredictor::new(models.score.clone()),
            over_under: OverUnderPredictor::new(models.over_under.clone()),
        }
    }
}

fn classify(
    model: &dyn OutcomeClassifier,
    market: Market,
    features: &FeatureRecord,
    classes: usize,
) -> Result<Vec<f64>, PredictError> {
    let probs = model
        .predict_proba(&to_vector(features))
        .map_err(|source| PredictError::Model { market, source })?;
    if probs.len() != classes {
        return Err(PredictError::OutputShape {
            market,
            expected: classes,
            got: probs.len(),
        });
    }
    Ok(probs)
}

// Truncates toward zero, as integer goal counts.
fn goals_from_model(value: f64) -> Result<u32, PredictError> {
    let goals = value.trunc();
    if !goals.is_finite() || goals < 0.0 || goals > u32::MAX as f64 {
        return Err(PredictError::OutputValue {
            market: Market::Score,
            value,
        });
    }
    Ok(goals as u32)
}

pub fn rule_based_winner(f: &FeatureRecord) -> WinnerSubPrediction {
    let edge = f.home_advantage + FORM_WEIGHT * f.form_diff + H2H_WEIGHT * f.h2h_diff();
    // A lopsided edge can push one side below zero; floor it so the mass stays valid.
    let home = (BASE_SIDE_STRENGTH + edge).max(0.0);
    let away = (BASE_SIDE_STRENGTH - edge).max(0.0);
    let draw = DRAW_STRENGTH;

    let total = home + draw + away;
    WinnerSubPrediction {
        home_win_prob: home / total,
        draw_prob: draw / total,
        away_win_prob: away / total,
    }
}

pub fn rule_based_score(f: &FeatureRecord) -> ScoreSubPrediction {
    ScoreSubPrediction {
        home_score: expected_goals(HOME_SCORE_BASE + SCORE_FORM_WEIGHT * f.home_form_avg),
        away_score: expected_goals(AWAY_SCORE_BASE + SCORE_FORM_WEIGHT * f.away_form_avg),
    }
}

// Halves round to even: 2.5 -> 2, 1.5 -> 2, 0.5 -> 0.
fn expected_goals(raw: f64) -> u32 {
    raw.round_ties_even().max(0.0) as u32
}

pub fn rule_based_over_under(f: &FeatureRecord) -> OverUnderSubPrediction {
    let total_goals_expected = (f.home_form_avg + f.away_form_avg) * GOAL_LINE;
    if total_goals_expected > GOAL_LINE {
        OverUnderSubPrediction {
            over_prob: 0.6,
            under_prob: 0.4,
        }
    } else {
        OverUnderSubPrediction {
            over_prob: 0.4,
            under_prob: 0.6,
        }
    }
}
