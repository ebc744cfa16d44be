use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use crate::ensemble;
use crate::error::PredictError;
use crate::features::build_features;
use crate::models::ModelSet;
use crate::predictors::MarketPredictors;
use crate::reasoning::{self, INSUFFICIENT_DATA};
use crate::types::{
    CombinedPrediction, MatchContext, MatchPrediction, ModelTag, PerformanceMetrics,
    PredictionRequest,
};

/// Façade over the prediction pipeline. Holds only read-only state, so one
/// instance can serve any number of threads.
pub struct PredictionOrchestrator {
    predictors: MarketPredictors,
}

impl PredictionOrchestrator {
    pub fn new(models: &ModelSet) -> Self {
        info!(markets = ?models.loaded_markets(), "prediction orchestrator ready");
        Self {
            predictors: MarketPredictors::from_models(models),
        }
    }

    /// Rule-based on every market.
    pub fn rule_based() -> Self {
        Self::new(&ModelSet::empty())
    }

    /// Never fails: any pipeline error or panic yields [`fallback_prediction`].
    pub fn predict_match(&self, match_id: &str, ctx: &MatchContext) -> MatchPrediction {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(ctx)))
            .unwrap_or_else(|payload| Err(PredictError::Panicked(panic_message(&*payload))));

        match outcome {
            Ok(prediction) => {
                debug!(
                    match_id,
                    home = prediction.combined.home_win_prob,
                    draw = prediction.combined.draw_prob,
                    away = prediction.combined.away_win_prob,
                    "prediction ready"
                );
                prediction
            }
            Err(err) => {
                error!(match_id, error = %err, "prediction pipeline failed, serving fallback");
                fallback_prediction()
            }
        }
    }

    pub fn predict_request(&self, req: &PredictionRequest) -> MatchPrediction {
        self.predict_match(&req.match_id, &MatchContext::from(req))
    }

    fn run_pipeline(&self, ctx: &MatchContext) -> Result<MatchPrediction, PredictError> {
        let features = build_features(ctx);

        let winner = self.predictors.winner.predict(&features)?;
        let score = self.predictors.score.predict(&features)?;
        let over_under = self.predictors.over_under.predict(&features)?;

        let combined = ensemble::combine(&winner, &score, &over_under)?;
        let reasoning = reasoning::explain(&features, &combined);

        Ok(MatchPrediction {
            combined,
            model: ModelTag::XgEloEnsemble,
            reasoning,
        })
    }

    pub fn train_models(&self) {
        info!("model training not implemented yet");
    }

    pub fn model_performance(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            accuracy: 0.75,
            precision: 0.72,
            recall: 0.68,
            f1_score: 0.70,
            last_updated: "2024-01-01".to_string(),
        }
    }
}

pub fn fallback_prediction() -> MatchPrediction {
    MatchPrediction {
        combined: CombinedPrediction {
            home_win_prob: 0.33,
            draw_prob: 0.34,
            away_win_prob: 0.33,
            home_score: 1,
            away_score: 1,
            confidence: 0.5,
            over_under: None,
        },
        model: ModelTag::Fallback,
        reasoning: INSUFFICIENT_DATA.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
