pub mod batch;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod league_params;
pub mod models;
pub mod orchestrator;
pub mod predictors;
pub mod reasoning;
pub mod types;

pub use orchestrator::{PredictionOrchestrator, fallback_prediction};
pub use types::{MatchContext, MatchPrediction, ModelTag, PredictionRequest};
