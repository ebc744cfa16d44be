use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ArtifactError, ArtifactShapeError, Market};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

pub const WINNER_ARTIFACT: &str = "match_winner_model.json";
pub const SCORE_ARTIFACT: &str = "score_model.json";
pub const OVER_UNDER_ARTIFACT: &str = "over_under_model.json";

/// Class-probability model. Winner models emit `[home, draw, away]`,
/// over/under models emit `[under, over]`.
pub trait OutcomeClassifier: Send + Sync {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;
}

/// Paired numeric model; emits `[home, away]` goals.
pub trait ScoreRegressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; 2]>;
}

/// Loaded once, read-only afterwards. Cloning shares the same models.
#[derive(Clone, Default)]
pub struct ModelSet {
    pub winner: Option<Arc<dyn OutcomeClassifier>>,
    pub score: Option<Arc<dyn ScoreRegressor>>,
    pub over_under: Option<Arc<dyn OutcomeClassifier>>,
}

impl fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSet")
            .field("winner", &self.winner.is_some())
            .field("score", &self.score.is_some())
            .field("over_under", &self.over_under.is_some())
            .finish()
    }
}

impl ModelSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_winner(mut self, model: Arc<dyn OutcomeClassifier>) -> Self {
        self.winner = Some(model);
        self
    }

    pub fn with_score(mut self, model: Arc<dyn ScoreRegressor>) -> Self {
        self.score = Some(model);
        self
    }

    pub fn with_over_under(mut self, model: Arc<dyn OutcomeClassifier>) -> Self {
        self.over_under = Some(model);
        self
    }

    pub fn loaded_markets(&self) -> Vec<Market> {
        let mut out = Vec::new();
        if self.winner.is_some() {
            out.push(Market::Winner);
        }
        if self.score.is_some() {
            out.push(Market::Score);
        }
        if self.over_under.is_some() {
            out.push(Market::OverUnder);
        }
        out
    }

    /// Absent or broken artifacts leave that market on its rule-based path.
    pub fn load_from_dir(dir: &Path) -> Self {
        let winner = optional(
            Market::Winner,
            LinearSoftmaxModel::load(&dir.join(WINNER_ARTIFACT), 3),
        )
        .map(|m| Arc::new(m) as Arc<dyn OutcomeClassifier>);
        let score = optional(
            Market::Score,
            LinearRegressorModel::load(&dir.join(SCORE_ARTIFACT)),
        )
        .map(|m| Arc::new(m) as Arc<dyn ScoreRegressor>);
        let over_under = optional(
            Market::OverUnder,
            LinearSoftmaxModel::load(&dir.join(OVER_UNDER_ARTIFACT), 2),
        )
        .map(|m| Arc::new(m) as Arc<dyn OutcomeClassifier>);

        let set = Self {
            winner,
            score,
            over_under,
        };
        info!(dir = %dir.display(), models = ?set, "model set loaded");
        set
    }
}

fn optional<M>(market: Market, loaded: Result<M, ArtifactError>) -> Option<M> {
    match loaded {
        Ok(model) => {
            debug!(%market, "model artifact loaded");
            Some(model)
        }
        Err(ArtifactError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
            debug!(%market, path = %path.display(), "no model artifact, using rules");
            None
        }
        Err(err) => {
            warn!(%market, error = %err, "ignoring model artifact, using rules");
            None
        }
    }
}

pub fn read_artifact<T>(path: &Path) -> Result<T, ArtifactError>
where
    T: for<'de> Deserialize<'de>,
{
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str::<T>(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// On-disk form shared by both linear model kinds: one coefficient row and
/// one intercept per output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub coeffs: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

impl LinearArtifact {
    fn rows(&self, outputs: usize) -> Result<Vec<FeatureVector>, ArtifactShapeError> {
        if !self.feature_names.is_empty() && self.feature_names != FEATURE_NAMES {
            return Err(ArtifactShapeError::FeatureOrder {
                found: self.feature_names.clone(),
            });
        }
        if self.coeffs.len() != outputs || self.intercepts.len() != outputs {
            return Err(ArtifactShapeError::OutputCount {
                expected: outputs,
                rows: self.coeffs.len(),
                intercepts: self.intercepts.len(),
            });
        }
        let mut rows = Vec::with_capacity(outputs);
        for (idx, row) in self.coeffs.iter().enumerate() {
            let row: FeatureVector = row.as_slice().try_into().map_err(|_| {
                ArtifactShapeError::RowWidth {
                    row: idx,
                    got: row.len(),
                    expected: FEATURE_COUNT,
                }
            })?;
            rows.push(row);
        }
        Ok(rows)
    }
}

fn read_linear(path: &Path) -> Result<LinearArtifact, ArtifactError> {
    let artifact = read_artifact::<LinearArtifact>(path)?;
    debug!(
        path = %path.display(),
        generated_at = artifact.generated_at.as_deref().unwrap_or("unknown"),
        "linear artifact read"
    );
    Ok(artifact)
}

/// Multinomial logistic model over the fixed feature vector.
#[derive(Debug, Clone)]
pub struct LinearSoftmaxModel {
    coeffs: Vec<FeatureVector>,
    intercepts: Vec<f64>,
}

impl LinearSoftmaxModel {
    pub fn from_artifact(
        artifact: &LinearArtifact,
        classes: usize,
    ) -> Result<Self, ArtifactShapeError> {
        let coeffs = artifact.rows(classes)?;
        Ok(Self {
            coeffs,
            intercepts: artifact.intercepts.clone(),
        })
    }

    pub fn load(path: &Path, classes: usize) -> Result<Self, ArtifactError> {
        let artifact = read_linear(path)?;
        Self::from_artifact(&artifact, classes).map_err(|source| ArtifactError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl OutcomeClassifier for LinearSoftmaxModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let logits: Vec<f64> = self
            .coeffs
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| dot(row, features) + b)
            .collect();
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            anyhow::bail!("non-finite logits {logits:?}");
        }
        let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|e| e / sum).collect())
    }
}

/// Two independent linear heads, home goals then away goals.
#[derive(Debug, Clone)]
pub struct LinearRegressorModel {
    coeffs: [FeatureVector; 2],
    intercepts: [f64; 2],
}

impl LinearRegressorModel {
    pub fn from_artifact(artifact: &LinearArtifact) -> Result<Self, ArtifactShapeError> {
        let rows = artifact.rows(2)?;
        Ok(Self {
            coeffs: [rows[0], rows[1]],
            intercepts: [artifact.intercepts[0], artifact.intercepts[1]],
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact = read_linear(path)?;
        Self::from_artifact(&artifact).map_err(|source| ArtifactError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ScoreRegressor for LinearRegressorModel {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        Ok([
            dot(&self.coeffs[0], features) + self.intercepts[0],
            dot(&self.coeffs[1], features) + self.intercepts[1],
        ])
    }
}

fn dot(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
