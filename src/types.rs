use serde::{Deserialize, Serialize};

/// One prior meeting between two sides, as reported by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HeadToHeadMatch {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub home_score: i32,
    #[serde(default)]
    pub away_score: i32,
}

/// Inbound request record as relayed by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    #[serde(default)]
    pub home_form: Option<Vec<i32>>,
    #[serde(default)]
    pub away_form: Option<Vec<i32>>,
    #[serde(default)]
    pub head_to_head: Option<Vec<HeadToHeadMatch>>,
}

/// Raw match context. Form sequences are ordered oldest to most recent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub home_form: Option<Vec<i32>>,
    pub away_form: Option<Vec<i32>>,
    pub head_to_head: Vec<HeadToHeadMatch>,
}

impl MatchContext {
    pub fn new(home_team: &str, away_team: &str, league: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            league: league.to_string(),
            home_form: None,
            away_form: None,
            head_to_head: Vec::new(),
        }
    }

    pub fn with_form(mut self, home_form: Vec<i32>, away_form: Vec<i32>) -> Self {
        self.home_form = Some(home_form);
        self.away_form = Some(away_form);
        self
    }

    pub fn with_head_to_head(mut self, head_to_head: Vec<HeadToHeadMatch>) -> Self {
        self.head_to_head = head_to_head;
        self
    }
}

impl From<&PredictionRequest> for MatchContext {
    fn from(req: &PredictionRequest) -> Self {
        Self {
            home_team: req.home_team.clone(),
            away_team: req.away_team.clone(),
            league: req.league.clone(),
            home_form: req.home_form.clone(),
            away_form: req.away_form.clone(),
            head_to_head: req.head_to_head.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRecord {
    pub home_form_avg: f64,
    pub away_form_avg: f64,
    pub home_form_trend: f64,
    pub away_form_trend: f64,
    pub h2h_home_wins: u32,
    pub h2h_away_wins: u32,
    pub h2h_draws: u32,
    pub league_strength: f64,
    pub home_advantage: f64,
    pub form_diff: f64,
    pub trend_diff: f64,
}

impl FeatureRecord {
    /// Home wins minus away wins over the head-to-head window.
    pub fn h2h_diff(&self) -> f64 {
        self.h2h_home_wins as f64 - self.h2h_away_wins as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinnerSubPrediction {
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubPrediction {
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverUnderSubPrediction {
    pub over_prob: f64,
    pub under_prob: f64,
}

/// Ensemble output before the model tag and explanation are attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPrediction {
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub home_score: u32,
    pub away_score: u32,
    pub confidence: f64,
    #[serde(flatten)]
    pub over_under: Option<OverUnderSubPrediction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTag {
    XgEloEnsemble,
    Fallback,
}

impl ModelTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelTag::XgEloEnsemble => "xg_elo_ensemble",
            ModelTag::Fallback => "fallback",
        }
    }
}

/// Outbound record: a flat field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    #[serde(flatten)]
    pub combined: CombinedPrediction,
    pub model: ModelTag,
    pub reasoning: String,
}

impl MatchPrediction {
    pub fn is_fallback(&self) -> bool {
        self.model == ModelTag::Fallback
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub last_updated: String,
}
