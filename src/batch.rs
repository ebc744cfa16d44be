//! Batch front end: request parsing, order-preserving parallel prediction
//! and the report the CLI prints.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::orchestrator::PredictionOrchestrator;
use crate::types::{MatchPrediction, PerformanceMetrics, PredictionRequest};

/// A request document is either one request or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RequestBatch {
    Many(Vec<PredictionRequest>),
    One(PredictionRequest),
}

impl RequestBatch {
    pub fn into_vec(self) -> Vec<PredictionRequest> {
        match self {
            RequestBatch::Many(v) => v,
            RequestBatch::One(r) => vec![r],
        }
    }
}

pub fn parse_requests(raw: &str) -> serde_json::Result<Vec<PredictionRequest>> {
    serde_json::from_str::<RequestBatch>(raw).map(RequestBatch::into_vec)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub match_id: String,
    #[serde(flatten)]
    pub prediction: MatchPrediction,
}

#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub generated_at: String,
    pub model_performance: PerformanceMetrics,
    pub predictions: Vec<PredictionRow>,
}

/// Rows come back in request order regardless of which worker ran them.
pub fn predict_batch(
    orchestrator: &PredictionOrchestrator,
    requests: &[PredictionRequest],
    threads: usize,
) -> Vec<PredictionRow> {
    with_predict_pool(threads, || {
        requests
            .par_iter()
            .map(|req| PredictionRow {
                match_id: req.match_id.clone(),
                prediction: orchestrator.predict_request(req),
            })
            .collect()
    })
}

pub fn build_report(
    orchestrator: &PredictionOrchestrator,
    predictions: Vec<PredictionRow>,
) -> ForecastReport {
    ForecastReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        model_performance: orchestrator.model_performance(),
        predictions,
    }
}

fn with_predict_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = r#"{
        "match_id": "solo",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "league": "Premier League",
        "home_form": [1, 1, 0, 1, 0]
    }"#;

    fn request(id: usize) -> PredictionRequest {
        // Alternate the in-form side so neighbouring rows differ.
        let (home_form, away_form) = if id % 2 == 0 {
            (vec![1, 1, 1], vec![-1, 0, -1])
        } else {
            (vec![-1, -1, 0], vec![1, 1, 1])
        };
        PredictionRequest {
            match_id: format!("m-{id:03}"),
            home_team: format!("Home {id}"),
            away_team: format!("Away {id}"),
            league: "Serie A".to_string(),
            home_form: Some(home_form),
            away_form: Some(away_form),
            head_to_head: None,
        }
    }

    #[test]
    fn lone_object_and_single_element_array_agree() {
        let lone = parse_requests(ONE).unwrap();
        let wrapped = parse_requests(&format!("[{ONE}]")).unwrap();
        assert_eq!(lone.len(), 1);
        assert_eq!(wrapped.len(), 1);

        let orch = PredictionOrchestrator::rule_based();
        let a = predict_batch(&orch, &lone, 2);
        let b = predict_batch(&orch, &wrapped, 2);
        assert_eq!(a, b);
        assert_eq!(a[0].match_id, "solo");
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        assert!(parse_requests("[]").unwrap().is_empty());
        assert!(parse_requests(r#"{"match_id": "x"}"#).is_err());
    }

    #[test]
    fn parallel_rows_keep_request_order() {
        let requests: Vec<_> = (0..64).map(request).collect();
        let orch = PredictionOrchestrator::rule_based();

        let rows = predict_batch(&orch, &requests, 8);
        let ids: Vec<_> = rows.iter().map(|r| r.match_id.as_str()).collect();
        let expected: Vec<_> = requests.iter().map(|r| r.match_id.as_str()).collect();
        assert_eq!(ids, expected);

        for (row, req) in rows.iter().zip(&requests) {
            assert_eq!(row.prediction, orch.predict_request(req));
        }
        assert_eq!(rows, predict_batch(&orch, &requests, 1));
    }

    #[test]
    fn report_rows_are_flat() {
        let orch = PredictionOrchestrator::rule_based();
        let rows = predict_batch(&orch, &parse_requests(ONE).unwrap(), 1);
        let value = serde_json::to_value(build_report(&orch, rows)).unwrap();
        assert_eq!(value["predictions"][0]["match_id"], "solo");
        assert!(value["predictions"][0].get("home_win_prob").is_some());
        assert_eq!(value["model_performance"]["accuracy"], 0.75);
        assert!(value["generated_at"].as_str().is_some());
    }
}
