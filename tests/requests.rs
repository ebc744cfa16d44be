use std::fs;
use std::path::PathBuf;

use match_forecast::models::{ModelSet, OVER_UNDER_ARTIFACT, WINNER_ARTIFACT};
use match_forecast::{ModelTag, PredictionOrchestrator, PredictionRequest};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn requests() -> Vec<PredictionRequest> {
    serde_json::from_str(&read_fixture("requests.json")).expect("fixture should parse")
}

#[test]
fn parses_request_fixture() {
    let reqs = requests();
    assert_eq!(reqs.len(), 3);
    assert_eq!(reqs[0].match_id, "pl-2024-ars-che");
    assert!(reqs[0].head_to_head.is_none());
    assert_eq!(reqs[1].head_to_head.as_ref().map(Vec::len), Some(2));
    assert_eq!(reqs[2].home_form.as_deref(), Some(&[][..]));
    assert!(reqs[2].away_form.is_none());
}

#[test]
fn away_side_in_form_is_favored() {
    let orch = PredictionOrchestrator::rule_based();
    let pred = orch.predict_request(&requests()[1]);
    let c = pred.combined;

    assert_eq!((c.home_score, c.away_score), (1, 2));
    assert!((c.home_win_prob - 0.15).abs() < 1e-9);
    assert!((c.draw_prob - 0.255).abs() < 1e-9);
    assert!((c.away_win_prob - 0.595).abs() < 1e-9);
    assert!((c.confidence - 0.9).abs() < 1e-12, "confidence {}", c.confidence);
    let ou = c.over_under.expect("over/under carried through");
    assert_eq!(ou.under_prob, 0.6);
    assert_eq!(
        pred.reasoning,
        "Away team has the advantage. \
         Away team has been performing better recently. \
         High confidence prediction based on clear indicators."
    );
}

#[test]
fn home_hosted_history_adds_head_to_head_clause() {
    let orch = PredictionOrchestrator::rule_based();
    let pred = orch.predict_request(&requests()[2]);
    let c = pred.combined;

    assert_eq!(pred.model, ModelTag::XgEloEnsemble);
    assert!((c.home_win_prob - 0.685).abs() < 1e-9);
    assert!((c.away_win_prob - 0.06).abs() < 1e-9);
    assert_eq!(
        pred.reasoning,
        "Home team is favored based on recent form. \
         Home team has historical advantage in head-to-head matches. \
         High confidence prediction based on clear indicators."
    );
}

#[test]
fn serialized_prediction_is_a_flat_record() {
    let orch = PredictionOrchestrator::rule_based();
    let value = serde_json::to_value(orch.predict_request(&requests()[0])).unwrap();
    for key in [
        "home_win_prob",
        "draw_prob",
        "away_win_prob",
        "home_score",
        "away_score",
        "confidence",
        "over_prob",
        "under_prob",
        "model",
        "reasoning",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["model"], "xg_elo_ensemble");
}

#[test]
fn artifacts_on_disk_drive_model_backed_markets() {
    let dir = tempfile::tempdir().unwrap();
    let names: Vec<&str> = match_forecast::features::FEATURE_NAMES.to_vec();
    // Zero weights: the intercepts alone decide the class probabilities.
    let winner = serde_json::json!({
        "feature_names": names,
        "coeffs": vec![vec![0.0; 11]; 3],
        "intercepts": [0.0, 0.0, 0.0],
    });
    let over_under = serde_json::json!({
        "coeffs": vec![vec![0.0; 11]; 2],
        "intercepts": [0.0, 0.0],
    });
    fs::write(dir.path().join(WINNER_ARTIFACT), winner.to_string()).unwrap();
    fs::write(dir.path().join(OVER_UNDER_ARTIFACT), over_under.to_string()).unwrap();

    let models = ModelSet::load_from_dir(dir.path());
    assert!(models.winner.is_some());
    assert!(models.score.is_none());

    let orch = PredictionOrchestrator::new(&models);
    let pred = orch.predict_request(&requests()[0]);
    let c = pred.combined;
    assert_eq!(pred.model, ModelTag::XgEloEnsemble);
    // Uniform winner model (0.2 each after scaling) plus the 2-1 home bonus.
    assert!((c.home_win_prob - 0.5).abs() < 1e-9);
    assert!((c.draw_prob - 0.25).abs() < 1e-9);
    let ou = c.over_under.expect("over/under carried through");
    assert!((ou.over_prob - 0.5).abs() < 1e-12);
}
