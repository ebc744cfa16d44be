use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use match_forecast::PredictionOrchestrator;
use match_forecast::batch::{build_report, parse_requests, predict_batch};
use match_forecast::config::ForecastConfig;
use match_forecast::models::ModelSet;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = ForecastConfig::from_env();
    cfg.init_logging();

    let orchestrator = PredictionOrchestrator::new(&ModelSet::load_from_dir(&cfg.model_dir));

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--train") {
        orchestrator.train_models();
        return Ok(());
    }

    let raw = read_input(arg.map(PathBuf::from))?;
    let requests = parse_requests(&raw).context("parse prediction requests")?;
    info!(requests = requests.len(), "predicting batch");

    let predictions = predict_batch(&orchestrator, &requests, cfg.parallelism);
    let report = build_report(&orchestrator, predictions);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize forecast report")?
    );
    Ok(())
}

fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("read requests {}", path.display())),
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("read requests from stdin")?;
            Ok(raw)
        }
    }
}
