use crate::types::{CombinedPrediction, FeatureRecord};

const FAVORITE_THRESHOLD: f64 = 0.5;
const FORM_GAP: f64 = 0.2;
const HIGH_CONFIDENCE: f64 = 0.8;
const LOW_CONFIDENCE: f64 = 0.6;

pub const INSUFFICIENT_DATA: &str = "Unable to generate prediction due to insufficient data.";

/// Clauses in fixed order: favorite, form, head-to-head, confidence.
/// Each is evaluated on its own; only the favorite clause is always present.
pub fn explain(features: &FeatureRecord, combined: &CombinedPrediction) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(4);

    parts.push(if combined.home_win_prob > FAVORITE_THRESHOLD {
        "Home team is favored based on recent form"
    } else if combined.away_win_prob > FAVORITE_THRESHOLD {
        "Away team has the advantage"
    } else {
        "This match appears evenly balanced"
    });

    if features.form_diff > FORM_GAP {
        parts.push("Home team has significantly better recent form");
    } else if features.form_diff < -FORM_GAP {
        parts.push("Away team has been performing better recently");
    }

    if features.h2h_home_wins > features.h2h_away_wins {
        parts.push("Home team has historical advantage in head-to-head matches");
    }

    if combined.confidence > HIGH_CONFIDENCE {
        parts.push("High confidence prediction based on clear indicators");
    } else if combined.confidence < LOW_CONFIDENCE {
        parts.push("Low confidence due to mixed signals");
    }

    format!("{}.", parts.join(". "))
}
