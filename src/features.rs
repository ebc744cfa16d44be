use tracing::debug;

use crate::league_params::{is_known_league, league_strength};
use crate::types::{FeatureRecord, HeadToHeadMatch, MatchContext};

pub const HOME_ADVANTAGE: f64 = 0.1;

pub const DEFAULT_HOME_FORM: [i32; 5] = [1, 1, 0, 1, 0];
pub const DEFAULT_AWAY_FORM: [i32; 5] = [0, 1, 1, 0, 1];

pub const FEATURE_COUNT: usize = 11;

/// Column order expected by externally trained models. Do not reorder.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "home_form_avg",
    "away_form_avg",
    "home_form_trend",
    "away_form_trend",
    "h2h_home_wins",
    "h2h_away_wins",
    "h2h_draws",
    "league_strength",
    "home_advantage",
    "form_diff",
    "trend_diff",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

pub fn build_features(ctx: &MatchContext) -> FeatureRecord {
    let home_form = form_or_default(ctx.home_form.as_deref(), &DEFAULT_HOME_FORM);
    let away_form = form_or_default(ctx.away_form.as_deref(), &DEFAULT_AWAY_FORM);

    let home_form_avg = mean(home_form);
    let away_form_avg = mean(away_form);
    let home_form_trend = linear_trend(home_form);
    let away_form_trend = linear_trend(away_form);

    if !is_known_league(&ctx.league) {
        debug!(league = %ctx.league, "unrated league, using default strength");
    }

    let (h2h_home_wins, h2h_away_wins, h2h_draws) =
        head_to_head_counts(&ctx.home_team, &ctx.head_to_head);

    let features = FeatureRecord {
        home_form_avg,
        away_form_avg,
        home_form_trend,
        away_form_trend,
        h2h_home_wins,
        h2h_away_wins,
        h2h_draws,
        league_strength: league_strength(&ctx.league),
        home_advantage: HOME_ADVANTAGE,
        form_diff: home_form_avg - away_form_avg,
        trend_diff: home_form_trend - away_form_trend,
    };
    debug!(
        home = %ctx.home_team,
        away = %ctx.away_team,
        form_diff = features.form_diff,
        trend_diff = features.trend_diff,
        "built features"
    );
    features
}

pub fn to_vector(f: &FeatureRecord) -> FeatureVector {
    [
        f.home_form_avg,
        f.away_form_avg,
        f.home_form_trend,
        f.away_form_trend,
        f.h2h_home_wins as f64,
        f.h2h_away_wins as f64,
        f.h2h_draws as f64,
        f.league_strength,
        f.home_advantage,
        f.form_diff,
        f.trend_diff,
    ]
}

fn form_or_default<'a>(form: Option<&'a [i32]>, default: &'a [i32]) -> &'a [i32] {
    match form {
        Some(f) if !f.is_empty() => f,
        _ => default,
    }
}

fn mean(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

/// Least-squares slope of form value against its index.
fn linear_trend(values: &[i32]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, v) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (*v as f64 - y_mean);
        den += dx * dx;
    }
    if den > 0.0 { num / den } else { 0.0 }
}

// Only meetings hosted by the named home side count.
fn head_to_head_counts(home_team: &str, meetings: &[HeadToHeadMatch]) -> (u32, u32, u32) {
    let mut home_wins = 0;
    let mut away_wins = 0;
    let mut draws = 0;
    for m in meetings {
        if m.home_team.as_deref() != Some(home_team) {
            continue;
        }
        if m.home_score > m.away_score {
            home_wins += 1;
        } else if m.home_score < m.away_score {
            away_wins += 1;
        } else {
            draws += 1;
        }
    }
    (home_wins, away_wins, draws)
}
