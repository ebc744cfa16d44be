use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const DEFAULT_LEAGUE_STRENGTH: f64 = 0.5;

// Keys are matched exactly: no case folding, no aliasing.
static LEAGUE_STRENGTH: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Premier League", 0.9),
        ("La Liga", 0.85),
        ("Bundesliga", 0.8),
        ("Serie A", 0.75),
        ("Ligue 1", 0.7),
    ])
});

pub fn league_strength(league: &str) -> f64 {
    LEAGUE_STRENGTH
        .get(league)
        .copied()
        .unwrap_or(DEFAULT_LEAGUE_STRENGTH)
}

pub fn is_known_league(league: &str) -> bool {
    LEAGUE_STRENGTH.contains_key(league)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_leagues_resolve() {
        assert_eq!(league_strength("Premier League"), 0.9);
        assert_eq!(league_strength("Ligue 1"), 0.7);
    }

    #[test]
    fn lookup_is_exact_string() {
        assert!(!is_known_league("premier league"));
        assert_eq!(league_strength("premier league"), DEFAULT_LEAGUE_STRENGTH);
        assert_eq!(league_strength(" La Liga"), DEFAULT_LEAGUE_STRENGTH);
        assert_eq!(league_strength("Eredivisie"), DEFAULT_LEAGUE_STRENGTH);
    }
}
