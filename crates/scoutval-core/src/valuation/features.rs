// Feature normalization: raw player stats -> the feature vector the
// regression model was trained on.

use std::ops::RangeInclusive;

use crate::valuation::league::LeagueTable;
use crate::valuation::ValuationError;

// ---------------------------------------------------------------------------
// Input bounds
// ---------------------------------------------------------------------------

/// Documented input ranges for user-entered stats. The core does not
/// enforce them; input surfaces clamp to them.
pub const AGE_RANGE: RangeInclusive<u32> = 16..=40;
pub const GOALS_RANGE: RangeInclusive<u32> = 0..=60;
pub const ASSISTS_RANGE: RangeInclusive<u32> = 0..=40;
pub const MINUTES_RANGE: RangeInclusive<u32> = 0..=4000;

/// Feature names in model column order.
pub const FEATURE_NAMES: [&str; 4] = [
    "age",
    "goals_weighted",
    "assists_weighted",
    "minutes_played",
];

/// Number of model input features.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

// ---------------------------------------------------------------------------
// RawStats
// ---------------------------------------------------------------------------

/// Per-player stats as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStats {
    pub age: u32,
    pub goals: u32,
    pub assists: u32,
    pub minutes_played: u32,
    pub league: String,
}

impl Default for RawStats {
    fn default() -> Self {
        RawStats {
            age: 24,
            goals: 10,
            assists: 5,
            minutes_played: 2000,
            league: "Premier League (England)".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// Model-ready features. Field order matches `FEATURE_NAMES`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub age: f64,
    pub goals_weighted: f64,
    pub assists_weighted: f64,
    pub minutes_played: f64,
}

impl FeatureVector {
    /// Features as a row in `FEATURE_NAMES` order.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.goals_weighted,
            self.assists_weighted,
            self.minutes_played,
        ]
    }

    /// Copy with NaN or infinite values replaced by zero.
    pub fn zero_filled(&self) -> FeatureVector {
        let fill = |v: f64| if v.is_finite() { v } else { 0.0 };
        FeatureVector {
            age: fill(self.age),
            goals_weighted: fill(self.goals_weighted),
            assists_weighted: fill(self.assists_weighted),
            minutes_played: fill(self.minutes_played),
        }
    }
}

/// Result of normalizing one set of raw stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub features: FeatureVector,
    /// Multiplier that was applied to goals and assists.
    pub multiplier: f64,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Convert raw stats into a feature vector using `leagues` for the
/// strength multiplier. Age and minutes pass through unchanged.
pub fn normalize(raw: &RawStats, leagues: &LeagueTable) -> Result<Normalized, ValuationError> {
    let multiplier = leagues.multiplier(&raw.league)?;
    Ok(Normalized {
        features: FeatureVector {
            age: f64::from(raw.age),
            goals_weighted: f64::from(raw.goals) * multiplier,
            assists_weighted: f64::from(raw.assists) * multiplier,
            minutes_played: f64::from(raw.minutes_played),
        },
        multiplier,
    })
}
