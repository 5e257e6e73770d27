// Valuation service: single what-if valuations and batch scouting
// comparisons (real market value vs. model prediction).

use std::sync::Arc;

use tracing::{info, warn};

use crate::db::{DataAccessError, PlayerDatabase, PlayerRecord};
use crate::valuation::features::{normalize, FeatureVector, Normalized, RawStats};
use crate::valuation::league::LeagueTable;
use crate::valuation::predictor::Predictor;
use crate::valuation::{format_eur, ValuationError, ValueEstimate};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Estimates strictly above this are superstars.
pub const SUPERSTAR_THRESHOLD: f64 = 50_000_000.0;
/// Estimates strictly above this (and not superstars) are solid professionals.
pub const SOLID_PROFESSIONAL_THRESHOLD: f64 = 10_000_000.0;
/// Estimates strictly below this are youth/lower-league talents.
pub const LOWER_LEAGUE_THRESHOLD: f64 = 1_000_000.0;
/// A value difference strictly below this raises a moneyball alert.
pub const MONEYBALL_THRESHOLD: f64 = -5_000_000.0;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Display band for a single valuation. The band between
/// `LOWER_LEAGUE_THRESHOLD` and `SOLID_PROFESSIONAL_THRESHOLD` (inclusive)
/// has no tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Superstar,
    SolidProfessional,
    YouthOrLowerLeague,
}

impl Tier {
    pub fn classify(estimate: f64) -> Option<Tier> {
        if estimate > SUPERSTAR_THRESHOLD {
            Some(Tier::Superstar)
        } else if estimate > SOLID_PROFESSIONAL_THRESHOLD {
            Some(Tier::SolidProfessional)
        } else if estimate < LOWER_LEAGUE_THRESHOLD {
            Some(Tier::YouthOrLowerLeague)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Superstar => "superstar",
            Tier::SolidProfessional => "solid professional",
            Tier::YouthOrLowerLeague => "youth/lower-league",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Superstar => "This player is a superstar!",
            Tier::SolidProfessional => "This player is a solid professional.",
            Tier::YouthOrLowerLeague => "This player might be a youth or lower-league talent.",
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of a what-if valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValuation {
    pub features: FeatureVector,
    /// League multiplier applied to goals and assists.
    pub multiplier: f64,
    pub estimate: ValueEstimate,
    pub tier: Option<Tier>,
}

impl SingleValuation {
    pub fn weighted_goals(&self) -> f64 {
        self.features.goals_weighted
    }

    pub fn weighted_assists(&self) -> f64 {
        self.features.assists_weighted
    }
}

/// A reference player alongside the model's opinion of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub record: PlayerRecord,
    /// Unset when the model is unavailable.
    pub predicted_value: Option<f64>,
    /// `market_value_in_eur - predicted_value`. Unset when either side is.
    pub value_difference: Option<f64>,
}

impl ComparisonRow {
    /// Features built from the stored, already league-weighted columns.
    /// NULL columns become zero.
    pub fn features(record: &PlayerRecord) -> FeatureVector {
        FeatureVector {
            age: record.age.unwrap_or(0.0),
            goals_weighted: record.goals_weighted.unwrap_or(0.0),
            assists_weighted: record.assists_weighted.unwrap_or(0.0),
            minutes_played: record.minutes_played.unwrap_or(0.0),
        }
    }
}

/// The most undervalued player in a comparison, when past the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyballAlert {
    pub name: String,
    /// Absolute size of the (negative) value difference.
    pub undervalued_by: f64,
}

impl MoneyballAlert {
    pub fn message(&self) -> String {
        format!(
            "MONEYBALL ALERT: {} is undervalued by {}!",
            self.name,
            format_eur(self.undervalued_by)
        )
    }
}

/// How a scouting comparison turned out.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoutStatus {
    /// Rows carry predictions and differences.
    Valued,
    /// No record matched the filter. Not an error.
    NoPlayersFound,
    /// Records matched but could not be valued.
    ModelUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutReport {
    pub rows: Vec<ComparisonRow>,
    pub status: ScoutStatus,
    pub alert: Option<MoneyballAlert>,
}

/// Find the row with the lowest value difference (first one on ties, rows
/// without a difference skipped) and alert if it is below
/// `MONEYBALL_THRESHOLD`.
pub fn find_moneyball(rows: &[ComparisonRow]) -> Option<MoneyballAlert> {
    let mut best: Option<(&ComparisonRow, f64)> = None;
    for row in rows {
        let Some(diff) = row.value_difference.filter(|d| !d.is_nan()) else {
            continue;
        };
        match best {
            Some((_, min)) if diff >= min => {}
            _ => best = Some((row, diff)),
        }
    }

    let (row, diff) = best?;
    (diff < MONEYBALL_THRESHOLD).then(|| MoneyballAlert {
        name: row.record.name.clone(),
        undervalued_by: diff.abs(),
    })
}

// ---------------------------------------------------------------------------
// ValuationService
// ---------------------------------------------------------------------------

/// Orchestrates normalization and prediction for user queries.
///
/// The predictor is shared read-only; a failed request never changes it.
pub struct ValuationService {
    leagues: LeagueTable,
    predictor: Arc<Predictor>,
}

impl ValuationService {
    pub fn new(leagues: LeagueTable, predictor: Arc<Predictor>) -> Self {
        ValuationService { leagues, predictor }
    }

    pub fn leagues(&self) -> &LeagueTable {
        &self.leagues
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    /// Weight raw stats without predicting (for live breakdowns).
    pub fn normalize(&self, raw: &RawStats) -> Result<Normalized, ValuationError> {
        normalize(raw, &self.leagues)
    }

    /// Value one hypothetical player.
    pub fn evaluate_single(&self, raw: &RawStats) -> Result<SingleValuation, ValuationError> {
        let normalized = self.normalize(raw)?;
        let estimate = self.predictor.predict_one(&normalized.features).inspect_err(|e| {
            warn!("single valuation failed: {}", e);
        })?;
        let tier = Tier::classify(estimate.eur());

        info!(
            league = %raw.league,
            estimate = estimate.eur(),
            tier = tier.map(Tier::label).unwrap_or("none"),
            "single valuation"
        );

        Ok(SingleValuation {
            features: normalized.features,
            multiplier: normalized.multiplier,
            estimate,
            tier,
        })
    }

    /// Compare real and predicted values for every record whose name
    /// contains `name_filter`, keeping at most `limit` rows in input order.
    ///
    /// Case folding is ASCII-only, matching SQLite `LIKE`, so a name the
    /// database search returns is never dropped here.
    ///
    /// Stored weighted columns are used as-is; they are not renormalized.
    pub fn evaluate_batch(
        &self,
        name_filter: &str,
        records: &[PlayerRecord],
        limit: usize,
    ) -> ScoutReport {
        let needle = name_filter.to_ascii_lowercase();
        let matched: Vec<&PlayerRecord> = records
            .iter()
            .filter(|r| r.name.to_ascii_lowercase().contains(&needle))
            .take(limit)
            .collect();

        if matched.is_empty() {
            return ScoutReport {
                rows: Vec::new(),
                status: ScoutStatus::NoPlayersFound,
                alert: None,
            };
        }

        let features: Vec<FeatureVector> =
            matched.iter().map(|r| ComparisonRow::features(r)).collect();

        match self.predictor.predict_batch(&features) {
            Ok(predictions) => {
                let rows: Vec<ComparisonRow> = matched
                    .into_iter()
                    .zip(predictions)
                    .map(|(record, predicted)| ComparisonRow {
                        value_difference: record
                            .market_value_in_eur
                            .map(|real| real - predicted.eur()),
                        predicted_value: Some(predicted.eur()),
                        record: record.clone(),
                    })
                    .collect();
                let alert = find_moneyball(&rows);
                info!(
                    filter = name_filter,
                    rows = rows.len(),
                    alert = alert.is_some(),
                    "scouting comparison"
                );
                ScoutReport {
                    rows,
                    status: ScoutStatus::Valued,
                    alert,
                }
            }
            Err(e) => {
                warn!("scouting comparison without predictions: {}", e);
                let reason = match e {
                    ValuationError::ModelUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                ScoutReport {
                    rows: matched
                        .into_iter()
                        .map(|record| ComparisonRow {
                            record: record.clone(),
                            predicted_value: None,
                            value_difference: None,
                        })
                        .collect(),
                    status: ScoutStatus::ModelUnavailable(reason),
                    alert: None,
                }
            }
        }
    }

    /// Plain database comparison: matching players, no valuation.
    pub fn browse(
        &self,
        db: &PlayerDatabase,
        name_filter: &str,
        limit: usize,
    ) -> Result<Vec<PlayerRecord>, DataAccessError> {
        let players = db.search_players(name_filter, limit)?;
        info!(filter = name_filter, rows = players.len(), "database comparison");
        Ok(players)
    }

    /// Query the database and run a scouting comparison over the matches.
    pub fn scout(
        &self,
        db: &PlayerDatabase,
        name_filter: &str,
        limit: usize,
    ) -> Result<ScoutReport, DataAccessError> {
        let records = db.search_players(name_filter, limit)?;
        Ok(self.evaluate_batch(name_filter, &records, limit))
    }
}
