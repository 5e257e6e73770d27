// Valuation pipeline: league weighting, feature normalization, the predictor
// adapter, and the service that ties them to user queries.

pub mod features;
pub mod league;
pub mod predictor;
pub mod service;

use std::fmt;

use thiserror::Error;

/// Errors local to a single valuation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("unknown league: {0}")]
    UnknownLeague(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("invalid league table: {0}")]
    InvalidLeagueTable(String),
}

/// Predicted market value in EUR.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ValueEstimate(pub f64);

impl ValueEstimate {
    pub fn eur(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ValueEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_eur(self.0))
    }
}

/// Format an amount as whole euros with thousands separators, e.g.
/// `€12,345,678` or `-€6,000,000`.
pub fn format_eur(amount: f64) -> String {
    if !amount.is_finite() {
        return "€-".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-€{grouped}")
    } else {
        format!("€{grouped}")
    }
}
