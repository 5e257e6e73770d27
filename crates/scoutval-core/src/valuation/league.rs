// League strength table: league identifier -> multiplier applied to counting
// stats before prediction.

use crate::valuation::ValuationError;

/// Standard league table, strongest first. Multipliers track each league's
/// coefficient relative to the Premier League.
const STANDARD_LEAGUES: &[(&str, f64)] = &[
    ("Premier League (England)", 1.00),
    ("Serie A (Italy)", 0.89),
    ("La Liga (Spain)", 0.83),
    ("Bundesliga (Germany)", 0.80),
    ("Ligue 1 (France)", 0.73),
    ("Eredivisie (Netherlands)", 0.63),
    ("Liga Nos (Portugal)", 0.61),
    ("Jupiler Pro (Belgium)", 0.56),
    ("Super Lig (Turkey)", 0.46),
    ("Super League (Greece)", 0.42),
    ("Superliga (Denmark)", 0.38),
    ("SPFL (Scotland)", 0.29),
    ("Ukrainian Premier League (Ukraine)", 0.23),
    ("Russian Premier League (Russia)", 0.18),
    ("MLS/Other", 0.15),
];

/// One supported league and its strength multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueEntry {
    pub id: String,
    pub multiplier: f64,
}

/// Ordered mapping from league identifier to strength multiplier.
///
/// Every identifier appears exactly once and every multiplier lies in
/// `[0, 1]`. Lookups of unknown identifiers fail rather than falling back to
/// a default.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueTable {
    entries: Vec<LeagueEntry>,
}

impl LeagueTable {
    /// The fixed table shipped with the estimator.
    pub fn standard() -> Self {
        LeagueTable {
            entries: STANDARD_LEAGUES
                .iter()
                .map(|&(id, multiplier)| LeagueEntry {
                    id: id.to_string(),
                    multiplier,
                })
                .collect(),
        }
    }

    /// Build a table from explicit entries, preserving their order.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ValuationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = LeagueTable {
            entries: Vec::new(),
        };
        for (id, multiplier) in entries {
            let id = id.into();
            if !(0.0..=1.0).contains(&multiplier) {
                return Err(ValuationError::InvalidLeagueTable(format!(
                    "multiplier for '{id}' must be in [0, 1], got {multiplier}"
                )));
            }
            if table.entries.iter().any(|e| e.id == id) {
                return Err(ValuationError::InvalidLeagueTable(format!(
                    "duplicate league '{id}'"
                )));
            }
            table.entries.push(LeagueEntry { id, multiplier });
        }
        Ok(table)
    }

    /// Multiplier for `league`, or `UnknownLeague`.
    pub fn multiplier(&self, league: &str) -> Result<f64, ValuationError> {
        self.entries
            .iter()
            .find(|e| e.id == league)
            .map(|e| e.multiplier)
            .ok_or_else(|| ValuationError::UnknownLeague(league.to_string()))
    }

    pub fn entries(&self) -> &[LeagueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LeagueTable {
    fn default() -> Self {
        Self::standard()
    }
}
