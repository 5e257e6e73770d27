// Library root: configuration, reference-database access, and the valuation
// pipeline (league table, feature normalizer, predictor adapter, service).

pub mod config;
pub mod db;
pub mod valuation;
