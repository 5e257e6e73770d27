// Predictor adapter: wraps a trained regression model behind a small
// predict-one / predict-batch interface.
//
// The model is read once from a JSON artifact. A missing or unreadable
// artifact leaves the adapter `Disabled` (valuation off, everything else
// keeps working); an artifact trained on a different feature layout is a
// fatal configuration error.

use std::path::Path;

use anyhow::bail;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::valuation::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::valuation::{ValuationError, ValueEstimate};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("corrupt model artifact {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("model was trained on features {found:?}, expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl PredictorError {
    /// Whether this error must abort startup instead of disabling valuation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PredictorError::FeatureMismatch { .. })
    }
}

// ---------------------------------------------------------------------------
// Regressor trait
// ---------------------------------------------------------------------------

/// A trained regression function over rows in `FEATURE_NAMES` order.
///
/// Implementations must be free of side effects so one instance can be
/// shared by every caller for the life of the process.
pub trait Regressor: Send + Sync {
    /// Short human-readable description, e.g. `"linear"`.
    fn describe(&self) -> String;

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64>;

    /// Predict many rows; output order matches input order.
    fn predict_rows(&self, rows: &[[f64; FEATURE_COUNT]]) -> anyhow::Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

// ---------------------------------------------------------------------------
// Artifact format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    feature_names: Vec<String>,
    model: ModelSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelSpec {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

/// `intercept + sum(coefficients[i] * x[i])`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Regressor for LinearModel {
    fn describe(&self) -> String {
        "linear".to_string()
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64> {
        if self.coefficients.len() != FEATURE_COUNT {
            bail!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                FEATURE_COUNT
            );
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

/// How per-tree outputs combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (random forest).
    #[default]
    Mean,
    /// `base_score` plus the sum of tree outputs (gradient boosting).
    Sum,
}

/// Ensemble of binary regression trees.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node. Splits send a row left when `x[feature] <= threshold`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    /// Structural checks: non-empty, feature indices in range, children
    /// strictly after their parent (which rules out cycles).
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                threshold,
            } = *node
            {
                if feature >= FEATURE_COUNT {
                    return Err(format!("node {i} splits on feature {feature}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i} has non-finite threshold"));
                }
                for child in [left, right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {i} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Bounded by the node count so a tree
    /// built by hand without `validate` cannot loop forever.
    fn evaluate(&self, row: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(x) = row.get(*feature) else {
                        bail!("node {idx} splits on feature {feature}");
                    };
                    idx = if *x <= *threshold { *left } else { *right };
                }
                None => bail!("node index {idx} out of range"),
            }
        }
        bail!("tree walk did not reach a leaf")
    }
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("ensemble has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn describe(&self) -> String {
        let agg = match self.aggregation {
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
        };
        format!("tree ensemble ({} trees, {agg})", self.trees.len())
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64> {
        if self.trees.is_empty() {
            bail!("ensemble has no trees");
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(row)?;
        }
        Ok(match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        })
    }
}

/// Read and validate a model artifact.
pub fn load_artifact(path: &Path) -> Result<Box<dyn Regressor>, PredictorError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| PredictorError::Io {
        path: display.clone(),
        source: e,
    })?;
    parse_artifact(&text, &display)
}

fn parse_artifact(text: &str, path: &str) -> Result<Box<dyn Regressor>, PredictorError> {
    let artifact: ModelArtifact =
        serde_json::from_str(text).map_err(|e| PredictorError::Parse {
            path: path.to_string(),
            source: e,
        })?;

    if artifact.feature_names != FEATURE_NAMES {
        return Err(PredictorError::FeatureMismatch {
            expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            found: artifact.feature_names,
        });
    }

    let corrupt = |message: String| PredictorError::Corrupt {
        path: path.to_string(),
        message,
    };

    match artifact.model {
        ModelSpec::Linear(model) => {
            if model.coefficients.len() != FEATURE_COUNT {
                return Err(corrupt(format!(
                    "expected {FEATURE_COUNT} coefficients, found {}",
                    model.coefficients.len()
                )));
            }
            Ok(Box::new(model))
        }
        ModelSpec::TreeEnsemble(model) => {
            model.validate().map_err(corrupt)?;
            Ok(Box::new(model))
        }
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// The loaded model, or the reason valuation is unavailable.
pub enum Predictor {
    Active(Box<dyn Regressor>),
    Disabled { reason: String },
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predictor::Active(model) => f.debug_tuple("Active").field(&model.describe()).finish(),
            Predictor::Disabled { reason } => {
                f.debug_struct("Disabled").field("reason", reason).finish()
            }
        }
    }
}

impl Predictor {
    /// Load the predictor from `path`.
    ///
    /// Missing or corrupt artifacts yield `Disabled`. A feature-layout
    /// mismatch is returned as an error.
    pub fn from_artifact(path: &Path) -> Result<Self, PredictorError> {
        match load_artifact(path) {
            Ok(model) => {
                info!("Model loaded from {}: {}", path.display(), model.describe());
                Ok(Predictor::Active(model))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Valuation disabled: {}", e);
                Ok(Predictor::Disabled {
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn active(model: impl Regressor + 'static) -> Self {
        Predictor::Active(Box::new(model))
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Predictor::Disabled {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Predictor::Active(_))
    }

    /// One-line status for display.
    pub fn status(&self) -> String {
        match self {
            Predictor::Active(model) => format!("model: {}", model.describe()),
            Predictor::Disabled { reason } => format!("model unavailable: {reason}"),
        }
    }

    pub fn predict_one(&self, features: &FeatureVector) -> Result<ValueEstimate, ValuationError> {
        let model = self.model()?;
        model
            .predict_row(&features.to_row())
            .map(ValueEstimate)
            .map_err(|e| ValuationError::ModelUnavailable(format!("prediction failed: {e:#}")))
    }

    /// Predict every vector in order. NaN inputs are treated as zero.
    pub fn predict_batch(
        &self,
        features: &[FeatureVector],
    ) -> Result<Vec<ValueEstimate>, ValuationError> {
        let model = self.model()?;
        let rows: Vec<[f64; FEATURE_COUNT]> =
            features.iter().map(|fv| fv.zero_filled().to_row()).collect();
        let values = model
            .predict_rows(&rows)
            .map_err(|e| ValuationError::ModelUnavailable(format!("prediction failed: {e:#}")))?;
        if values.len() != rows.len() {
            return Err(ValuationError::ModelUnavailable(format!(
                "model returned {} predictions for {} rows",
                values.len(),
                rows.len()
            )));
        }
        Ok(values.into_iter().map(ValueEstimate).collect())
    }

    fn model(&self) -> Result<&dyn Regressor, ValuationError> {
        match self {
            Predictor::Active(model) => Ok(model.as_ref()),
            Predictor::Disabled { reason } => {
                Err(ValuationError::ModelUnavailable(reason.clone()))
            }
        }
    }
}
