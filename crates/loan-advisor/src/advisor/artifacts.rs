//! Frozen model artifacts: the fitted feature scaler and the binary classifier.
//!
//! Both are loaded once at startup from JSON documents and never mutated afterwards. The
//! traits are the seam the inference context is generic over, so tests can substitute
//! hand-built models.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Previously fitted transform normalizing raw features.
pub trait FeatureScaler: Send + Sync {
    fn input_dim(&self) -> usize;

    /// Scale `features`; callers guarantee `features.len() == self.input_dim()`.
    fn transform(&self, features: &[f64]) -> Vec<f64>;
}

/// Previously trained decision function mapping scaled features to a class label.
pub trait BinaryClassifier: Send + Sync {
    fn input_dim(&self) -> usize;

    fn predict_label(&self, scaled: &[f64]) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Scaler,
    Classifier,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("scaler"),
            ArtifactKind::Classifier => f.write_str("classifier"),
        }
    }
}

/// Errors raised while loading or checking model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("{kind} artifact could not be read from {origin}: {source}")]
    Missing {
        kind: ArtifactKind,
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} artifact at {origin} is malformed: {source}")]
    Malformed {
        kind: ArtifactKind,
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} artifact is invalid: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },
    #[error("scaler expects {scaler} features but classifier expects {classifier}")]
    DimensionMismatch { scaler: usize, classifier: usize },
    #[error("model artifacts expect {found} features but the encoder produces {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("scaler was fitted on features {found:?} but the encoder produces {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

fn read_json<T>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError>
where
    T: for<'de> Deserialize<'de>,
{
    let origin = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Missing {
        kind,
        origin: origin.clone(),
        source,
    })?;
    parse_json(kind, &origin, &raw)
}

fn parse_json<T>(kind: ArtifactKind, origin: &str, raw: &str) -> Result<T, ArtifactError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(raw).map_err(|source| ArtifactError::Malformed {
        kind,
        origin: origin.to_string(),
        source,
    })
}

/// Z-score scaler: `(x - mean) / scale` per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let scaler = Self {
            mean,
            scale,
            feature_names: None,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let scaler: Self = read_json(ArtifactKind::Scaler, path.as_ref())?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        let scaler: Self = parse_json(ArtifactKind::Scaler, "inline", raw)?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            kind: ArtifactKind::Scaler,
            reason,
        };

        if self.mean.is_empty() {
            return Err(invalid("mean is empty".to_string()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(invalid(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(invalid(format!(
                    "feature_names has {} entries but mean has {}",
                    names.len(),
                    self.mean.len()
                )));
            }
        }
        if let Some(index) = self.mean.iter().position(|value| !value.is_finite()) {
            return Err(invalid(format!("mean[{index}] is not finite")));
        }
        if let Some(index) = self
            .scale
            .iter()
            .position(|value| !value.is_finite() || *value == 0.0)
        {
            return Err(invalid(format!("scale[{index}] must be finite and non-zero")));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn input_dim(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }
}

/// Linear decision function; class 1 when `coefficients . x + intercept > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        let classifier = Self {
            coefficients,
            intercept,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let classifier: Self = read_json(ArtifactKind::Classifier, path.as_ref())?;
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        let classifier: Self = parse_json(ArtifactKind::Classifier, "inline", raw)?;
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn decision_function(&self, scaled: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            kind: ArtifactKind::Classifier,
            reason,
        };

        if self.coefficients.is_empty() {
            return Err(invalid("coefficients are empty".to_string()));
        }
        if let Some(index) = self.coefficients.iter().position(|value| !value.is_finite()) {
            return Err(invalid(format!("coefficients[{index}] is not finite")));
        }
        if !self.intercept.is_finite() {
            return Err(invalid("intercept is not finite".to_string()));
        }
        Ok(())
    }
}

impl BinaryClassifier for LinearClassifier {
    fn input_dim(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_label(&self, scaled: &[f64]) -> i64 {
        if self.decision_function(scaled) > 0.0 {
            1
        } else {
            0
        }
    }
}
