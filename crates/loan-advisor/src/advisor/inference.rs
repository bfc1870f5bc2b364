use std::sync::Arc;

use tracing::{debug, info};

use super::artifacts::{
    ArtifactError, BinaryClassifier, FeatureScaler, LinearClassifier, StandardScaler,
};
use super::cache::PredictionCache;
use super::domain::{FeatureVector, Verdict, FEATURE_COUNT, FEATURE_NAMES};
use crate::config::ModelConfig;

/// Raised when a feature vector does not fit the loaded model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("feature vector has {found} elements but the scaler expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Immutable scaler and classifier pair shared by every request handler.
pub struct InferenceContext<S, C> {
    scaler: Arc<S>,
    classifier: Arc<C>,
    cache: Option<PredictionCache>,
}

impl InferenceContext<StandardScaler, LinearClassifier> {
    /// Load both artifacts from disk. Any failure here must stop startup.
    pub fn load(config: &ModelConfig) -> Result<Self, ArtifactError> {
        let scaler = StandardScaler::from_path(&config.scaler_path)?;
        let classifier = LinearClassifier::from_path(&config.classifier_path)?;

        if scaler.input_dim() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                expected: FEATURE_COUNT,
                found: scaler.input_dim(),
            });
        }
        if let Some(names) = &scaler.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(ArtifactError::FeatureOrder {
                    expected: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
                    found: names.clone(),
                });
            }
        }

        let context = Self::new(scaler, classifier)?.with_cache(config.cache_capacity);
        info!(
            scaler = %config.scaler_path.display(),
            classifier = %config.classifier_path.display(),
            cache_capacity = config.cache_capacity,
            "model artifacts loaded"
        );
        Ok(context)
    }
}

impl<S, C> InferenceContext<S, C>
where
    S: FeatureScaler + 'static,
    C: BinaryClassifier + 'static,
{
    pub fn new(scaler: S, classifier: C) -> Result<Self, ArtifactError> {
        Self::from_shared(Arc::new(scaler), Arc::new(classifier))
    }

    pub fn from_shared(scaler: Arc<S>, classifier: Arc<C>) -> Result<Self, ArtifactError> {
        if scaler.input_dim() != classifier.input_dim() {
            return Err(ArtifactError::DimensionMismatch {
                scaler: scaler.input_dim(),
                classifier: classifier.input_dim(),
            });
        }

        Ok(Self {
            scaler,
            classifier,
            cache: None,
        })
    }

    /// Memoize verdicts in a bounded cache; a capacity of 0 disables it.
    pub fn with_cache(mut self, capacity: u64) -> Self {
        self.cache = (capacity > 0).then(|| PredictionCache::new(capacity));
        self
    }

    pub fn cache(&self) -> Option<&PredictionCache> {
        self.cache.as_ref()
    }

    pub fn input_dim(&self) -> usize {
        self.scaler.input_dim()
    }

    /// Scale the features and run the classifier.
    pub fn predict(&self, features: &FeatureVector) -> Result<Verdict, InferenceError> {
        let expected = self.scaler.input_dim();
        if features.len() != expected {
            return Err(InferenceError::DimensionMismatch {
                expected,
                found: features.len(),
            });
        }

        if let Some(verdict) = self.cache.as_ref().and_then(|cache| cache.get(features)) {
            debug!(%verdict, "prediction served from cache");
            return Ok(verdict);
        }

        let scaled = self.scaler.transform(features.as_slice());
        let verdict = Verdict::from_class_label(self.classifier.predict_label(&scaled));

        if let Some(cache) = &self.cache {
            cache.insert(features, verdict);
        }

        Ok(verdict)
    }
}
