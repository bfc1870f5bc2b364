use moka::sync::Cache;

use super::domain::{FeatureVector, Verdict, FEATURE_COUNT};

/// Hashable identity of a feature vector (bit patterns of each element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FeatureKey([u64; FEATURE_COUNT]);

impl From<&FeatureVector> for FeatureKey {
    fn from(features: &FeatureVector) -> Self {
        let mut bits = [0u64; FEATURE_COUNT];
        for (slot, value) in bits.iter_mut().zip(features.as_slice()) {
            *slot = value.to_bits();
        }
        Self(bits)
    }
}

/// Bounded, thread-safe memo of verdicts keyed by feature vector.
#[derive(Clone)]
pub struct PredictionCache {
    cache: Cache<FeatureKey, Verdict>,
}

impl PredictionCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn get(&self, features: &FeatureVector) -> Option<Verdict> {
        self.cache.get(&FeatureKey::from(features))
    }

    pub fn insert(&self, features: &FeatureVector, verdict: Verdict) {
        self.cache.insert(FeatureKey::from(features), verdict);
    }

    /// Approximate entry count; moka applies pending writes lazily.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PredictionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
