//! Domain definitions for the loaded pipeline and its results.

use crate::artifacts::domain::{ArtifactKind, Pca, Regressor, StandardScaler};
use crate::features::domain::PlaceholderPolicy;

/// Result of a single prediction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Estimated nightly price, exactly as produced by the regressor.
    pub price: f64,
    pub latency_us: u64,
}

/// Where one artifact came from and which bytes were loaded.
#[derive(Clone, Debug)]
pub struct ManifestEntry {
    pub kind: ArtifactKind,
    pub location: String,
    pub fingerprint: String,
}

/// Description of a loaded pipeline, for logs and the `check` command.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    pub input_dim: usize,
    pub reduced_dim: usize,
    pub regressor: &'static str,
    pub placeholder: PlaceholderPolicy,
}

/// The immutable scaler → projector → regressor triple.
///
/// Built only by `inference::service::load`, which checks that the stages
/// chain together; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct PreFittedPipeline {
    pub(crate) scaler: StandardScaler,
    pub(crate) projector: Pca,
    pub(crate) regressor: Regressor,
    pub(crate) manifest: Manifest,
}

impl PreFittedPipeline {
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn placeholder(&self) -> PlaceholderPolicy {
        self.manifest.placeholder
    }
}
