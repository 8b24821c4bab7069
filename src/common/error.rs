//! Error handling primitives shared across the core.
//!
//! Load-time failures (`ArtifactLoad`, `Config`) block readiness; everything
//! else is scoped to a single request and leaves the pipeline untouched.

use std::fmt;
use std::io;

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PriceCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// An artifact was missing, corrupt or had an incompatible shape.
    ArtifactLoad = 1,
    /// Feature count did not match a fitted stage.
    SchemaMismatch = 2,
    /// The regressor produced NaN or an infinity.
    NumericAnomaly = 3,
    /// Input failed validation.
    InvalidInput = 4,
    /// No pipeline has been loaded yet.
    NotReady = 5,
    /// Configuration could not be parsed.
    Config = 6,
}

impl PriceCode {
    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// Pipeline stage reported by shape mismatches.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Scale,
    Project,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Scale => "scale",
            Stage::Project => "project",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an artifact could not be turned into a fitted stage.
#[derive(Debug, Error)]
pub enum LoadFault {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("incompatible shape: {0}")]
    Shape(String),
}

/// Canonical error type for the core.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("failed to load {artifact} artifact: {fault}")]
    ArtifactLoad {
        artifact: String,
        #[source]
        fault: LoadFault,
    },

    #[error("{stage} stage expects {expected} features, got {got}")]
    SchemaMismatch {
        stage: Stage,
        expected: usize,
        got: usize,
    },

    #[error("regressor produced a non-finite value ({value})")]
    NumericAnomaly { value: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("pipeline is not loaded")]
    NotReady,

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type PriceResult<T> = Result<T, PriceError>;

impl PriceError {
    /// Shape helper for artifacts whose internals do not line up.
    pub fn shape(artifact: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            fault: LoadFault::Shape(msg.into()),
        }
    }

    /// Wrap an I/O or decode failure for the named artifact.
    pub fn load(artifact: impl Into<String>, fault: impl Into<LoadFault>) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            fault: fault.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn code(&self) -> PriceCode {
        match self {
            PriceError::ArtifactLoad { .. } => PriceCode::ArtifactLoad,
            PriceError::SchemaMismatch { .. } => PriceCode::SchemaMismatch,
            PriceError::NumericAnomaly { .. } => PriceCode::NumericAnomaly,
            PriceError::InvalidInput(_) => PriceCode::InvalidInput,
            PriceError::NotReady => PriceCode::NotReady,
            PriceError::Config(_) => PriceCode::Config,
        }
    }

    /// Fatal errors keep the service from accepting prediction requests.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PriceError::ArtifactLoad { .. } | PriceError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(PriceCode::Ok as u32, 0);
        assert_eq!(PriceCode::ArtifactLoad as u32, 1);
        assert_eq!(PriceCode::SchemaMismatch as u32, 2);
        assert_eq!(PriceCode::NumericAnomaly as u32, 3);
        assert_eq!(PriceCode::InvalidInput as u32, 4);
        assert_eq!(PriceCode::NotReady as u32, 5);
        assert_eq!(PriceCode::Config as u32, 6);
    }

    #[test]
    fn load_errors_are_fatal_and_request_errors_are_not() {
        let missing = PriceError::load(
            "scaler",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(missing.is_fatal());
        assert_eq!(missing.code(), PriceCode::ArtifactLoad);

        let mismatch = PriceError::SchemaMismatch {
            stage: Stage::Scale,
            expected: 24,
            got: 23,
        };
        assert!(!mismatch.is_fatal());
        assert_eq!(
            mismatch.to_string(),
            "scale stage expects 24 features, got 23"
        );
    }

    #[test]
    fn artifact_message_names_the_artifact() {
        let err = PriceError::shape("projector", "components are not rectangular");
        assert_eq!(
            err.to_string(),
            "failed to load projector artifact: incompatible shape: components are not rectangular"
        );
    }
}
