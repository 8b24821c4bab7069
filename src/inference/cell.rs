//! Process-wide memoized pipeline.
//!
//! The pipeline is loaded at most once and never invalidated. A failed load
//! stores nothing, so callers keep seeing `None` (or retry) instead of a
//! half-initialised pipeline.

use std::sync::{Arc, Mutex, OnceLock};

use crate::common::error::PriceResult;

use super::domain::PreFittedPipeline;

pub struct PipelineCell {
    slot: OnceLock<Arc<PreFittedPipeline>>,
    init: Mutex<()>,
}

impl PipelineCell {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The loaded pipeline, if a load has succeeded.
    pub fn get(&self) -> Option<Arc<PreFittedPipeline>> {
        self.slot.get().cloned()
    }

    /// Return the memoized pipeline, running `loader` only while none is stored.
    ///
    /// Concurrent first callers serialize on the init lock so the artifacts are
    /// deserialized once.
    pub fn get_or_load<F>(&self, loader: F) -> PriceResult<Arc<PreFittedPipeline>>
    where
        F: FnOnce() -> PriceResult<PreFittedPipeline>,
    {
        if let Some(ready) = self.get() {
            return Ok(ready);
        }

        let _guard = self.init.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(ready) = self.get() {
            return Ok(ready);
        }

        let pipeline = Arc::new(loader()?);
        Ok(Arc::clone(self.slot.get_or_init(|| pipeline)))
    }
}

impl Default for PipelineCell {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: PipelineCell = PipelineCell::new();

/// Cell backing the C ABI.
pub fn global() -> &'static PipelineCell {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::common::error::PriceError;
    use crate::inference::domain::Manifest;
    use crate::artifacts::domain::{LinearRegressor, Pca, Regressor, StandardScaler};
    use crate::features::domain::PlaceholderPolicy;

    fn tiny() -> PreFittedPipeline {
        PreFittedPipeline {
            scaler: StandardScaler::new(vec![0.0], vec![1.0], None).unwrap(),
            projector: Pca::new(vec![0.0], vec![vec![1.0]], None, false).unwrap(),
            regressor: Regressor::Linear(LinearRegressor::new(vec![1.0], 0.0).unwrap()),
            manifest: Manifest {
                entries: Vec::new(),
                input_dim: 1,
                reduced_dim: 1,
                regressor: "linear",
                placeholder: PlaceholderPolicy::Strip,
            },
        }
    }

    #[test]
    fn failed_load_leaves_the_cell_empty() {
        let cell = PipelineCell::new();
        let err = cell
            .get_or_load(|| Err(PriceError::shape("scaler", "broken")))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(cell.get().is_none());

        let ready = cell.get_or_load(|| Ok(tiny())).unwrap();
        assert_eq!(ready.manifest().input_dim, 1);
        assert!(cell.get().is_some());
    }

    #[test]
    fn loader_runs_once() {
        let cell = Arc::new(PipelineCell::new());
        let calls = Arc::new(AtomicUsize::new(0));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cell = Arc::clone(&cell);
                let calls = Arc::clone(&calls);
                scope.spawn(move || {
                    cell.get_or_load(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(tiny())
                    })
                    .unwrap();
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let first = cell.get().unwrap();
        let again = cell.get_or_load(|| Ok(tiny())).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
}
