//! Inference: the loaded pipeline, single and batch prediction, and the
//! process-wide memoized instance.

pub mod cell;
pub mod domain;
pub mod service;
pub mod workers;

pub use cell::PipelineCell;
pub use domain::{Manifest, PreFittedPipeline, Prediction};
pub use workers::Pool;
