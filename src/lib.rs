// lib.rs - listing features in, nightly price out
pub mod api;
pub mod artifacts;
pub mod common;
pub mod features;
pub mod inference;

pub use api::ffi::{rp_api_version, rp_free_str, rp_init, rp_predict, rp_schema};
pub use common::{PriceCode, PriceError, PriceResult};
pub use features::{Feature, FeatureVector, Listing, PlaceholderPolicy};
pub use inference::{PipelineCell, PreFittedPipeline, Prediction};
