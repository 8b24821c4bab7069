//! Listing schema: the ordered feature set shared by the form and the pipeline.

pub mod domain;
pub mod service;

pub use domain::{Feature, FeatureVector, FieldSpec, Listing, PlaceholderPolicy};
