//! Caller-facing surfaces: the C ABI and form presentation helpers.

pub mod ffi;
pub mod form;
