//! Assembly of validated feature vectors from form input.

use crate::common::error::{PriceError, PriceResult};

use super::domain::{Feature, FeatureVector, Listing};

/// Validate a listing against the form bounds and produce its feature vector.
pub fn assemble(listing: &Listing) -> PriceResult<FeatureVector> {
    for feature in Feature::ALL {
        check_value(feature, listing.get(feature))?;
    }
    Ok(listing.to_vector())
}

fn check_value(feature: Feature, value: f64) -> PriceResult<()> {
    let spec = feature.spec();
    if !value.is_finite() {
        return Err(PriceError::invalid(format!(
            "{} must be a finite number",
            feature.key()
        )));
    }
    if !spec.contains(value) {
        return Err(PriceError::invalid(format!(
            "{} must be between {} and {}, got {}",
            feature.key(),
            spec.min,
            spec.max,
            value
        )));
    }
    if spec.integral && value.fract() != 0.0 {
        return Err(PriceError::invalid(format!(
            "{} must be a whole number, got {}",
            feature.key(),
            value
        )));
    }
    Ok(())
}

/// Parse a JSON object of `key: number` pairs on top of the form defaults.
pub fn listing_from_json(input: &str) -> PriceResult<Listing> {
    serde_json::from_str(input).map_err(|err| PriceError::invalid(err.to_string()))
}

/// Apply a single `key=value` assignment to a listing.
pub fn apply_assignment(listing: &mut Listing, assignment: &str) -> PriceResult<()> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| PriceError::invalid(format!("expected key=value, got {assignment:?}")))?;
    let key = key.trim();
    let feature =
        Feature::from_key(key).ok_or_else(|| PriceError::invalid(format!("unknown field {key:?}")))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PriceError::invalid(format!("{key} is not a number: {:?}", raw.trim())))?;
    listing.set(feature, value);
    Ok(())
}
