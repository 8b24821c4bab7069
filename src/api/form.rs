//! Presentation helpers for the listing form: sections, price and error text.

use std::fmt::Write;

use crate::common::error::PriceError;
use crate::features::domain::{Feature, Listing};

/// Form sections, in display order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Section {
    Host,
    Location,
    Property,
    Pricing,
    Availability,
    Reviews,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Host,
        Section::Location,
        Section::Property,
        Section::Pricing,
        Section::Availability,
        Section::Reviews,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Host => "Host",
            Section::Location => "Location",
            Section::Property => "Property",
            Section::Pricing => "Pricing",
            Section::Availability => "Availability and stay length",
            Section::Reviews => "Reviews",
        }
    }

    pub fn of(feature: Feature) -> Section {
        use Feature::*;
        match feature {
            HostResponseRate | HostTotalListingsCount => Section::Host,
            Latitude | Longitude => Section::Location,
            Bathrooms | Bedrooms | Beds => Section::Property,
            SecurityDeposit | CleaningFee | GuestsIncluded | ExtraPeople => Section::Pricing,
            MinimumNights | MaximumNights | Availability30 | Availability90 => {
                Section::Availability
            }
            NumberOfReviews
            | ReviewScoresRating
            | ReviewScoresAccuracy
            | ReviewScoresCleanliness
            | ReviewScoresCheckin
            | ReviewScoresCommunication
            | ReviewScoresLocation
            | ReviewScoresValue
            | ReviewsPerMonth => Section::Reviews,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(move |f| Section::of(*f) == *self)
    }
}

/// Nightly price with two decimals, e.g. `87.50€`.
pub fn render_price(price: f64) -> String {
    format!("{price:.2}€")
}

/// Message shown to the person filling the form.
pub fn render_error(err: &PriceError) -> String {
    match err {
        PriceError::ArtifactLoad { .. } | PriceError::NotReady => format!(
            "Price estimates are unavailable: the model files could not be loaded ({err})."
        ),
        PriceError::Config(msg) => format!("Price estimates are unavailable: {msg}."),
        PriceError::InvalidInput(msg) => format!("Please check the form: {msg}."),
        PriceError::SchemaMismatch { .. } => {
            format!("The model does not accept this listing layout ({err}).")
        }
        PriceError::NumericAnomaly { .. } => {
            "The model could not produce a price for this listing.".to_string()
        }
    }
}

/// Schema grouped by section with bounds and defaults.
pub fn render_schema() -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let _ = writeln!(out, "[{}]", section.title());
        for feature in section.fields() {
            let spec = feature.spec();
            let _ = writeln!(
                out,
                "  {:<28} {:<30} {:>8} .. {:<8} default {}{}",
                feature.key(),
                feature.column(),
                spec.min,
                spec.max,
                spec.default,
                if spec.integral { "" } else { " (decimal)" }
            );
        }
    }
    out
}

/// Submitted values, printed after a failed prediction to help debugging.
pub fn render_inputs(listing: &Listing) -> String {
    let mut out = String::new();
    for feature in Feature::ALL {
        let _ = writeln!(out, "{:<28} {}", feature.column(), listing.get(feature));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Stage;

    #[test]
    fn every_feature_has_exactly_one_section() {
        let total: usize = Section::ALL.iter().map(|s| s.fields().count()).sum();
        assert_eq!(total, Feature::COUNT);
        assert_eq!(Section::of(Feature::Beds), Section::Property);
        assert_eq!(Section::of(Feature::ReviewsPerMonth), Section::Reviews);
    }

    #[test]
    fn price_has_two_decimals_and_currency() {
        assert_eq!(render_price(87.5), "87.50€");
        assert_eq!(render_price(120.456), "120.46€");
    }

    #[test]
    fn errors_read_as_user_messages() {
        let text = render_error(&PriceError::SchemaMismatch {
            stage: Stage::Scale,
            expected: 24,
            got: 25,
        });
        assert!(text.contains("expects 24 features, got 25"));

        let text = render_error(&PriceError::NumericAnomaly { value: f64::NAN });
        assert!(!text.contains("NaN"));

        let text = render_error(&PriceError::NotReady);
        assert!(text.starts_with("Price estimates are unavailable"));
    }

    #[test]
    fn schema_lists_every_key() {
        let schema = render_schema();
        for feature in Feature::ALL {
            assert!(schema.contains(feature.key()));
        }
        assert!(schema.starts_with("[Host]"));
    }

    #[test]
    fn inputs_dump_uses_column_names() {
        let dump = render_inputs(&Listing::default());
        assert!(dump.contains("Host Response Rate"));
        assert_eq!(dump.lines().count(), Feature::COUNT);
    }
}
