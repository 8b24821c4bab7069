//! The closed listing schema and the typed records built on top of it.
//!
//! Column order is load-bearing: the fitted scaler and projector were fit
//! against exactly this order, so `Feature::ALL` is the single source of truth
//! for both request assembly and the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::PriceError;

/// Name of the trailing training-time column that carries no signal.
pub const PLACEHOLDER_COLUMN: &str = "Price";

/// One column of the feature schema. The discriminant is the column index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    HostResponseRate,
    HostTotalListingsCount,
    Latitude,
    Longitude,
    Bathrooms,
    Bedrooms,
    Beds,
    SecurityDeposit,
    CleaningFee,
    GuestsIncluded,
    ExtraPeople,
    MinimumNights,
    MaximumNights,
    Availability30,
    Availability90,
    NumberOfReviews,
    ReviewScoresRating,
    ReviewScoresAccuracy,
    ReviewScoresCleanliness,
    ReviewScoresCheckin,
    ReviewScoresCommunication,
    ReviewScoresLocation,
    ReviewScoresValue,
    ReviewsPerMonth,
}

/// Input bounds and default of a single field, as offered by the form.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Increment offered by the form widget.
    pub step: f64,
    pub integral: bool,
}

impl FieldSpec {
    const fn int(min: f64, max: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            step: 1.0,
            integral: true,
        }
    }

    const fn dec(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
            integral: false,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Feature {
    pub const COUNT: usize = 24;

    /// Every feature in schema order.
    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::HostResponseRate,
        Feature::HostTotalListingsCount,
        Feature::Latitude,
        Feature::Longitude,
        Feature::Bathrooms,
        Feature::Bedrooms,
        Feature::Beds,
        Feature::SecurityDeposit,
        Feature::CleaningFee,
        Feature::GuestsIncluded,
        Feature::ExtraPeople,
        Feature::MinimumNights,
        Feature::MaximumNights,
        Feature::Availability30,
        Feature::Availability90,
        Feature::NumberOfReviews,
        Feature::ReviewScoresRating,
        Feature::ReviewScoresAccuracy,
        Feature::ReviewScoresCleanliness,
        Feature::ReviewScoresCheckin,
        Feature::ReviewScoresCommunication,
        Feature::ReviewScoresLocation,
        Feature::ReviewScoresValue,
        Feature::ReviewsPerMonth,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name the artifacts were fitted with.
    pub fn column(self) -> &'static str {
        match self {
            Feature::HostResponseRate => "Host Response Rate",
            Feature::HostTotalListingsCount => "Host Total Listings Count",
            Feature::Latitude => "Latitude",
            Feature::Longitude => "Longitude",
            Feature::Bathrooms => "Bathrooms",
            Feature::Bedrooms => "Bedrooms",
            Feature::Beds => "Beds",
            Feature::SecurityDeposit => "Security Deposit",
            Feature::CleaningFee => "Cleaning Fee",
            Feature::GuestsIncluded => "Guests Included",
            Feature::ExtraPeople => "Extra People",
            Feature::MinimumNights => "Minimum Nights",
            Feature::MaximumNights => "Maximum Nights",
            Feature::Availability30 => "Availability 30",
            Feature::Availability90 => "Availability 90",
            Feature::NumberOfReviews => "Number of Reviews",
            Feature::ReviewScoresRating => "Review Scores Rating",
            Feature::ReviewScoresAccuracy => "Review Scores Accuracy",
            Feature::ReviewScoresCleanliness => "Review Scores Cleanliness",
            Feature::ReviewScoresCheckin => "Review Scores Checkin",
            Feature::ReviewScoresCommunication => "Review Scores Communication",
            Feature::ReviewScoresLocation => "Review Scores Location",
            Feature::ReviewScoresValue => "Review Scores Value",
            Feature::ReviewsPerMonth => "Reviews per Month",
        }
    }

    /// Key used in JSON payloads and `key=value` assignments.
    pub fn key(self) -> &'static str {
        match self {
            Feature::HostResponseRate => "host_response_rate",
            Feature::HostTotalListingsCount => "host_total_listings_count",
            Feature::Latitude => "latitude",
            Feature::Longitude => "longitude",
            Feature::Bathrooms => "bathrooms",
            Feature::Bedrooms => "bedrooms",
            Feature::Beds => "beds",
            Feature::SecurityDeposit => "security_deposit",
            Feature::CleaningFee => "cleaning_fee",
            Feature::GuestsIncluded => "guests_included",
            Feature::ExtraPeople => "extra_people",
            Feature::MinimumNights => "minimum_nights",
            Feature::MaximumNights => "maximum_nights",
            Feature::Availability30 => "availability_30",
            Feature::Availability90 => "availability_90",
            Feature::NumberOfReviews => "number_of_reviews",
            Feature::ReviewScoresRating => "review_scores_rating",
            Feature::ReviewScoresAccuracy => "review_scores_accuracy",
            Feature::ReviewScoresCleanliness => "review_scores_cleanliness",
            Feature::ReviewScoresCheckin => "review_scores_checkin",
            Feature::ReviewScoresCommunication => "review_scores_communication",
            Feature::ReviewScoresLocation => "review_scores_location",
            Feature::ReviewScoresValue => "review_scores_value",
            Feature::ReviewsPerMonth => "reviews_per_month",
        }
    }

    pub fn spec(self) -> FieldSpec {
        match self {
            Feature::HostResponseRate => FieldSpec::int(0.0, 100.0, 95.0),
            Feature::HostTotalListingsCount => FieldSpec::int(1.0, 100.0, 1.0),
            Feature::Latitude => FieldSpec::dec(-90.0, 90.0, 48.8566, 0.0001),
            Feature::Longitude => FieldSpec::dec(-180.0, 180.0, 2.3522, 0.0001),
            Feature::Bathrooms => FieldSpec::dec(0.0, 10.0, 1.0, 0.5),
            Feature::Bedrooms => FieldSpec::int(0.0, 10.0, 1.0),
            Feature::Beds => FieldSpec::int(0.0, 20.0, 1.0),
            Feature::SecurityDeposit => FieldSpec::int(0.0, 1000.0, 0.0),
            Feature::CleaningFee => FieldSpec::int(0.0, 500.0, 30.0),
            Feature::GuestsIncluded => FieldSpec::int(1.0, 16.0, 2.0),
            Feature::ExtraPeople => FieldSpec::int(0.0, 100.0, 0.0),
            Feature::MinimumNights => FieldSpec::int(1.0, 30.0, 1.0),
            Feature::MaximumNights => FieldSpec::int(1.0, 365.0, 30.0),
            Feature::Availability30 => FieldSpec::int(0.0, 30.0, 15.0),
            Feature::Availability90 => FieldSpec::int(0.0, 90.0, 45.0),
            Feature::NumberOfReviews => FieldSpec::int(0.0, 500.0, 0.0),
            Feature::ReviewScoresRating => FieldSpec::int(0.0, 100.0, 90.0),
            Feature::ReviewScoresAccuracy
            | Feature::ReviewScoresCleanliness
            | Feature::ReviewScoresCheckin
            | Feature::ReviewScoresCommunication
            | Feature::ReviewScoresLocation
            | Feature::ReviewScoresValue => FieldSpec::int(0.0, 10.0, 9.0),
            Feature::ReviewsPerMonth => FieldSpec::dec(0.0, 20.0, 0.0, 0.1),
        }
    }

    pub fn from_key(key: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Listing attributes as entered in the form, one named field per feature.
///
/// Absent keys fall back to the form defaults; unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Listing {
    pub host_response_rate: f64,
    pub host_total_listings_count: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub bathrooms: f64,
    pub bedrooms: f64,
    pub beds: f64,
    pub security_deposit: f64,
    pub cleaning_fee: f64,
    pub guests_included: f64,
    pub extra_people: f64,
    pub minimum_nights: f64,
    pub maximum_nights: f64,
    pub availability_30: f64,
    pub availability_90: f64,
    pub number_of_reviews: f64,
    pub review_scores_rating: f64,
    pub review_scores_accuracy: f64,
    pub review_scores_cleanliness: f64,
    pub review_scores_checkin: f64,
    pub review_scores_communication: f64,
    pub review_scores_location: f64,
    pub review_scores_value: f64,
    pub reviews_per_month: f64,
}

impl Listing {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::HostResponseRate => self.host_response_rate,
            Feature::HostTotalListingsCount => self.host_total_listings_count,
            Feature::Latitude => self.latitude,
            Feature::Longitude => self.longitude,
            Feature::Bathrooms => self.bathrooms,
            Feature::Bedrooms => self.bedrooms,
            Feature::Beds => self.beds,
            Feature::SecurityDeposit => self.security_deposit,
            Feature::CleaningFee => self.cleaning_fee,
            Feature::GuestsIncluded => self.guests_included,
            Feature::ExtraPeople => self.extra_people,
            Feature::MinimumNights => self.minimum_nights,
            Feature::MaximumNights => self.maximum_nights,
            Feature::Availability30 => self.availability_30,
            Feature::Availability90 => self.availability_90,
            Feature::NumberOfReviews => self.number_of_reviews,
            Feature::ReviewScoresRating => self.review_scores_rating,
            Feature::ReviewScoresAccuracy => self.review_scores_accuracy,
            Feature::ReviewScoresCleanliness => self.review_scores_cleanliness,
            Feature::ReviewScoresCheckin => self.review_scores_checkin,
            Feature::ReviewScoresCommunication => self.review_scores_communication,
            Feature::ReviewScoresLocation => self.review_scores_location,
            Feature::ReviewScoresValue => self.review_scores_value,
            Feature::ReviewsPerMonth => self.reviews_per_month,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::HostResponseRate => &mut self.host_response_rate,
            Feature::HostTotalListingsCount => &mut self.host_total_listings_count,
            Feature::Latitude => &mut self.latitude,
            Feature::Longitude => &mut self.longitude,
            Feature::Bathrooms => &mut self.bathrooms,
            Feature::Bedrooms => &mut self.bedrooms,
            Feature::Beds => &mut self.beds,
            Feature::SecurityDeposit => &mut self.security_deposit,
            Feature::CleaningFee => &mut self.cleaning_fee,
            Feature::GuestsIncluded => &mut self.guests_included,
            Feature::ExtraPeople => &mut self.extra_people,
            Feature::MinimumNights => &mut self.minimum_nights,
            Feature::MaximumNights => &mut self.maximum_nights,
            Feature::Availability30 => &mut self.availability_30,
            Feature::Availability90 => &mut self.availability_90,
            Feature::NumberOfReviews => &mut self.number_of_reviews,
            Feature::ReviewScoresRating => &mut self.review_scores_rating,
            Feature::ReviewScoresAccuracy => &mut self.review_scores_accuracy,
            Feature::ReviewScoresCleanliness => &mut self.review_scores_cleanliness,
            Feature::ReviewScoresCheckin => &mut self.review_scores_checkin,
            Feature::ReviewScoresCommunication => &mut self.review_scores_communication,
            Feature::ReviewScoresLocation => &mut self.review_scores_location,
            Feature::ReviewScoresValue => &mut self.review_scores_value,
            Feature::ReviewsPerMonth => &mut self.reviews_per_month,
        };
        *slot = value;
    }

    /// Values in schema order, without any validation.
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector(Feature::ALL.map(|f| self.get(f)))
    }
}

impl Default for Listing {
    fn default() -> Self {
        let mut listing = Listing {
            host_response_rate: 0.0,
            host_total_listings_count: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            bathrooms: 0.0,
            bedrooms: 0.0,
            beds: 0.0,
            security_deposit: 0.0,
            cleaning_fee: 0.0,
            guests_included: 0.0,
            extra_people: 0.0,
            minimum_nights: 0.0,
            maximum_nights: 0.0,
            availability_30: 0.0,
            availability_90: 0.0,
            number_of_reviews: 0.0,
            review_scores_rating: 0.0,
            review_scores_accuracy: 0.0,
            review_scores_cleanliness: 0.0,
            review_scores_checkin: 0.0,
            review_scores_communication: 0.0,
            review_scores_location: 0.0,
            review_scores_value: 0.0,
            reviews_per_month: 0.0,
        };
        for feature in Feature::ALL {
            listing.set(feature, feature.spec().default);
        }
        listing
    }
}

/// Fixed-arity feature row in schema order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector([f64; Feature::COUNT]);

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Row handed to the scaler under the given placeholder policy.
    pub fn to_row(&self, policy: PlaceholderPolicy) -> Vec<f64> {
        let mut row = Vec::with_capacity(policy.width());
        row.extend_from_slice(&self.0);
        if policy == PlaceholderPolicy::ZeroFill {
            row.push(0.0);
        }
        row
    }
}

/// How the trailing `Price` placeholder column is treated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    /// Hand the scaler the schema columns only.
    #[default]
    Strip,
    /// Append a zero-valued `Price` column for scalers fitted with it.
    ZeroFill,
}

impl PlaceholderPolicy {
    pub fn width(self) -> usize {
        match self {
            PlaceholderPolicy::Strip => Feature::COUNT,
            PlaceholderPolicy::ZeroFill => Feature::COUNT + 1,
        }
    }

    /// Column names in the order the scaler receives them.
    pub fn columns(self) -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = Feature::ALL.iter().map(|f| f.column()).collect();
        if self == PlaceholderPolicy::ZeroFill {
            cols.push(PLACEHOLDER_COLUMN);
        }
        cols
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaceholderPolicy::Strip => "strip",
            PlaceholderPolicy::ZeroFill => "zero_fill",
        }
    }
}

impl FromStr for PlaceholderPolicy {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(PlaceholderPolicy::Strip),
            "zero_fill" | "zero-fill" => Ok(PlaceholderPolicy::ZeroFill),
            other => Err(PriceError::Config(format!(
                "unknown placeholder policy {other:?}"
            ))),
        }
    }
}
