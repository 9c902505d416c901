//! Domain validation rules, shared by the API input boundary and the
//! persistence layer. The reference date is passed in by the caller so the
//! rules stay pure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MINIMUM_AGE: u32 = 18;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    SameOriginAndDestination,
    TripDateInPast,
    BirthDateInFuture,
    UnderMinimumAge,
    DuplicatePlaceName,
}

impl ValidationError {
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::SameOriginAndDestination => {
                "Origin and destination cannot be the same"
            }
            ValidationError::TripDateInPast => "Trip date cannot be in the past",
            ValidationError::BirthDateInFuture => "Birth date cannot be in the future",
            ValidationError::UnderMinimumAge => "User should be 18 years or older",
            ValidationError::DuplicatePlaceName => "Place with this name already exists",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_trip_route(origin_id: i64, destination_id: i64) -> Result<(), ValidationError> {
    if origin_id == destination_id {
        return Err(ValidationError::SameOriginAndDestination);
    }
    Ok(())
}

pub fn validate_trip_date(trip_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if trip_date < today {
        return Err(ValidationError::TripDateInPast);
    }
    Ok(())
}

/// Whole-year age check. A birth date exactly MINIMUM_AGE years ago passes.
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let Some(age) = today.years_since(birth_date) else {
        return Err(ValidationError::BirthDateInFuture);
    };
    if age < MINIMUM_AGE {
        return Err(ValidationError::UnderMinimumAge);
    }
    Ok(())
}
