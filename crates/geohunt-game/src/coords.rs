//! Coordinate range validators shared by the event and chest inputs.
//!
//! Coordinates are [`Decimal`] end to end, so the `validator` derive's
//! numeric `range` rule does not apply; these custom functions implement
//! the WGS84 bounds instead.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Accept latitudes in [-90, 90] degrees.
pub fn validate_latitude(latitude: &Decimal) -> Result<(), ValidationError> {
    let min = Decimal::from(-90);
    let max = Decimal::from(90);
    if *latitude < min || *latitude > max {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("latitude must be between -90 and 90".into());
        return Err(err);
    }
    Ok(())
}

/// Accept longitudes in [-180, 180] degrees.
pub fn validate_longitude(longitude: &Decimal) -> Result<(), ValidationError> {
    let min = Decimal::from(-180);
    let max = Decimal::from(180);
    if *longitude < min || *longitude > max {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("longitude must be between -180 and 180".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_latitude(&Decimal::from(90)).is_ok());
        assert!(validate_latitude(&Decimal::from(-90)).is_ok());
        assert!(validate_longitude(&Decimal::from(180)).is_ok());
        assert!(validate_longitude(&Decimal::from(-180)).is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(validate_latitude(&Decimal::new(905, 1)).is_err());
        assert!(validate_longitude(&Decimal::from(-181)).is_err());
    }
}
