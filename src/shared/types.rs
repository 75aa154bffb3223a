use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

// =============================================================================
// GEOGRAPHIC COORDINATE
// =============================================================================

/// A decimal-degrees coordinate, rounded to 6 decimal places on construction.
///
/// Invariant: latitude in [-90, 90], longitude in [-180, 180]. Rounding happens
/// before the range check so that values like 90.0000004 are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees (positive north)
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east)
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        let latitude = round_to_6dp(latitude);
        let longitude = round_to_6dp(longitude);

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude out of range [-90, 90]: {}", latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude out of range [-180, 180]: {}", longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Round a decimal-degrees value to 6 decimal places.
///
/// This is the exact rounding contract the rest of the system depends on
/// (map centering, record payloads): scale, round half away from zero,
/// scale back.
pub fn round_to_6dp(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rounds_to_6dp() {
        let coord = GeoCoordinate::new(36.083333333333336, 136.21666666666667).unwrap();
        assert_eq!(coord.latitude, 36.083333);
        assert_eq!(coord.longitude, 136.216667);
    }

    #[test]
    fn test_coordinate_range_invariant() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
        assert!(GeoCoordinate::new(90.1, 0.0).is_err());
        assert!(GeoCoordinate::new(-90.1, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, 180.1).is_err());
        assert!(GeoCoordinate::new(0.0, -180.1).is_err());
    }

    #[test]
    fn test_coordinate_rounds_before_range_check() {
        // 90.0000004 rounds down to 90.0, which is inside the range
        assert!(GeoCoordinate::new(90.0000004, 0.0).is_ok());
    }
}
