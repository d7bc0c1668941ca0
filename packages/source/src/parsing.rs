//! Coordinate parsing for survey geopoints.
//!
//! Survey geopoint answers arrive as free text,
//! `"latitude longitude [altitude [accuracy]]"`, separated by whitespace.

use webgis_source_models::CoordinatePair;

/// Parses a geopoint string into a `(latitude, longitude)` pair.
///
/// Every whitespace-separated token must be a finite decimal number and at
/// least two tokens must be present. Tokens after the second (altitude,
/// accuracy) are ignored. Returns `None` for a missing input, a blank
/// string, a non-numeric token, or fewer than two tokens; malformed input is
/// logged.
#[must_use]
pub fn parse_gps_location(raw: Option<&str>) -> Option<CoordinatePair> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }

    let values: Result<Vec<f64>, _> = raw.split_whitespace().map(str::parse::<f64>).collect();

    match values {
        Ok(values) if values.len() >= 2 && values[..2].iter().all(|v| v.is_finite()) => {
            Some(CoordinatePair::new(values[0], values[1]))
        }
        _ => {
            log::warn!("Could not parse GPS location: {raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng() {
        let pair = parse_gps_location(Some("-37.47 -72.34")).unwrap();
        assert!((pair.latitude - -37.47).abs() < f64::EPSILON);
        assert!((pair.longitude - -72.34).abs() < f64::EPSILON);
    }

    #[test]
    fn ignores_altitude_and_accuracy() {
        assert_eq!(
            parse_gps_location(Some("-37.47 -72.34 150")),
            Some(CoordinatePair::new(-37.47, -72.34))
        );
        assert_eq!(
            parse_gps_location(Some("  -37.47\t-72.34 150 4.5 ")),
            Some(CoordinatePair::new(-37.47, -72.34))
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert!(parse_gps_location(Some("abc -72.34")).is_none());
        assert!(parse_gps_location(Some("-37.47 -72.34 high")).is_none());
        assert!(parse_gps_location(Some("-37.47,-72.34")).is_none());
    }

    #[test]
    fn rejects_too_few_tokens() {
        assert!(parse_gps_location(Some("-37.47")).is_none());
    }

    #[test]
    fn rejects_blank_and_missing() {
        assert!(parse_gps_location(Some("")).is_none());
        assert!(parse_gps_location(Some("   ")).is_none());
        assert!(parse_gps_location(None).is_none());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(parse_gps_location(Some("NaN -72.34")).is_none());
        assert!(parse_gps_location(Some("-37.47 inf")).is_none());
    }
}
