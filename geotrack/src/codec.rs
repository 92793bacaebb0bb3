//! Outbound payload encoding.
//!
//! A position update is delivered to the host as a JSON object:
//!
//! ```text
//! {"latitude":37.5,"longitude":-122.3,"accuracy":5.0,"timestamp":1700000000000}
//! ```
//!
//! Optional fields (`accuracy`, `altitude`, `altitudeAccuracy`, `heading`,
//! `speed`) are omitted when the source did not provide them. Floats are
//! written in shortest round-trip form, so decoding reproduces the exact
//! values that were encoded.

use crate::position::Coordinate;

/// Error type for payload encoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not a valid coordinate record.
    #[error("Invalid coordinate payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The coordinate holds a value that cannot be represented.
    #[error("Coordinate is not finite: {latitude}, {longitude}")]
    NonFinite { latitude: f64, longitude: f64 },
}

/// Encode a coordinate into the outbound payload.
pub fn encode_coordinate(coordinate: &Coordinate) -> Result<String, CodecError> {
    if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
        return Err(CodecError::NonFinite {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        });
    }
    Ok(serde_json::to_string(coordinate)?)
}

/// Decode an outbound payload back into a coordinate.
pub fn decode_coordinate(payload: &str) -> Result<Coordinate, CodecError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_exact() {
        let coordinate = Coordinate::new(37.5, -122.3);
        let payload = encode_coordinate(&coordinate).unwrap();
        let decoded = decode_coordinate(&payload).unwrap();

        assert_eq!(decoded.latitude.to_bits(), 37.5f64.to_bits());
        assert_eq!(decoded.longitude.to_bits(), (-122.3f64).to_bits());
    }

    #[test]
    fn test_optional_fields_omitted() {
        let coordinate = Coordinate::new(1.0, 2.0).with_timestamp(42);
        let payload = encode_coordinate(&coordinate).unwrap();

        assert_eq!(payload, r#"{"latitude":1.0,"longitude":2.0,"timestamp":42}"#);
    }

    #[test]
    fn test_camel_case_fields() {
        let mut coordinate = Coordinate::new(1.0, 2.0).with_timestamp(0);
        coordinate.altitude_accuracy = Some(3.5);
        let payload = encode_coordinate(&coordinate).unwrap();

        assert!(payload.contains(r#""altitudeAccuracy":3.5"#));
    }

    #[test]
    fn test_decode_rejects_missing_latitude() {
        let result = decode_coordinate(r#"{"longitude":2.0}"#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_encode_rejects_nan() {
        let coordinate = Coordinate::new(f64::NAN, 0.0);
        assert!(matches!(
            encode_coordinate(&coordinate),
            Err(CodecError::NonFinite { .. })
        ));
    }
}
