//! JSON parser for prediction responses.

use anyhow::Result;
use serde_json::Value;

use crate::analytics::types::Prediction;

/// Decodes a JSON prediction response and normalizes it into a [`Prediction`].
///
/// # Errors
///
/// Returns an error only if the bytes are not valid JSON. Any valid JSON
/// document normalizes, possibly to a prediction with no routes.
pub fn parse_prediction(bytes: &[u8]) -> Result<Prediction> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(Prediction::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_object_has_no_routes() {
        let prediction = parse_prediction(b"{}").unwrap();
        assert!(prediction.routes.is_empty());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let invalid_bytes = vec![0xFF, 0xFE, 0x00, 0x01];
        assert!(parse_prediction(&invalid_bytes).is_err());
        assert!(parse_prediction(b"").is_err());
    }

    #[test]
    fn test_parse_non_object_document() {
        let prediction = parse_prediction(b"[1, 2, 3]").unwrap();
        assert!(prediction.routes.is_empty());
    }

    #[test]
    fn test_parse_valid_minimal_prediction() {
        let body = br#"{"routes": [{"rank": 1, "name": "Outer Ring", "distance_km": 9.5}], "confidence": "Medium"}"#;
        let prediction = parse_prediction(body).unwrap();

        assert_eq!(prediction.routes.len(), 1);
        assert_eq!(prediction.routes[0].name.as_deref(), Some("Outer Ring"));
        assert_eq!(prediction.routes[0].distance_km, Some(9.5));
        assert_eq!(prediction.context.confidence.as_deref(), Some("Medium"));
    }
}
