//! Analysis payload ingestion
//!
//! The analysis service hands over one JSON document per load. A broken
//! document is an error; a broken annotation inside an otherwise valid
//! document is dropped on its own so the rest of the overlay still renders.

use crate::{Annotation, PricePoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Payload and annotation validation failures
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed analysis payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} level is missing its price")]
    MissingPrice(&'static str),

    #[error("{0} level has a non-finite price")]
    NonFinitePrice(&'static str),

    #[error("{0} event is missing its date")]
    MissingDate(&'static str),

    #[error("unparseable annotation date `{0}`")]
    InvalidDate(String),
}

/// One analysis load: the series plus its annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub points: Vec<PricePoint>,
    pub annotations: Vec<Annotation>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    symbol: Option<String>,
    points: Vec<PricePoint>,
    #[serde(default)]
    annotations: Option<Vec<Value>>,
}

impl AnalysisPayload {
    pub fn new(points: Vec<PricePoint>, annotations: Vec<Annotation>) -> Self {
        Self {
            symbol: None,
            points,
            annotations,
        }
    }

    /// Parse a payload, dropping malformed annotations individually
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let raw: RawPayload = serde_json::from_str(json)?;
        let annotations = parse_annotations(raw.annotations.unwrap_or_default());

        tracing::debug!(
            points = raw.points.len(),
            annotations = annotations.len(),
            "analysis payload parsed"
        );

        Ok(Self {
            symbol: raw.symbol,
            points: raw.points,
            annotations,
        })
    }
}

/// Validate annotation records one by one, skipping the ones that fail
pub fn parse_annotations(values: Vec<Value>) -> Vec<Annotation> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<Annotation>(value) {
            Ok(annotation) => Some(annotation),
            Err(err) => {
                tracing::debug!(index = i, %err, "dropping malformed annotation");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventKind, LevelKind};

    const PAYLOAD: &str = r#"{
        "symbol": "ACME",
        "points": [
            {"date": "2024-01-01", "close": 100},
            {"date": "2024-01-02", "close": 110},
            {"date": "2024-01-03", "close": 90}
        ],
        "annotations": [
            {"kind": "SUPPORT", "price": 95, "strength": "strong"},
            {"kind": "RESISTANCE", "strength": "weak"},
            {"kind": "BREAKOUT", "date": "2024-01-02", "description": "Range break"},
            {"kind": "VOLUME_SPIKE"},
            "not even an object"
        ]
    }"#;

    #[test]
    fn test_payload_drops_malformed_annotations_individually() {
        let payload = AnalysisPayload::from_json(PAYLOAD).unwrap();
        assert_eq!(payload.symbol.as_deref(), Some("ACME"));
        assert_eq!(payload.points.len(), 3);
        assert_eq!(payload.annotations.len(), 2);
        assert_eq!(payload.annotations[0].as_level().unwrap().kind, LevelKind::Support);
        assert_eq!(payload.annotations[1].as_event().unwrap().kind, EventKind::Breakout);
    }

    #[test]
    fn test_payload_without_annotations() {
        let payload =
            AnalysisPayload::from_json(r#"{"points": [], "annotations": null}"#).unwrap();
        assert!(payload.points.is_empty());
        assert!(payload.annotations.is_empty());
    }

    #[test]
    fn test_broken_document_is_an_error() {
        let err = AnalysisPayload::from_json(r#"{"points": "#).unwrap_err();
        assert!(matches!(err, PayloadError::Json(_)));
    }
}
