//! # insight-state
//!
//! Reactive state management for the Stock Insight dashboard.
//! Holds the currently analysed series and its annotations in Leptos signals
//! so charts re-render only when their own inputs change.

pub mod watchlist;

pub use watchlist::*;

use insight_core::{AnalysisPayload, Annotation, PayloadError, PricePoint};
use leptos::prelude::*;

// ============================================================================
// ANALYSIS STATE
// ============================================================================

/// Signals feeding the main price chart
#[derive(Debug, Clone, Copy)]
pub struct AnalysisState {
    pub symbol: RwSignal<Option<String>>,
    pub points: RwSignal<Vec<PricePoint>>,
    pub annotations: RwSignal<Vec<Annotation>>,
    /// Overlay shown while a load is in flight
    pub loading: RwSignal<bool>,
    /// Caller-reported failure, replaces the chart when set
    pub error: RwSignal<Option<String>>,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self {
            symbol: RwSignal::new(None),
            points: RwSignal::new(Vec::new()),
            annotations: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    /// Mark a load as started; existing data stays until replaced
    pub fn begin_loading(&self) {
        self.loading.set(true);
        self.error.set(None);
    }

    /// Replace series and annotations in one go
    pub fn load_payload(&self, payload: AnalysisPayload) {
        tracing::info!(
            symbol = payload.symbol.as_deref().unwrap_or("-"),
            points = payload.points.len(),
            annotations = payload.annotations.len(),
            "analysis loaded"
        );

        self.symbol.set(payload.symbol);
        self.points.set(payload.points);
        self.annotations.set(payload.annotations);
        self.loading.set(false);
        self.error.set(None);
    }

    /// Parse and load a JSON payload. A document that cannot be parsed becomes
    /// the chart error and leaves the current data untouched.
    pub fn load_json(&self, json: &str) -> Result<(), PayloadError> {
        match AnalysisPayload::from_json(json) {
            Ok(payload) => {
                self.load_payload(payload);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "analysis payload rejected");
                self.set_error(err.to_string());
                Err(err)
            }
        }
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        self.loading.set(false);
        self.error.set(Some(msg.into()));
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn has_error(&self) -> bool {
        self.error.with(Option::is_some)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide analysis state to the component tree
pub fn provide_analysis_state() -> AnalysisState {
    let state = AnalysisState::new();
    provide_context(state);
    state
}

/// Use analysis state from context
pub fn use_analysis_state() -> AnalysisState {
    expect_context::<AnalysisState>()
}

/// Try to get analysis state from context (returns None if not provided)
pub fn try_use_analysis_state() -> Option<AnalysisState> {
    use_context::<AnalysisState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "symbol": "ACME",
        "points": [
            {"date": "2024-01-01", "close": 100.0},
            {"date": "2024-01-02", "close": 104.5}
        ],
        "annotations": [
            {"kind": "SUPPORT", "price": 98.0, "strength": "strong"},
            {"kind": "RESISTANCE"}
        ]
    }"#;

    #[test]
    fn test_load_json_replaces_data() {
        Owner::new().with(|| {
            let state = AnalysisState::new();
            state.begin_loading();
            assert!(state.is_loading());

            state.load_json(PAYLOAD).unwrap();
            assert!(!state.is_loading());
            assert_eq!(state.symbol.get_untracked().as_deref(), Some("ACME"));
            assert_eq!(state.points.with_untracked(Vec::len), 2);
            // The resistance without a price is dropped on its own
            assert_eq!(state.annotations.with_untracked(Vec::len), 1);
        });
    }

    #[test]
    fn test_broken_payload_becomes_error() {
        Owner::new().with(|| {
            let state = AnalysisState::new();
            state.load_json(PAYLOAD).unwrap();
            state.begin_loading();

            assert!(state.load_json("{\"points\": 7}").is_err());
            assert!(state.error.get_untracked().is_some());
            assert!(!state.loading.get_untracked());
            assert_eq!(state.points.with_untracked(Vec::len), 2);

            state.clear_error();
            assert!(state.error.get_untracked().is_none());
        });
    }
}
