use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Threshold range offered by the sensitivity slider. Not enforced.
pub const RECOMMENDED_THRESHOLD_RANGE: (f64, f64) = (1.0, 5.0);

/// Window range offered by the window-size slider. Not enforced.
pub const RECOMMENDED_WINDOW_RANGE: (usize, usize) = (5, 20);

/// Tunable parameters for every analysis the core runs.
///
/// Fields missing from a JSON document take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Z-score cutoff for change-point detection (lower = more sensitive)
    pub threshold: f64,

    /// Samples per comparison window in the detector
    pub detection_window: usize,

    /// Trailing window of the moving average
    pub smoothing_window: usize,

    /// Samples before/after a change point used for impact analysis
    pub impact_offset: usize,

    /// Search radius for the nearest event, in days
    pub nearest_event_max_days: i64,

    /// An event this close (in days) counts as correlated
    pub correlation_window_days: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            detection_window: 10,
            smoothing_window: 7,
            impact_offset: 7,
            nearest_event_max_days: 14,
            correlation_window_days: 7,
        }
    }
}

impl AnalysisSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: AnalysisSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Reject values the analyses cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(CoreError::config(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if self.detection_window == 0 {
            return Err(CoreError::config("detection_window must be at least 1"));
        }
        if self.smoothing_window == 0 {
            return Err(CoreError::config("smoothing_window must be at least 1"));
        }
        if self.nearest_event_max_days < 0 {
            return Err(CoreError::config(format!(
                "nearest_event_max_days must not be negative, got {}",
                self.nearest_event_max_days
            )));
        }
        if self.correlation_window_days < 0 {
            return Err(CoreError::config(format!(
                "correlation_window_days must not be negative, got {}",
                self.correlation_window_days
            )));
        }
        Ok(())
    }
}
