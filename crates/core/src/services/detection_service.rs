use tracing::debug;

use crate::errors::CoreError;
use crate::models::change_point::ChangePoint;
use crate::models::price::{PricePoint, SmoothedPoint};
use crate::services::stats::{mean, population_std};

/// Two-window z-score change-point detector.
///
/// For every candidate index `i` in `[w, len - w)` the `w` samples before `i`
/// are compared with the `w` samples starting at `i`:
///
/// ```text
/// score = |mean(next) - mean(prev)| / std(prev)     (std(prev) == 0 → 1)
/// ```
///
/// Indices whose score exceeds the threshold are emitted in ascending date
/// order. Adjacent indices describing the same shift are all reported; no
/// merging takes place.
pub struct DetectionService;

impl DetectionService {
    pub fn new() -> Self {
        Self
    }

    /// Detect change points on raw prices.
    ///
    /// Returns an empty list when the series holds fewer than
    /// `2 * window_size` samples.
    pub fn detect(
        &self,
        series: &[PricePoint],
        threshold: f64,
        window_size: usize,
    ) -> Result<Vec<ChangePoint>, CoreError> {
        let values: Vec<f64> = series.iter().map(|p| p.price).collect();
        self.scan(series, &values, threshold, window_size)
    }

    /// Detect change points on the moving average of a smoothed series.
    /// Reported prices are the raw prices at the flagged dates.
    pub fn detect_smoothed(
        &self,
        smoothed: &[SmoothedPoint],
        threshold: f64,
        window_size: usize,
    ) -> Result<Vec<ChangePoint>, CoreError> {
        let raw: Vec<PricePoint> = smoothed
            .iter()
            .map(|p| PricePoint::new(p.date, p.price))
            .collect();
        let values: Vec<f64> = smoothed.iter().map(|p| p.moving_average).collect();
        self.scan(&raw, &values, threshold, window_size)
    }

    fn scan(
        &self,
        points: &[PricePoint],
        values: &[f64],
        threshold: f64,
        window_size: usize,
    ) -> Result<Vec<ChangePoint>, CoreError> {
        validate(threshold, window_size)?;

        let len = values.len();
        if len < window_size.saturating_mul(2) {
            debug!(
                samples = len,
                window_size, "series too short for two detection windows"
            );
            return Ok(Vec::new());
        }

        let mut change_points = Vec::new();
        for i in window_size..len - window_size {
            let prev = &values[i - window_size..i];
            let next = &values[i..i + window_size];

            let prev_mean = mean(prev);
            let next_mean = mean(next);
            let prev_std = population_std(prev, prev_mean);

            // Flat previous window: fall back to the raw mean difference.
            let divisor = if prev_std == 0.0 { 1.0 } else { prev_std };
            let score = (next_mean - prev_mean).abs() / divisor;

            if score > threshold {
                change_points.push(ChangePoint::detected(
                    points[i].date,
                    points[i].price,
                    score,
                ));
            }
        }

        debug!(
            samples = len,
            window_size,
            threshold,
            detected = change_points.len(),
            "change-point scan complete"
        );
        Ok(change_points)
    }
}

fn validate(threshold: f64, window_size: usize) -> Result<(), CoreError> {
    if window_size == 0 {
        return Err(CoreError::config("detection window must be at least 1"));
    }
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CoreError::config(format!(
            "detection threshold must be a positive number, got {threshold}"
        )));
    }
    Ok(())
}

impl Default for DetectionService {
    fn default() -> Self {
        Self::new()
    }
}
