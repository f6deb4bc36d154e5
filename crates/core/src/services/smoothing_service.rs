use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, SmoothedPoint};

/// Trailing-window moving average.
///
/// Pure computation, no state: the same input always yields the same output.
pub struct SmoothingService;

impl SmoothingService {
    pub fn new() -> Self {
        Self
    }

    /// Compute the trailing moving average for every sample.
    ///
    /// The value at index `i` is the mean of `[max(0, i - window + 1), i]`,
    /// so the window shrinks near the start instead of leaving gaps. The
    /// output has exactly one point per input point, in the same order.
    pub fn smooth(
        &self,
        series: &[PricePoint],
        window_size: usize,
    ) -> Result<Vec<SmoothedPoint>, CoreError> {
        if window_size == 0 {
            return Err(CoreError::config("smoothing window must be at least 1"));
        }

        let smoothed: Vec<SmoothedPoint> = series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let start = (i + 1).saturating_sub(window_size);
                SmoothedPoint {
                    date: point.date,
                    price: point.price,
                    moving_average: mean(&series[start..=i]),
                }
            })
            .collect();

        debug!(samples = series.len(), window_size, "smoothed price series");
        Ok(smoothed)
    }
}

fn mean(window: &[PricePoint]) -> f64 {
    window.iter().map(|p| p.price).sum::<f64>() / window.len() as f64
}

impl Default for SmoothingService {
    fn default() -> Self {
        Self::new()
    }
}
