use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::event::EventCategory;

/// A single data point for price chart rendering.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub date: NaiveDate,

    pub price: f64,

    /// Trailing moving average, when smoothing was requested
    pub moving_average: Option<f64>,

    /// Event recorded on this exact date, if any
    pub event: Option<ChartEventMarker>,

    /// Whether this date is a curated (known) change point
    pub is_known_change_point: bool,
}

/// An event annotation on a chart data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEventMarker {
    pub label: String,
    pub category: EventCategory,
    pub description: String,
}

/// Preset chart windows offered by the range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePreset {
    ThreeMonths,
    SixMonths,
    OneYear,
    All,
}

impl RangePreset {
    /// First date shown for this preset, counted back from `anchor`.
    /// `None` means "no lower bound".
    pub fn start_date(self, anchor: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            RangePreset::ThreeMonths => 3,
            RangePreset::SixMonths => 6,
            RangePreset::OneYear => 12,
            RangePreset::All => return None,
        };
        anchor.checked_sub_months(Months::new(months))
    }
}

impl std::fmt::Display for RangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangePreset::ThreeMonths => write!(f, "3m"),
            RangePreset::SixMonths => write!(f, "6m"),
            RangePreset::OneYear => write!(f, "1y"),
            RangePreset::All => write!(f, "all"),
        }
    }
}
