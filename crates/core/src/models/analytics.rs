use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::change_point::ChangePoint;
use super::event::{Event, EventCategory};

/// Per-category roll-up of recorded event impacts.
///
/// An empty category reports zeros for every field, never NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub count: usize,
    pub average_percent_change: f64,
    pub max_percent_change: f64,
    pub min_percent_change: f64,
}

/// Category → impact summary, covering every known category.
pub type ImpactSummary = BTreeMap<EventCategory, CategoryImpact>;

/// Descriptive statistics over all prices of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Population standard deviation of the prices
    pub volatility: f64,
}

/// A single day-over-day percent move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMove {
    /// Date of the later sample in the pair
    pub date: NaiveDate,
    pub percent_change: f64,
}

/// Largest positive and largest negative consecutive move in a series.
///
/// A side is `None` when the series never moves in that direction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LargestDailyMoves {
    pub largest_increase: Option<DailyMove>,
    pub largest_decrease: Option<DailyMove>,
}

/// Price before and after a change point, `offset` samples on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceImpact {
    pub before_date: NaiveDate,
    pub before_price: f64,
    pub after_date: NaiveDate,
    pub after_price: f64,
    pub percent_change: f64,
}

/// Outcome of an impact-window lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImpactAnalysis {
    Computed(PriceImpact),
    /// The date is sampled but one side has fewer than `offset` samples.
    InsufficientData {
        samples_before: usize,
        samples_after: usize,
    },
    /// No sample carries the requested date.
    DateNotInSeries,
    /// The "before" price is zero, so no percent change exists.
    ZeroBasePrice { before_date: NaiveDate },
}

impl ImpactAnalysis {
    pub fn impact(&self) -> Option<&PriceImpact> {
        match self {
            ImpactAnalysis::Computed(impact) => Some(impact),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ImpactAnalysis::Computed(_))
    }
}

/// Direction/size class of a percent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    MajorPositive,
    MajorNegative,
    MinorPositive,
    MinorNegative,
}

impl std::fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftDirection::MajorPositive => write!(f, "major positive"),
            ShiftDirection::MajorNegative => write!(f, "major negative"),
            ShiftDirection::MinorPositive => write!(f, "minor positive"),
            ShiftDirection::MinorNegative => write!(f, "minor negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftMagnitude {
    Significant,
    Moderate,
}

impl std::fmt::Display for ShiftMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftMagnitude::Significant => write!(f, "significant"),
            ShiftMagnitude::Moderate => write!(f, "moderate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactInterpretation {
    pub direction: ShiftDirection,
    pub magnitude: ShiftMagnitude,
}

/// The event closest in time to a date, with its distance in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestEvent {
    pub event: Event,
    pub distance_days: i64,
}

/// Last price strictly before a date vs. first price on or after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceShift {
    pub before: NaiveDate,
    pub price_before: f64,
    pub after: NaiveDate,
    pub price_after: f64,
    pub percent_change: f64,
}

/// Everything known about one selected change point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePointReport {
    pub change_point: ChangePoint,
    pub nearest_event: Option<NearestEvent>,
    pub impact: ImpactAnalysis,
    /// Present only when the impact could be computed
    pub interpretation: Option<ImpactInterpretation>,
    /// Whether any event lies within the correlation window
    pub correlated: bool,
}

/// Roll-up of a mixed list of known and detected change points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangePointSummary {
    pub total: usize,
    pub known: usize,
    pub detected: usize,
    /// Highest detector score, `None` when nothing was detected
    pub max_score: Option<f64>,
    /// Mean detector score, `None` when nothing was detected
    pub mean_score: Option<f64>,
}

/// Dashboard-level statistics over one price series and event set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// `None` for an empty series
    pub price_statistics: Option<PriceStatistics>,

    /// max - min
    pub price_range: Option<f64>,

    /// (max - min) / min × 100, `None` when min is zero or the series is empty
    pub price_range_percent: Option<f64>,

    pub daily_moves: LargestDailyMoves,

    pub total_events: usize,

    /// Event count per category (every known category present)
    pub events_by_category: BTreeMap<EventCategory, usize>,

    /// Category with the most events, `None` when there are no events
    pub most_common_category: Option<EventCategory>,
}
