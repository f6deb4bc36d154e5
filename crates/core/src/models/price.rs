use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single price data point (date → price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A price point together with its trailing moving average.
///
/// Derived from a [`PriceSeries`], never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub moving_average: f64,
}

/// Position of the sample dated exactly `date`, or `None`.
///
/// `points` must be sorted ascending by date (binary search, O(log n)).
pub fn index_of_date(points: &[PricePoint], date: NaiveDate) -> Option<usize> {
    points.binary_search_by_key(&date, |p| p.date).ok()
}

/// Canonical, date-ordered set of price samples.
///
/// Invariants enforced on construction:
/// - strictly ascending dates (no duplicates)
/// - every price is finite
///
/// Immutable once built; every analytical service reads it through
/// [`PriceSeries::points`] or one of the range queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from samples in any order. Sorts by date, then validates.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.date);
        Self::from_sorted(points)
    }

    /// Build a series from samples that are already in ascending date order.
    pub fn from_sorted(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
            return Err(CoreError::InvalidSeries(format!(
                "non-finite price on {}",
                bad.date
            )));
        }
        for pair in points.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(CoreError::InvalidSeries(format!(
                    "duplicate date {}",
                    pair[1].date
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(CoreError::InvalidSeries(format!(
                    "dates out of order: {} after {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// First and last sample dates, if the series is non-empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }

    /// Samples whose dates fall in `[start, end]` (inclusive).
    /// Empty when nothing qualifies, including when `start > end`.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        if start > end {
            return &[];
        }
        // First entry >= start
        let from = self
            .points
            .binary_search_by_key(&start, |p| p.date)
            .unwrap_or_else(|pos| pos);
        // First entry > end
        let to = self
            .points
            .binary_search_by_key(&end, |p| p.date)
            .map(|pos| pos + 1)
            .unwrap_or_else(|pos| pos);
        &self.points[from..to]
    }

    /// Position of the sample dated exactly `date`.
    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        index_of_date(&self.points, date)
    }

    /// Price on an exact date, if sampled.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.index_of_date(date).map(|idx| self.points[idx].price)
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}

impl AsRef<[PricePoint]> for PriceSeries {
    fn as_ref(&self) -> &[PricePoint] {
        &self.points
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::new(points).map_err(serde::de::Error::custom)
    }
}
