use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;
use crate::models::change_point::ChangePoint;
use crate::models::chart::{ChartDataPoint, ChartEventMarker, RangePreset};
use crate::models::event::{Event, EventCatalog};
use crate::models::price::{PricePoint, PriceSeries};
use crate::services::smoothing_service::SmoothingService;

/// Generates chart-ready data sets from the price series and event catalog.
///
/// The core computes all the numbers; the frontend only renders.
/// Each chart point carries:
/// - the price and (optionally) its moving average
/// - the event recorded on that date, if any
/// - whether the date is a known change point
pub struct ChartService {
    smoothing_service: SmoothingService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            smoothing_service: SmoothingService::new(),
        }
    }

    /// Annotate every sample for rendering.
    ///
    /// `smoothing_window = None` leaves `moving_average` empty.
    pub fn annotate(
        &self,
        series: &[PricePoint],
        catalog: &EventCatalog,
        known_change_points: &[ChangePoint],
        smoothing_window: Option<usize>,
    ) -> Result<Vec<ChartDataPoint>, CoreError> {
        let moving_averages: Option<Vec<f64>> = match smoothing_window {
            Some(window) => Some(
                self.smoothing_service
                    .smooth(series, window)?
                    .into_iter()
                    .map(|p| p.moving_average)
                    .collect(),
            ),
            None => None,
        };

        // Index events by date for O(1) lookup per sample; first event of a day wins.
        let mut events_by_date: HashMap<NaiveDate, &Event> = HashMap::new();
        for event in catalog {
            events_by_date.entry(event.date).or_insert(event);
        }
        let known_dates: HashSet<NaiveDate> =
            known_change_points.iter().map(|cp| cp.date).collect();

        let chart = series
            .iter()
            .enumerate()
            .map(|(i, point)| ChartDataPoint {
                date: point.date,
                price: point.price,
                moving_average: moving_averages.as_ref().map(|ma| ma[i]),
                event: events_by_date.get(&point.date).map(|e| ChartEventMarker {
                    label: e.label.clone(),
                    category: e.category,
                    description: e.description.clone(),
                }),
                is_known_change_point: known_dates.contains(&point.date),
            })
            .collect();

        Ok(chart)
    }

    /// Samples visible under a range preset: everything dated on or after the
    /// preset's start, counted back from `anchor`.
    pub fn range<'a>(
        &self,
        series: &'a PriceSeries,
        preset: RangePreset,
        anchor: NaiveDate,
    ) -> &'a [PricePoint] {
        let start = preset.start_date(anchor).unwrap_or(NaiveDate::MIN);
        series.slice(start, NaiveDate::MAX)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
