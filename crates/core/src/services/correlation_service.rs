use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::analytics::{
    ChangePointReport, ImpactAnalysis, ImpactInterpretation, NearestEvent, PriceImpact,
    PriceShift, ShiftDirection, ShiftMagnitude,
};
use crate::models::change_point::ChangePoint;
use crate::models::event::{Event, EventCatalog};
use crate::models::price::{index_of_date, PricePoint};
use crate::models::settings::AnalysisSettings;
use crate::services::stats::percent_change;

/// Percent move at or beyond which a shift counts as "major".
pub const MAJOR_SHIFT_PERCENT: f64 = 5.0;

/// Absolute percent move beyond which a shift counts as "significant".
pub const SIGNIFICANT_SHIFT_PERCENT: f64 = 10.0;

/// Links change points to nearby events and measures the price move around them.
///
/// Pure business logic: reads the series and the catalog, never mutates them.
pub struct CorrelationService;

impl CorrelationService {
    pub fn new() -> Self {
        Self
    }

    /// Find the event closest in time to `date`, within `max_distance_days`.
    ///
    /// The catalog is scanned in ascending date order and only a strictly
    /// smaller distance replaces the current best, so on a tie the earliest
    /// event wins (and among same-day events, the first one recorded).
    pub fn nearest_event(
        &self,
        date: NaiveDate,
        catalog: &EventCatalog,
        max_distance_days: i64,
    ) -> Result<Option<NearestEvent>, CoreError> {
        check_distance("max_distance_days", max_distance_days)?;

        let mut best: Option<(&Event, i64)> = None;
        for event in catalog {
            let distance = (event.date - date).num_days().abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((event, distance));
            }
        }

        Ok(best
            .filter(|(_, distance)| *distance <= max_distance_days)
            .map(|(event, distance_days)| NearestEvent {
                event: event.clone(),
                distance_days,
            }))
    }

    /// All events within `window_days` of `date` (inclusive on both sides).
    pub fn events_within<'a>(
        &self,
        date: NaiveDate,
        catalog: &'a EventCatalog,
        window_days: i64,
    ) -> Result<&'a [Event], CoreError> {
        check_distance("window_days", window_days)?;
        let days = Days::new(window_days.unsigned_abs());
        let start = date.checked_sub_days(days).unwrap_or(NaiveDate::MIN);
        let end = date.checked_add_days(days).unwrap_or(NaiveDate::MAX);
        Ok(catalog.in_range(start, end))
    }

    /// Whether any event lies within `window_days` of `date`.
    pub fn is_correlated(
        &self,
        date: NaiveDate,
        catalog: &EventCatalog,
        window_days: i64,
    ) -> Result<bool, CoreError> {
        Ok(!self.events_within(date, catalog, window_days)?.is_empty())
    }

    /// Price `offset` samples before vs. `offset` samples after `date`.
    ///
    /// Offsets count samples, not calendar days, since the series is
    /// irregularly sampled.
    pub fn impact_window(
        &self,
        series: &[PricePoint],
        date: NaiveDate,
        offset: usize,
    ) -> ImpactAnalysis {
        let Some(index) = index_of_date(series, date) else {
            return ImpactAnalysis::DateNotInSeries;
        };

        let samples_before = index;
        let samples_after = series.len() - index - 1;
        if samples_before < offset || samples_after < offset {
            debug!(%date, offset, samples_before, samples_after, "not enough samples for impact window");
            return ImpactAnalysis::InsufficientData {
                samples_before,
                samples_after,
            };
        }

        let before = &series[index - offset];
        let after = &series[index + offset];
        match percent_change(before.price, after.price) {
            Some(percent_change) => ImpactAnalysis::Computed(PriceImpact {
                before_date: before.date,
                before_price: before.price,
                after_date: after.date,
                after_price: after.price,
                percent_change,
            }),
            None => ImpactAnalysis::ZeroBasePrice {
                before_date: before.date,
            },
        }
    }

    /// Classify a percent move for reporting.
    pub fn interpret(&self, percent_change: f64) -> ImpactInterpretation {
        let direction = if percent_change >= MAJOR_SHIFT_PERCENT {
            ShiftDirection::MajorPositive
        } else if percent_change <= -MAJOR_SHIFT_PERCENT {
            ShiftDirection::MajorNegative
        } else if percent_change > 0.0 {
            ShiftDirection::MinorPositive
        } else {
            ShiftDirection::MinorNegative
        };
        let magnitude = if percent_change.abs() > SIGNIFICANT_SHIFT_PERCENT {
            ShiftMagnitude::Significant
        } else {
            ShiftMagnitude::Moderate
        };
        ImpactInterpretation {
            direction,
            magnitude,
        }
    }

    /// Last sample strictly before `date` vs. first sample on or after it.
    pub fn price_shift_across(&self, series: &[PricePoint], date: NaiveDate) -> Option<PriceShift> {
        let split = series.partition_point(|p| p.date < date);
        let before = series.get(split.checked_sub(1)?)?;
        let after = series.get(split)?;
        let percent_change = percent_change(before.price, after.price)?;
        Some(PriceShift {
            before: before.date,
            price_before: before.price,
            after: after.date,
            price_after: after.price,
            percent_change,
        })
    }

    /// Full report for one selected change point.
    pub fn analyze_change_point(
        &self,
        series: &[PricePoint],
        catalog: &EventCatalog,
        change_point: &ChangePoint,
        settings: &AnalysisSettings,
    ) -> Result<ChangePointReport, CoreError> {
        let nearest_event =
            self.nearest_event(change_point.date, catalog, settings.nearest_event_max_days)?;
        let correlated =
            self.is_correlated(change_point.date, catalog, settings.correlation_window_days)?;
        let impact = self.impact_window(series, change_point.date, settings.impact_offset);
        let interpretation = impact
            .impact()
            .map(|i| self.interpret(i.percent_change));

        Ok(ChangePointReport {
            change_point: change_point.clone(),
            nearest_event,
            impact,
            interpretation,
            correlated,
        })
    }
}

fn check_distance(name: &str, days: i64) -> Result<(), CoreError> {
    if days < 0 {
        return Err(CoreError::config(format!(
            "{name} must not be negative, got {days}"
        )));
    }
    Ok(())
}

impl Default for CorrelationService {
    fn default() -> Self {
        Self::new()
    }
}
