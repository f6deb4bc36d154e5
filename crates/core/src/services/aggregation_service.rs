use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::analytics::{
    CategoryImpact, ChangePointSummary, DailyMove, DashboardSummary, ImpactSummary,
    LargestDailyMoves, PriceStatistics,
};
use crate::models::change_point::ChangePoint;
use crate::models::event::{Event, EventCategory};
use crate::models::price::PricePoint;
use crate::services::stats::{mean, percent_change, population_std};

/// Dashboard roll-ups over events, change points and the price series.
///
/// Every result is computed fresh from its inputs; nothing is cached here.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Group events by category and summarize their recorded percent changes.
    ///
    /// Every known category appears in the result. Categories without events
    /// report `count = 0` and zero for average, max and min.
    pub fn summarize_by_category(&self, events: &[Event]) -> ImpactSummary {
        let mut summary: ImpactSummary = EventCategory::ALL
            .into_iter()
            .map(|c| (c, CategoryImpact::default()))
            .collect();

        for category in EventCategory::ALL {
            let changes: Vec<f64> = events
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.percent_change)
                .collect();
            if changes.is_empty() {
                continue;
            }
            summary.insert(
                category,
                CategoryImpact {
                    count: changes.len(),
                    average_percent_change: mean(&changes),
                    max_percent_change: changes.iter().copied().fold(f64::MIN, f64::max),
                    min_percent_change: changes.iter().copied().fold(f64::MAX, f64::min),
                },
            );
        }

        summary
    }

    /// Min, max, average and volatility (population std) of all prices.
    /// `None` for an empty series.
    pub fn price_statistics(&self, series: &[PricePoint]) -> Option<PriceStatistics> {
        if series.is_empty() {
            return None;
        }
        let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
        let average = mean(&prices);
        Some(PriceStatistics {
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            average,
            volatility: population_std(&prices, average),
        })
    }

    /// Largest day-over-day increase and decrease.
    ///
    /// Scans left to right and only replaces the current record on a strictly
    /// larger move, so ties keep the earliest date. Pairs starting at a zero
    /// price have no percent change and are skipped.
    pub fn largest_daily_moves(&self, series: &[PricePoint]) -> LargestDailyMoves {
        let mut moves = LargestDailyMoves::default();

        for pair in series.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let Some(change) = percent_change(prev.price, curr.price) else {
                warn!(date = %prev.date, "zero price, skipping daily move");
                continue;
            };

            if change > 0.0
                && moves
                    .largest_increase
                    .as_ref()
                    .map_or(true, |m| change > m.percent_change)
            {
                moves.largest_increase = Some(DailyMove {
                    date: curr.date,
                    percent_change: change,
                });
            }
            if change < 0.0
                && moves
                    .largest_decrease
                    .as_ref()
                    .map_or(true, |m| change < m.percent_change)
            {
                moves.largest_decrease = Some(DailyMove {
                    date: curr.date,
                    percent_change: change,
                });
            }
        }

        moves
    }

    /// Count known vs. detected change points and summarize detector scores.
    pub fn summarize_change_points(&self, change_points: &[ChangePoint]) -> ChangePointSummary {
        let scores: Vec<f64> = change_points.iter().filter_map(|cp| cp.score).collect();
        ChangePointSummary {
            total: change_points.len(),
            known: change_points.len() - scores.len(),
            detected: scores.len(),
            max_score: scores.iter().copied().reduce(f64::max),
            mean_score: (!scores.is_empty()).then(|| mean(&scores)),
        }
    }

    /// All dashboard statistics in one pass over the inputs.
    pub fn dashboard_summary(&self, series: &[PricePoint], events: &[Event]) -> DashboardSummary {
        let price_statistics = self.price_statistics(series);
        let price_range = price_statistics.as_ref().map(|s| s.max - s.min);
        let price_range_percent = price_statistics
            .as_ref()
            .and_then(|s| percent_change(s.min, s.max));

        let events_by_category: BTreeMap<EventCategory, usize> = EventCategory::ALL
            .into_iter()
            .map(|c| (c, events.iter().filter(|e| e.category == c).count()))
            .collect();

        // Ties go to the category listed first in EventCategory::ALL.
        let mut most_common_category: Option<(EventCategory, usize)> = None;
        for category in EventCategory::ALL {
            let count = events_by_category[&category];
            if count > 0 && most_common_category.map_or(true, |(_, best)| count > best) {
                most_common_category = Some((category, count));
            }
        }

        debug!(
            samples = series.len(),
            events = events.len(),
            "computed dashboard summary"
        );

        DashboardSummary {
            price_statistics,
            price_range,
            price_range_percent,
            daily_moves: self.largest_daily_moves(series),
            total_events: events.len(),
            events_by_category,
            most_common_category: most_common_category.map(|(c, _)| c),
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
