pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    analytics::{ChangePointReport, ChangePointSummary, DashboardSummary, ImpactSummary},
    change_point::ChangePoint,
    chart::{ChartDataPoint, RangePreset},
    event::EventCatalog,
    price::{PriceSeries, SmoothedPoint},
    settings::AnalysisSettings,
};
use services::{
    aggregation_service::AggregationService, chart_service::ChartService,
    correlation_service::CorrelationService, detection_service::DetectionService,
    smoothing_service::SmoothingService,
};
use std::collections::HashMap;
use storage::loader::DatasetLoader;
use tracing::debug;

use errors::CoreError;

/// Memo key for detection results: (threshold bits, window size).
type DetectionKey = (u64, usize);

/// Main entry point for the Brent Insight core library.
///
/// Holds one immutable dataset (prices, events, curated change points), the
/// analysis settings, and all services needed to analyze it. Detection
/// results are memoized per `(threshold, window)` because the series never
/// changes after construction.
#[must_use]
pub struct BrentAnalyzer {
    series: PriceSeries,
    catalog: EventCatalog,
    known_change_points: Vec<ChangePoint>,
    settings: AnalysisSettings,
    smoothing_service: SmoothingService,
    detection_service: DetectionService,
    correlation_service: CorrelationService,
    aggregation_service: AggregationService,
    chart_service: ChartService,
    detection_cache: HashMap<DetectionKey, Vec<ChangePoint>>,
}

impl std::fmt::Debug for BrentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrentAnalyzer")
            .field("samples", &self.series.len())
            .field("events", &self.catalog.len())
            .field("known_change_points", &self.known_change_points.len())
            .field("settings", &self.settings)
            .field("cached_detections", &self.detection_cache.len())
            .finish()
    }
}

impl BrentAnalyzer {
    /// Create an analyzer over a dataset with default settings.
    pub fn new(series: PriceSeries, catalog: EventCatalog) -> Self {
        Self {
            series,
            catalog,
            known_change_points: Vec::new(),
            settings: AnalysisSettings::default(),
            smoothing_service: SmoothingService::new(),
            detection_service: DetectionService::new(),
            correlation_service: CorrelationService::new(),
            aggregation_service: AggregationService::new(),
            chart_service: ChartService::new(),
            detection_cache: HashMap::new(),
        }
    }

    /// Attach curated change points (sorted by date on the way in).
    pub fn with_known_change_points(mut self, mut change_points: Vec<ChangePoint>) -> Self {
        change_points.sort_by_key(|cp| cp.date);
        self.known_change_points = change_points;
        self
    }

    /// Replace the default settings. Fails on invalid settings.
    pub fn with_settings(mut self, settings: AnalysisSettings) -> Result<Self, CoreError> {
        self.set_settings(settings)?;
        Ok(self)
    }

    /// Load prices (JSON or CSV), events and optional curated change points
    /// from disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_files(
        prices_path: &str,
        events_path: &str,
        change_points_path: Option<&str>,
    ) -> Result<Self, CoreError> {
        let series = DatasetLoader::prices_from_file(prices_path)?;
        let catalog = DatasetLoader::events_from_file(events_path)?;
        let known = match change_points_path {
            Some(path) => DatasetLoader::change_points_from_file(path)?,
            None => Vec::new(),
        };
        Ok(Self::new(series, catalog).with_known_change_points(known))
    }

    // ── Dataset ─────────────────────────────────────────────────────

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn events(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn known_change_points(&self) -> &[ChangePoint] {
        &self.known_change_points
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Replace all settings after validating them. Cached detections stay
    /// valid because they are keyed by their own parameters.
    pub fn set_settings(&mut self, settings: AnalysisSettings) -> Result<(), CoreError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Change the detection threshold (z-score cutoff).
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), CoreError> {
        let settings = AnalysisSettings {
            threshold,
            ..self.settings.clone()
        };
        self.set_settings(settings)
    }

    /// Change the detection window size.
    pub fn set_detection_window(&mut self, detection_window: usize) -> Result<(), CoreError> {
        let settings = AnalysisSettings {
            detection_window,
            ..self.settings.clone()
        };
        self.set_settings(settings)
    }

    // ── Smoothing & Detection ───────────────────────────────────────

    /// Moving average over the whole series using the configured window.
    pub fn smoothed(&self) -> Result<Vec<SmoothedPoint>, CoreError> {
        self.smoothing_service
            .smooth(self.series.points(), self.settings.smoothing_window)
    }

    /// Detected change points for the current threshold and window.
    /// Results are memoized per `(threshold, window)`.
    pub fn detected_change_points(&mut self) -> Result<Vec<ChangePoint>, CoreError> {
        let key = (
            self.settings.threshold.to_bits(),
            self.settings.detection_window,
        );
        if let Some(cached) = self.detection_cache.get(&key) {
            return Ok(cached.clone());
        }

        let detected = self.detection_service.detect(
            self.series.points(),
            self.settings.threshold,
            self.settings.detection_window,
        )?;
        debug!(
            threshold = self.settings.threshold,
            window = self.settings.detection_window,
            detected = detected.len(),
            "caching detection result"
        );
        self.detection_cache.insert(key, detected.clone());
        Ok(detected)
    }

    /// Detect change points within `[start, end]` only. Not memoized.
    pub fn detect_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ChangePoint>, CoreError> {
        self.detection_service.detect(
            self.series.slice(start, end),
            self.settings.threshold,
            self.settings.detection_window,
        )
    }

    /// Number of memoized detection results.
    pub fn cached_detections(&self) -> usize {
        self.detection_cache.len()
    }

    pub fn clear_detection_cache(&mut self) {
        self.detection_cache.clear();
    }

    // ── Correlation ─────────────────────────────────────────────────

    /// Nearest event, impact window and interpretation for one change point.
    pub fn report_for(&self, change_point: &ChangePoint) -> Result<ChangePointReport, CoreError> {
        self.correlation_service.analyze_change_point(
            self.series.points(),
            &self.catalog,
            change_point,
            &self.settings,
        )
    }

    /// Reports for every known and detected change point, ordered by date
    /// (known before detected on the same date).
    pub fn all_reports(&mut self) -> Result<Vec<ChangePointReport>, CoreError> {
        let mut points = self.known_change_points.clone();
        points.extend(self.detected_change_points()?);
        points.sort_by_key(|cp| (cp.date, cp.is_detected()));
        points.iter().map(|cp| self.report_for(cp)).collect()
    }

    // ── Aggregation ─────────────────────────────────────────────────

    /// Per-category event impact (every known category present).
    #[must_use]
    pub fn impact_summary(&self) -> ImpactSummary {
        self.aggregation_service
            .summarize_by_category(self.catalog.events())
    }

    #[must_use]
    pub fn dashboard_summary(&self) -> DashboardSummary {
        self.aggregation_service
            .dashboard_summary(self.series.points(), self.catalog.events())
    }

    /// Counts and scores over known plus currently detected change points.
    pub fn change_point_summary(&mut self) -> Result<ChangePointSummary, CoreError> {
        let mut points = self.known_change_points.clone();
        points.extend(self.detected_change_points()?);
        Ok(self.aggregation_service.summarize_change_points(&points))
    }

    // ── Chart Data ──────────────────────────────────────────────────

    /// Chart points for a range preset anchored at `anchor`, optionally with
    /// the configured moving average.
    pub fn chart_data(
        &self,
        preset: RangePreset,
        anchor: NaiveDate,
        with_moving_average: bool,
    ) -> Result<Vec<ChartDataPoint>, CoreError> {
        let visible = self.chart_service.range(&self.series, preset, anchor);
        let window = with_moving_average.then_some(self.settings.smoothing_window);
        self.chart_service
            .annotate(visible, &self.catalog, &self.known_change_points, window)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Currently detected change points as CSV (`date,price,score,kind`).
    pub fn export_detected_to_csv(&mut self) -> Result<String, CoreError> {
        let detected = self.detected_change_points()?;
        DatasetLoader::change_points_to_csv(&detected)
    }

    /// Reports for every change point as pretty JSON.
    pub fn export_reports_to_json(&mut self) -> Result<String, CoreError> {
        let reports = self.all_reports()?;
        DatasetLoader::reports_to_json(&reports)
    }
}
