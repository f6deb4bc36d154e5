use std::io::Read;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::analytics::ChangePointReport;
use crate::models::change_point::ChangePoint;
use crate::models::event::EventCatalog;
use crate::models::price::{PricePoint, PriceSeries};

use super::format;

/// Reads the price series, event catalog and curated change points, and
/// exports analysis results. Read-only with respect to the datasets.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Prices from a JSON array of `{ "date": "YYYY-MM-DD", "price": f64 }`.
    pub fn prices_from_json(json: &str) -> Result<PriceSeries, CoreError> {
        let points: Vec<PricePoint> = serde_json::from_str(json)?;
        debug!(samples = points.len(), "loaded prices from JSON");
        PriceSeries::new(points)
    }

    /// Prices from a `Date,Price` CSV.
    pub fn prices_from_csv<R: Read>(reader: R) -> Result<PriceSeries, CoreError> {
        let points = format::read_price_rows(reader)?;
        debug!(samples = points.len(), "loaded prices from CSV");
        PriceSeries::new(points)
    }

    /// Events from a JSON array using the dataset field names
    /// (`date`, `event`, `type`, `price`, `percent_change`, `description`, `source`).
    pub fn events_from_json(json: &str) -> Result<EventCatalog, CoreError> {
        let catalog: EventCatalog = serde_json::from_str(json)?;
        debug!(events = catalog.len(), "loaded events");
        Ok(catalog)
    }

    /// Curated change points from a JSON array of `{ date, price }`
    /// (an optional `score` marks a detected point).
    pub fn change_points_from_json(json: &str) -> Result<Vec<ChangePoint>, CoreError> {
        let mut points: Vec<ChangePoint> = serde_json::from_str(json)?;
        points.sort_by_key(|cp| cp.date);
        Ok(points)
    }

    /// Export change points as CSV text.
    pub fn change_points_to_csv(change_points: &[ChangePoint]) -> Result<String, CoreError> {
        let bytes = format::write_change_point_rows(Vec::new(), change_points)?;
        String::from_utf8(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Export change-point reports as pretty JSON.
    pub fn reports_to_json(reports: &[ChangePointReport]) -> Result<String, CoreError> {
        serde_json::to_string_pretty(reports)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize reports: {e}")))
    }

    /// Load prices from disk; `.csv` files are read as CSV, anything else as JSON.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn prices_from_file(path: &str) -> Result<PriceSeries, CoreError> {
        let is_csv = std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            let file = std::fs::File::open(path)?;
            Self::prices_from_csv(std::io::BufReader::new(file))
        } else {
            Self::prices_from_json(&std::fs::read_to_string(path)?)
        }
    }

    /// Load the event catalog from a JSON file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn events_from_file(path: &str) -> Result<EventCatalog, CoreError> {
        Self::events_from_json(&std::fs::read_to_string(path)?)
    }

    /// Load curated change points from a JSON file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn change_points_from_file(path: &str) -> Result<Vec<ChangePoint>, CoreError> {
        Self::change_points_from_json(&std::fs::read_to_string(path)?)
    }
}
