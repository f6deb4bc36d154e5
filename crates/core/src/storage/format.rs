//! Record layouts for the price CSV files and the change-point export.
//!
//! Price CSV (EIA export layout):
//! ```text
//! Date,Price
//! 20-May-87,18.63
//! "Apr 22, 2020",13.77
//! 2022-03-01,117.25
//! ```
//! Rows with an empty price are skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::warn;

use crate::errors::CoreError;
use crate::models::change_point::ChangePoint;
use crate::models::price::PricePoint;

/// Date layouts accepted in price files, tried in order.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%b-%y", "%b %d, %Y"];

/// Parse a date in any of the [`DATE_FORMATS`].
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| CoreError::InvalidDate(format!("unrecognized date '{raw}'")))
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Price", alias = "price")]
    price: Option<f64>,
}

/// Read `Date,Price` rows. Order is preserved; sorting is the caller's job.
pub fn read_price_rows<R: Read>(reader: R) -> Result<Vec<PricePoint>, CoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for (line, row) in csv_reader.deserialize::<PriceRow>().enumerate() {
        let row = row?;
        let Some(price) = row.price else {
            warn!(line = line + 2, date = %row.date, "skipping row without price");
            continue;
        };
        points.push(PricePoint::new(parse_date(&row.date)?, price));
    }
    Ok(points)
}

#[derive(Debug, Serialize)]
struct ChangePointRow<'a> {
    date: NaiveDate,
    price: f64,
    score: Option<f64>,
    kind: &'a str,
}

/// Write change points as `date,price,score,kind`. Known points leave `score` empty.
pub fn write_change_point_rows<W: Write>(
    writer: W,
    change_points: &[ChangePoint],
) -> Result<W, CoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for cp in change_points {
        let kind = cp.kind().to_string();
        csv_writer.serialize(ChangePointRow {
            date: cp.date,
            price: cp.price,
            score: cp.score,
            kind: &kind,
        })?;
    }
    csv_writer
        .into_inner()
        .map_err(|e| CoreError::Csv(e.to_string()))
}
