use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a change point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangePointKind {
    /// Curated from historical records, no score
    Known,
    /// Produced by the detector, carries a score
    Detected,
}

impl std::fmt::Display for ChangePointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangePointKind::Known => write!(f, "Known"),
            ChangePointKind::Detected => write!(f, "Detected"),
        }
    }
}

/// A date where the price series shifts.
///
/// `score` is present only for detected points and is always `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ChangePoint {
    pub fn known(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            score: None,
        }
    }

    pub fn detected(date: NaiveDate, price: f64, score: f64) -> Self {
        Self {
            date,
            price,
            score: Some(score),
        }
    }

    pub fn kind(&self) -> ChangePointKind {
        if self.score.is_some() {
            ChangePointKind::Detected
        } else {
            ChangePointKind::Known
        }
    }

    pub fn is_detected(&self) -> bool {
        self.score.is_some()
    }
}
