use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a world event annotated on the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventCategory {
    Economic,
    Geopolitical,
    Market,
    #[serde(rename = "Natural Disaster")]
    NaturalDisaster,
    Policy,
    Supply,
}

impl EventCategory {
    /// Every known category, in display order.
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Economic,
        EventCategory::Geopolitical,
        EventCategory::Market,
        EventCategory::NaturalDisaster,
        EventCategory::Policy,
        EventCategory::Supply,
    ];
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Economic => write!(f, "Economic"),
            EventCategory::Geopolitical => write!(f, "Geopolitical"),
            EventCategory::Market => write!(f, "Market"),
            EventCategory::NaturalDisaster => write!(f, "Natural Disaster"),
            EventCategory::Policy => write!(f, "Policy"),
            EventCategory::Supply => write!(f, "Supply"),
        }
    }
}

/// A curated world event with its recorded price impact.
///
/// Field names on the wire follow the event dataset (`event`, `type`,
/// `percent_change`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Date of the event (daily granularity)
    pub date: NaiveDate,

    /// Short headline, e.g. "Iraq Invasion of Kuwait"
    #[serde(rename = "event")]
    pub label: String,

    #[serde(rename = "type")]
    pub category: EventCategory,

    /// Brent price on the event date
    pub price: f64,

    /// Recorded percent change attributed to the event
    pub percent_change: f64,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub source: String,
}

impl Event {
    pub fn new(
        date: NaiveDate,
        label: impl Into<String>,
        category: EventCategory,
        price: f64,
        percent_change: f64,
    ) -> Self {
        Self {
            date,
            label: label.into(),
            category,
            price,
            percent_change,
            description: String::new(),
            source: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// The event set, kept in ascending date order.
///
/// Sorting is stable, so events sharing a date keep their input order and
/// every "event on this date" lookup returns the first of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.date);
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Events dated within `[start, end]` (inclusive).
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> &[Event] {
        if start > end {
            return &[];
        }
        let from = self.events.partition_point(|e| e.date < start);
        let to = self.events.partition_point(|e| e.date <= end);
        &self.events[from..to]
    }

    /// Events of one category, or every event when `category` is `None`.
    pub fn by_category(&self, category: Option<EventCategory>) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .collect()
    }

    /// First event recorded on `date`.
    pub fn on_date(&self, date: NaiveDate) -> Option<&Event> {
        self.in_range(date, date).first()
    }

    /// Distinct categories that occur in the catalog, in `EventCategory` order.
    pub fn categories_present(&self) -> Vec<EventCategory> {
        EventCategory::ALL
            .into_iter()
            .filter(|c| self.events.iter().any(|e| e.category == *c))
            .collect()
    }
}

impl<'de> Deserialize<'de> for EventCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Event>::deserialize(deserializer).map(EventCatalog::new)
    }
}

impl<'a> IntoIterator for &'a EventCatalog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
