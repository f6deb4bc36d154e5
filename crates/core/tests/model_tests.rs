use chrono::NaiveDate;
use brent_insight_core::errors::CoreError;
use brent_insight_core::models::analytics::{ImpactAnalysis, PriceImpact};
use brent_insight_core::models::change_point::{ChangePoint, ChangePointKind};
use brent_insight_core::models::chart::RangePreset;
use brent_insight_core::models::event::{Event, EventCatalog, EventCategory};
use brent_insight_core::models::price::{index_of_date, PricePoint, PriceSeries};
use brent_insight_core::models::settings::AnalysisSettings;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn p(y: i32, m: u32, day: u32, price: f64) -> PricePoint {
    PricePoint::new(d(y, m, day), price)
}

fn sample_series() -> PriceSeries {
    PriceSeries::new(vec![
        p(2022, 1, 3, 78.0),
        p(2022, 1, 4, 79.5),
        p(2022, 1, 5, 80.1),
        p(2022, 1, 10, 82.3),
        p(2022, 1, 11, 83.0),
    ])
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  PriceSeries
// ═══════════════════════════════════════════════════════════════════

mod price_series {
    use super::*;

    #[test]
    fn new_sorts_by_date() {
        let series = PriceSeries::new(vec![
            p(2022, 3, 1, 117.25),
            p(2022, 1, 1, 88.42),
            p(2022, 2, 1, 97.09),
        ])
        .unwrap();
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2022, 1, 1), d(2022, 2, 1), d(2022, 3, 1)]);
    }

    #[test]
    fn duplicate_dates_rejected() {
        let result = PriceSeries::new(vec![p(2022, 1, 1, 1.0), p(2022, 1, 1, 2.0)]);
        assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
    }

    #[test]
    fn non_finite_price_rejected() {
        let result = PriceSeries::new(vec![p(2022, 1, 1, f64::NAN)]);
        assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
        let result = PriceSeries::new(vec![p(2022, 1, 1, f64::INFINITY)]);
        assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
    }

    #[test]
    fn from_sorted_rejects_out_of_order() {
        let result = PriceSeries::from_sorted(vec![p(2022, 2, 1, 1.0), p(2022, 1, 1, 2.0)]);
        match result {
            Err(CoreError::InvalidSeries(msg)) => assert!(msg.contains("out of order")),
            other => panic!("expected InvalidSeries, got {other:?}"),
        }
    }

    #[test]
    fn zero_and_negative_prices_allowed() {
        let series = PriceSeries::new(vec![p(2020, 4, 20, -37.63), p(2020, 4, 21, 0.0)]).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new(vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.date_range(), None);
        assert!(series.slice(d(2000, 1, 1), d(2030, 1, 1)).is_empty());
    }

    #[test]
    fn accessors() {
        let series = sample_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series.first().unwrap().date, d(2022, 1, 3));
        assert_eq!(series.last().unwrap().date, d(2022, 1, 11));
        assert_eq!(series.get(2).unwrap().price, 80.1);
        assert!(series.get(5).is_none());
        assert_eq!(series.date_range(), Some((d(2022, 1, 3), d(2022, 1, 11))));
    }

    #[test]
    fn slice_is_inclusive() {
        let series = sample_series();
        let slice = series.slice(d(2022, 1, 4), d(2022, 1, 10));
        let dates: Vec<_> = slice.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2022, 1, 4), d(2022, 1, 5), d(2022, 1, 10)]);
    }

    #[test]
    fn slice_with_unsampled_bounds() {
        let series = sample_series();
        let slice = series.slice(d(2022, 1, 6), d(2022, 1, 9));
        assert!(slice.is_empty());

        let slice = series.slice(d(2022, 1, 6), d(2022, 1, 30));
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].date, d(2022, 1, 10));
    }

    #[test]
    fn slice_reversed_bounds_is_empty() {
        let series = sample_series();
        assert!(series.slice(d(2022, 1, 11), d(2022, 1, 3)).is_empty());
    }

    #[test]
    fn slice_whole_range() {
        let series = sample_series();
        assert_eq!(series.slice(d(1900, 1, 1), d(2100, 1, 1)).len(), 5);
    }

    #[test]
    fn index_of_date_found_and_missing() {
        let series = sample_series();
        assert_eq!(series.index_of_date(d(2022, 1, 3)), Some(0));
        assert_eq!(series.index_of_date(d(2022, 1, 10)), Some(3));
        assert_eq!(series.index_of_date(d(2022, 1, 6)), None);
        assert_eq!(index_of_date(series.points(), d(2022, 1, 11)), Some(4));
    }

    #[test]
    fn price_on() {
        let series = sample_series();
        assert_eq!(series.price_on(d(2022, 1, 5)), Some(80.1));
        assert_eq!(series.price_on(d(2022, 1, 6)), None);
    }

    #[test]
    fn serializes_as_plain_array() {
        let series = PriceSeries::new(vec![p(2022, 3, 1, 117.25)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"date":"2022-03-01","price":117.25}]"#);
    }

    #[test]
    fn deserialize_sorts_and_validates() {
        let series: PriceSeries = serde_json::from_str(
            r#"[{"date":"2022-02-01","price":2.0},{"date":"2022-01-01","price":1.0}]"#,
        )
        .unwrap();
        assert_eq!(series.first().unwrap().date, d(2022, 1, 1));

        let dup = serde_json::from_str::<PriceSeries>(
            r#"[{"date":"2022-01-01","price":2.0},{"date":"2022-01-01","price":1.0}]"#,
        );
        assert!(dup.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  EventCategory / Event
// ═══════════════════════════════════════════════════════════════════

mod event_category {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(EventCategory::Economic.to_string(), "Economic");
        assert_eq!(EventCategory::NaturalDisaster.to_string(), "Natural Disaster");
        assert_eq!(EventCategory::Supply.to_string(), "Supply");
    }

    #[test]
    fn serde_uses_dataset_names() {
        let json = serde_json::to_string(&EventCategory::NaturalDisaster).unwrap();
        assert_eq!(json, r#""Natural Disaster""#);
        let back: EventCategory = serde_json::from_str(r#""Geopolitical""#).unwrap();
        assert_eq!(back, EventCategory::Geopolitical);
    }

    #[test]
    fn all_lists_each_category_once() {
        let unique: std::collections::HashSet<_> = EventCategory::ALL.into_iter().collect();
        assert_eq!(unique.len(), EventCategory::ALL.len());
    }
}

mod event {
    use super::*;

    #[test]
    fn deserialize_dataset_record() {
        let json = r#"{
            "date": "1990-08-02",
            "event": "Iraq Invasion of Kuwait",
            "type": "Geopolitical",
            "source": "Global News Archives",
            "price": 19.92,
            "percent_change": 12.67,
            "description": "Iraq invades Kuwait."
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.date, d(1990, 8, 2));
        assert_eq!(event.label, "Iraq Invasion of Kuwait");
        assert_eq!(event.category, EventCategory::Geopolitical);
        assert_eq!(event.percent_change, 12.67);
        assert_eq!(event.source, "Global News Archives");
    }

    #[test]
    fn description_and_source_optional() {
        let json = r#"{"date":"2022-10-01","event":"OPEC+ cut","type":"Economic","price":97.92,"percent_change":7.7}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.description.is_empty());
        assert!(event.source.is_empty());
    }

    #[test]
    fn builder_helpers() {
        let event = Event::new(d(2020, 3, 9), "Price war", EventCategory::Market, 34.36, -24.1)
            .with_description("Saudi Arabia and Russia start a price war.")
            .with_source("Reuters");
        assert_eq!(event.description, "Saudi Arabia and Russia start a price war.");
        assert_eq!(event.source, "Reuters");
    }

    #[test]
    fn serialize_uses_dataset_field_names() {
        let event = Event::new(d(2020, 3, 9), "Price war", EventCategory::Market, 34.36, -24.1);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "Price war");
        assert_eq!(value["type"], "Market");
        assert_eq!(value["percent_change"], -24.1);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  EventCatalog
// ═══════════════════════════════════════════════════════════════════

mod event_catalog {
    use super::*;

    fn catalog() -> EventCatalog {
        EventCatalog::new(vec![
            Event::new(d(2022, 10, 5), "OPEC+ cut", EventCategory::Policy, 93.4, 7.7),
            Event::new(d(2022, 2, 24), "Invasion", EventCategory::Geopolitical, 99.08, 19.3),
            Event::new(d(2022, 2, 24), "Sanctions", EventCategory::Economic, 99.08, 2.0),
            Event::new(d(2023, 3, 15), "Banking stress", EventCategory::Economic, 73.2, -4.4),
        ])
    }

    #[test]
    fn sorted_by_date_stable() {
        let catalog = catalog();
        let labels: Vec<_> = catalog.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Invasion", "Sanctions", "OPEC+ cut", "Banking stress"]);
    }

    #[test]
    fn on_date_first_match_wins() {
        let catalog = catalog();
        assert_eq!(catalog.on_date(d(2022, 2, 24)).unwrap().label, "Invasion");
        assert!(catalog.on_date(d(2022, 2, 25)).is_none());
    }

    #[test]
    fn in_range_inclusive() {
        let catalog = catalog();
        assert_eq!(catalog.in_range(d(2022, 2, 24), d(2022, 10, 5)).len(), 3);
        assert!(catalog.in_range(d(2022, 3, 1), d(2022, 9, 30)).is_empty());
        assert!(catalog.in_range(d(2023, 1, 1), d(2022, 1, 1)).is_empty());
    }

    #[test]
    fn by_category() {
        let catalog = catalog();
        assert_eq!(catalog.by_category(Some(EventCategory::Economic)).len(), 2);
        assert_eq!(catalog.by_category(Some(EventCategory::Supply)).len(), 0);
        assert_eq!(catalog.by_category(None).len(), 4);
    }

    #[test]
    fn categories_present_in_display_order() {
        assert_eq!(
            catalog().categories_present(),
            vec![
                EventCategory::Economic,
                EventCategory::Geopolitical,
                EventCategory::Policy
            ]
        );
    }

    #[test]
    fn deserialize_sorts() {
        let json = r#"[
            {"date":"2022-10-01","event":"B","type":"Economic","price":1.0,"percent_change":1.0},
            {"date":"2022-03-01","event":"A","type":"Geopolitical","price":1.0,"percent_change":1.0}
        ]"#;
        let catalog: EventCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.events()[0].label, "A");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChangePoint
// ═══════════════════════════════════════════════════════════════════

mod change_point {
    use super::*;

    #[test]
    fn known_has_no_score() {
        let cp = ChangePoint::known(d(2008, 7, 3), 146.08);
        assert_eq!(cp.kind(), ChangePointKind::Known);
        assert!(!cp.is_detected());
        assert_eq!(cp.score, None);
    }

    #[test]
    fn detected_has_score() {
        let cp = ChangePoint::detected(d(2008, 7, 3), 146.08, 3.2);
        assert_eq!(cp.kind(), ChangePointKind::Detected);
        assert_eq!(cp.score, Some(3.2));
    }

    #[test]
    fn known_serializes_without_score() {
        let json = serde_json::to_string(&ChangePoint::known(d(2016, 1, 20), 27.88)).unwrap();
        assert_eq!(json, r#"{"date":"2016-01-20","price":27.88}"#);
        let back: ChangePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ChangePointKind::Known);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ImpactAnalysis
// ═══════════════════════════════════════════════════════════════════

mod impact_analysis {
    use super::*;

    #[test]
    fn impact_accessor() {
        let computed = ImpactAnalysis::Computed(PriceImpact {
            before_date: d(2022, 1, 1),
            before_price: 100.0,
            after_date: d(2022, 1, 15),
            after_price: 110.0,
            percent_change: 10.0,
        });
        assert!(computed.is_computed());
        assert_eq!(computed.impact().unwrap().after_price, 110.0);
        assert!(ImpactAnalysis::DateNotInSeries.impact().is_none());
    }

    #[test]
    fn tagged_serialization() {
        let value = serde_json::to_value(ImpactAnalysis::InsufficientData {
            samples_before: 2,
            samples_after: 9,
        })
        .unwrap();
        assert_eq!(value["status"], "insufficient_data");
        assert_eq!(value["samples_before"], 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  RangePreset
// ═══════════════════════════════════════════════════════════════════

mod range_preset {
    use super::*;

    #[test]
    fn start_dates() {
        let anchor = d(2023, 12, 31);
        assert_eq!(RangePreset::ThreeMonths.start_date(anchor), Some(d(2023, 9, 30)));
        assert_eq!(RangePreset::SixMonths.start_date(anchor), Some(d(2023, 6, 30)));
        assert_eq!(RangePreset::OneYear.start_date(anchor), Some(d(2022, 12, 31)));
        assert_eq!(RangePreset::All.start_date(anchor), None);
    }

    #[test]
    fn display() {
        assert_eq!(RangePreset::ThreeMonths.to_string(), "3m");
        assert_eq!(RangePreset::All.to_string(), "all");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AnalysisSettings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = AnalysisSettings::default();
        assert_eq!(s.threshold, 2.0);
        assert_eq!(s.detection_window, 10);
        assert_eq!(s.smoothing_window, 7);
        assert_eq!(s.impact_offset, 7);
        assert_eq!(s.nearest_event_max_days, 14);
        assert_eq!(s.correlation_window_days, 7);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let s = AnalysisSettings::from_json(r#"{"threshold": 3.5}"#).unwrap();
        assert_eq!(s.threshold, 3.5);
        assert_eq!(s.detection_window, 10);
    }

    #[test]
    fn json_roundtrip() {
        let s = AnalysisSettings {
            threshold: 1.5,
            detection_window: 5,
            ..AnalysisSettings::default()
        };
        let back = AnalysisSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn invalid_values_rejected() {
        let cases = [
            AnalysisSettings { threshold: 0.0, ..Default::default() },
            AnalysisSettings { threshold: -1.0, ..Default::default() },
            AnalysisSettings { threshold: f64::NAN, ..Default::default() },
            AnalysisSettings { detection_window: 0, ..Default::default() },
            AnalysisSettings { smoothing_window: 0, ..Default::default() },
            AnalysisSettings { nearest_event_max_days: -1, ..Default::default() },
            AnalysisSettings { correlation_window_days: -7, ..Default::default() },
        ];
        for s in cases {
            assert!(
                matches!(s.validate(), Err(CoreError::InvalidConfiguration(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_json_validates() {
        let result = AnalysisSettings::from_json(r#"{"detection_window": 0}"#);
        assert!(matches!(result, Err(CoreError::InvalidConfiguration(_))));
    }

    #[test]
    fn from_json_rejects_negative_window() {
        let result = AnalysisSettings::from_json(r#"{"detection_window": -3}"#);
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }
}
