pub mod aggregation_service;
pub mod chart_service;
pub mod correlation_service;
pub mod detection_service;
pub mod smoothing_service;

mod stats;
