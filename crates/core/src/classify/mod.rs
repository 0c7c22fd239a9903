//! Overspend/under-spend classification of a closed week.

pub mod scenario;
pub mod service;


pub use scenario::Scenario;
pub use service::{ClassificationResult, ScenarioClassifier};
