//! Distribution of a week's surplus or deficit.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::AllocationPlanner;
pub use types::{AllocationPlan, GoalContribution, GoalSelection, PlanMode, UserOverrides};
