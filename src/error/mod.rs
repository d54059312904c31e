pub mod planner;

pub use planner::{PlannerError, Result};
