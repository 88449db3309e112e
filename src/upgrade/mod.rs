//! Upgrade selection and planning
//!
//! This module provides:
//! - Fix selection from a policy or an interactive chooser
//! - Write plan aggregation with companion deduplication

mod planner;
mod selector;

pub use planner::{build_plan, collect_companions};
pub use selector::{available_actions, select, select_with};
