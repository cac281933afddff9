mod plan;
mod planner;
pub mod prompts;

pub use plan::{Plan, ResearchTask, TaskTag};
pub use planner::{parse_plan, Planner};
