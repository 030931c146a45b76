//! Core proxy logic

pub mod assistant;
pub mod limiter;
pub mod selection;
pub mod upstream;

pub use assistant::{AssistantAnswer, AssistantService};
