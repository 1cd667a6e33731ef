//! Agent system for tool-assisted question answering.

mod runner;

pub use runner::{Agent, AgentOutcome, ToolCallRecord};
