// Conversation handling
//
// Composes the model context for each request and drives the two-phase
// tool-calling exchange that produces the final answer.

mod orchestrator;
mod prompt;

pub use orchestrator::{HistoryTurn, Orchestrator};
pub use prompt::{system_prompt, DATABASE_SCHEMA};
