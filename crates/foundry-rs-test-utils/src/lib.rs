//! Test helpers shared across Foundry crates.

pub mod history;
pub mod index;
pub mod runner;

pub use history::{assistant_message, tool_call, tool_result, user_message};
pub use index::RecordingIndex;
pub use runner::ScriptedRunner;
