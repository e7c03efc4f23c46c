//! Advisor personas and the agent execution seam.
//!
//! Personas are declarative: a name, instructions, an optional model, and an
//! optional memory search tool pointing at the conversation's search index.
//! An [`AgentRunner`] executes a persona over a message sequence.

mod error;
pub mod persona;
mod responses;
mod runner;

pub use error::AgentError;
pub use persona::{MemorySearch, Persona, StateRecord, faith_foundry, hobby_farm, resolve_state};
pub use responses::{ResponsesOptions, ResponsesRunner};
pub use runner::{AgentRunner, RunOutput};
