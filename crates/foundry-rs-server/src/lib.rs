//! HTTP surface for the Foundry advisors.
//!
//! Two chat routes run a persona over the caller's messages and archive the
//! resulting history through the conversation journal; `/health` reports
//! liveness.

mod error;
mod routes;
mod serve;
mod state;

pub use error::ServerError;
pub use routes::router;
pub use serve::{ServeHandle, start};
pub use state::{AppState, ChatSettings};
