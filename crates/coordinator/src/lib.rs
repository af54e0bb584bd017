/// Orchestration layer for the document client: wires the store, the
/// REST client and the live channel together, and feeds a notification
/// stream for the presentation layer.
mod config;
pub use config::*;

mod notifications;
pub use notifications::*;

mod coordinator;
pub use coordinator::*;
