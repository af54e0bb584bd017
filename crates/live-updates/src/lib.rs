/// Live-update channel for the document client.
/// One persistent WebSocket connection, capped exponential-backoff
/// reconnection, and subscriber fan-out for messages and status.
mod protocol;
pub use protocol::*;

mod client;
pub use client::*;
