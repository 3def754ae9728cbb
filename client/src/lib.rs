//! Async client for the hsdev Haskell source analysis server.
//!
//! hsdev speaks newline-delimited JSON over a persistent TCP socket: every
//! request carries a correlation id, and the server answers each id with any
//! number of `notify` messages followed by exactly one `result` or `error`.
//! Responses arrive in whatever order the server finishes them, so many
//! requests can be in flight on the one ordered stream at once.
//!
//! [`Client`] owns a connection and does the multiplexing; commands in
//! [`command`] describe what to ask and how to decode the answer into the
//! types from `hsdev-types`; [`HsdevServer`] supervises the server process
//! for embedders that also own its lifecycle.

pub mod codec;
pub mod command;
pub mod types;

pub(crate) mod protocol;

mod connection;
mod error;
mod server;

pub use connection::Client;
pub use error::ClientError;
pub use server::HsdevServer;
pub use types::{ClientConfig, ClientEvent, LogLevel, ServerEvent, ServerOptions};
