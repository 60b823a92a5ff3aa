//! AquaChat Runtime - Connection lifecycle, session store, and event relay
//!
//! This crate provides the client-side infrastructure for talking to an
//! AquaChat server over its bidirectional event channel:
//!
//! - **Configuration**: Resolving the server endpoint once per process
//! - **Transport**: WebSocket framing of named JSON events
//! - **Connection**: Handle lifecycle, bounded reconnection, event dispatch
//! - **Session**: The at-most-one-handle store keyed by auth token
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  aqua-cli   │  View controllers (login, lobby, room)
//! └──────┬──────┘
//!        │ owns one Session
//! ┌──────▼──────┐
//! │ aqua-runtime│  This crate
//! │  ┌────────┐ │
//! │  │Session │ │  token-keyed handle store
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Conn   │ │  emit/on/off + state machine
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  WebSocket transport
//! │  └────────┘ │
//! └─────────────┘
//! ```
//!
//! # Ownership
//!
//! A [`Session`] holds at most one live [`Connection`] at a time. Opening
//! with the token already in use returns the existing handle; opening with
//! a different token closes the old handle before the new one exists.
//! Relay operations (`send`/`subscribe`/`unsubscribe`) are silent no-ops
//! while no handle is open.

pub mod config;
pub mod connection;
pub mod error;
pub mod session;
pub mod transport;

// Re-export key types at crate root
pub use config::{Config, DEFAULT_ENDPOINT, DEFAULT_RECONNECT_LIMIT, ENDPOINT_ENV};
pub use connection::{ConnectOptions, Connection, ConnectionState, HandlerId};
pub use error::{Error, Result};
pub use session::Session;
