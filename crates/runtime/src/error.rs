//! Error types for the AquaChat runtime.
//!
//! Lifecycle operations (`Session::open`, `close`, the relay helpers) never
//! return these: they either succeed or degrade to logged no-ops. Errors
//! surface from the transport layer and from callers awaiting connectivity.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the AquaChat runtime.
#[derive(Debug, Error)]
pub enum Error {
	/// Failed to establish the WebSocket handshake.
	#[error("Failed to connect to AquaChat server: {0}")]
	ConnectionFailed(String),

	/// Transport-level error on an established connection.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Timeout waiting for the connection to reach a state.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Connection gave up after exhausting its reconnection budget.
	#[error("Connection failed after exhausting reconnection attempts")]
	ReconnectExhausted,

	/// Handle was closed while the caller was waiting on it.
	#[error("Connection closed")]
	Closed,
}
