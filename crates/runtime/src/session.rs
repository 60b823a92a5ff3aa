//! Session store and connection manager.
//!
//! A [`Session`] holds at most one live [`Connection`] together with the
//! token it was opened with. It is an explicitly constructed object owned
//! by the application's composition root — not module-level state — so
//! tests can build independent instances.
//!
//! The invariant it enforces: requesting a connection with the token
//! already in use returns the existing handle unchanged; requesting with a
//! different token (absent counts as a distinct value) closes the old
//! handle before the new one is constructed, so two live handles never
//! coexist from the caller's perspective.

use std::sync::Arc;

use parking_lot::Mutex;

use aqua_protocol::{ClientEvent, ServerEvent, ServerEventKind};

use crate::config::Config;
use crate::connection::{ConnectOptions, Connection, HandlerId};

struct Active {
	connection: Arc<Connection>,
	token: Option<String>,
}

/// Process-wide owner of the single live connection handle.
pub struct Session {
	config: Config,
	active: Mutex<Option<Active>>,
}

impl Session {
	/// Build a session against a resolved endpoint configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			active: Mutex::new(None),
		}
	}

	/// Obtain a ready-to-use connection for `token` (`None` = anonymous).
	///
	/// Idempotent for the token currently held: the existing handle is
	/// returned with no side effects. A different token closes the old
	/// handle (best-effort, failures swallowed) and opens a new one.
	/// Returns synchronously; the handle connects in the background.
	///
	/// Must be called within a Tokio runtime.
	pub fn open(&self, token: Option<&str>) -> Arc<Connection> {
		let mut active = self.active.lock();

		if let Some(current) = active.as_ref() {
			if current.token.as_deref() == token {
				return Arc::clone(&current.connection);
			}
		}

		if let Some(previous) = active.take() {
			previous.connection.close();
		}

		let connection = Connection::open(
			&self.config.endpoint,
			ConnectOptions {
				token: token.map(str::to_owned),
				reconnect_limit: self.config.reconnect_limit,
			},
		);

		*active = Some(Active {
			connection: Arc::clone(&connection),
			token: token.map(str::to_owned),
		});

		connection
	}

	/// The existing handle, without risking opening a new one.
	pub fn current(&self) -> Option<Arc<Connection>> {
		self.active
			.lock()
			.as_ref()
			.map(|active| Arc::clone(&active.connection))
	}

	/// Best-effort close of the live handle, if any, and clear the store.
	/// No-op when the store is empty; never fails.
	pub fn close(&self) {
		if let Some(active) = self.active.lock().take() {
			active.connection.close();
		}
	}

	/// Forward an event over the live handle. Silent no-op when none exists.
	pub fn send(&self, event: ClientEvent) {
		if let Some(connection) = self.current() {
			connection.emit(event);
		}
	}

	/// Register a handler on the live handle. Returns `None` (and does
	/// nothing) when no handle exists.
	pub fn subscribe<F>(&self, kind: ServerEventKind, handler: F) -> Option<HandlerId>
	where
		F: Fn(&ServerEvent) + Send + Sync + 'static,
	{
		self.current().map(|connection| connection.on(kind, handler))
	}

	/// Remove one handler (`id = Some`) or all handlers for the kind
	/// (`id = None`) from the live handle. Silent no-op when none exists.
	pub fn unsubscribe(&self, kind: ServerEventKind, id: Option<HandlerId>) {
		if let Some(connection) = self.current() {
			connection.off(kind, id);
		}
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		self.close();
	}
}
