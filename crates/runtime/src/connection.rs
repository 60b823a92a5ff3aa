//! Connection handle for the AquaChat event channel.
//!
//! A [`Connection`] is the live handle callers exchange named events
//! through. It owns:
//! - an outbound queue drained by a writer task (fire-and-forget `emit`)
//! - a handler registry keyed by event kind (`on`/`off`)
//! - a state machine observable through a watch channel
//!
//! # Lifecycle
//!
//! Construction never fails and never blocks: [`Connection::open`] returns
//! a handle in the `Connecting` state and a background task performs the
//! handshake. Handshake failures retry up to the configured bound before
//! the handle settles in `Failed`; a drop of an established connection
//! retries within the same budget. An explicit [`close`](Connection::close)
//! is terminal — the handle never reconnects after it.
//!
//! # Dispatch
//!
//! Inbound frames are parsed and dispatched on a single reader task:
//! handlers for a given event kind run one at a time, in wire arrival
//! order. A slow handler delays delivery of subsequent frames.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc, watch};
use url::Url;

use aqua_protocol::{ClientEvent, InboundFrame, ServerEvent, ServerEventKind};

use crate::error::{Error, Result};
use crate::transport;

/// Delay between reconnection attempts.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Observable state of a connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
	/// Handshake in progress (initial or between retries).
	Connecting,
	/// Handshake completed, events flow.
	Connected,
	/// Explicitly closed, or lost and not coming back. Terminal.
	Disconnected,
	/// Reconnection budget exhausted. Terminal.
	Failed,
}

/// Options for opening a connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
	/// Session token presented as connection-time auth data; `None` connects
	/// anonymously.
	pub token: Option<String>,
	/// Automatic reconnection attempts before giving up.
	pub reconnect_limit: u32,
}

/// Identifier returned by [`Connection::on`], used to remove one handler.
pub type HandlerId = u64;

type Handler = Arc<dyn Fn(&ServerEvent) + Send + Sync>;
type HandlerMap = HashMap<ServerEventKind, Vec<(HandlerId, Handler)>>;

/// Live handle to the bidirectional event channel.
pub struct Connection {
	handshake: Url,
	outbound_tx: mpsc::UnboundedSender<ClientEvent>,
	handlers: Mutex<HandlerMap>,
	next_handler_id: AtomicU64,
	state_tx: watch::Sender<ConnectionState>,
	closed: AtomicBool,
	close_notify: Notify,
}

impl Connection {
	/// Open a connection to `endpoint`. Returns synchronously with a
	/// `Connecting` handle; the handshake proceeds on a background task.
	///
	/// Must be called within a Tokio runtime.
	pub fn open(endpoint: &Url, options: ConnectOptions) -> Arc<Self> {
		let handshake = transport::handshake_url(endpoint, options.token.as_deref());
		let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
		let (state_tx, _) = watch::channel(ConnectionState::Connecting);

		let connection = Arc::new(Self {
			handshake,
			outbound_tx,
			handlers: Mutex::new(HashMap::new()),
			next_handler_id: AtomicU64::new(0),
			state_tx,
			closed: AtomicBool::new(false),
			close_notify: Notify::new(),
		});

		tokio::spawn(drive(
			Arc::clone(&connection),
			outbound_rx,
			options.reconnect_limit,
		));

		connection
	}

	/// The handshake URL this handle was opened with (auth token included).
	pub fn handshake_url(&self) -> &Url {
		&self.handshake
	}

	/// Queue an event for the server. Fire-and-forget: no acknowledgment,
	/// no delivery guarantee beyond the transport's. Dropped silently on a
	/// closed handle.
	pub fn emit(&self, event: ClientEvent) {
		if self.is_closed() {
			tracing::debug!(target: "aqua", "emit on closed connection dropped");
			return;
		}
		let _ = self.outbound_tx.send(event);
	}

	/// Register a handler for one event kind. Handlers run on the reader
	/// task in wire arrival order, for the lifetime of the handle or until
	/// [`off`](Self::off).
	pub fn on<F>(&self, kind: ServerEventKind, handler: F) -> HandlerId
	where
		F: Fn(&ServerEvent) + Send + Sync + 'static,
	{
		let id = self.next_handler_id.fetch_add(1, Ordering::SeqCst);
		self.handlers
			.lock()
			.entry(kind)
			.or_default()
			.push((id, Arc::new(handler)));
		id
	}

	/// Remove the handler with `id`, or every handler for `kind` when `id`
	/// is `None`. Unknown ids are ignored.
	pub fn off(&self, kind: ServerEventKind, id: Option<HandlerId>) {
		let mut handlers = self.handlers.lock();
		match id {
			Some(id) => {
				if let Some(list) = handlers.get_mut(&kind) {
					list.retain(|(hid, _)| *hid != id);
				}
			}
			None => {
				handlers.remove(&kind);
			}
		}
	}

	/// Current state.
	pub fn state(&self) -> ConnectionState {
		*self.state_tx.borrow()
	}

	/// Watch for state transitions.
	pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
		self.state_tx.subscribe()
	}

	/// Whether [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Best-effort close. Never fails, and closing an already-closed handle
	/// is a no-op; the underlying socket teardown happens asynchronously and
	/// any failure there is swallowed.
	pub fn close(&self) {
		if self.closed.swap(true, Ordering::SeqCst) {
			return;
		}
		self.close_notify.notify_one();
		self.state_tx.send_replace(ConnectionState::Disconnected);
	}

	/// Wait until the handshake completes, with a deadline. Useful for view
	/// controllers that want to fail fast instead of queueing events.
	pub async fn wait_connected(&self, deadline: Duration) -> Result<()> {
		let mut state = self.watch_state();
		let wait = async {
			loop {
				match *state.borrow_and_update() {
					ConnectionState::Connected => return Ok(()),
					ConnectionState::Failed => return Err(Error::ReconnectExhausted),
					ConnectionState::Disconnected => return Err(Error::Closed),
					ConnectionState::Connecting => {}
				}
				if state.changed().await.is_err() {
					return Err(Error::Closed);
				}
			}
		};
		tokio::time::timeout(deadline, wait)
			.await
			.map_err(|_| Error::Timeout("waiting for connection".to_string()))?
	}

	/// Invoke handlers registered for this event's kind, in registration
	/// order. Runs on the reader task.
	pub(crate) fn dispatch(&self, event: &ServerEvent) {
		let snapshot: Vec<Handler> = {
			let handlers = self.handlers.lock();
			match handlers.get(&event.kind()) {
				Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
				None => return,
			}
		};
		for handler in snapshot {
			handler(event);
		}
	}
}

/// Connection driver: dial with bounded retries, then pump frames until the
/// stream drops or the handle is closed.
async fn drive(
	connection: Arc<Connection>,
	mut outbound_rx: mpsc::UnboundedReceiver<ClientEvent>,
	reconnect_limit: u32,
) {
	let mut failures: u32 = 0;

	loop {
		if connection.is_closed() {
			break;
		}

		match transport::connect(&connection.handshake).await {
			Ok((sender, receiver)) => {
				failures = 0;
				// Diagnostic only; callers observe connectivity via the state watch.
				tracing::info!(
					target: "aqua",
					host = connection.handshake.host_str().unwrap_or(""),
					"connected"
				);
				connection.state_tx.send_replace(ConnectionState::Connected);

				run_io(&connection, sender, receiver, &mut outbound_rx).await;

				if connection.is_closed() {
					break;
				}
				tracing::warn!(target: "aqua", "connection lost, reconnecting");
				connection
					.state_tx
					.send_replace(ConnectionState::Connecting);
			}
			Err(err) => {
				// Diagnostic only, mirrors the failure path of the success log.
				tracing::warn!(target: "aqua", error = %err, "connect_error");
			}
		}

		failures += 1;
		if failures > reconnect_limit {
			connection.state_tx.send_replace(ConnectionState::Failed);
			break;
		}

		tokio::select! {
			_ = connection.close_notify.notified() => break,
			_ = tokio::time::sleep(RECONNECT_DELAY) => {}
		}
	}

	if connection.is_closed() {
		connection
			.state_tx
			.send_replace(ConnectionState::Disconnected);
	}
}

/// Pump one established socket: writer drains the outbound queue, reader
/// parses and dispatches inbound frames. Returns when the socket drops or
/// the handle is closed.
async fn run_io(
	connection: &Arc<Connection>,
	mut sender: transport::WsSender,
	mut receiver: transport::WsReceiver,
	outbound_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
) {
	loop {
		tokio::select! {
			_ = connection.close_notify.notified() => {
				sender.close().await;
				return;
			}
			queued = outbound_rx.recv() => match queued {
				Some(event) => match serde_json::to_string(&event) {
					Ok(frame) => {
						if let Err(err) = sender.send(frame).await {
							tracing::warn!(target: "aqua", error = %err, "write failed");
							return;
						}
					}
					Err(err) => {
						tracing::error!(target: "aqua", error = %err, "failed to encode event");
					}
				},
				// Every handle dropped; nothing left to write for.
				None => {
					sender.close().await;
					return;
				}
			},
			inbound = receiver.next_text() => match inbound {
				Some(Ok(text)) => match serde_json::from_str::<InboundFrame>(&text) {
					Ok(InboundFrame::Event(event)) => connection.dispatch(&event),
					Ok(InboundFrame::Unknown(value)) => {
						tracing::debug!(
							target: "aqua",
							"unknown event (ignored): {}",
							value.get("event").and_then(|e| e.as_str()).unwrap_or("?")
						);
					}
					Err(err) => {
						tracing::error!(target: "aqua", error = %err, "failed to parse frame");
					}
				},
				Some(Err(err)) => {
					tracing::warn!(target: "aqua", error = %err, "read failed");
					return;
				}
				None => return,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use aqua_protocol::ChatMessage;

	// Nothing listens on this port; handshakes fail fast, which is fine for
	// tests that only exercise the handle surface.
	fn test_connection(token: Option<&str>) -> Arc<Connection> {
		let endpoint = Url::parse("http://127.0.0.1:9").unwrap();
		Connection::open(
			&endpoint,
			ConnectOptions {
				token: token.map(str::to_owned),
				reconnect_limit: 0,
			},
		)
	}

	fn message(text: &str) -> ServerEvent {
		ServerEvent::Message(ChatMessage {
			room: Some("General".into()),
			username: "ana".into(),
			msg: text.into(),
			..Default::default()
		})
	}

	#[tokio::test]
	async fn handshake_url_carries_token() {
		let anonymous = test_connection(None);
		assert!(!anonymous.handshake_url().query().unwrap().contains("token"));

		let authed = test_connection(Some("tok1"));
		assert!(authed.handshake_url().query().unwrap().contains("token=tok1"));
	}

	#[tokio::test]
	async fn dispatch_invokes_handlers_in_order() {
		let connection = test_connection(None);

		let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		connection.on(ServerEventKind::Message, move |ev| {
			if let ServerEvent::Message(m) = ev {
				sink.lock().push(m.msg.clone());
			}
		});

		let other_touched = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&other_touched);
		connection.on(ServerEventKind::Status, move |_| {
			flag.store(true, Ordering::SeqCst);
		});

		connection.dispatch(&message("E1"));
		connection.dispatch(&message("E2"));
		connection.dispatch(&message("E3"));

		assert_eq!(*seen.lock(), vec!["E1", "E2", "E3"]);
		assert!(!other_touched.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn off_with_id_removes_one_handler() {
		let connection = test_connection(None);

		let first_count = Arc::new(AtomicU64::new(0));
		let second_count = Arc::new(AtomicU64::new(0));

		let c1 = Arc::clone(&first_count);
		let id1 = connection.on(ServerEventKind::Message, move |_| {
			c1.fetch_add(1, Ordering::SeqCst);
		});
		let c2 = Arc::clone(&second_count);
		let _id2 = connection.on(ServerEventKind::Message, move |_| {
			c2.fetch_add(1, Ordering::SeqCst);
		});

		connection.dispatch(&message("a"));
		connection.off(ServerEventKind::Message, Some(id1));
		connection.dispatch(&message("b"));

		assert_eq!(first_count.load(Ordering::SeqCst), 1);
		assert_eq!(second_count.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn off_without_id_removes_all_handlers() {
		let connection = test_connection(None);

		let count = Arc::new(AtomicU64::new(0));
		let c = Arc::clone(&count);
		connection.on(ServerEventKind::Message, move |_| {
			c.fetch_add(1, Ordering::SeqCst);
		});

		connection.off(ServerEventKind::Message, None);
		connection.dispatch(&message("dropped"));

		assert_eq!(count.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn close_is_idempotent_and_terminal() {
		let connection = test_connection(None);

		connection.close();
		assert!(connection.is_closed());
		assert_eq!(connection.state(), ConnectionState::Disconnected);

		// Second close is a no-op, emit after close is dropped silently.
		connection.close();
		connection.emit(ClientEvent::Leave {
			token: None,
			room: "General".into(),
		});
		assert_eq!(connection.state(), ConnectionState::Disconnected);
	}

	#[tokio::test]
	async fn handshake_failure_exhausts_budget() {
		let connection = test_connection(None);

		let mut state = connection.watch_state();
		let settled = tokio::time::timeout(Duration::from_secs(5), async {
			loop {
				let current = *state.borrow_and_update();
				if current == ConnectionState::Failed {
					return current;
				}
				if state.changed().await.is_err() {
					return current;
				}
			}
		})
		.await
		.expect("connection should settle");

		assert_eq!(settled, ConnectionState::Failed);
	}
}
