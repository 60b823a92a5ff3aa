//! WebSocket transport for the AquaChat event channel.
//!
//! Frames are JSON text messages (`{"event": …, "data": …}`); this module
//! only moves text in and out of the socket. Parsing into typed events and
//! dispatch order are the connection's concern.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::{Error, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport preferences declared to the server at handshake time:
/// persistent streaming first, request-based fallback second.
pub const TRANSPORTS: &str = "websocket,polling";

/// Derive the handshake URL for an endpoint and optional auth token.
///
/// `http`/`https` endpoints map to `ws`/`wss`; the token, when present,
/// rides the query string as connection-time authentication data.
pub fn handshake_url(endpoint: &Url, token: Option<&str>) -> Url {
	let mut url = endpoint.clone();
	let scheme = match url.scheme() {
		"https" => "wss",
		_ => "ws",
	};
	// Cannot fail for the http(s) schemes Config admits.
	let _ = url.set_scheme(scheme);
	url.set_path("/socket");
	url.set_query(None);
	url.query_pairs_mut().append_pair("transports", TRANSPORTS);
	if let Some(token) = token {
		url.query_pairs_mut().append_pair("token", token);
	}
	url
}

/// Perform the WebSocket handshake and split the stream into halves.
pub async fn connect(url: &Url) -> Result<(WsSender, WsReceiver)> {
	let (stream, _response) = connect_async(url.as_str())
		.await
		.map_err(|e| Error::ConnectionFailed(e.to_string()))?;
	let (sink, stream) = stream.split();
	Ok((WsSender { sink }, WsReceiver { stream }))
}

/// Write half of the socket.
pub struct WsSender {
	sink: SplitSink<WsStream, Message>,
}

impl WsSender {
	/// Send one JSON text frame.
	pub async fn send(&mut self, frame: String) -> Result<()> {
		self.sink
			.send(Message::Text(frame.into()))
			.await
			.map_err(|e| Error::TransportError(e.to_string()))
	}

	/// Best-effort close. Errors on an already-broken socket are discarded;
	/// closing never propagates failure to the caller.
	pub async fn close(&mut self) {
		let _ = self.sink.send(Message::Close(None)).await;
		let _ = self.sink.close().await;
	}
}

/// Read half of the socket.
pub struct WsReceiver {
	stream: SplitStream<WsStream>,
}

impl WsReceiver {
	/// Next text frame, skipping control frames. `None` once the server has
	/// closed the stream.
	pub async fn next_text(&mut self) -> Option<Result<String>> {
		loop {
			match self.stream.next().await? {
				Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
				Ok(Message::Close(_)) => return None,
				Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
				Ok(other) => {
					tracing::debug!(target: "aqua", "ignoring non-text frame: {:?}", other);
					continue;
				}
				Err(e) => return Some(Err(Error::TransportError(e.to_string()))),
			}
		}
	}
}
