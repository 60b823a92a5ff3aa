//! Named events exchanged over the socket channel.
//!
//! Every frame on the wire is a JSON object of the shape
//! `{"event": "<name>", "data": {…}}`. Each direction is a closed set:
//!
//! - [`ClientEvent`] — events this client sends (`login`, `register`,
//!   `join`, `leave`, `send_message`)
//! - [`ServerEvent`] — events the server broadcasts back (results,
//!   messages, presence notifications)
//!
//! Inbound frames are parsed through [`InboundFrame`] so that event names
//! this client does not know about are preserved as raw JSON instead of
//! failing the read loop.

use serde::{Deserialize, Serialize};

/// Event sent from the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
	/// Authenticate with username/password. Answered by `login_success`
	/// or `login_error`.
	Login { username: String, password: String },
	/// Create an account. Answered by `register_success` or `register_error`.
	Register { username: String, password: String },
	/// Enter a chat room. The token authenticates the join; some rooms
	/// additionally require a PIN.
	Join {
		#[serde(skip_serializing_if = "Option::is_none")]
		token: Option<String>,
		room: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pin: Option<String>,
	},
	/// Leave the current room.
	Leave {
		#[serde(skip_serializing_if = "Option::is_none")]
		token: Option<String>,
		room: String,
	},
	/// Post a message to a room. `file_url` references a previously
	/// uploaded attachment; the server rejects it in text-only rooms.
	SendMessage {
		#[serde(skip_serializing_if = "Option::is_none")]
		token: Option<String>,
		room: String,
		msg: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		file_url: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		original_filename: Option<String>,
	},
}

/// A chat message as the server emits it, both in the `message` broadcast
/// and in the REST history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatMessage {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub room: Option<String>,
	#[serde(default)]
	pub username: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	#[serde(default)]
	pub msg: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub original_filename: Option<String>,
}

impl ChatMessage {
	/// Display name: nickname when the server assigned one, username otherwise.
	pub fn display_name(&self) -> &str {
		self.nickname.as_deref().unwrap_or(&self.username)
	}
}

/// Event received from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
	/// Informational notice (connection established, user joined a room, …).
	Status {
		msg: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		sid: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		authenticated: Option<bool>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		username: Option<String>,
	},
	LoginSuccess {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		msg: Option<String>,
		token: String,
		username: String,
		#[serde(default)]
		is_admin: bool,
	},
	LoginError { msg: String },
	RegisterSuccess {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		msg: Option<String>,
		token: String,
		username: String,
	},
	RegisterError { msg: String },
	JoinSuccess { room: String },
	JoinError {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		code: Option<String>,
		msg: String,
	},
	LeaveSuccess { room: String },
	LeaveError { msg: String },
	/// A message broadcast to everyone in the room.
	Message(ChatMessage),
	MsgError { msg: String },
	UserJoined {
		username: String,
		room: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		timestamp: Option<String>,
	},
	UserLeft {
		username: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		nickname: Option<String>,
		room: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		timestamp: Option<String>,
	},
	UserDisconnected {
		username: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		nickname: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		room: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		timestamp: Option<String>,
	},
}

impl ServerEvent {
	/// The subscription key for this event.
	pub fn kind(&self) -> ServerEventKind {
		match self {
			ServerEvent::Status { .. } => ServerEventKind::Status,
			ServerEvent::LoginSuccess { .. } => ServerEventKind::LoginSuccess,
			ServerEvent::LoginError { .. } => ServerEventKind::LoginError,
			ServerEvent::RegisterSuccess { .. } => ServerEventKind::RegisterSuccess,
			ServerEvent::RegisterError { .. } => ServerEventKind::RegisterError,
			ServerEvent::JoinSuccess { .. } => ServerEventKind::JoinSuccess,
			ServerEvent::JoinError { .. } => ServerEventKind::JoinError,
			ServerEvent::LeaveSuccess { .. } => ServerEventKind::LeaveSuccess,
			ServerEvent::LeaveError { .. } => ServerEventKind::LeaveError,
			ServerEvent::Message(_) => ServerEventKind::Message,
			ServerEvent::MsgError { .. } => ServerEventKind::MsgError,
			ServerEvent::UserJoined { .. } => ServerEventKind::UserJoined,
			ServerEvent::UserLeft { .. } => ServerEventKind::UserLeft,
			ServerEvent::UserDisconnected { .. } => ServerEventKind::UserDisconnected,
		}
	}
}

/// Fieldless mirror of [`ServerEvent`], used as the key when subscribing
/// handlers to a single event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEventKind {
	Status,
	LoginSuccess,
	LoginError,
	RegisterSuccess,
	RegisterError,
	JoinSuccess,
	JoinError,
	LeaveSuccess,
	LeaveError,
	Message,
	MsgError,
	UserJoined,
	UserLeft,
	UserDisconnected,
}

impl ServerEventKind {
	/// Wire name of the event.
	pub fn as_str(&self) -> &'static str {
		match self {
			ServerEventKind::Status => "status",
			ServerEventKind::LoginSuccess => "login_success",
			ServerEventKind::LoginError => "login_error",
			ServerEventKind::RegisterSuccess => "register_success",
			ServerEventKind::RegisterError => "register_error",
			ServerEventKind::JoinSuccess => "join_success",
			ServerEventKind::JoinError => "join_error",
			ServerEventKind::LeaveSuccess => "leave_success",
			ServerEventKind::LeaveError => "leave_error",
			ServerEventKind::Message => "message",
			ServerEventKind::MsgError => "msg_error",
			ServerEventKind::UserJoined => "user_joined",
			ServerEventKind::UserLeft => "user_left",
			ServerEventKind::UserDisconnected => "user_disconnected",
		}
	}
}

/// Discriminated view of an inbound frame.
///
/// Event names this client does not recognize fall through to
/// [`Unknown`](Self::Unknown) so the read loop can log and drop them
/// instead of erroring (forward-compatible catch-all).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InboundFrame {
	Event(ServerEvent),
	Unknown(serde_json::Value),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn login_serializes_with_event_tag() {
		let ev = ClientEvent::Login {
			username: "admin".into(),
			password: "admin123".into(),
		};
		let json = serde_json::to_string(&ev).unwrap();
		assert_eq!(
			json,
			r#"{"event":"login","data":{"username":"admin","password":"admin123"}}"#
		);
	}

	#[test]
	fn join_omits_absent_pin_and_token() {
		let ev = ClientEvent::Join {
			token: None,
			room: "General".into(),
			pin: None,
		};
		let json = serde_json::to_string(&ev).unwrap();
		assert_eq!(json, r#"{"event":"join","data":{"room":"General"}}"#);
	}

	#[test]
	fn send_message_carries_file_fields_when_present() {
		let ev = ClientEvent::SendMessage {
			token: Some("eyJ".into()),
			room: "General".into(),
			msg: "mira esto".into(),
			file_url: Some("https://res.cloudinary.com/x.png".into()),
			original_filename: Some("x.png".into()),
		};
		let json = serde_json::to_string(&ev).unwrap();
		assert!(json.starts_with(r#"{"event":"send_message""#));
		assert!(json.contains(r#""file_url":"https://res.cloudinary.com/x.png""#));
		assert!(json.contains(r#""original_filename":"x.png""#));
	}

	#[test]
	fn message_event_deserializes_server_payload() {
		let json = r#"{"event":"message","data":{"room":"General","username":"ana",
			"nickname":null,"msg":"hola","timestamp":"2025-01-15T10:30:00-05:00",
			"file_url":null,"original_filename":null,
			"security_flags":{"risk_level":"low"}}}"#;
		let ev: ServerEvent = serde_json::from_str(json).unwrap();
		match ev {
			ServerEvent::Message(m) => {
				assert_eq!(m.room.as_deref(), Some("General"));
				assert_eq!(m.username, "ana");
				assert_eq!(m.msg, "hola");
				assert_eq!(m.display_name(), "ana");
			}
			other => panic!("expected message, got {other:?}"),
		}
	}

	#[test]
	fn login_success_defaults_is_admin() {
		let json = r#"{"event":"login_success","data":{"msg":"login correcto","token":"eyJ","username":"ana"}}"#;
		let ev: ServerEvent = serde_json::from_str(json).unwrap();
		assert_eq!(
			ev,
			ServerEvent::LoginSuccess {
				msg: Some("login correcto".into()),
				token: "eyJ".into(),
				username: "ana".into(),
				is_admin: false,
			}
		);
		assert_eq!(ev.kind(), ServerEventKind::LoginSuccess);
	}

	#[test]
	fn unknown_event_name_falls_through() {
		let json = r#"{"event":"room_info","data":{"room":{"name":"General"}}}"#;
		let frame: InboundFrame = serde_json::from_str(json).unwrap();
		match frame {
			InboundFrame::Unknown(value) => assert_eq!(value["event"], "room_info"),
			InboundFrame::Event(ev) => panic!("expected unknown, got {ev:?}"),
		}
	}

	#[test]
	fn known_event_parses_through_inbound_frame() {
		let json = r#"{"event":"join_error","data":{"code":"token_expired","msg":"Token inválido o expirado"}}"#;
		let frame: InboundFrame = serde_json::from_str(json).unwrap();
		match frame {
			InboundFrame::Event(ServerEvent::JoinError { code, .. }) => {
				assert_eq!(code.as_deref(), Some("token_expired"));
			}
			other => panic!("expected join_error, got {other:?}"),
		}
	}

	#[test]
	fn nickname_wins_for_display_name() {
		let m = ChatMessage {
			username: "anon-1234".into(),
			nickname: Some("Gata".into()),
			..Default::default()
		};
		assert_eq!(m.display_name(), "Gata");
	}
}
