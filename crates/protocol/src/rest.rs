//! DTOs for the AquaChat REST endpoints.
//!
//! The socket channel carries live traffic; history, room management and
//! uploads go over plain HTTP. These types match the JSON bodies of
//! `GET /rooms`, `GET /rooms/{room}/messages`, `POST /rooms`,
//! `POST /upload` and the error envelope all endpoints share.

use serde::{Deserialize, Serialize};

use crate::events::ChatMessage;

/// Whether a room accepts file attachments or text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
	#[default]
	Text,
	Multimedia,
}

impl RoomType {
	pub fn allows_files(&self) -> bool {
		matches!(self, RoomType::Multimedia)
	}
}

/// One entry in the lobby listing (`GET /rooms`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomInfo {
	#[serde(default)]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(rename = "type", default)]
	pub room_type: RoomType,
	/// Members currently in the room.
	#[serde(default)]
	pub members: u64,
	/// Total messages stored for the room.
	#[serde(default)]
	pub messages: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomsResponse {
	pub rooms: Vec<RoomInfo>,
}

/// `GET /rooms/{room}/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
	#[serde(default)]
	pub messages: Vec<ChatMessage>,
}

/// Body for `POST /rooms` (admin only).
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomRequest {
	pub name: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(rename = "type")]
	pub room_type: RoomType,
	/// Server generates a PIN when omitted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pin: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_file_mb: Option<u32>,
}

/// Room echo in the `POST /rooms` response, PIN included.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRoom {
	#[serde(default)]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(rename = "type", default)]
	pub room_type: RoomType,
	#[serde(default)]
	pub pin: Option<String>,
	#[serde(default)]
	pub max_file_mb: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomResponse {
	#[serde(default)]
	pub msg: String,
	pub room: CreatedRoom,
}

/// `POST /upload` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
	#[serde(default)]
	pub msg: String,
	pub url: String,
	pub filename: String,
	#[serde(default)]
	pub public_id: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
	#[serde(default)]
	pub size_mb: Option<f64>,
}

/// Error envelope shared by every REST endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
	pub error: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rooms_listing_parses_server_shape() {
		let json = r#"{"rooms":[{"id":"uuid-1","name":"General","description":"Sala principal",
			"type":"multimedia","members":5,"messages":120,"created_at":"2025-01-15T10:30:00"}]}"#;
		let parsed: RoomsResponse = serde_json::from_str(json).unwrap();
		assert_eq!(parsed.rooms.len(), 1);
		let room = &parsed.rooms[0];
		assert_eq!(room.name, "General");
		assert_eq!(room.room_type, RoomType::Multimedia);
		assert!(room.room_type.allows_files());
	}

	#[test]
	fn room_type_defaults_to_text() {
		let json = r#"{"rooms":[{"name":"Solo Texto"}]}"#;
		let parsed: RoomsResponse = serde_json::from_str(json).unwrap();
		assert_eq!(parsed.rooms[0].room_type, RoomType::Text);
		assert!(!parsed.rooms[0].room_type.allows_files());
	}

	#[test]
	fn create_room_request_renames_type_and_skips_empty() {
		let req = CreateRoomRequest {
			name: "Sala VIP".into(),
			description: String::new(),
			room_type: RoomType::Multimedia,
			pin: None,
			max_file_mb: Some(10),
		};
		let json = serde_json::to_string(&req).unwrap();
		assert_eq!(
			json,
			r#"{"name":"Sala VIP","type":"multimedia","max_file_mb":10}"#
		);
	}

	#[test]
	fn history_parses_messages() {
		let json = r#"{"messages":[{"room":"General","username":"ana","msg":"hola",
			"timestamp":"2025-01-15T10:30:00-05:00"}]}"#;
		let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
		assert_eq!(parsed.messages[0].username, "ana");
	}
}
