//! `aqua create-room` — admin room creation over REST.

use colored::Colorize;

use aqua_protocol::{CreateRoomRequest, RoomType};
use aqua_runtime::Config;

use crate::error::{CliError, Result};
use crate::rest::ApiClient;
use crate::token_store::TokenStore;

pub async fn run(
	name: String,
	description: String,
	multimedia: bool,
	pin: Option<String>,
	max_file_mb: Option<u32>,
	store: &TokenStore,
) -> Result<()> {
	let token = store.load().chat_token.ok_or(CliError::NotLoggedIn)?;

	let config = Config::from_env();
	let api = ApiClient::new(config.endpoint);

	let request = CreateRoomRequest {
		name,
		description,
		room_type: if multimedia {
			RoomType::Multimedia
		} else {
			RoomType::Text
		},
		pin,
		max_file_mb,
	};

	let created = api.create_room(&token, &request).await?;
	println!("{} room {} created", "ok".green().bold(), created.room.name.bold());
	if let Some(pin) = created.room.pin {
		// The server only reveals the PIN here; print it so the admin can share it.
		println!("   pin: {}", pin.yellow());
	}
	Ok(())
}
