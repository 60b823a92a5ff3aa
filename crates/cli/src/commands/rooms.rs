//! `aqua rooms` — the lobby: list rooms with live stats.

use colored::Colorize;

use aqua_runtime::Config;

use crate::error::Result;
use crate::rest::ApiClient;

pub async fn run(filter: Option<String>) -> Result<()> {
	let config = Config::from_env();
	let api = ApiClient::new(config.endpoint);

	let mut rooms = api.list_rooms().await?;
	if let Some(filter) = filter {
		let needle = filter.to_lowercase();
		rooms.retain(|room| room.name.to_lowercase().contains(&needle));
	}

	if rooms.is_empty() {
		println!("no rooms found");
		return Ok(());
	}

	for room in rooms {
		let kind = if room.room_type.allows_files() {
			"multimedia".cyan()
		} else {
			"text".dimmed()
		};
		println!(
			"{:<20} {:>3} members {:>5} messages  [{}]  {}",
			room.name.bold(),
			room.members,
			room.messages,
			kind,
			room.description.dimmed(),
		);
	}
	Ok(())
}
