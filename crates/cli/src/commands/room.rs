//! `aqua room` — the chat view.
//!
//! Loads history over REST, joins the room over the socket channel with the
//! stored token, then mirrors the room's live traffic to the terminal while
//! reading outgoing messages from stdin. `/file <path>` uploads first and
//! sends the resulting URL (multimedia rooms only); `/quit` leaves.

use std::path::Path;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use aqua_protocol::{ChatMessage, ClientEvent, ServerEvent, ServerEventKind};
use aqua_runtime::{Config, Session};

use crate::commands::{RESPONSE_DEADLINE, open_with_stored_token, wait_for};
use crate::error::{CliError, Result};
use crate::rest::ApiClient;
use crate::token_store::TokenStore;

pub async fn run(name: String, pin: Option<String>, store: &TokenStore) -> Result<()> {
	let stored = store.load();
	let token = stored.chat_token.clone().ok_or(CliError::NotLoggedIn)?;
	let me = stored.chat_user.clone().unwrap_or_default();

	let config = Config::from_env();
	let api = ApiClient::new(config.endpoint.clone());

	// Server-declared room type gates the /file command.
	let allows_files = match api.list_rooms().await {
		Ok(rooms) => rooms
			.iter()
			.find(|room| room.name == name)
			.map(|room| room.room_type.allows_files())
			.unwrap_or(false),
		Err(err) => {
			tracing::debug!(target: "aqua", error = %err, "room listing unavailable");
			false
		}
	};

	// History is best-effort: an empty room view beats refusing to join.
	match api.room_messages(&name).await {
		Ok(history) => {
			for message in &history {
				print_message(message, &me);
			}
		}
		Err(err) => tracing::debug!(target: "aqua", error = %err, "no history"),
	}

	let session = Session::new(config);
	let connection = open_with_stored_token(&session, store);
	connection.wait_connected(RESPONSE_DEADLINE).await?;

	connection.emit(ClientEvent::Join {
		token: Some(token.clone()),
		room: name.clone(),
		pin,
	});
	match wait_for(
		&connection,
		&[ServerEventKind::JoinSuccess, ServerEventKind::JoinError],
		"join response",
	)
	.await?
	{
		ServerEvent::JoinSuccess { room } => {
			println!("{} joined {}", "ok".green().bold(), room.bold());
		}
		ServerEvent::JoinError { msg, .. } => {
			session.close();
			return Err(CliError::Join(msg));
		}
		_ => {}
	}

	subscribe_room_traffic(&session, &name, &me);

	if allows_files {
		println!("{}", "type to chat, /file <path> to send an attachment, /quit to leave".dimmed());
	} else {
		println!("{}", "type to chat, /quit to leave (text-only room)".dimmed());
	}

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await? {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		if line == "/quit" {
			break;
		}
		if let Some(path) = line.strip_prefix("/file ") {
			if !allows_files {
				println!("{}", "this room is text-only".yellow());
				continue;
			}
			match api.upload(&token, Path::new(path.trim()), Some(&name)).await {
				Ok(uploaded) => session.send(ClientEvent::SendMessage {
					token: Some(token.clone()),
					room: name.clone(),
					msg: String::new(),
					file_url: Some(uploaded.url),
					original_filename: Some(uploaded.filename),
				}),
				Err(err) => eprintln!("{} upload failed: {err}", "!".red()),
			}
			continue;
		}
		session.send(ClientEvent::SendMessage {
			token: Some(token.clone()),
			room: name.clone(),
			msg: line.to_string(),
			file_url: None,
			original_filename: None,
		});
	}

	session.send(ClientEvent::Leave {
		token: Some(token),
		room: name,
	});
	session.close();
	Ok(())
}

/// Mirror the room's live traffic to the terminal. Handlers stay registered
/// for the lifetime of the handle.
fn subscribe_room_traffic(session: &Session, room: &str, me: &str) {
	let this_room = room.to_string();
	let self_name = me.to_string();
	session.subscribe(ServerEventKind::Message, move |event| {
		if let ServerEvent::Message(message) = event {
			// The server broadcasts per room, but filter anyway in case the
			// handle is shared across views.
			if message.room.as_deref() == Some(this_room.as_str()) {
				print_message(message, &self_name);
			}
		}
	});

	session.subscribe(ServerEventKind::Status, |event| {
		if let ServerEvent::Status { msg, .. } = event {
			println!("{}", format!("-- {msg}").dimmed());
		}
	});
	session.subscribe(ServerEventKind::UserJoined, |event| {
		if let ServerEvent::UserJoined { username, .. } = event {
			println!("{}", format!("-- {username} joined").dimmed());
		}
	});
	session.subscribe(ServerEventKind::UserLeft, |event| {
		if let ServerEvent::UserLeft { username, nickname, .. } = event {
			let who = nickname.as_deref().unwrap_or(username);
			println!("{}", format!("-- {who} left").dimmed());
		}
	});
	session.subscribe(ServerEventKind::UserDisconnected, |event| {
		if let ServerEvent::UserDisconnected { username, nickname, .. } = event {
			let who = nickname.as_deref().unwrap_or(username);
			println!("{}", format!("-- {who} disconnected").dimmed());
		}
	});
	session.subscribe(ServerEventKind::MsgError, |event| {
		if let ServerEvent::MsgError { msg } = event {
			eprintln!("{} {msg}", "!".red());
		}
	});
}

fn print_message(message: &ChatMessage, me: &str) {
	let who = message.display_name();
	let name = if !me.is_empty() && who == me {
		who.green().bold()
	} else {
		who.cyan().bold()
	};
	let time = message
		.timestamp
		.as_deref()
		.map(|t| format!("[{t}] "))
		.unwrap_or_default();

	if let Some(file_url) = &message.file_url {
		let label = message.original_filename.as_deref().unwrap_or("attachment");
		println!("{}{}: {} ({})", time.dimmed(), name, label.underline(), file_url);
		if !message.msg.is_empty() {
			println!("{}{}: {}", time.dimmed(), name, message.msg);
		}
	} else {
		println!("{}{}: {}", time.dimmed(), name, message.msg);
	}
}
