//! `aqua register` — create an account and persist the session token.

use colored::Colorize;

use aqua_protocol::{ClientEvent, ServerEvent, ServerEventKind};
use aqua_runtime::{Config, Session};

use crate::commands::{RESPONSE_DEADLINE, wait_for};
use crate::error::{CliError, Result};
use crate::token_store::{StoredSession, TokenStore};

pub async fn run(username: String, password: String, store: &TokenStore) -> Result<()> {
	let session = Session::new(Config::from_env());
	let connection = session.open(None);
	connection.wait_connected(RESPONSE_DEADLINE).await?;

	connection.emit(ClientEvent::Register { username, password });

	let answer = wait_for(
		&connection,
		&[
			ServerEventKind::RegisterSuccess,
			ServerEventKind::RegisterError,
		],
		"registration response",
	)
	.await?;
	session.close();

	match answer {
		ServerEvent::RegisterSuccess { token, username, .. } => {
			store.save(&StoredSession {
				chat_token: Some(token),
				chat_user: Some(username.clone()),
			})?;
			println!("{} registered as {}", "ok".green().bold(), username.bold());
			Ok(())
		}
		ServerEvent::RegisterError { msg } => Err(CliError::Auth(msg)),
		other => Err(CliError::Auth(format!("unexpected response: {other:?}"))),
	}
}
