//! Command dispatch and shared session plumbing.

pub mod create_room;
pub mod download;
pub mod login;
pub mod logout;
pub mod register;
pub mod room;
pub mod rooms;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use aqua_protocol::{ServerEvent, ServerEventKind};
use aqua_runtime::{Connection, Session};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::token_store::TokenStore;

/// How long view controllers wait for the server to answer an event.
pub const RESPONSE_DEADLINE: Duration = Duration::from_secs(10);

pub async fn dispatch(cli: Cli) -> Result<()> {
	let store = TokenStore::new();

	match cli.command {
		Commands::Login { username, password } => login::run(username, password, &store).await,
		Commands::Register { username, password } => {
			register::run(username, password, &store).await
		}
		Commands::Rooms { filter } => rooms::run(filter).await,
		Commands::CreateRoom {
			name,
			description,
			multimedia,
			pin,
			max_file_mb,
		} => create_room::run(name, description, multimedia, pin, max_file_mb, &store).await,
		Commands::Room { name, pin } => room::run(name, pin, &store).await,
		Commands::Download {
			url,
			filename,
			output,
		} => download::run(url, filename, output).await,
		Commands::Logout => logout::run(&store),
	}
}

/// Open the session with whatever token durable storage holds. An empty
/// store behaves exactly like an anonymous open.
pub fn open_with_stored_token(session: &Session, store: &TokenStore) -> Arc<Connection> {
	let stored = store.load();
	session.open(stored.chat_token.as_deref())
}

/// Wait for the first event matching one of `kinds`, with a deadline.
/// Handlers are removed again before returning.
pub async fn wait_for(
	connection: &Connection,
	kinds: &[ServerEventKind],
	what: &str,
) -> Result<ServerEvent> {
	let (tx, mut rx) = mpsc::unbounded_channel();

	let subscriptions: Vec<_> = kinds
		.iter()
		.map(|&kind| {
			let tx = tx.clone();
			let id = connection.on(kind, move |event| {
				let _ = tx.send(event.clone());
			});
			(kind, id)
		})
		.collect();

	let outcome = tokio::time::timeout(RESPONSE_DEADLINE, rx.recv()).await;

	for (kind, id) in subscriptions {
		connection.off(kind, Some(id));
	}

	match outcome {
		Ok(Some(event)) => Ok(event),
		Ok(None) | Err(_) => Err(CliError::Timeout(what.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use aqua_runtime::Config;
	use tempfile::TempDir;
	use url::Url;

	use crate::token_store::StoredSession;

	fn offline_session() -> Session {
		// Nothing listens here; these tests only look at the handshake URL.
		Session::new(Config::new(Url::parse("http://127.0.0.1:9").unwrap()))
	}

	#[tokio::test]
	async fn empty_store_opens_anonymously() {
		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("session.json"));
		let session = offline_session();

		let connection = open_with_stored_token(&session, &store);
		assert!(!connection.handshake_url().query().unwrap().contains("token"));
	}

	#[tokio::test]
	async fn stored_token_rides_the_handshake() {
		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("session.json"));
		store
			.save(&StoredSession {
				chat_token: Some("eyJ.tok".into()),
				chat_user: Some("ana".into()),
			})
			.unwrap();
		let session = offline_session();

		let connection = open_with_stored_token(&session, &store);
		assert!(
			connection
				.handshake_url()
				.query()
				.unwrap()
				.contains("token=eyJ.tok")
		);
	}
}
