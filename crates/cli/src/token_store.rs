//! Durable client storage for the session token and display name.
//!
//! One JSON file under the XDG config directory (`aqua/session.json`),
//! holding the `chat_token` the connection manager authenticates with and
//! the `chat_user` display name used to tag self-authored messages.
//! A missing or unreadable file is simply an empty session.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chat_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chat_user: Option<String>,
}

/// File-backed store for [`StoredSession`].
#[derive(Debug, Clone)]
pub struct TokenStore {
	path: PathBuf,
}

impl TokenStore {
	/// Store at the default location (`$XDG_CONFIG_HOME/aqua/session.json`).
	pub fn new() -> Self {
		Self { path: default_path() }
	}

	/// Store at an explicit path. Tests use this to avoid shared state.
	pub fn at(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Load the stored session; missing or corrupt files read as empty.
	pub fn load(&self) -> StoredSession {
		fs::read_to_string(&self.path)
			.ok()
			.and_then(|content| serde_json::from_str(&content).ok())
			.unwrap_or_default()
	}

	/// Persist the session. The file holds a credential, so it is written
	/// with owner-only permissions on unix.
	pub fn save(&self, session: &StoredSession) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
		}
		Ok(())
	}

	/// Remove the stored session. No-op when nothing is stored.
	pub fn clear(&self) -> Result<()> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err.into()),
		}
	}
}

impl Default for TokenStore {
	fn default() -> Self {
		Self::new()
	}
}

fn default_path() -> PathBuf {
	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
		.unwrap_or_else(|| PathBuf::from("."));
	config_home.join("aqua/session.json")
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn missing_file_reads_as_empty_session() {
		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("session.json"));
		assert_eq!(store.load(), StoredSession::default());
	}

	#[test]
	fn save_and_load_round_trip() {
		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("nested/session.json"));

		let session = StoredSession {
			chat_token: Some("eyJ.abc".into()),
			chat_user: Some("ana".into()),
		};
		store.save(&session).unwrap();

		assert_eq!(store.load(), session);
	}

	#[test]
	fn storage_keys_are_stable() {
		let session = StoredSession {
			chat_token: Some("eyJ".into()),
			chat_user: Some("ana".into()),
		};
		let json = serde_json::to_string(&session).unwrap();
		assert!(json.contains("\"chat_token\""));
		assert!(json.contains("\"chat_user\""));
	}

	#[test]
	fn clear_is_idempotent() {
		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("session.json"));

		store
			.save(&StoredSession {
				chat_token: Some("eyJ".into()),
				chat_user: None,
			})
			.unwrap();
		store.clear().unwrap();
		store.clear().unwrap();

		assert_eq!(store.load(), StoredSession::default());
	}

	#[cfg(unix)]
	#[test]
	fn saved_file_is_owner_only() {
		use std::os::unix::fs::PermissionsExt;

		let tmp = TempDir::new().unwrap();
		let store = TokenStore::at(tmp.path().join("session.json"));
		store
			.save(&StoredSession {
				chat_token: Some("eyJ".into()),
				chat_user: None,
			})
			.unwrap();

		let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o600);
	}
}
