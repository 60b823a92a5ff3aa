use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// REST endpoint answered with a non-success status.
	#[error("server error ({status}): {message}")]
	Api { status: u16, message: String },

	/// Login/registration rejected by the server.
	#[error("authentication failed: {0}")]
	Auth(String),

	/// Join rejected by the server (bad PIN, expired token, missing room).
	#[error("could not join room: {0}")]
	Join(String),

	/// Command needs a stored session token.
	#[error("not logged in (run `aqua login` first)")]
	NotLoggedIn,

	#[error("timed out waiting for {0}")]
	Timeout(String),

	#[error(transparent)]
	Http(#[from] reqwest::Error),

	#[error(transparent)]
	Runtime(#[from] aqua_runtime::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
