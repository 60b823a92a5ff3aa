//! Endpoint configuration.
//!
//! The server endpoint is resolved once per process, from the environment
//! with a literal fallback, and handed to the [`Session`](crate::Session)
//! by the composition root. Nothing in this crate re-reads the environment
//! after construction.

use tracing::warn;
use url::Url;

/// Environment variable naming the AquaChat server endpoint.
pub const ENDPOINT_ENV: &str = "AQUA_API_URL";

/// Fallback endpoint when [`ENDPOINT_ENV`] is unset.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Automatic reconnection attempts before a handle gives up.
pub const DEFAULT_RECONNECT_LIMIT: u32 = 3;

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
	/// HTTP(S) base endpoint; the socket channel derives its ws(s) URL from it.
	pub endpoint: Url,
	/// Reconnection attempt bound for each connection handle.
	pub reconnect_limit: u32,
}

impl Config {
	/// Build a config for a known-good endpoint.
	pub fn new(endpoint: Url) -> Self {
		Self {
			endpoint,
			reconnect_limit: DEFAULT_RECONNECT_LIMIT,
		}
	}

	/// Resolve the endpoint from `AQUA_API_URL`, falling back to
	/// [`DEFAULT_ENDPOINT`]. An unparseable or non-HTTP(S) value is
	/// logged and replaced by the fallback rather than failing startup.
	pub fn from_env() -> Self {
		let raw = std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
		let endpoint = match parse_endpoint(&raw) {
			Some(url) => url,
			None => {
				warn!(
					target: "aqua",
					value = %raw,
					"{} is not a usable endpoint, using {}",
					ENDPOINT_ENV,
					DEFAULT_ENDPOINT
				);
				Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
			}
		};
		Self::new(endpoint)
	}
}

// HTTP(S) only: the REST client uses the endpoint as-is, and the socket
// channel derives its ws(s) URL from it.
fn parse_endpoint(raw: &str) -> Option<Url> {
	let url = Url::parse(raw).ok()?;
	match url.scheme() {
		"http" | "https" => Some(url),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_endpoint_parses() {
		let config = Config::new(Url::parse(DEFAULT_ENDPOINT).unwrap());
		assert_eq!(config.endpoint.as_str(), "http://localhost:5000/");
		assert_eq!(config.reconnect_limit, 3);
	}

	#[test]
	fn rejects_non_http_schemes() {
		assert!(parse_endpoint("ftp://example.com").is_none());
		assert!(parse_endpoint("not a url").is_none());
		assert!(parse_endpoint("https://chat.example.com").is_some());
		// The REST client shares the endpoint, so socket schemes are out too.
		assert!(parse_endpoint("ws://chat.example.com").is_none());
		assert!(parse_endpoint("wss://chat.example.com").is_none());
	}
}
