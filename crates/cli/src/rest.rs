//! REST client for the AquaChat HTTP endpoints.
//!
//! Room listing, history, room creation, uploads and proxy downloads all
//! go over plain HTTP against the same endpoint the socket channel uses.
//! Errors come back as the server's `{"error": …}` envelope and are
//! surfaced as [`CliError::Api`].

use std::path::Path;

use reqwest::multipart;
use url::Url;

use aqua_protocol::{
	ApiErrorBody, ChatMessage, CreateRoomRequest, CreateRoomResponse, MessagesResponse, RoomInfo,
	RoomsResponse, UploadResponse,
};

use crate::error::{CliError, Result};

pub struct ApiClient {
	base: Url,
	http: reqwest::Client,
}

impl ApiClient {
	pub fn new(base: Url) -> Self {
		Self {
			base,
			http: reqwest::Client::new(),
		}
	}

	/// `GET /rooms` — the lobby listing.
	pub async fn list_rooms(&self) -> Result<Vec<RoomInfo>> {
		let url = self.join("rooms")?;
		let response = check(self.http.get(url).send().await?).await?;
		Ok(response.json::<RoomsResponse>().await?.rooms)
	}

	/// `GET /rooms/{room}/messages` — message history.
	pub async fn room_messages(&self, room: &str) -> Result<Vec<ChatMessage>> {
		let url = self.join(&format!("rooms/{room}/messages"))?;
		let response = check(self.http.get(url).send().await?).await?;
		Ok(response.json::<MessagesResponse>().await?.messages)
	}

	/// `POST /rooms` — create a room (admin token required).
	pub async fn create_room(
		&self,
		token: &str,
		request: &CreateRoomRequest,
	) -> Result<CreateRoomResponse> {
		let url = self.join("rooms")?;
		let response = check(
			self.http
				.post(url)
				.bearer_auth(token)
				.json(request)
				.send()
				.await?,
		)
		.await?;
		Ok(response.json().await?)
	}

	/// `POST /upload` — multipart file upload (bearer token required).
	/// `room` lets the server apply that room's size limit.
	pub async fn upload(
		&self,
		token: &str,
		path: &Path,
		room: Option<&str>,
	) -> Result<UploadResponse> {
		let data = tokio::fs::read(path).await?;
		let filename = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_else(|| "file".to_string());

		let mut form =
			multipart::Form::new().part("file", multipart::Part::bytes(data).file_name(filename));
		if let Some(room) = room {
			form = form.text("room", room.to_string());
		}

		let url = self.join("upload")?;
		let response = check(
			self.http
				.post(url)
				.bearer_auth(token)
				.multipart(form)
				.send()
				.await?,
		)
		.await?;
		Ok(response.json().await?)
	}

	/// `GET /download` — fetch an attachment through the server proxy.
	/// Writes the body to `dest` and returns the byte count.
	pub async fn download(&self, file_url: &str, filename: &str, dest: &Path) -> Result<u64> {
		let mut url = self.join("download")?;
		url.query_pairs_mut()
			.append_pair("url", file_url)
			.append_pair("filename", filename);

		let response = check(self.http.get(url).send().await?).await?;
		let bytes = response.bytes().await?;
		tokio::fs::write(dest, &bytes).await?;
		Ok(bytes.len() as u64)
	}

	fn join(&self, path: &str) -> Result<Url> {
		self.base
			.join(path)
			.map_err(|e| CliError::Api { status: 0, message: e.to_string() })
	}
}

/// Turn a non-success response into [`CliError::Api`], preferring the
/// server's error envelope over the bare status.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let message = match response.json::<ApiErrorBody>().await {
		Ok(body) => body.error,
		Err(_) => status
			.canonical_reason()
			.unwrap_or("request failed")
			.to_string(),
	};

	Err(CliError::Api {
		status: status.as_u16(),
		message,
	})
}
