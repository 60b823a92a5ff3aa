//! `aqua download` — fetch an uploaded file through the server proxy.

use std::path::PathBuf;

use colored::Colorize;

use aqua_runtime::Config;

use crate::error::Result;
use crate::rest::ApiClient;

pub async fn run(url: String, filename: String, output: Option<PathBuf>) -> Result<()> {
	let config = Config::from_env();
	let api = ApiClient::new(config.endpoint);

	let dest = match output {
		Some(dir) => dir.join(&filename),
		None => PathBuf::from(&filename),
	};

	let bytes = api.download(&url, &filename, &dest).await?;
	println!(
		"{} saved {} ({bytes} bytes)",
		"ok".green().bold(),
		dest.display().to_string().bold(),
	);
	Ok(())
}
