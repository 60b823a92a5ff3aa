use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Root CLI for the AquaChat client.
#[derive(Parser, Debug)]
#[command(name = "aqua")]
#[command(about = "AquaChat terminal client")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in and persist the session token.
	Login {
		username: String,
		password: String,
	},
	/// Create an account and persist the session token.
	Register {
		username: String,
		password: String,
	},
	/// List rooms in the lobby.
	Rooms {
		/// Only show rooms whose name contains this text.
		#[arg(short, long)]
		filter: Option<String>,
	},
	/// Create a room (admin only).
	CreateRoom {
		name: String,
		#[arg(short, long, default_value = "")]
		description: String,
		/// Allow file attachments in the room.
		#[arg(long)]
		multimedia: bool,
		/// Access PIN; the server generates one when omitted.
		#[arg(long)]
		pin: Option<String>,
		/// Upload size limit in megabytes.
		#[arg(long)]
		max_file_mb: Option<u32>,
	},
	/// Join a room and chat. `/file <path>` sends an attachment,
	/// `/quit` leaves.
	Room {
		name: String,
		/// Access PIN for protected rooms.
		#[arg(long)]
		pin: Option<String>,
	},
	/// Fetch a shared attachment through the server proxy.
	Download {
		/// Attachment URL as it appears in the message.
		url: String,
		/// Name to save the file under.
		filename: String,
		/// Destination directory (defaults to the current directory).
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Clear the stored session token.
	Logout,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_login_command() {
		let cli = Cli::try_parse_from(["aqua", "login", "maya", "hunter2"]).unwrap();
		match cli.command {
			Commands::Login { username, password } => {
				assert_eq!(username, "maya");
				assert_eq!(password, "hunter2");
			}
			_ => panic!("Expected Login command"),
		}
	}

	#[test]
	fn parse_rooms_with_filter() {
		let cli = Cli::try_parse_from(["aqua", "rooms", "--filter", "general"]).unwrap();
		match cli.command {
			Commands::Rooms { filter } => assert_eq!(filter.as_deref(), Some("general")),
			_ => panic!("Expected Rooms command"),
		}
	}

	#[test]
	fn parse_create_room_flags() {
		let cli = Cli::try_parse_from([
			"aqua",
			"create-room",
			"media",
			"--multimedia",
			"--pin",
			"4321",
			"--max-file-mb",
			"25",
		])
		.unwrap();
		match cli.command {
			Commands::CreateRoom {
				name,
				description,
				multimedia,
				pin,
				max_file_mb,
			} => {
				assert_eq!(name, "media");
				assert_eq!(description, "");
				assert!(multimedia);
				assert_eq!(pin.as_deref(), Some("4321"));
				assert_eq!(max_file_mb, Some(25));
			}
			_ => panic!("Expected CreateRoom command"),
		}
	}

	#[test]
	fn parse_room_with_pin() {
		let cli = Cli::try_parse_from(["aqua", "room", "lobby", "--pin", "0000"]).unwrap();
		match cli.command {
			Commands::Room { name, pin } => {
				assert_eq!(name, "lobby");
				assert_eq!(pin.as_deref(), Some("0000"));
			}
			_ => panic!("Expected Room command"),
		}
	}

	#[test]
	fn parse_download_with_output_dir() {
		let cli = Cli::try_parse_from([
			"aqua",
			"download",
			"/uploads/abc.png",
			"cat.png",
			"-o",
			"/tmp",
		])
		.unwrap();
		match cli.command {
			Commands::Download {
				url,
				filename,
				output,
			} => {
				assert_eq!(url, "/uploads/abc.png");
				assert_eq!(filename, "cat.png");
				assert_eq!(output, Some(PathBuf::from("/tmp")));
			}
			_ => panic!("Expected Download command"),
		}
	}

	#[test]
	fn verbose_flag_counts() {
		let cli = Cli::try_parse_from(["aqua", "-vv", "logout"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert!(matches!(cli.command, Commands::Logout));
	}
}
