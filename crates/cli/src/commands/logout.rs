//! `aqua logout` — forget the stored session token.

use colored::Colorize;

use crate::error::Result;
use crate::token_store::TokenStore;

pub fn run(store: &TokenStore) -> Result<()> {
	store.clear()?;
	println!("{} logged out", "ok".green().bold());
	Ok(())
}
