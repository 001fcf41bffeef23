#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Estimates the pp and star rating of a play
	Estimate(crate::commands::estimate::Args),
	/// Checks a mod combination against a ruleset's catalog
	Mods(crate::commands::mods::Args),
}
