use clap::Parser;
use command::{Cli, Command};
use osu_bot::context::Error;
use osu_bot::logs::init_tracing;

mod command;
mod commands;

#[tokio::main]
async fn main() -> Result<(), Error> {
	init_tracing("osu_bot=info")?;

	let cli = Cli::parse();
	match cli.command {
		Command::Estimate(args) => {
			commands::estimate::run(args).await?;
		}
		Command::Mods(args) => {
			commands::mods::run(args)?;
		}
	}

	Ok(())
}
