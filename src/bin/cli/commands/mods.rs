use osu_bot::context::Error;
use osu_bot::osu::ruleset::Ruleset;

use crate::commands::parse_mods;

#[derive(clap::Args)]
pub struct Args {
	/// Concatenated mod acronyms, e.g. `HDDT`
	mods: String,

	#[arg(short, long, default_value = "osu")]
	ruleset: Ruleset,
}

pub fn run(args: Args) -> Result<(), Error> {
	let Some(acronyms) = parse_mods(args.ruleset, &args.mods)? else {
		return Ok(());
	};

	let catalog = args.ruleset.catalog();
	println!("+{} is a valid {} combination", args.mods.to_uppercase(), args.ruleset);

	let applied: Vec<_> = catalog
		.mod_apply_order()
		.filter(|a| acronyms.contains(a))
		.map(|a| a.to_string())
		.collect();
	if !applied.is_empty() {
		println!("Applied in order: {}", applied.join(" → "));
	}

	for acronym in &acronyms {
		let incompatible = catalog
			.incompatible_with(*acronym)
			.unwrap_or_default()
			.iter()
			.map(|a| a.to_string())
			.collect::<Vec<_>>()
			.join(", ");

		println!(
			"{acronym}: {}, incompatible with [{incompatible}]",
			if catalog.changes_star_rating(*acronym) {
				"changes star rating"
			} else {
				"keeps star rating"
			}
		);
	}

	Ok(())
}
