use osu_bot::context::{Error, TaggedError};
use osu_bot::get_user_error;
use osu_bot::osu::mods::ModAcronym;
use osu_bot::osu::ruleset::Ruleset;

pub mod estimate;
pub mod mods;

/// Parses and validates a combination, printing user errors.
///
/// Returns `None` when the combination was rejected.
pub fn parse_mods(ruleset: Ruleset, raw: &str) -> Result<Option<Vec<ModAcronym>>, Error> {
	let parsed = ModAcronym::parse_combination(raw).and_then(|acronyms| {
		ruleset.catalog().validate(&acronyms)?;
		Ok::<_, TaggedError>(acronyms)
	});

	match parsed {
		Ok(acronyms) => Ok(Some(acronyms)),
		Err(err) => {
			println!("{}", get_user_error!(err));
			Ok(None)
		}
	}
}
