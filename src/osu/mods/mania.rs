//! osu!mania mod catalog and stat effects.
//!
//! Key count mods change the star rating without touching any stat.

use crate::osu::hitcounts::ManiaHitcounts;
use crate::osu::mods::catalog::ModCatalog;
use crate::osu::ruleset::{Mania, Mode, Ruleset};

pub static CATALOG: ModCatalog = ModCatalog::new(
	Ruleset::Mania,
	&[
		("EZ", &["HR", "AC", "DA"]),
		("NF", &["SD", "PF", "AC", "AT", "CN"]),
		("HT", &["DC", "DT", "NC"]),
		("DC", &["HT", "DT", "NC"]),
		("HR", &["EZ", "DA"]),
		("SD", &["NF", "PF", "AT", "CN"]),
		("PF", &["NF", "SD", "AC", "AT", "CN"]),
		("DT", &["HT", "DC", "NC"]),
		("NC", &["HT", "DC", "DT"]),
		("FI", &["HD", "CO", "FL"]),
		("HD", &["FI", "CO", "FL"]),
		("CO", &["FI", "HD", "FL"]),
		("FL", &["FI", "HD", "CO"]),
		("AC", &["EZ", "NF", "PF"]),
		("RD", &[]),
		("DS", &[]),
		("MR", &[]),
		("DA", &["EZ", "HR"]),
		("CL", &[]),
		("IN", &["HO"]),
		("HO", &["IN"]),
		("4K", &["5K", "6K", "7K", "8K", "9K"]),
		("5K", &["4K", "6K", "7K", "8K", "9K"]),
		("6K", &["4K", "5K", "7K", "8K", "9K"]),
		("7K", &["4K", "5K", "6K", "8K", "9K"]),
		("8K", &["4K", "5K", "6K", "7K", "9K"]),
		("9K", &["4K", "5K", "6K", "7K", "8K"]),
		("AT", &["NF", "SD", "PF", "CN"]),
		("CN", &["NF", "SD", "PF", "AT"]),
	],
	&["EZ", "HR", "DA", "HT", "DC", "DT", "NC"],
	&[
		"HT", "DC", "DT", "NC", "IN", "HO", "4K", "5K", "6K", "7K", "8K", "9K",
	],
);

impl Mode for Mania {
	const RULESET: Ruleset = Ruleset::Mania;

	type Hitcounts = ManiaHitcounts;
}

// }}}
