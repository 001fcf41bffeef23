//! osu!standard mod catalog and stat effects.

use crate::osu::hitcounts::OsuHitcounts;
use crate::osu::mods::catalog::ModCatalog;
use crate::osu::ruleset::{Mode, Ruleset, Standard};

// {{{ Catalog
pub static CATALOG: ModCatalog = ModCatalog::new(
	Ruleset::Standard,
	&[
		("EZ", &["HR", "AC", "DA"]),
		("NF", &["SD", "PF", "AC", "RX", "AP", "AT", "CN"]),
		("HT", &["DC", "DT", "NC"]),
		("DC", &["HT", "DT", "NC"]),
		("HR", &["EZ", "DA", "MR"]),
		("SD", &["NF", "PF", "RX", "AP", "AT", "CN"]),
		("PF", &["NF", "SD", "AC", "RX", "AP", "AT", "CN"]),
		("DT", &["HT", "DC", "NC"]),
		("NC", &["HT", "DC", "DT"]),
		("HD", &[]),
		("FL", &["BL"]),
		("BL", &["FL"]),
		("AC", &["EZ", "NF", "PF"]),
		("TP", &["DA", "RD"]),
		("DA", &["EZ", "HR", "TP"]),
		("CL", &[]),
		("RD", &["TP"]),
		("MR", &["HR"]),
		("AL", &["SG", "AT", "CN", "RX", "AP"]),
		("SG", &["AL", "AT", "CN", "RX", "AP"]),
		("AT", &["NF", "SD", "PF", "AL", "SG", "CN", "RX", "AP", "SO", "TD"]),
		("CN", &["NF", "SD", "PF", "AL", "SG", "AT", "RX", "AP", "SO", "TD"]),
		("RX", &["NF", "SD", "PF", "AL", "SG", "AT", "CN", "AP"]),
		("AP", &["NF", "SD", "PF", "AL", "SG", "AT", "CN", "RX", "SO"]),
		("SO", &["AT", "CN", "AP"]),
		("TD", &["AT", "CN"]),
	],
	&["EZ", "HR", "DA", "TP", "HT", "DC", "DT", "NC"],
	&[
		"EZ", "HR", "DA", "TP", "HT", "DC", "DT", "NC", "FL", "RX", "AP", "TD",
	],
);
// }}}

impl Mode for Standard {
	const RULESET: Ruleset = Ruleset::Standard;

	type Hitcounts = OsuHitcounts;
}

// }}}
