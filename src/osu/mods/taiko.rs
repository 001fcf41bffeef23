//! osu!taiko mod catalog and stat effects.
//!
//! Taiko judges hits against a narrower window than osu!standard, which is
//! what speed mods shrink.

use crate::osu::hitcounts::TaikoHitcounts;
use crate::osu::mods::catalog::ModCatalog;
use crate::osu::ruleset::{Mode, Ruleset, Taiko};
use crate::osu::stat_conversion::{ms_to_taiko_od, taiko_od_to_ms};

pub static CATALOG: ModCatalog = ModCatalog::new(
	Ruleset::Taiko,
	&[
		("EZ", &["HR", "AC", "DA"]),
		("NF", &["SD", "PF", "AC", "AT", "CN", "RX"]),
		("HT", &["DC", "DT", "NC"]),
		("DC", &["HT", "DT", "NC"]),
		("HR", &["EZ", "DA"]),
		("SD", &["NF", "PF", "AT", "CN", "RX"]),
		("PF", &["NF", "SD", "AC", "AT", "CN", "RX"]),
		("DT", &["HT", "DC", "NC"]),
		("NC", &["HT", "DC", "DT"]),
		("HD", &[]),
		("FL", &[]),
		("AC", &["EZ", "NF", "PF"]),
		("DA", &["EZ", "HR"]),
		("CL", &[]),
		("RD", &["SW"]),
		("SW", &["RD"]),
		("SG", &["AT", "CN", "RX"]),
		("CS", &[]),
		("AT", &["NF", "SD", "PF", "SG", "CN", "RX"]),
		("CN", &["NF", "SD", "PF", "SG", "AT", "RX"]),
		("RX", &["NF", "SD", "PF", "SG", "AT", "CN"]),
	],
	&["EZ", "HR", "DA", "HT", "DC", "DT", "NC"],
	&["EZ", "HR", "DA", "HT", "DC", "DT", "NC"],
);

impl Mode for Taiko {
	const RULESET: Ruleset = Ruleset::Taiko;

	type Hitcounts = TaikoHitcounts;

	#[inline]
	fn od_to_ms(od: f64) -> f64 {
		taiko_od_to_ms(od)
	}

	#[inline]
	fn ms_to_od(ms: f64) -> f64 {
		ms_to_taiko_od(ms)
	}
}

// }}}
