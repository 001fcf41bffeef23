//! osu!catch mod catalog and stat effects.

use crate::osu::hitcounts::CatchHitcounts;
use crate::osu::mods::catalog::ModCatalog;
use crate::osu::ruleset::{Catch, Mode, Ruleset};

pub static CATALOG: ModCatalog = ModCatalog::new(
	Ruleset::Catch,
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
		("MR", &[]),
		("FF", &[]),
		("AT", &["NF", "SD", "PF", "CN", "RX"]),
		("CN", &["NF", "SD", "PF", "AT", "RX"]),
		("RX", &["NF", "SD", "PF", "AT", "CN"]),
	],
	&["EZ", "HR", "DA", "HT", "DC", "DT", "NC"],
	&["EZ", "HR", "DA", "HT", "DC", "DT", "NC"],
);

impl Mode for Catch {
	const RULESET: Ruleset = Ruleset::Catch;

	type Hitcounts = CatchHitcounts;
}

// {{{ Tests
#[cfg(test)]
mod catch_tests {
	use super::*;
	use crate::osu::beatmap::beatmap_fixtures::beatmap;
	use crate::osu::beatmap::BeatmapStats;
	use crate::osu::mods::{GameMod, Mod, SpeedSettings};

	const EPSILON: f64 = 1e-9;

	#[test]
	fn double_time_on_ar9_od8() {
		let map = beatmap::<Catch>(BeatmapStats::new(9.0, 4.0, 8.0, 6.0));
		let modded = Mod::<Catch>::apply(&GameMod::DoubleTime(SpeedSettings::default()), &map);

		assert!((modded.stats.ar - (10.0 + 1.0 / 3.0)).abs() < EPSILON);
		assert!((modded.stats.od - (80.0 - 32.0 / 1.5) / 6.0).abs() < EPSILON);
		assert_eq!(modded.stats.cs, 4.0);
		assert_eq!(modded.song.bpm, map.song.bpm * 1.5);
	}

	#[test]
	fn hard_rock_shrinks_the_catcher() {
		let stats = Catch::hard_rock(BeatmapStats::new(9.0, 4.0, 8.0, 6.0));
		assert!((stats.cs - 5.2).abs() < EPSILON);
	}
}
// }}}
