use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::osu::beatmap::BeatmapStats;
use crate::osu::hitcounts::Hitcounts;
use crate::osu::mods::catalog::ModCatalog;
use crate::osu::mods::{catch, halve_all, harden_all, mania, standard, taiko};
use crate::osu::stat_conversion::{
	approach_rate_to_ms, ms_to_approach_rate, ms_to_osu_od, osu_od_to_ms, scale_through_ms,
};

// {{{ Ruleset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
	Standard,
	Taiko,
	Catch,
	Mania,
}

impl Ruleset {
	pub const RULESETS: [Self; 4] = [Self::Standard, Self::Taiko, Self::Catch, Self::Mania];

	/// Names used by the simulation service in its routes.
	pub const API_NAMES: [&'static str; 4] = ["osu", "taiko", "catch", "mania"];
	pub const DISPLAY_NAMES: [&'static str; 4] = ["osu!", "osu!taiko", "osu!catch", "osu!mania"];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}

	#[inline]
	pub fn api_name(self) -> &'static str {
		Self::API_NAMES[self.to_index()]
	}

	#[inline]
	pub fn catalog(self) -> &'static ModCatalog {
		match self {
			Self::Standard => &standard::CATALOG,
			Self::Taiko => &taiko::CATALOG,
			Self::Catch => &catch::CATALOG,
			Self::Mania => &mania::CATALOG,
		}
	}
}

impl Display for Ruleset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Self::DISPLAY_NAMES[self.to_index()])
	}
}

impl FromStr for Ruleset {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"osu" | "std" | "standard" | "0" => Ok(Self::Standard),
			"taiko" | "1" => Ok(Self::Taiko),
			"catch" | "ctb" | "fruits" | "2" => Ok(Self::Catch),
			"mania" | "3" => Ok(Self::Mania),
			other => Err(anyhow!("Unknown ruleset {other:?}")),
		}
	}
}
// }}}
// {{{ Mode markers
/// Type-level ruleset.
///
/// Beatmaps, scores and mods are parameterised over a mode marker so that a
/// mod written for one ruleset can never be folded over another ruleset's
/// beatmap. Rulesets only override the stat hooks where their timing
/// differs, which so far is Taiko's hit window.
pub trait Mode: Debug + Clone + Copy + Default + PartialEq + Send + Sync + 'static {
	const RULESET: Ruleset;

	type Hitcounts: Hitcounts;

	#[inline]
	fn catalog() -> &'static ModCatalog {
		Self::RULESET.catalog()
	}

	/// Overall difficulty to the width of the top hit window, in ms.
	#[inline]
	fn od_to_ms(od: f64) -> f64 {
		osu_od_to_ms(od)
	}

	#[inline]
	fn ms_to_od(ms: f64) -> f64 {
		ms_to_osu_od(ms)
	}

	/// Stats after the Easy mod.
	#[inline]
	fn easy(stats: BeatmapStats) -> BeatmapStats {
		halve_all(stats)
	}

	/// Stats after the Hard Rock mod.
	#[inline]
	fn hard_rock(stats: BeatmapStats) -> BeatmapStats {
		harden_all(stats)
	}

	/// Stats after playing the map back at `rate` times its original speed.
	///
	/// Approach rate and overall difficulty shrink through their windows,
	/// so the result is not linear in `rate`.
	fn change_speed(stats: BeatmapStats, rate: f64) -> BeatmapStats {
		BeatmapStats {
			ar: scale_through_ms(stats.ar, rate, approach_rate_to_ms, ms_to_approach_rate),
			od: scale_through_ms(stats.od, rate, Self::od_to_ms, Self::ms_to_od),
			..stats
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standard;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Taiko;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Catch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mania;
// }}}
