//! Gameplay modifiers and the transformations they perform on beatmaps.

// {{{ Imports
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::TaggedError;
use crate::osu::beatmap::{Beatmap, BeatmapStats};
use crate::osu::ruleset::Mode;

pub use acronym::ModAcronym;
// }}}

pub mod acronym;
pub mod catalog;
pub mod catch;
pub mod mania;
pub mod standard;
pub mod taiko;

// {{{ Mod trait
/// A modifier acting on beatmaps of a single ruleset.
///
/// `apply` must be pure and total: it never mutates its input, and never
/// fails for a beatmap of its own ruleset.
pub trait Mod<M: Mode> {
	fn acronym(&self) -> ModAcronym;

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M>;
}
// }}}
// {{{ Settings
/// Settings shared by every rate-changing mod.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedSettings {
	/// Overrides the mod's default rate.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub speed_change: Option<f64>,
}

impl SpeedSettings {
	#[inline]
	pub fn with_rate(rate: f64) -> Self {
		Self {
			speed_change: Some(rate),
		}
	}

	/// The override, unless it could not be a playback rate.
	#[inline]
	fn usable_rate(&self) -> Option<f64> {
		self.speed_change
			.filter(|rate| rate.is_finite() && *rate > 0.0)
	}

	#[inline]
	pub fn rate_or(&self, default: f64) -> f64 {
		self.usable_rate().unwrap_or(default)
	}

	/// The custom rate, if it differs from the mod's default.
	#[inline]
	pub fn custom_rate(&self, default: f64) -> Option<f64> {
		self.usable_rate()
			.filter(|rate| (rate - default).abs() > f64::EPSILON)
	}
}

/// Direct overrides of any subset of the four stats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DifficultyAdjustSettings {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approach_rate: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub circle_size: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overall_difficulty: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub drain_rate: Option<f64>,
}

impl DifficultyAdjustSettings {
	/// Whether applying these settings would leave every stat untouched.
	#[inline]
	pub fn is_noop(&self) -> bool {
		self.approach_rate.is_none()
			&& self.circle_size.is_none()
			&& self.overall_difficulty.is_none()
			&& self.drain_rate.is_none()
	}

	pub fn adjust(&self, stats: BeatmapStats) -> BeatmapStats {
		BeatmapStats {
			ar: self.approach_rate.unwrap_or(stats.ar),
			cs: self.circle_size.unwrap_or(stats.cs),
			od: self.overall_difficulty.unwrap_or(stats.od),
			hp: self.drain_rate.unwrap_or(stats.hp),
		}
	}
}
// }}}
// {{{ Stat scaling
/// Multiplier applied by Hard Rock to every stat but circle size.
pub const HARD_ROCK_MULTIPLIER: f64 = 1.4;
pub const HARD_ROCK_CS_MULTIPLIER: f64 = 1.3;
pub const EASY_MULTIPLIER: f64 = 0.5;

#[inline]
pub fn halve_all(stats: BeatmapStats) -> BeatmapStats {
	BeatmapStats {
		ar: stats.ar * EASY_MULTIPLIER,
		cs: stats.cs * EASY_MULTIPLIER,
		od: stats.od * EASY_MULTIPLIER,
		hp: stats.hp * EASY_MULTIPLIER,
	}
}

/// Every stat is capped at 10.
#[inline]
pub fn harden_all(stats: BeatmapStats) -> BeatmapStats {
	BeatmapStats {
		ar: (stats.ar * HARD_ROCK_MULTIPLIER).min(10.0),
		cs: (stats.cs * HARD_ROCK_CS_MULTIPLIER).min(10.0),
		od: (stats.od * HARD_ROCK_MULTIPLIER).min(10.0),
		hp: (stats.hp * HARD_ROCK_MULTIPLIER).min(10.0),
	}
}
// }}}
// {{{ Concrete mods
/// Default rate of Double Time and Nightcore.
pub const SPEED_UP_RATE: f64 = 1.5;
/// Default rate of Half Time and Daycore.
pub const SLOW_DOWN_RATE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Easy;

impl<M: Mode> Mod<M> for Easy {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		ModAcronym::from_static("EZ")
	}

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		beatmap.with_stats(M::easy(beatmap.stats))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardRock;

impl<M: Mode> Mod<M> for HardRock {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		ModAcronym::from_static("HR")
	}

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		beatmap.with_stats(M::hard_rock(beatmap.stats))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifficultyAdjust(pub DifficultyAdjustSettings);

impl<M: Mode> Mod<M> for DifficultyAdjust {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		ModAcronym::from_static("DA")
	}

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		beatmap.with_stats(self.0.adjust(beatmap.stats))
	}
}

/// A rate-changing mod. `SpeedMod::double_time()` and friends build the
/// four flavours the game has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedMod {
	acronym: &'static str,
	default_rate: f64,
	pub settings: SpeedSettings,
}

impl SpeedMod {
	#[inline]
	pub fn double_time(settings: SpeedSettings) -> Self {
		Self {
			acronym: "DT",
			default_rate: SPEED_UP_RATE,
			settings,
		}
	}

	#[inline]
	pub fn nightcore(settings: SpeedSettings) -> Self {
		Self {
			acronym: "NC",
			default_rate: SPEED_UP_RATE,
			settings,
		}
	}

	#[inline]
	pub fn half_time(settings: SpeedSettings) -> Self {
		Self {
			acronym: "HT",
			default_rate: SLOW_DOWN_RATE,
			settings,
		}
	}

	#[inline]
	pub fn daycore(settings: SpeedSettings) -> Self {
		Self {
			acronym: "DC",
			default_rate: SLOW_DOWN_RATE,
			settings,
		}
	}

	#[inline]
	pub fn rate(&self) -> f64 {
		self.settings.rate_or(self.default_rate)
	}
}

impl<M: Mode> Mod<M> for SpeedMod {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		ModAcronym::from_static(self.acronym)
	}

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		let rate = self.rate();
		let faster = beatmap.with_playback_rate(rate);
		faster.with_stats(M::change_speed(beatmap.stats, rate))
	}
}

/// Any mod without a numeric effect on the stats we model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unremarkable(pub ModAcronym);

impl<M: Mode> Mod<M> for Unremarkable {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		self.0
	}

	#[inline]
	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		beatmap.clone()
	}
}
// }}}
// {{{ Game mod
/// Tagged union over every mod variant, as carried around by scores.
#[derive(Debug, Clone, PartialEq)]
pub enum GameMod {
	Easy,
	HardRock,
	DoubleTime(SpeedSettings),
	Nightcore(SpeedSettings),
	HalfTime(SpeedSettings),
	Daycore(SpeedSettings),
	DifficultyAdjust(DifficultyAdjustSettings),
	Unremarkable(ModAcronym),
}

impl GameMod {
	/// Builds a mod out of its acronym and (possibly empty) settings object.
	///
	/// Settings that fail to parse are ignored, as the game itself does.
	pub fn from_acronym(acronym: ModAcronym, settings: &Map<String, Value>) -> Self {
		fn parse<T: for<'de> Deserialize<'de> + Default>(settings: &Map<String, Value>) -> T {
			serde_json::from_value(Value::Object(settings.clone())).unwrap_or_default()
		}

		match acronym.as_str() {
			"EZ" => Self::Easy,
			"HR" => Self::HardRock,
			"DT" => Self::DoubleTime(parse(settings)),
			"NC" => Self::Nightcore(parse(settings)),
			"HT" => Self::HalfTime(parse(settings)),
			"DC" => Self::Daycore(parse(settings)),
			"DA" => Self::DifficultyAdjust(parse(settings)),
			_ => Self::Unremarkable(acronym),
		}
	}

	/// Builds settings-free mods out of a combination like `"HDDT"`.
	pub fn parse_combination(raw: &str) -> Result<Vec<Self>, TaggedError> {
		let empty = Map::new();
		Ok(ModAcronym::parse_combination(raw)?
			.into_iter()
			.map(|acronym| Self::from_acronym(acronym, &empty))
			.collect())
	}

	#[inline]
	pub fn acronym(&self) -> ModAcronym {
		match self {
			Self::Easy => ModAcronym::from_static("EZ"),
			Self::HardRock => ModAcronym::from_static("HR"),
			Self::DoubleTime(_) => ModAcronym::from_static("DT"),
			Self::Nightcore(_) => ModAcronym::from_static("NC"),
			Self::HalfTime(_) => ModAcronym::from_static("HT"),
			Self::Daycore(_) => ModAcronym::from_static("DC"),
			Self::DifficultyAdjust(_) => ModAcronym::from_static("DA"),
			Self::Unremarkable(acronym) => *acronym,
		}
	}

	/// The rate this mod plays the map back at, if it changes it.
	#[inline]
	pub fn speed_mod(&self) -> Option<SpeedMod> {
		match *self {
			Self::DoubleTime(settings) => Some(SpeedMod::double_time(settings)),
			Self::Nightcore(settings) => Some(SpeedMod::nightcore(settings)),
			Self::HalfTime(settings) => Some(SpeedMod::half_time(settings)),
			Self::Daycore(settings) => Some(SpeedMod::daycore(settings)),
			_ => None,
		}
	}

	/// Wire representation used by the simulation service.
	pub fn to_api(&self) -> ApiMod {
		let settings = match self {
			Self::DoubleTime(settings)
			| Self::Nightcore(settings)
			| Self::HalfTime(settings)
			| Self::Daycore(settings) => serde_json::to_value(settings),
			Self::DifficultyAdjust(settings) => serde_json::to_value(settings),
			_ => Ok(Value::Null),
		};

		ApiMod {
			acronym: self.acronym(),
			settings: match settings {
				Ok(Value::Object(map)) => map,
				_ => Map::new(),
			},
		}
	}
}

impl<M: Mode> Mod<M> for GameMod {
	#[inline]
	fn acronym(&self) -> ModAcronym {
		GameMod::acronym(self)
	}

	fn apply(&self, beatmap: &Beatmap<M>) -> Beatmap<M> {
		match self {
			Self::Easy => Mod::<M>::apply(&Easy, beatmap),
			Self::HardRock => Mod::<M>::apply(&HardRock, beatmap),
			Self::DifficultyAdjust(settings) => {
				Mod::<M>::apply(&DifficultyAdjust(*settings), beatmap)
			}
			Self::Unremarkable(acronym) => Mod::<M>::apply(&Unremarkable(*acronym), beatmap),
			_ => match self.speed_mod() {
				Some(speed_mod) => Mod::<M>::apply(&speed_mod, beatmap),
				None => beatmap.clone(),
			},
		}
	}
}

/// A mod as sent to (and returned by) the simulation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMod {
	pub acronym: ModAcronym,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub settings: Map<String, Value>,
}

impl ApiMod {
	#[inline]
	pub fn plain(acronym: ModAcronym) -> Self {
		Self {
			acronym,
			settings: Map::new(),
		}
	}
}
// }}}
