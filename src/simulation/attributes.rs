//! Per-ruleset attribute breakdowns returned by simulations.
//!
//! Only `pp` and `star_rating` are required, plus the approach rate of
//! osu!standard maps. Skill breakdowns default to zero when a backend doesn't
//! report them.

use serde::{Deserialize, Serialize};

pub trait PerformanceAttributes {
	fn pp(&self) -> f64;
}

pub trait DifficultyAttributes {
	fn star_rating(&self) -> f64;
}

// {{{ osu!standard
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OsuPerformanceAttributes {
	pub pp: f64,
	#[serde(default)]
	pub aim: f64,
	#[serde(default)]
	pub speed: f64,
	#[serde(default)]
	pub accuracy: f64,
	#[serde(default)]
	pub flashlight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OsuDifficultyAttributes {
	pub star_rating: f64,
	#[serde(default)]
	pub max_combo: u32,
	/// Required, as the Hidden correction scales with it.
	pub approach_rate: f64,
	#[serde(default)]
	pub overall_difficulty: f64,
}
// }}}
// {{{ osu!taiko
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaikoPerformanceAttributes {
	pub pp: f64,
	#[serde(default)]
	pub difficulty: f64,
	#[serde(default)]
	pub accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaikoDifficultyAttributes {
	pub star_rating: f64,
	#[serde(default)]
	pub max_combo: u32,
}
// }}}
// {{{ osu!catch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CatchPerformanceAttributes {
	pub pp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CatchDifficultyAttributes {
	pub star_rating: f64,
	#[serde(default)]
	pub max_combo: u32,
	#[serde(default)]
	pub approach_rate: f64,
}
// }}}
// {{{ osu!mania
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ManiaPerformanceAttributes {
	pub pp: f64,
	#[serde(default)]
	pub difficulty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ManiaDifficultyAttributes {
	pub star_rating: f64,
	#[serde(default)]
	pub max_combo: u32,
}
// }}}
// {{{ Trait impls
macro_rules! impl_attributes {
	($performance:ty, $difficulty:ty) => {
		impl PerformanceAttributes for $performance {
			#[inline]
			fn pp(&self) -> f64 {
				self.pp
			}
		}

		impl DifficultyAttributes for $difficulty {
			#[inline]
			fn star_rating(&self) -> f64 {
				self.star_rating
			}
		}
	};
}

impl_attributes!(OsuPerformanceAttributes, OsuDifficultyAttributes);
impl_attributes!(TaikoPerformanceAttributes, TaikoDifficultyAttributes);
impl_attributes!(CatchPerformanceAttributes, CatchDifficultyAttributes);
impl_attributes!(ManiaPerformanceAttributes, ManiaDifficultyAttributes);
// }}}
