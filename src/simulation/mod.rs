//! Access to pp and star rating simulations.
//!
//! A [`ScoreSimulationsDao`] answers "what would this play be worth" for a
//! beatmap, a mod combination and a description of the play. Failures never
//! surface as errors: an unreachable service and a combination the engine
//! cannot simulate both come back as `None`.

// {{{ Imports
use serde::{Deserialize, Serialize};

use crate::osu::hitcounts::{CatchHitcounts, ManiaHitcounts, OsuHitcounts, TaikoHitcounts};
use crate::osu::mods::{
	ApiMod, DifficultyAdjustSettings, GameMod, SLOW_DOWN_RATE, SPEED_UP_RATE,
};
use crate::simulation::attributes::{
	CatchDifficultyAttributes, CatchPerformanceAttributes, DifficultyAttributes,
	ManiaDifficultyAttributes, ManiaPerformanceAttributes, OsuDifficultyAttributes,
	OsuPerformanceAttributes, PerformanceAttributes, TaikoDifficultyAttributes,
	TaikoPerformanceAttributes,
};
// }}}

pub mod attributes;
pub mod backend;
pub mod circuit;
pub mod hidden;
pub mod http;
pub mod local;
pub mod remote;

#[cfg(test)]
pub(crate) mod testing;

// {{{ Score specs
/// Describes an osu!standard play. Leaving a count out lets the simulator
/// pick it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OsuScoreSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub combo: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub misses: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mehs: Option<u32>,
	/// 100s
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub goods: Option<u32>,
	/// Target accuracy in percent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaikoScoreSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub combo: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub misses: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub goods: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CatchScoreSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub combo: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub misses: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub droplets: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tiny_droplets: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accuracy: Option<f64>,
}

/// Mania has no combo input: combo plays no part in its pp.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ManiaScoreSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub misses: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mehs: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub oks: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub goods: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub greats: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accuracy: Option<f64>,
}
// }}}
// {{{ Simulation params
/// Mod settings the simulator cannot infer from acronyms alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationParams {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub difficulty_adjust: Option<DifficultyAdjustSettings>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dt_rate: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ht_rate: Option<f64>,
}

impl SimulationParams {
	pub fn from_mods(mods: &[GameMod]) -> Self {
		let mut params = Self::default();

		for game_mod in mods {
			match game_mod {
				GameMod::DoubleTime(settings) | GameMod::Nightcore(settings) => {
					params.dt_rate = settings.custom_rate(SPEED_UP_RATE);
				}
				GameMod::HalfTime(settings) | GameMod::Daycore(settings) => {
					params.ht_rate = settings.custom_rate(SLOW_DOWN_RATE);
				}
				GameMod::DifficultyAdjust(settings) if !settings.is_noop() => {
					params.difficulty_adjust = Some(*settings);
				}
				_ => {}
			}
		}

		params
	}

	/// The playback rate to simulate at, when it isn't a mod's default.
	#[inline]
	pub fn clock_rate(&self) -> Option<f64> {
		self.dt_rate.or(self.ht_rate)
	}
}

/// Body of a simulation request.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRequest<S> {
	pub beatmap_id: u32,
	pub mods: Vec<ApiMod>,
	#[serde(flatten)]
	pub spec: S,
	#[serde(flatten)]
	pub params: SimulationParams,
}

impl<S> SimulationRequest<S> {
	pub fn new(beatmap_id: u32, mods: &[GameMod], spec: S, params: &SimulationParams) -> Self {
		Self {
			beatmap_id,
			mods: mods.iter().map(GameMod::to_api).collect(),
			spec,
			params: *params,
		}
	}
}
// }}}
// {{{ Simulated scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedScoreInfo<H> {
	pub accuracy: f64,
	pub statistics: H,
	/// The mods the simulator actually took into account.
	#[serde(default)]
	pub mods: Vec<ApiMod>,
}

/// Response of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedScore<H, P, D> {
	pub score: SimulatedScoreInfo<H>,
	pub performance_attributes: P,
	pub difficulty_attributes: D,
}

impl<H, P: PerformanceAttributes, D: DifficultyAttributes> SimulatedScore<H, P, D> {
	#[inline]
	pub fn pp(&self) -> f64 {
		self.performance_attributes.pp()
	}

	#[inline]
	pub fn star_rating(&self) -> f64 {
		self.difficulty_attributes.star_rating()
	}
}

pub type OsuSimulatedScore =
	SimulatedScore<OsuHitcounts, OsuPerformanceAttributes, OsuDifficultyAttributes>;
pub type TaikoSimulatedScore =
	SimulatedScore<TaikoHitcounts, TaikoPerformanceAttributes, TaikoDifficultyAttributes>;
pub type CatchSimulatedScore =
	SimulatedScore<CatchHitcounts, CatchPerformanceAttributes, CatchDifficultyAttributes>;
pub type ManiaSimulatedScore =
	SimulatedScore<ManiaHitcounts, ManiaPerformanceAttributes, ManiaDifficultyAttributes>;
// }}}
// {{{ Dao
pub trait ScoreSimulationsDao: Send + Sync {
	async fn get_for_osu(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: OsuScoreSpec,
		params: &SimulationParams,
	) -> Option<OsuSimulatedScore>;

	async fn get_for_taiko(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: TaikoScoreSpec,
		params: &SimulationParams,
	) -> Option<TaikoSimulatedScore>;

	async fn get_for_catch(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: CatchScoreSpec,
		params: &SimulationParams,
	) -> Option<CatchSimulatedScore>;

	async fn get_for_mania(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: ManiaScoreSpec,
		params: &SimulationParams,
	) -> Option<ManiaSimulatedScore>;
}
// }}}
