//! Test doubles for the simulation layer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::context::Error;
use crate::osu::hitcounts::{CatchHitcounts, ManiaHitcounts, OsuHitcounts, TaikoHitcounts};
use crate::osu::mods::{ApiMod, GameMod, ModAcronym};
use crate::osu::ruleset::Ruleset;
use crate::simulation::attributes::*;
use crate::simulation::http::SimulationHttpClient;
use crate::simulation::*;

// {{{ Fixtures
/// aim 200, speed 150, accuracy 80, no flashlight, 400pp, AR 9, 6.5*
pub fn osu_simulated_score(mods: &[&'static str]) -> OsuSimulatedScore {
	SimulatedScore {
		score: SimulatedScoreInfo {
			accuracy: 98.0,
			statistics: OsuHitcounts {
				great: 1000,
				ok: 20,
				meh: 1,
				miss: 1,
			},
			mods: mods
				.iter()
				.map(|m| ApiMod::plain(ModAcronym::from_static(m)))
				.collect(),
		},
		performance_attributes: OsuPerformanceAttributes {
			pp: 400.0,
			aim: 200.0,
			speed: 150.0,
			accuracy: 80.0,
			flashlight: 0.0,
		},
		difficulty_attributes: OsuDifficultyAttributes {
			star_rating: 6.5,
			max_combo: 1500,
			approach_rate: 9.0,
			overall_difficulty: 8.0,
		},
	}
}

pub fn osu_simulated_json(mods: &[&'static str]) -> Value {
	json!(osu_simulated_score(mods))
}
// }}}
// {{{ Mock dao
/// Answers every request with the same canned scores, counting calls.
#[derive(Debug, Default)]
pub struct MockDao {
	pub calls: AtomicUsize,
	pub fail: AtomicBool,
}

impl MockDao {
	#[inline]
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	async fn answer<T>(&self, value: T) -> Option<T> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		// Give concurrent callers a chance to pile up
		tokio::task::yield_now().await;

		if self.fail.load(Ordering::SeqCst) {
			None
		} else {
			Some(value)
		}
	}
}

impl ScoreSimulationsDao for MockDao {
	async fn get_for_osu(
		&self,
		_beatmap_id: u32,
		_mods: &[GameMod],
		_spec: OsuScoreSpec,
		_params: &SimulationParams,
	) -> Option<OsuSimulatedScore> {
		self.answer(osu_simulated_score(&[])).await
	}

	async fn get_for_taiko(
		&self,
		_beatmap_id: u32,
		_mods: &[GameMod],
		_spec: TaikoScoreSpec,
		_params: &SimulationParams,
	) -> Option<TaikoSimulatedScore> {
		self.answer(SimulatedScore {
			score: SimulatedScoreInfo {
				accuracy: 97.0,
				statistics: TaikoHitcounts::default(),
				mods: Vec::new(),
			},
			performance_attributes: TaikoPerformanceAttributes {
				pp: 300.0,
				..Default::default()
			},
			difficulty_attributes: TaikoDifficultyAttributes {
				star_rating: 5.5,
				max_combo: 900,
			},
		})
		.await
	}

	async fn get_for_catch(
		&self,
		_beatmap_id: u32,
		_mods: &[GameMod],
		_spec: CatchScoreSpec,
		_params: &SimulationParams,
	) -> Option<CatchSimulatedScore> {
		self.answer(SimulatedScore {
			score: SimulatedScoreInfo {
				accuracy: 99.0,
				statistics: CatchHitcounts::default(),
				mods: Vec::new(),
			},
			performance_attributes: CatchPerformanceAttributes { pp: 200.0 },
			difficulty_attributes: CatchDifficultyAttributes {
				star_rating: 4.5,
				..Default::default()
			},
		})
		.await
	}

	async fn get_for_mania(
		&self,
		_beatmap_id: u32,
		_mods: &[GameMod],
		_spec: ManiaScoreSpec,
		_params: &SimulationParams,
	) -> Option<ManiaSimulatedScore> {
		self.answer(SimulatedScore {
			score: SimulatedScoreInfo {
				accuracy: 96.0,
				statistics: ManiaHitcounts::default(),
				mods: Vec::new(),
			},
			performance_attributes: ManiaPerformanceAttributes {
				pp: 100.0,
				..Default::default()
			},
			difficulty_attributes: ManiaDifficultyAttributes {
				star_rating: 3.5,
				max_combo: 2000,
			},
		})
		.await
	}
}
// }}}
// {{{ Mock http client
/// Scripted transport. Replies with `response`, or fails when told to.
#[derive(Debug)]
pub struct MockHttpClient {
	pub response: Mutex<Value>,
	pub simulate_calls: AtomicUsize,
	pub health_calls: AtomicUsize,
	pub fail_simulations: AtomicBool,
	pub healthy: AtomicBool,
	pub last_request: Mutex<Option<(Ruleset, Value)>>,
}

impl MockHttpClient {
	pub fn new(response: Value) -> Self {
		Self {
			response: Mutex::new(response),
			simulate_calls: AtomicUsize::new(0),
			health_calls: AtomicUsize::new(0),
			fail_simulations: AtomicBool::new(false),
			healthy: AtomicBool::new(true),
			last_request: Mutex::new(None),
		}
	}

	#[inline]
	pub fn simulate_calls(&self) -> usize {
		self.simulate_calls.load(Ordering::SeqCst)
	}

	#[inline]
	pub fn health_calls(&self) -> usize {
		self.health_calls.load(Ordering::SeqCst)
	}
}

impl SimulationHttpClient for MockHttpClient {
	async fn simulate<Req, Res>(&self, ruleset: Ruleset, request: &Req) -> Result<Res, Error>
	where
		Req: Serialize + Sync,
		Res: DeserializeOwned + Send,
	{
		self.simulate_calls.fetch_add(1, Ordering::SeqCst);
		*self.last_request.lock().unwrap() = Some((ruleset, serde_json::to_value(request)?));

		if self.fail_simulations.load(Ordering::SeqCst) {
			return Err(anyhow!("502 Bad Gateway"));
		}

		let response = self.response.lock().unwrap().clone();
		Ok(serde_json::from_value(response)?)
	}

	async fn check_health(&self) -> Result<(), Error> {
		self.health_calls.fetch_add(1, Ordering::SeqCst);
		if self.healthy.load(Ordering::SeqCst) {
			Ok(())
		} else {
			Err(anyhow!("Connection refused"))
		}
	}
}
// }}}
