// {{{ Imports
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::osu::mods::GameMod;
use crate::osu::ruleset::Ruleset;
use crate::simulation::circuit::CircuitState;
use crate::simulation::hidden::correct_for_hidden;
use crate::simulation::http::SimulationHttpClient;
use crate::simulation::*;
use crate::timed;
// }}}

/// Simulations backed by the remote simulation service, behind a circuit
/// breaker.
///
/// While the circuit is open every call returns `None` straight away. Only a
/// successful health check closes it again.
#[derive(Debug)]
pub struct RemoteScoreSimulationsDao<C> {
	client: C,
	circuit: CircuitState,
}

impl<C: SimulationHttpClient> RemoteScoreSimulationsDao<C> {
	pub fn new(client: C) -> Self {
		Self {
			client,
			circuit: CircuitState::default(),
		}
	}

	#[inline]
	pub fn client(&self) -> &C {
		&self.client
	}

	#[inline]
	pub fn circuit(&self) -> &CircuitState {
		&self.circuit
	}

	// {{{ Requests
	async fn simulate<S, R>(
		&self,
		ruleset: Ruleset,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: S,
		params: &SimulationParams,
	) -> Option<R>
	where
		S: Serialize + Sync,
		R: DeserializeOwned + Send,
	{
		if !self.circuit.is_available() {
			debug!("Skipping {ruleset} simulation of beatmap {beatmap_id}: service unavailable");
			return None;
		}

		let request = SimulationRequest::new(beatmap_id, mods, spec, params);
		let result = timed!(format!("simulate_{}", ruleset.api_name()), {
			self.client.simulate::<_, R>(ruleset, &request).await
		});

		match result {
			Ok(simulated) => Some(simulated),
			Err(e) => {
				debug!("Simulation of beatmap {beatmap_id} failed: {e:#}");
				self.circuit.record_failure(&e);
				None
			}
		}
	}
	// }}}
	// {{{ Health checks
	/// Probes the service once, updating the circuit.
	pub async fn check_health(&self) -> bool {
		match self.client.check_health().await {
			Ok(()) => {
				self.circuit.record_success();
				true
			}
			Err(e) => {
				self.circuit.record_failure(&e);
				false
			}
		}
	}

	/// Keeps probing the service every `period` until the task is aborted.
	pub fn spawn_health_checks(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
		let dao = self.clone();
		tokio::spawn(async move {
			let mut interval = tokio::time::interval(period);
			interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				interval.tick().await;
				dao.check_health().await;
			}
		})
	}
	// }}}
}

impl<C: SimulationHttpClient> ScoreSimulationsDao for RemoteScoreSimulationsDao<C> {
	async fn get_for_osu(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: OsuScoreSpec,
		params: &SimulationParams,
	) -> Option<OsuSimulatedScore> {
		let mut score: OsuSimulatedScore = self
			.simulate(Ruleset::Standard, beatmap_id, mods, spec, params)
			.await?;

		if correct_for_hidden(mods, &mut score) {
			debug!("Applied the hidden correction to beatmap {beatmap_id}");
		}

		Some(score)
	}

	async fn get_for_taiko(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: TaikoScoreSpec,
		params: &SimulationParams,
	) -> Option<TaikoSimulatedScore> {
		self.simulate(Ruleset::Taiko, beatmap_id, mods, spec, params)
			.await
	}

	async fn get_for_catch(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: CatchScoreSpec,
		params: &SimulationParams,
	) -> Option<CatchSimulatedScore> {
		self.simulate(Ruleset::Catch, beatmap_id, mods, spec, params)
			.await
	}

	async fn get_for_mania(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: ManiaScoreSpec,
		params: &SimulationParams,
	) -> Option<ManiaSimulatedScore> {
		self.simulate(Ruleset::Mania, beatmap_id, mods, spec, params)
			.await
	}
}

// }}}
