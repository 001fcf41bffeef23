use std::sync::Arc;

use crate::osu::mods::GameMod;
use crate::simulation::http::HttpSimulationClient;
use crate::simulation::local::LocalScoreSimulationsDao;
use crate::simulation::remote::RemoteScoreSimulationsDao;
use crate::simulation::*;

/// The simulation backend picked at startup.
///
/// The remote dao sits behind an [`Arc`] so its health check task can share
/// the circuit state.
#[derive(Debug)]
pub enum SimulationBackend {
	Remote(Arc<RemoteScoreSimulationsDao<HttpSimulationClient>>),
	Local(LocalScoreSimulationsDao),
}

impl SimulationBackend {
	#[inline]
	pub fn name(&self) -> &'static str {
		match self {
			Self::Remote(_) => "remote",
			Self::Local(_) => "local",
		}
	}
}

impl ScoreSimulationsDao for SimulationBackend {
	async fn get_for_osu(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: OsuScoreSpec,
		params: &SimulationParams,
	) -> Option<OsuSimulatedScore> {
		match self {
			Self::Remote(dao) => dao.get_for_osu(beatmap_id, mods, spec, params).await,
			Self::Local(dao) => dao.get_for_osu(beatmap_id, mods, spec, params).await,
		}
	}

	async fn get_for_taiko(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: TaikoScoreSpec,
		params: &SimulationParams,
	) -> Option<TaikoSimulatedScore> {
		match self {
			Self::Remote(dao) => dao.get_for_taiko(beatmap_id, mods, spec, params).await,
			Self::Local(dao) => dao.get_for_taiko(beatmap_id, mods, spec, params).await,
		}
	}

	async fn get_for_catch(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: CatchScoreSpec,
		params: &SimulationParams,
	) -> Option<CatchSimulatedScore> {
		match self {
			Self::Remote(dao) => dao.get_for_catch(beatmap_id, mods, spec, params).await,
			Self::Local(dao) => dao.get_for_catch(beatmap_id, mods, spec, params).await,
		}
	}

	async fn get_for_mania(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: ManiaScoreSpec,
		params: &SimulationParams,
	) -> Option<ManiaSimulatedScore> {
		match self {
			Self::Remote(dao) => dao.get_for_mania(beatmap_id, mods, spec, params).await,
			Self::Local(dao) => dao.get_for_mania(beatmap_id, mods, spec, params).await,
		}
	}
}
// }}}
