// {{{ Imports
use std::marker::PhantomData;
use std::sync::Arc;

use crate::estimation::{Estimation, EstimationCache, ScoreEstimator};
use crate::osu::ruleset::{Catch, Mania, Mode, Standard, Taiko};
use crate::osu::score::{BeatmapScore, SimulationBasis};
use crate::simulation::{
	CatchScoreSpec, ManiaScoreSpec, OsuScoreSpec, ScoreSimulationsDao, SimulationParams,
	TaikoScoreSpec,
};
// }}}

// {{{ Simulated modes
/// Rulesets the simulation layer knows how to describe plays for.
pub trait SimulatedMode: Mode {
	/// Builds the request for `score` and runs it through `dao`.
	async fn simulate<D: ScoreSimulationsDao>(
		dao: &D,
		score: &BeatmapScore<Self>,
	) -> Option<Estimation>;

	fn provider<D>(providers: &EstimationProviders<D>) -> &EstimationProvider<Self, D>;
}

#[inline]
fn accuracy_percent<M: Mode>(score: &BeatmapScore<M>) -> Option<f64> {
	Some(score.accuracy * 100.0)
}

impl SimulatedMode for Standard {
	async fn simulate<D: ScoreSimulationsDao>(
		dao: &D,
		score: &BeatmapScore<Self>,
	) -> Option<Estimation> {
		let hits = &score.hitcounts;
		let spec = match score.simulation_basis {
			SimulationBasis::Hitcounts => OsuScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				mehs: Some(hits.meh),
				goods: Some(hits.ok),
				accuracy: None,
			},
			SimulationBasis::Accuracy => OsuScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				accuracy: accuracy_percent(score),
				..Default::default()
			},
		};

		let params = SimulationParams::from_mods(&score.mods);
		let simulated = dao
			.get_for_osu(score.base_beatmap.id, &score.mods, spec, &params)
			.await?;

		Some(Estimation {
			pp: simulated.pp(),
			star_rating: simulated.star_rating(),
		})
	}

	#[inline]
	fn provider<D>(providers: &EstimationProviders<D>) -> &EstimationProvider<Self, D> {
		&providers.osu
	}
}

impl SimulatedMode for Taiko {
	async fn simulate<D: ScoreSimulationsDao>(
		dao: &D,
		score: &BeatmapScore<Self>,
	) -> Option<Estimation> {
		let hits = &score.hitcounts;
		let spec = match score.simulation_basis {
			SimulationBasis::Hitcounts => TaikoScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				goods: Some(hits.ok),
				accuracy: None,
			},
			SimulationBasis::Accuracy => TaikoScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				accuracy: accuracy_percent(score),
				..Default::default()
			},
		};

		let params = SimulationParams::from_mods(&score.mods);
		let simulated = dao
			.get_for_taiko(score.base_beatmap.id, &score.mods, spec, &params)
			.await?;

		Some(Estimation {
			pp: simulated.pp(),
			star_rating: simulated.star_rating(),
		})
	}

	#[inline]
	fn provider<D>(providers: &EstimationProviders<D>) -> &EstimationProvider<Self, D> {
		&providers.taiko
	}
}

impl SimulatedMode for Catch {
	async fn simulate<D: ScoreSimulationsDao>(
		dao: &D,
		score: &BeatmapScore<Self>,
	) -> Option<Estimation> {
		let hits = &score.hitcounts;
		let spec = match score.simulation_basis {
			SimulationBasis::Hitcounts => CatchScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				droplets: Some(hits.large_tick_hit),
				tiny_droplets: Some(hits.small_tick_hit),
				accuracy: None,
			},
			SimulationBasis::Accuracy => CatchScoreSpec {
				combo: Some(score.max_combo),
				misses: Some(hits.miss),
				accuracy: accuracy_percent(score),
				..Default::default()
			},
		};

		let params = SimulationParams::from_mods(&score.mods);
		let simulated = dao
			.get_for_catch(score.base_beatmap.id, &score.mods, spec, &params)
			.await?;

		Some(Estimation {
			pp: simulated.pp(),
			star_rating: simulated.star_rating(),
		})
	}

	#[inline]
	fn provider<D>(providers: &EstimationProviders<D>) -> &EstimationProvider<Self, D> {
		&providers.catch
	}
}

impl SimulatedMode for Mania {
	async fn simulate<D: ScoreSimulationsDao>(
		dao: &D,
		score: &BeatmapScore<Self>,
	) -> Option<Estimation> {
		let hits = &score.hitcounts;
		let spec = match score.simulation_basis {
			SimulationBasis::Hitcounts => ManiaScoreSpec {
				misses: Some(hits.miss),
				mehs: Some(hits.meh),
				oks: Some(hits.ok),
				goods: Some(hits.good),
				greats: Some(hits.great),
				accuracy: None,
			},
			SimulationBasis::Accuracy => ManiaScoreSpec {
				misses: Some(hits.miss),
				accuracy: accuracy_percent(score),
				..Default::default()
			},
		};

		let params = SimulationParams::from_mods(&score.mods);
		let simulated = dao
			.get_for_mania(score.base_beatmap.id, &score.mods, spec, &params)
			.await?;

		Some(Estimation {
			pp: simulated.pp(),
			star_rating: simulated.star_rating(),
		})
	}

	#[inline]
	fn provider<D>(providers: &EstimationProviders<D>) -> &EstimationProvider<Self, D> {
		&providers.mania
	}
}
// }}}
// {{{ Providers
/// Estimates scores of one ruleset, remembering recent results.
#[derive(Debug)]
pub struct EstimationProvider<M, D> {
	dao: Arc<D>,
	cache: EstimationCache,
	mode: PhantomData<M>,
}

pub type OsuEstimationProvider<D> = EstimationProvider<Standard, D>;
pub type TaikoEstimationProvider<D> = EstimationProvider<Taiko, D>;
pub type CatchEstimationProvider<D> = EstimationProvider<Catch, D>;
pub type ManiaEstimationProvider<D> = EstimationProvider<Mania, D>;

impl<M, D> EstimationProvider<M, D> {
	pub fn new(dao: Arc<D>) -> Self {
		Self {
			dao,
			cache: EstimationCache::default(),
			mode: PhantomData,
		}
	}

	#[inline]
	pub fn cache(&self) -> &EstimationCache {
		&self.cache
	}
}

impl<M: SimulatedMode, D: ScoreSimulationsDao> ScoreEstimator<M> for EstimationProvider<M, D> {
	async fn estimation(&self, score: &BeatmapScore<M>) -> Option<Estimation> {
		self.cache
			.get_or_compute(score.instance_id(), || M::simulate(self.dao.as_ref(), score))
			.await
	}
}

/// One provider per ruleset, all sharing the same dao.
#[derive(Debug)]
pub struct EstimationProviders<D> {
	pub osu: OsuEstimationProvider<D>,
	pub taiko: TaikoEstimationProvider<D>,
	pub catch: CatchEstimationProvider<D>,
	pub mania: ManiaEstimationProvider<D>,
}

impl<D> EstimationProviders<D> {
	pub fn new(dao: Arc<D>) -> Self {
		Self {
			osu: EstimationProvider::new(dao.clone()),
			taiko: EstimationProvider::new(dao.clone()),
			catch: EstimationProvider::new(dao.clone()),
			mania: EstimationProvider::new(dao),
		}
	}
}

impl<M: SimulatedMode, D: ScoreSimulationsDao> ScoreEstimator<M> for EstimationProviders<D> {
	async fn estimation(&self, score: &BeatmapScore<M>) -> Option<Estimation> {
		M::provider(self).estimation(score).await
	}
}
// }}}
