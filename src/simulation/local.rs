//! Simulations computed in-process with `rosu-pp`.
//!
//! Every ruleset is simulated. osu!standard maps are converted when asked
//! for another ruleset; maps of other rulesets only simulate as themselves.

// {{{ Imports
use std::path::PathBuf;

use anyhow::Context;
use rosu_pp::any::PerformanceAttributes as RosuPerformanceAttributes;
use rosu_pp::model::mode::GameMode;
use rosu_pp::{Beatmap as RosuBeatmap, Performance};
use tracing::{debug, warn};

use crate::context::config::SimulationConfig;
use crate::context::Error;
use crate::osu::hitcounts::{
	CatchHitcounts, Hitcounts, ManiaHitcounts, OsuHitcounts, TaikoHitcounts,
};
use crate::osu::mods::{ApiMod, GameMod};
use crate::simulation::attributes::*;
use crate::simulation::*;
use crate::timed;
// }}}

// {{{ Beatmap sources
/// Somewhere `.osu` files can be read from.
pub trait BeatmapSource: Send + Sync {
	async fn beatmap_bytes(&self, beatmap_id: u32) -> Result<Vec<u8>, Error>;
}

#[derive(Debug, Clone)]
pub enum BeatmapFileSource {
	/// Reads `<dir>/<id>.osu`.
	Directory(PathBuf),
	/// Fetches `<url>/<id>`.
	Download { client: reqwest::Client, url: String },
}

impl BeatmapFileSource {
	pub fn from_config(config: &SimulationConfig) -> Result<Self, Error> {
		if let Some(dir) = &config.beatmaps_dir {
			return Ok(Self::Directory(dir.clone()));
		}

		let client = reqwest::Client::builder()
			.timeout(config.request_timeout())
			.build()
			.context("Could not build the http client")?;

		Ok(Self::Download {
			client,
			url: config.beatmap_download_url.trim_end_matches('/').to_owned(),
		})
	}
}

impl BeatmapSource for BeatmapFileSource {
	async fn beatmap_bytes(&self, beatmap_id: u32) -> Result<Vec<u8>, Error> {
		match self {
			Self::Directory(dir) => {
				let path = dir.join(format!("{beatmap_id}.osu"));
				tokio::fs::read(&path)
					.await
					.with_context(|| format!("Could not read beatmap file {path:?}"))
			}
			Self::Download { client, url } => {
				let bytes = client
					.get(format!("{url}/{beatmap_id}"))
					.send()
					.await?
					.error_for_status()?
					.bytes()
					.await
					.with_context(|| format!("Could not download beatmap {beatmap_id}"))?;

				Ok(bytes.to_vec())
			}
		}
	}
}
// }}}
// {{{ Legacy mod bits
/// Acronyms and their bit in the legacy mods bitfield.
const LEGACY_MOD_BITS: [(&str, u32); 26] = [
	("NF", 1 << 0),
	("EZ", 1 << 1),
	("TD", 1 << 2),
	("HD", 1 << 3),
	("HR", 1 << 4),
	("SD", 1 << 5),
	("DT", 1 << 6),
	("RX", 1 << 7),
	("HT", 1 << 8),
	("NC", (1 << 9) | (1 << 6)),
	("FL", 1 << 10),
	("AT", 1 << 11),
	("SO", 1 << 12),
	("AP", 1 << 13),
	("PF", (1 << 14) | (1 << 5)),
	("4K", 1 << 15),
	("5K", 1 << 16),
	("6K", 1 << 17),
	("7K", 1 << 18),
	("8K", 1 << 19),
	("FI", 1 << 20),
	("RD", 1 << 21),
	("CN", 1 << 22),
	("TP", 1 << 23),
	("9K", 1 << 24),
	("MR", 1 << 30),
];

/// Mods without a legacy counterpart are dropped. Daycore plays like Half
/// Time as far as difficulty goes.
pub fn legacy_mod_bits(mods: &[GameMod]) -> u32 {
	mods.iter()
		.map(|game_mod| {
			let acronym = game_mod.acronym();
			let acronym = if acronym == "DC" { "HT" } else { acronym.as_str() };
			LEGACY_MOD_BITS
				.iter()
				.find(|(a, _)| *a == acronym)
				.map_or(0, |(_, bits)| *bits)
		})
		.fold(0, |acc, bits| acc | bits)
}
// }}}
// {{{ Dao
#[derive(Debug, Clone)]
pub struct LocalScoreSimulationsDao<S = BeatmapFileSource> {
	source: S,
}

impl<S: BeatmapSource> LocalScoreSimulationsDao<S> {
	pub fn new(source: S) -> Self {
		Self { source }
	}

	async fn load(&self, beatmap_id: u32) -> Option<RosuBeatmap> {
		let bytes = match self.source.beatmap_bytes(beatmap_id).await {
			Ok(bytes) => bytes,
			Err(e) => {
				warn!("Could not load beatmap {beatmap_id}: {e:#}");
				return None;
			}
		};

		match RosuBeatmap::from_bytes(&bytes) {
			Ok(beatmap) => Some(beatmap),
			Err(e) => {
				warn!("Could not parse beatmap {beatmap_id}: {e}");
				None
			}
		}
	}

	/// Sets up everything shared between rulesets.
	fn performance<'map>(
		beatmap: &'map RosuBeatmap,
		mode: GameMode,
		mods: &[GameMod],
		params: &SimulationParams,
	) -> Performance<'map> {
		let mut performance = Performance::new(beatmap)
			.mode_or_ignore(mode)
			.mods(legacy_mod_bits(mods));

		if let Some(rate) = params.clock_rate() {
			performance = performance.clock_rate(rate);
		}

		if let Some(adjust) = params.difficulty_adjust {
			if let Some(ar) = adjust.approach_rate {
				performance = performance.ar(ar as f32, false);
			}
			if let Some(cs) = adjust.circle_size {
				performance = performance.cs(cs as f32, false);
			}
			if let Some(od) = adjust.overall_difficulty {
				performance = performance.od(od as f32, false);
			}
			if let Some(hp) = adjust.drain_rate {
				performance = performance.hp(hp as f32, false);
			}
		}

		performance
	}
}

impl<S: BeatmapSource> ScoreSimulationsDao for LocalScoreSimulationsDao<S> {
	async fn get_for_osu(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: OsuScoreSpec,
		params: &SimulationParams,
	) -> Option<OsuSimulatedScore> {
		let beatmap = self.load(beatmap_id).await?;

		timed!("local_simulate_osu", {
			let mut performance = Self::performance(&beatmap, GameMode::Osu, mods, params);
			if let Some(combo) = spec.combo {
				performance = performance.combo(combo);
			}
			if let Some(misses) = spec.misses {
				performance = performance.misses(misses);
			}
			if let Some(goods) = spec.goods {
				performance = performance.n100(goods);
			}
			if let Some(mehs) = spec.mehs {
				performance = performance.n50(mehs);
			}
			if let Some(accuracy) = spec.accuracy {
				performance = performance.accuracy(accuracy);
			}

			let state = performance.generate_state();
			let RosuPerformanceAttributes::Osu(attributes) = performance.calculate() else {
				debug!("Beatmap {beatmap_id} cannot be simulated as osu!standard");
				return None;
			};

			let statistics = OsuHitcounts {
				great: state.n300,
				ok: state.n100,
				meh: state.n50,
				miss: state.misses,
			};

			Some(SimulatedScore {
				score: SimulatedScoreInfo {
					accuracy: statistics.accuracy() * 100.0,
					statistics,
					mods: mods.iter().map(GameMod::to_api).collect::<Vec<ApiMod>>(),
				},
				performance_attributes: OsuPerformanceAttributes {
					pp: attributes.pp,
					aim: attributes.pp_aim,
					speed: attributes.pp_speed,
					accuracy: attributes.pp_acc,
					flashlight: attributes.pp_flashlight,
				},
				difficulty_attributes: OsuDifficultyAttributes {
					star_rating: attributes.difficulty.stars,
					max_combo: attributes.difficulty.max_combo,
					approach_rate: attributes.difficulty.ar,
					overall_difficulty: attributes.difficulty.od,
				},
			})
		})
	}

	async fn get_for_taiko(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: TaikoScoreSpec,
		params: &SimulationParams,
	) -> Option<TaikoSimulatedScore> {
		let beatmap = self.load(beatmap_id).await?;

		timed!("local_simulate_taiko", {
			let mut performance = Self::performance(&beatmap, GameMode::Taiko, mods, params);
			if let Some(combo) = spec.combo {
				performance = performance.combo(combo);
			}
			if let Some(misses) = spec.misses {
				performance = performance.misses(misses);
			}
			if let Some(goods) = spec.goods {
				performance = performance.n100(goods);
			}
			if let Some(accuracy) = spec.accuracy {
				performance = performance.accuracy(accuracy);
			}

			let state = performance.generate_state();
			let RosuPerformanceAttributes::Taiko(attributes) = performance.calculate() else {
				debug!("Beatmap {beatmap_id} cannot be simulated as osu!taiko");
				return None;
			};

			let statistics = TaikoHitcounts {
				great: state.n300,
				ok: state.n100,
				miss: state.misses,
			};

			Some(SimulatedScore {
				score: SimulatedScoreInfo {
					accuracy: statistics.accuracy() * 100.0,
					statistics,
					mods: mods.iter().map(GameMod::to_api).collect(),
				},
				performance_attributes: TaikoPerformanceAttributes {
					pp: attributes.pp,
					difficulty: attributes.pp_difficulty,
					accuracy: attributes.pp_acc,
				},
				difficulty_attributes: TaikoDifficultyAttributes {
					star_rating: attributes.difficulty.stars,
					max_combo: attributes.difficulty.max_combo,
				},
			})
		})
	}

	async fn get_for_catch(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: CatchScoreSpec,
		params: &SimulationParams,
	) -> Option<CatchSimulatedScore> {
		let beatmap = self.load(beatmap_id).await?;

		timed!("local_simulate_catch", {
			let mut performance = Self::performance(&beatmap, GameMode::Catch, mods, params);
			if let Some(combo) = spec.combo {
				performance = performance.combo(combo);
			}
			if let Some(misses) = spec.misses {
				performance = performance.misses(misses);
			}
			if let Some(droplets) = spec.droplets {
				performance = performance.n100(droplets);
			}
			if let Some(tiny_droplets) = spec.tiny_droplets {
				performance = performance.n50(tiny_droplets);
			}
			if let Some(accuracy) = spec.accuracy {
				performance = performance.accuracy(accuracy);
			}

			let state = performance.generate_state();
			let RosuPerformanceAttributes::Catch(attributes) = performance.calculate() else {
				debug!("Beatmap {beatmap_id} cannot be simulated as osu!catch");
				return None;
			};

			let statistics = CatchHitcounts {
				great: state.n300,
				large_tick_hit: state.n100,
				small_tick_hit: state.n50,
				small_tick_miss: state.n_katu,
				miss: state.misses,
			};

			Some(SimulatedScore {
				score: SimulatedScoreInfo {
					accuracy: statistics.accuracy() * 100.0,
					statistics,
					mods: mods.iter().map(GameMod::to_api).collect(),
				},
				performance_attributes: CatchPerformanceAttributes { pp: attributes.pp },
				difficulty_attributes: CatchDifficultyAttributes {
					star_rating: attributes.difficulty.stars,
					max_combo: attributes.difficulty.max_combo(),
					approach_rate: attributes.difficulty.ar,
				},
			})
		})
	}

	async fn get_for_mania(
		&self,
		beatmap_id: u32,
		mods: &[GameMod],
		spec: ManiaScoreSpec,
		params: &SimulationParams,
	) -> Option<ManiaSimulatedScore> {
		let beatmap = self.load(beatmap_id).await?;

		timed!("local_simulate_mania", {
			// Perfects make up whatever the other judgements leave over
			let mut performance = Self::performance(&beatmap, GameMode::Mania, mods, params);
			if let Some(misses) = spec.misses {
				performance = performance.misses(misses);
			}
			if let Some(mehs) = spec.mehs {
				performance = performance.n50(mehs);
			}
			if let Some(oks) = spec.oks {
				performance = performance.n100(oks);
			}
			if let Some(goods) = spec.goods {
				performance = performance.n_katu(goods);
			}
			if let Some(greats) = spec.greats {
				performance = performance.n300(greats);
			}
			if let Some(accuracy) = spec.accuracy {
				performance = performance.accuracy(accuracy);
			}

			let state = performance.generate_state();
			let RosuPerformanceAttributes::Mania(attributes) = performance.calculate() else {
				debug!("Beatmap {beatmap_id} cannot be simulated as osu!mania");
				return None;
			};

			let statistics = ManiaHitcounts {
				perfect: state.n_geki,
				great: state.n300,
				good: state.n_katu,
				ok: state.n100,
				meh: state.n50,
				miss: state.misses,
			};

			Some(SimulatedScore {
				score: SimulatedScoreInfo {
					accuracy: statistics.accuracy() * 100.0,
					statistics,
					mods: mods.iter().map(GameMod::to_api).collect(),
				},
				performance_attributes: ManiaPerformanceAttributes {
					pp: attributes.pp,
					difficulty: attributes.pp_difficulty,
				},
				difficulty_attributes: ManiaDifficultyAttributes {
					star_rating: attributes.difficulty.stars,
					max_combo: attributes.difficulty.max_combo,
				},
			})
		})
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod local_tests {
	use std::fmt::Write;

	use super::*;

	/// A short stream of circles, enough for rosu-pp to chew on.
	fn osu_file(mode: u8) -> String {
		let mut contents = format!(
			"osu file format v14\n\n\
			[General]\nMode: {mode}\n\n\
			[Difficulty]\nHPDrainRate:5\nCircleSize:4\nOverallDifficulty:8\n\
			ApproachRate:9\nSliderMultiplier:1.4\nSliderTickRate:1\n\n\
			[TimingPoints]\n0,300,4,2,0,100,1,0\n\n\
			[HitObjects]\n"
		);

		for i in 0..200u32 {
			let x = 64 + (i * 37) % 384;
			let y = 48 + (i * 53) % 288;
			let time = 1000 + i * 150;
			writeln!(contents, "{x},{y},{time},1,0,0:0:0:0:").unwrap();
		}

		contents
	}

	fn dao_with(files: &[(u32, String)]) -> (tempfile::TempDir, LocalScoreSimulationsDao) {
		let dir = tempfile::tempdir().unwrap();
		for (id, contents) in files {
			std::fs::write(dir.path().join(format!("{id}.osu")), contents).unwrap();
		}

		let dao = LocalScoreSimulationsDao::new(BeatmapFileSource::Directory(
			dir.path().to_path_buf(),
		));
		(dir, dao)
	}

	#[test]
	fn legacy_bits() {
		let mods = GameMod::parse_combination("HDNC").unwrap();
		assert_eq!(legacy_mod_bits(&mods), 8 | 64 | 512);

		let mods = GameMod::parse_combination("BLDA").unwrap();
		assert_eq!(legacy_mod_bits(&mods), 0);

		let mods = GameMod::parse_combination("DCCL").unwrap();
		assert_eq!(legacy_mod_bits(&mods), 256);
	}

	#[tokio::test]
	async fn directory_source_reads_by_id() {
		let (_dir, dao) = dao_with(&[(75, "osu file format v14\n".to_owned())]);
		let bytes = dao.source.beatmap_bytes(75).await.unwrap();
		assert_eq!(bytes, b"osu file format v14\n");
		assert!(dao.source.beatmap_bytes(76).await.is_err());
	}

	#[tokio::test]
	async fn simulates_standard_plays() {
		let (_dir, dao) = dao_with(&[(75, osu_file(0))]);
		let nomod = dao
			.get_for_osu(75, &[], OsuScoreSpec::default(), &SimulationParams::default())
			.await
			.unwrap();
		assert!(nomod.pp() > 0.0);
		assert!(nomod.star_rating() > 0.0);
		assert_eq!(nomod.score.statistics.total(), 200);

		let mods = GameMod::parse_combination("DT").unwrap();
		let dt = dao
			.get_for_osu(75, &mods, OsuScoreSpec::default(), &SimulationParams::default())
			.await
			.unwrap();
		assert!(dt.star_rating() > nomod.star_rating());
		assert!(dt.difficulty_attributes.approach_rate > 9.0);

		let missed = dao
			.get_for_osu(
				75,
				&[],
				OsuScoreSpec {
					misses: Some(10),
					..Default::default()
				},
				&SimulationParams::default(),
			)
			.await
			.unwrap();
		assert!(missed.pp() < nomod.pp());
		assert_eq!(missed.score.statistics.miss, 10);
	}

	#[tokio::test]
	async fn simulates_converted_taiko_plays() {
		let (_dir, dao) = dao_with(&[(75, osu_file(0))]);
		let taiko = dao
			.get_for_taiko(
				75,
				&[],
				TaikoScoreSpec {
					goods: Some(5),
					..Default::default()
				},
				&SimulationParams::default(),
			)
			.await
			.unwrap();

		assert!(taiko.pp() > 0.0);
		assert!(taiko.star_rating() > 0.0);
		assert_eq!(taiko.score.statistics.ok, 5);
	}

	#[tokio::test]
	async fn simulates_converted_catch_plays() {
		let (_dir, dao) = dao_with(&[(75, osu_file(0))]);
		let nomod = dao
			.get_for_catch(75, &[], CatchScoreSpec::default(), &SimulationParams::default())
			.await
			.unwrap();
		assert!(nomod.pp() > 0.0);
		assert!(nomod.star_rating() > 0.0);
		assert_eq!(nomod.score.statistics.great, 200);
		assert_eq!(nomod.difficulty_attributes.max_combo, 200);

		let missed = dao
			.get_for_catch(
				75,
				&[],
				CatchScoreSpec {
					misses: Some(10),
					..Default::default()
				},
				&SimulationParams::default(),
			)
			.await
			.unwrap();
		assert!(missed.pp() < nomod.pp());
		assert_eq!(missed.score.statistics.miss, 10);
	}

	#[tokio::test]
	async fn simulates_converted_mania_plays() {
		let (_dir, dao) = dao_with(&[(75, osu_file(0))]);
		let nomod = dao
			.get_for_mania(75, &[], ManiaScoreSpec::default(), &SimulationParams::default())
			.await
			.unwrap();
		assert!(nomod.pp() > 0.0);
		assert!(nomod.star_rating() > 0.0);
		assert_eq!(nomod.score.statistics.total(), 200);

		let sloppy = dao
			.get_for_mania(
				75,
				&[],
				ManiaScoreSpec {
					misses: Some(10),
					mehs: Some(20),
					..Default::default()
				},
				&SimulationParams::default(),
			)
			.await
			.unwrap();
		assert!(sloppy.pp() < nomod.pp());
		assert_eq!(sloppy.score.statistics.miss, 10);
		assert_eq!(sloppy.score.statistics.meh, 20);
	}

	#[tokio::test]
	async fn missing_maps_are_none() {
		let (_dir, dao) = dao_with(&[(75, osu_file(0))]);
		let params = SimulationParams::default();

		assert!(dao
			.get_for_osu(76, &[], OsuScoreSpec::default(), &params)
			.await
			.is_none());
		assert!(dao
			.get_for_catch(76, &[], CatchScoreSpec::default(), &params)
			.await
			.is_none());
		assert!(dao
			.get_for_mania(76, &[], ManiaScoreSpec::default(), &params)
			.await
			.is_none());
	}
}
// }}}
