// {{{ Imports
use std::marker::PhantomData;

use chrono::Utc;
use serde_json::{Map, Value};

use osu_bot::context::config::SimulationConfig;
use osu_bot::context::{BotContext, Error};
use osu_bot::estimation::providers::{EstimationProviders, SimulatedMode};
use osu_bot::osu::beatmap::{Beatmap, BeatmapStats, Beatmapset, BeatmapsetStatus, Song};
use osu_bot::osu::hitcounts::{
	CatchHitcounts, Hitcounts, ManiaHitcounts, OsuHitcounts, TaikoHitcounts,
};
use osu_bot::osu::mods::GameMod;
use osu_bot::osu::ruleset::{Catch, Mania, Ruleset, Standard, Taiko};
use osu_bot::osu::score::{BeatmapScore, Rank, ScoreData, SimulationBasis};
use osu_bot::simulation::backend::SimulationBackend;

use crate::commands::parse_mods;
// }}}

#[derive(clap::Args)]
pub struct Args {
	beatmap_id: u32,

	/// Concatenated mod acronyms, e.g. `HDDT`
	#[arg(short, long, default_value = "")]
	mods: String,

	#[arg(short, long, default_value = "osu")]
	ruleset: Ruleset,

	/// Custom rate for the speed mod
	#[arg(long)]
	rate: Option<f64>,

	// {{{ Beatmap
	#[arg(long, default_value_t = 5.0)]
	ar: f64,
	#[arg(long, default_value_t = 5.0)]
	cs: f64,
	#[arg(long, default_value_t = 5.0)]
	od: f64,
	#[arg(long, default_value_t = 5.0)]
	hp: f64,
	#[arg(long, default_value_t = 120.0)]
	bpm: f64,
	/// Drain length in seconds
	#[arg(long, default_value_t = 0.0)]
	length: f64,
	#[arg(long)]
	star_rating: Option<f64>,
	#[arg(long, default_value_t = 0)]
	max_combo: u32,
	// }}}
	// {{{ Play
	/// Combo reached. Defaults to the beatmap's max combo.
	#[arg(long)]
	combo: Option<u32>,
	/// Top judgements (300s, fruits, perfects)
	#[arg(long, default_value_t = 0)]
	greats: u32,
	/// 100s, droplets in catch
	#[arg(long, default_value_t = 0)]
	goods: u32,
	/// 50s, tiny droplets in catch
	#[arg(long, default_value_t = 0)]
	mehs: u32,
	#[arg(long, default_value_t = 0)]
	misses: u32,
	/// Simulate this accuracy (in percent) instead of the exact judgements
	#[arg(long)]
	accuracy: Option<f64>,
	// }}}
}

impl Args {
	fn game_mods(&self, ruleset: Ruleset) -> Result<Option<Vec<GameMod>>, Error> {
		let Some(acronyms) = parse_mods(ruleset, &self.mods)? else {
			return Ok(None);
		};

		let mut speed = Map::new();
		if let Some(rate) = self.rate {
			speed.insert("speed_change".to_owned(), Value::from(rate));
		}

		let empty = Map::new();
		Ok(Some(
			acronyms
				.into_iter()
				.map(|acronym| {
					let settings = match acronym.as_str() {
						"DT" | "NC" | "HT" | "DC" => &speed,
						_ => &empty,
					};
					GameMod::from_acronym(acronym, settings)
				})
				.collect(),
		))
	}

	fn beatmap<M: SimulatedMode>(&self) -> Beatmap<M> {
		Beatmap {
			id: self.beatmap_id,
			difficulty_name: String::new(),
			stats: BeatmapStats::new(self.ar, self.cs, self.od, self.hp),
			star_rating: self.star_rating,
			length: self.length,
			max_combo: self.max_combo,
			beatmapset: Beatmapset {
				id: 0,
				creator_id: 0,
				creator_username: String::new(),
				status: BeatmapsetStatus::Ranked,
			},
			song: Song {
				artist: String::new(),
				title: format!("Beatmap #{}", self.beatmap_id),
				bpm: self.bpm,
				length: self.length,
			},
			mode: PhantomData,
		}
	}

	fn score<M: SimulatedMode>(&self, mods: Vec<GameMod>, hitcounts: M::Hitcounts) -> BeatmapScore<M> {
		let accuracy = match self.accuracy {
			Some(accuracy) => accuracy / 100.0,
			None => hitcounts.accuracy(),
		};

		BeatmapScore::new(ScoreData {
			id: 0,
			ended_at: Utc::now(),
			passed: true,
			map_progress: 1.0,
			mods,
			total_score: 0,
			max_combo: self.combo.unwrap_or(self.max_combo),
			hitcounts,
			accuracy,
			rank: Rank::A,
			pp: None,
			base_beatmap: self.beatmap(),
			simulation_basis: match self.accuracy {
				Some(_) => SimulationBasis::Accuracy,
				None => SimulationBasis::Hitcounts,
			},
		})
	}
}

fn format_estimate(value: Option<f64>, unit: &str) -> String {
	match value {
		Some(value) => format!("{value:.2}{unit}"),
		None => "-".to_owned(),
	}
}

async fn report<M: SimulatedMode>(
	estimators: &EstimationProviders<SimulationBackend>,
	score: BeatmapScore<M>,
) {
	let beatmap = score.modded_beatmap();
	let mods: Vec<_> = score.mods.iter().map(|m| m.acronym().to_string()).collect();

	println!("{} +{}", beatmap.song, mods.join(""));
	println!(
		"AR {:.2} | CS {:.2} | OD {:.2} | HP {:.2} | {:.0} BPM | {:.0}s",
		beatmap.stats.ar,
		beatmap.stats.cs,
		beatmap.stats.od,
		beatmap.stats.hp,
		beatmap.song.bpm,
		beatmap.length
	);

	let if_fc = score.if_full_combo();
	let if_ss = score.if_perfect();
	let (star_rating, pp, fc_pp, ss_pp) = tokio::join!(
		score.estimated_star_rating(estimators),
		score.estimated_pp(estimators),
		if_fc.estimated_pp(estimators),
		if_ss.estimated_pp(estimators),
	);

	println!("Star rating: {}", format_estimate(star_rating, "*"));
	println!(
		"{:.2}% {}x: {}",
		score.accuracy * 100.0,
		score.max_combo,
		format_estimate(pp, "pp")
	);
	println!(
		"If FC ({:.2}%): {}",
		if_fc.accuracy * 100.0,
		format_estimate(fc_pp, "pp")
	);
	println!("If SS: {}", format_estimate(ss_pp, "pp"));
}

pub async fn run(args: Args) -> Result<(), Error> {
	let ctx = BotContext::new(SimulationConfig::load()?)?;
	let Some(mods) = args.game_mods(args.ruleset)? else {
		return Ok(());
	};

	match args.ruleset {
		Ruleset::Standard => {
			let hitcounts = OsuHitcounts {
				great: args.greats,
				ok: args.goods,
				meh: args.mehs,
				miss: args.misses,
			};
			report(&ctx.estimators, args.score::<Standard>(mods, hitcounts)).await;
		}
		Ruleset::Taiko => {
			let hitcounts = TaikoHitcounts {
				great: args.greats,
				ok: args.goods,
				miss: args.misses,
			};
			report(&ctx.estimators, args.score::<Taiko>(mods, hitcounts)).await;
		}
		Ruleset::Catch => {
			let hitcounts = CatchHitcounts {
				great: args.greats,
				large_tick_hit: args.goods,
				small_tick_hit: args.mehs,
				small_tick_miss: 0,
				miss: args.misses,
			};
			report(&ctx.estimators, args.score::<Catch>(mods, hitcounts)).await;
		}
		Ruleset::Mania => {
			let hitcounts = ManiaHitcounts {
				perfect: args.greats,
				good: args.goods,
				meh: args.mehs,
				miss: args.misses,
				..Default::default()
			};
			report(&ctx.estimators, args.score::<Mania>(mods, hitcounts)).await;
		}
	}

	Ok(())
}
