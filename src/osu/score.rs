// {{{ Imports
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::estimation::ScoreEstimator;
use crate::osu::beatmap::Beatmap;
use crate::osu::hitcounts::Hitcounts;
use crate::osu::mods::{GameMod, Mod};
use crate::osu::ruleset::Mode;
// }}}

// {{{ Rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
	SS,
	S,
	A,
	B,
	C,
	D,
	F,
}

impl Rank {
	pub const RANKS: [Self; 7] = [
		Self::SS,
		Self::S,
		Self::A,
		Self::B,
		Self::C,
		Self::D,
		Self::F,
	];

	pub const RANK_STRINGS: [&'static str; 7] = ["SS", "S", "A", "B", "C", "D", "F"];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}
}

impl Display for Rank {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Self::RANK_STRINGS[self.to_index()])
	}
}

impl FromStr for Rank {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// The API reports silver ranks separately
		let upper = match s.trim().to_uppercase().as_str() {
			"X" | "XH" | "SSH" => "SS".to_owned(),
			"SH" => "S".to_owned(),
			other => other.to_owned(),
		};

		Self::RANK_STRINGS
			.iter()
			.position(|r| *r == upper)
			.map(|i| Self::RANKS[i])
			.ok_or_else(|| anyhow!("Cannot convert {s:?} to a rank"))
	}
}
// }}}
// {{{ Score data
/// What a simulation of this score should be driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationBasis {
	/// Reproduce the exact judgement counts.
	#[default]
	Hitcounts,
	/// Only match the accuracy, letting the simulator pick judgements.
	Accuracy,
}

/// The raw fields of a play, as reported by the game.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreData<M: Mode> {
	pub id: u64,
	pub ended_at: DateTime<Utc>,
	pub passed: bool,

	/// How much of the map was played, in `[0, 1]`.
	pub map_progress: f64,

	/// Mods in the order the game reported them.
	pub mods: Vec<GameMod>,
	pub total_score: u64,
	pub max_combo: u32,
	pub hitcounts: M::Hitcounts,

	/// In `[0, 1]`.
	pub accuracy: f64,
	pub rank: Rank,

	/// Server-reported pp, if any.
	pub pp: Option<f64>,
	pub base_beatmap: Beatmap<M>,
	pub simulation_basis: SimulationBasis,
}
// }}}
// {{{ Instance ids
/// Identity of a [`BeatmapScore`] value.
///
/// Minted fresh on construction and on every copy, so caches keyed on it
/// never hand a copy the estimates of its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScoreInstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(0);

impl ScoreInstanceId {
	#[inline]
	fn mint() -> Self {
		Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
	}
}
// }}}
// {{{ Beatmap score
/// A play on a beatmap, together with everything derived from its mods.
///
/// The value is immutable. Hypothetical variants are built with
/// [`BeatmapScore::copy_with`], which starts over with empty estimate caches.
#[derive(Debug)]
pub struct BeatmapScore<M: Mode> {
	data: ScoreData<M>,
	instance_id: ScoreInstanceId,
	modded_beatmap: Beatmap<M>,
	has_star_rating_changing_mods: bool,

	estimated_pp: OnceCell<Option<f64>>,
	estimated_star_rating: OnceCell<Option<f64>>,
}

impl<M: Mode> BeatmapScore<M> {
	pub fn new(data: ScoreData<M>) -> Self {
		let catalog = M::catalog();
		let has_star_rating_changing_mods = data
			.mods
			.iter()
			.any(|m| catalog.changes_star_rating(m.acronym()));

		let mut modded_beatmap = catalog.mod_apply_order().fold(
			data.base_beatmap.clone(),
			|beatmap, acronym| match data.mods.iter().find(|m| m.acronym() == acronym) {
				Some(game_mod) => Mod::<M>::apply(game_mod, &beatmap),
				None => beatmap,
			},
		);

		if has_star_rating_changing_mods {
			modded_beatmap.star_rating = None;
		}

		Self {
			data,
			instance_id: ScoreInstanceId::mint(),
			modded_beatmap,
			has_star_rating_changing_mods,
			estimated_pp: OnceCell::new(),
			estimated_star_rating: OnceCell::new(),
		}
	}

	// {{{ Accessors
	#[inline]
	pub fn data(&self) -> &ScoreData<M> {
		&self.data
	}

	#[inline]
	pub fn instance_id(&self) -> ScoreInstanceId {
		self.instance_id
	}

	/// The base beatmap with every mod folded over it, in catalog order.
	///
	/// Its star rating is `None` whenever the mods change it.
	#[inline]
	pub fn modded_beatmap(&self) -> &Beatmap<M> {
		&self.modded_beatmap
	}

	#[inline]
	pub fn has_star_rating_changing_mods(&self) -> bool {
		self.has_star_rating_changing_mods
	}
	// }}}
	// {{{ Copies
	/// Builds a new score out of this one, with `edit` applied to its data.
	pub fn copy_with(&self, edit: impl FnOnce(&mut ScoreData<M>)) -> Self {
		let mut data = self.data.clone();
		edit(&mut data);
		Self::new(data)
	}

	/// The same play, had every miss been a top judgement.
	pub fn if_full_combo(&self) -> Self {
		self.copy_with(|data| {
			data.hitcounts = data.hitcounts.full_combo();
			data.accuracy = data.hitcounts.accuracy();
			data.max_combo = data.base_beatmap.max_combo;
			data.passed = true;
			data.map_progress = 1.0;
			data.pp = None;
		})
	}

	/// The same map, played without a single imperfect judgement.
	pub fn if_perfect(&self) -> Self {
		self.copy_with(|data| {
			data.hitcounts = data.hitcounts.perfect();
			data.accuracy = 1.0;
			data.max_combo = data.base_beatmap.max_combo;
			data.rank = Rank::SS;
			data.passed = true;
			data.map_progress = 1.0;
			data.pp = None;
		})
	}
	// }}}
	// {{{ Estimates
	/// The server-reported pp when known, otherwise an estimate.
	///
	/// At most one estimation is ever started per score, even when called
	/// concurrently.
	pub async fn estimated_pp(&self, estimator: &impl ScoreEstimator<M>) -> Option<f64> {
		if let Some(pp) = self.data.pp {
			return Some(pp);
		}

		*self
			.estimated_pp
			.get_or_init(|| async {
				estimator
					.estimation(self)
					.await
					.map(|estimation| estimation.pp)
			})
			.await
	}

	/// The modded beatmap's star rating when the mods keep it intact,
	/// otherwise an estimate.
	pub async fn estimated_star_rating(&self, estimator: &impl ScoreEstimator<M>) -> Option<f64> {
		if let Some(star_rating) = self.modded_beatmap.star_rating {
			return Some(star_rating);
		}

		*self
			.estimated_star_rating
			.get_or_init(|| async {
				estimator
					.estimation(self)
					.await
					.map(|estimation| estimation.star_rating)
			})
			.await
	}
	// }}}
}

impl<M: Mode> Clone for BeatmapScore<M> {
	/// Clones get their own identity, and hence their own estimates.
	fn clone(&self) -> Self {
		self.copy_with(|_| {})
	}
}

impl<M: Mode> Deref for BeatmapScore<M> {
	type Target = ScoreData<M>;

	#[inline]
	fn deref(&self) -> &Self::Target {
		&self.data
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
pub(crate) mod score_fixtures {
	use chrono::TimeZone;

	use super::*;
	use crate::osu::beatmap::beatmap_fixtures::beatmap;
	use crate::osu::beatmap::BeatmapStats;
	use crate::osu::hitcounts::OsuHitcounts;
	use crate::osu::ruleset::Standard;

	pub fn score(mods: &str) -> BeatmapScore<Standard> {
		BeatmapScore::new(ScoreData {
			id: 4_242_424_242,
			ended_at: Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
			passed: true,
			map_progress: 1.0,
			mods: GameMod::parse_combination(mods).unwrap(),
			total_score: 912_345,
			max_combo: 1700,
			hitcounts: OsuHitcounts {
				great: 1800,
				ok: 40,
				meh: 3,
				miss: 2,
			},
			accuracy: 0.9776,
			rank: Rank::A,
			pp: None,
			base_beatmap: beatmap(BeatmapStats::new(9.0, 4.0, 8.0, 6.0)),
			simulation_basis: SimulationBasis::Hitcounts,
		})
	}
}

#[cfg(test)]
mod score_tests {
	use std::sync::atomic::AtomicUsize;

	use super::score_fixtures::score;
	use super::*;
	use crate::estimation::Estimation;
	use crate::osu::mods::{DifficultyAdjustSettings, SpeedSettings};
	use crate::osu::ruleset::Standard;
	use crate::osu::stat_conversion::{approach_rate_to_ms, ms_to_approach_rate};

	#[derive(Default)]
	struct CountingEstimator {
		calls: AtomicUsize,
	}

	impl ScoreEstimator<Standard> for CountingEstimator {
		async fn estimation(&self, _score: &BeatmapScore<Standard>) -> Option<Estimation> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			tokio::task::yield_now().await;
			Some(Estimation {
				pp: 727.0,
				star_rating: 9.1,
			})
		}
	}

	#[test]
	fn mod_order_comes_from_the_catalog() {
		let a = score("HRDT");
		let b = score("DTHR");
		assert_eq!(a.modded_beatmap().stats, b.modded_beatmap().stats);

		// HR first (AR 9 -> 10), then DT (600ms -> 450ms -> 300ms)
		assert!((a.modded_beatmap().stats.ar - 11.0).abs() < 1e-9);
	}

	#[test]
	fn difficulty_adjust_lands_before_speed_mods() {
		let adjust = GameMod::DifficultyAdjust(DifficultyAdjustSettings {
			approach_rate: Some(8.0),
			..Default::default()
		});

		for (speed, rate) in [
			(GameMod::DoubleTime(SpeedSettings::default()), 1.5),
			(GameMod::HalfTime(SpeedSettings::default()), 0.75),
		] {
			let forward = score("").copy_with(|data| data.mods = vec![speed.clone(), adjust.clone()]);
			let reversed = score("").copy_with(|data| data.mods = vec![adjust.clone(), speed.clone()]);

			let expected = ms_to_approach_rate(approach_rate_to_ms(8.0) / rate);
			let ar = forward.modded_beatmap().stats.ar;
			assert!((ar - expected).abs() < 1e-9, "{rate}x gave AR {ar}");
			assert!((ar - 8.0).abs() > 0.5);
			assert_eq!(forward.modded_beatmap().stats, reversed.modded_beatmap().stats);
		}
	}

	#[test]
	fn star_rating_is_dropped_by_changing_mods_only() {
		let hd = score("HD");
		assert!(!hd.has_star_rating_changing_mods());
		assert_eq!(hd.modded_beatmap().star_rating, Some(7.03));
		assert_eq!(hd.modded_beatmap(), &hd.base_beatmap);

		let dt = score("HDDT");
		assert!(dt.has_star_rating_changing_mods());
		assert_eq!(dt.modded_beatmap().star_rating, None);
		assert_eq!(dt.base_beatmap.star_rating, Some(7.03));
	}

	#[test]
	fn copies_get_a_fresh_identity() {
		let original = score("");
		let copy = original.copy_with(|data| data.max_combo = 10);
		assert_ne!(original.instance_id(), copy.instance_id());
		assert_ne!(original.instance_id(), original.clone().instance_id());
		assert_eq!(copy.max_combo, 10);
		assert_eq!(original.max_combo, 1700);
	}

	#[test]
	fn hypothetical_scores() {
		let original = score("HD");
		let fc = original.if_full_combo();
		assert_eq!(fc.hitcounts.miss, 0);
		assert_eq!(fc.hitcounts.great, 1802);
		assert_eq!(fc.max_combo, 2385);
		assert_eq!(fc.rank, Rank::A);
		assert!(fc.accuracy > original.hitcounts.accuracy());

		let ss = original.if_perfect();
		assert_eq!(ss.accuracy, 1.0);
		assert_eq!(ss.rank, Rank::SS);
		assert_eq!(ss.hitcounts.total(), original.hitcounts.total());
	}

	#[tokio::test]
	async fn estimates_are_memoized_per_score() {
		let estimator = CountingEstimator::default();
		let score = score("DT");

		let (a, b) = tokio::join!(
			score.estimated_pp(&estimator),
			score.estimated_pp(&estimator)
		);
		assert_eq!(a, Some(727.0));
		assert_eq!(b, Some(727.0));
		assert_eq!(score.estimated_pp(&estimator).await, Some(727.0));
		assert_eq!(estimator.calls.load(Ordering::SeqCst), 1);

		let copy = score.copy_with(|_| {});
		copy.estimated_pp(&estimator).await;
		assert_eq!(estimator.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn known_values_skip_estimation() {
		let estimator = CountingEstimator::default();
		let known = score("HD").copy_with(|data| data.pp = Some(500.0));

		assert_eq!(known.estimated_pp(&estimator).await, Some(500.0));
		assert_eq!(known.estimated_star_rating(&estimator).await, Some(7.03));
		assert_eq!(estimator.calls.load(Ordering::SeqCst), 0);

		let dt = score("DT");
		assert_eq!(dt.estimated_star_rating(&estimator).await, Some(9.1));
		assert_eq!(estimator.calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn rank_parsing() {
		assert_eq!("xh".parse::<Rank>().unwrap(), Rank::SS);
		assert_eq!("SH".parse::<Rank>().unwrap(), Rank::S);
		assert_eq!("b".parse::<Rank>().unwrap(), Rank::B);
		assert!("E".parse::<Rank>().is_err());
	}
}
// }}}
