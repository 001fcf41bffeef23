//! Judgement counts, one shape per ruleset.
//!
//! Field order follows the order results are shown in, best judgement first.
//! Field names match the statistics keys of lazer scores, and missing keys
//! deserialize as zero.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub trait Hitcounts:
	Debug + Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
	/// Counts in display order, best judgement first.
	fn ordered_values(&self) -> Vec<u32>;

	fn misses(&self) -> u32;

	/// Accuracy in `[0, 1]`, following the ruleset's weighting.
	fn accuracy(&self) -> f64;

	/// The same play, with every combo break turned into a top judgement.
	fn full_combo(&self) -> Self;

	/// The same object count, every judgement being the top one.
	fn perfect(&self) -> Self;

	#[inline]
	fn total(&self) -> u32 {
		self.ordered_values().iter().sum()
	}
}

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
	if denominator <= 0.0 {
		1.0
	} else {
		(numerator / denominator).clamp(0.0, 1.0)
	}
}

// {{{ osu!standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OsuHitcounts {
	pub great: u32,
	pub ok: u32,
	pub meh: u32,
	pub miss: u32,
}

impl Hitcounts for OsuHitcounts {
	fn ordered_values(&self) -> Vec<u32> {
		vec![self.great, self.ok, self.meh, self.miss]
	}

	#[inline]
	fn misses(&self) -> u32 {
		self.miss
	}

	fn accuracy(&self) -> f64 {
		let weighted = 300.0 * self.great as f64 + 100.0 * self.ok as f64 + 50.0 * self.meh as f64;
		ratio(weighted, 300.0 * self.total() as f64)
	}

	fn full_combo(&self) -> Self {
		Self {
			great: self.great + self.miss,
			miss: 0,
			..*self
		}
	}

	fn perfect(&self) -> Self {
		Self {
			great: self.total(),
			..Self::default()
		}
	}
}
// }}}
// {{{ osu!taiko
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaikoHitcounts {
	pub great: u32,
	pub ok: u32,
	pub miss: u32,
}

impl Hitcounts for TaikoHitcounts {
	fn ordered_values(&self) -> Vec<u32> {
		vec![self.great, self.ok, self.miss]
	}

	#[inline]
	fn misses(&self) -> u32 {
		self.miss
	}

	fn accuracy(&self) -> f64 {
		ratio(
			self.great as f64 + 0.5 * self.ok as f64,
			self.total() as f64,
		)
	}

	fn full_combo(&self) -> Self {
		Self {
			great: self.great + self.miss,
			miss: 0,
			..*self
		}
	}

	fn perfect(&self) -> Self {
		Self {
			great: self.total(),
			..Self::default()
		}
	}
}
// }}}
// {{{ osu!catch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchHitcounts {
	/// Fruits
	pub great: u32,
	/// Droplets
	pub large_tick_hit: u32,
	/// Tiny droplets
	pub small_tick_hit: u32,
	/// Missed tiny droplets. These never break combo.
	pub small_tick_miss: u32,
	/// Missed fruits and droplets
	pub miss: u32,
}

impl Hitcounts for CatchHitcounts {
	fn ordered_values(&self) -> Vec<u32> {
		vec![
			self.great,
			self.large_tick_hit,
			self.small_tick_hit,
			self.small_tick_miss,
			self.miss,
		]
	}

	#[inline]
	fn misses(&self) -> u32 {
		self.miss
	}

	fn accuracy(&self) -> f64 {
		let caught = self.great + self.large_tick_hit + self.small_tick_hit;
		ratio(caught as f64, self.total() as f64)
	}

	fn full_combo(&self) -> Self {
		Self {
			great: self.great + self.miss,
			miss: 0,
			..*self
		}
	}

	fn perfect(&self) -> Self {
		Self {
			great: self.great + self.miss,
			large_tick_hit: self.large_tick_hit,
			small_tick_hit: self.small_tick_hit + self.small_tick_miss,
			small_tick_miss: 0,
			miss: 0,
		}
	}
}
// }}}
// {{{ osu!mania
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManiaHitcounts {
	pub perfect: u32,
	pub great: u32,
	pub good: u32,
	pub ok: u32,
	pub meh: u32,
	pub miss: u32,
}

impl Hitcounts for ManiaHitcounts {
	fn ordered_values(&self) -> Vec<u32> {
		vec![
			self.perfect,
			self.great,
			self.good,
			self.ok,
			self.meh,
			self.miss,
		]
	}

	#[inline]
	fn misses(&self) -> u32 {
		self.miss
	}

	fn accuracy(&self) -> f64 {
		let weighted = 305.0 * self.perfect as f64
			+ 300.0 * self.great as f64
			+ 200.0 * self.good as f64
			+ 100.0 * self.ok as f64
			+ 50.0 * self.meh as f64;
		ratio(weighted, 305.0 * self.total() as f64)
	}

	fn full_combo(&self) -> Self {
		Self {
			perfect: self.perfect + self.miss,
			miss: 0,
			..*self
		}
	}

	fn perfect(&self) -> Self {
		Self {
			perfect: self.total(),
			..Self::default()
		}
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod hitcounts_tests {
	use super::*;

	#[test]
	fn osu_accuracy() {
		let hits = OsuHitcounts {
			great: 90,
			ok: 6,
			meh: 2,
			miss: 2,
		};
		let expected = (300.0 * 90.0 + 100.0 * 6.0 + 50.0 * 2.0) / (300.0 * 100.0);
		assert!((hits.accuracy() - expected).abs() < 1e-12);
		assert_eq!(hits.total(), 100);
	}

	#[test]
	fn full_combo_keeps_the_object_count() {
		let hits = OsuHitcounts {
			great: 90,
			ok: 6,
			meh: 2,
			miss: 2,
		};
		let fc = hits.full_combo();
		assert_eq!(fc.total(), hits.total());
		assert_eq!(fc.misses(), 0);
		assert_eq!(fc.ok, 6);
		assert_eq!(hits.perfect().accuracy(), 1.0);
	}

	#[test]
	fn taiko_ok_counts_half() {
		let hits = TaikoHitcounts {
			great: 50,
			ok: 50,
			miss: 0,
		};
		assert_eq!(hits.accuracy(), 0.75);
	}

	#[test]
	fn catch_tiny_droplet_misses_survive_a_full_combo() {
		let hits = CatchHitcounts {
			great: 500,
			large_tick_hit: 40,
			small_tick_hit: 300,
			small_tick_miss: 10,
			miss: 3,
		};
		let fc = hits.full_combo();
		assert_eq!(fc.small_tick_miss, 10);
		assert_eq!(fc.miss, 0);
		assert_eq!(hits.perfect().accuracy(), 1.0);
	}

	#[test]
	fn mania_order_and_accuracy() {
		let hits = ManiaHitcounts {
			perfect: 1,
			great: 2,
			good: 3,
			ok: 4,
			meh: 5,
			miss: 6,
		};
		assert_eq!(hits.ordered_values(), vec![1, 2, 3, 4, 5, 6]);
		assert_eq!(ManiaHitcounts::default().accuracy(), 1.0);
		assert!(hits.accuracy() < 0.5);
	}
}
// }}}
