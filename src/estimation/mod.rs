//! Estimates of pp and star ratings for scores.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::osu::ruleset::Mode;
use crate::osu::score::{BeatmapScore, ScoreInstanceId};

pub mod providers;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
	pub pp: f64,
	pub star_rating: f64,
}

/// Something able to estimate scores of a given ruleset.
pub trait ScoreEstimator<M: Mode> {
	/// `None` when the score cannot be simulated right now, or at all.
	async fn estimation(&self, score: &BeatmapScore<M>) -> Option<Estimation>;
}

// {{{ Cache
type Slot = Arc<OnceCell<Option<Estimation>>>;

/// Bounded, insertion ordered map from score identities to estimations.
///
/// Entries are shared cells, so concurrent lookups of the same score wait on
/// a single computation. Once the cache outgrows [`Self::CAPACITY`], the
/// oldest [`Self::EVICTION_BATCH`] entries are dropped at once.
#[derive(Debug, Default)]
pub struct EstimationCache {
	entries: Mutex<VecDeque<(ScoreInstanceId, Slot)>>,
}

impl EstimationCache {
	pub const CAPACITY: usize = 50;
	pub const EVICTION_BATCH: usize = 25;

	fn slot(&self, id: ScoreInstanceId) -> Slot {
		let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
		if let Some((_, slot)) = entries.iter().find(|(key, _)| *key == id) {
			return slot.clone();
		}

		let slot = Slot::default();
		entries.push_back((id, slot.clone()));
		if entries.len() > Self::CAPACITY {
			entries.drain(..Self::EVICTION_BATCH);
		}

		slot
	}

	/// Returns the cached estimation for `id`, running `compute` on a miss.
	pub async fn get_or_compute<F, Fut>(&self, id: ScoreInstanceId, compute: F) -> Option<Estimation>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Option<Estimation>>,
	{
		let slot = self.slot(id);
		*slot.get_or_init(compute).await
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains(&self, id: ScoreInstanceId) -> bool {
		self.entries
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.iter()
			.any(|(key, _)| *key == id)
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod cache_tests {
	use super::*;
	use crate::osu::score::score_fixtures::score;

	const ESTIMATION: Estimation = Estimation {
		pp: 1.0,
		star_rating: 2.0,
	};

	#[tokio::test]
	async fn evicts_the_oldest_half_when_full() {
		let cache = EstimationCache::default();
		let scores: Vec<_> = (0..=EstimationCache::CAPACITY)
			.map(|_| score(""))
			.collect();

		for score in &scores[..EstimationCache::CAPACITY] {
			cache
				.get_or_compute(score.instance_id(), || async { Some(ESTIMATION) })
				.await;
		}
		assert_eq!(cache.len(), 50);
		assert!(cache.contains(scores[0].instance_id()));

		let last = &scores[EstimationCache::CAPACITY];
		cache
			.get_or_compute(last.instance_id(), || async { Some(ESTIMATION) })
			.await;

		assert_eq!(cache.len(), 26);
		assert!(!cache.contains(scores[24].instance_id()));
		assert!(cache.contains(scores[25].instance_id()));
		assert!(cache.contains(last.instance_id()));
	}

	#[tokio::test]
	async fn failures_are_cached_too() {
		let cache = EstimationCache::default();
		let score = score("");

		let first = cache.get_or_compute(score.instance_id(), || async { None }).await;
		let second = cache
			.get_or_compute(score.instance_id(), || async { Some(ESTIMATION) })
			.await;

		assert_eq!(first, None);
		assert_eq!(second, None);
	}
}
// }}}
