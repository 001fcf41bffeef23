use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::osu::ruleset::{Mode, Ruleset};

// {{{ Stats
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatmapStats {
	pub ar: f64,
	pub cs: f64,
	pub od: f64,
	pub hp: f64,
}

impl BeatmapStats {
	#[inline]
	pub fn new(ar: f64, cs: f64, od: f64, hp: f64) -> Self {
		Self { ar, cs, od, hp }
	}
}
// }}}
// {{{ Song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
	pub artist: String,
	pub title: String,
	pub bpm: f64,
	/// Length in seconds.
	pub length: f64,
}

impl Display for Song {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} - {}", self.artist, self.title)
	}
}
// }}}
// {{{ Beatmapset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatmapsetStatus {
	Graveyard,
	Wip,
	Pending,
	Ranked,
	Approved,
	Qualified,
	Loved,
}

impl BeatmapsetStatus {
	pub const STATUSES: [Self; 7] = [
		Self::Graveyard,
		Self::Wip,
		Self::Pending,
		Self::Ranked,
		Self::Approved,
		Self::Qualified,
		Self::Loved,
	];

	pub const STATUS_STRINGS: [&'static str; 7] = [
		"graveyard",
		"wip",
		"pending",
		"ranked",
		"approved",
		"qualified",
		"loved",
	];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}
}

impl Display for BeatmapsetStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Self::STATUS_STRINGS[self.to_index()])
	}
}

impl FromStr for BeatmapsetStatus {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowercase = s.trim().to_lowercase();
		for (i, status) in Self::STATUS_STRINGS.iter().enumerate() {
			if lowercase == *status {
				return Ok(Self::STATUSES[i]);
			}
		}

		Err(anyhow!("Cannot convert {s:?} to a beatmapset status"))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmapset {
	pub id: u32,
	pub creator_id: u32,
	pub creator_username: String,
	pub status: BeatmapsetStatus,
}
// }}}
// {{{ Beatmap
/// A beatmap's metadata as seen under a given ruleset.
///
/// Beatmaps are never mutated in place: mods produce new values via struct
/// update syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Beatmap<M: Mode> {
	pub id: u32,
	pub difficulty_name: String,
	pub stats: BeatmapStats,

	/// `None` when the mods applied to this map change its star rating,
	/// and it must therefore be estimated again.
	pub star_rating: Option<f64>,

	/// Drain length in seconds.
	pub length: f64,
	pub max_combo: u32,
	pub beatmapset: Beatmapset,
	pub song: Song,

	pub mode: PhantomData<M>,
}

impl<M: Mode> Beatmap<M> {
	#[inline]
	pub fn ruleset(&self) -> Ruleset {
		M::RULESET
	}

	#[inline]
	pub fn with_stats(&self, stats: BeatmapStats) -> Self {
		Self {
			stats,
			..self.clone()
		}
	}

	/// Plays the map back `rate` times faster, leaving the stats alone.
	pub fn with_playback_rate(&self, rate: f64) -> Self {
		Self {
			length: self.length / rate,
			song: Song {
				bpm: self.song.bpm * rate,
				length: self.song.length / rate,
				..self.song.clone()
			},
			..self.clone()
		}
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
pub(crate) mod beatmap_fixtures {
	use super::*;

	pub fn beatmap<M: Mode>(stats: BeatmapStats) -> Beatmap<M> {
		Beatmap {
			id: 129891,
			difficulty_name: "FOUR DIMENSIONS".to_owned(),
			stats,
			star_rating: Some(7.03),
			length: 240.0,
			max_combo: 2385,
			beatmapset: Beatmapset {
				id: 39804,
				creator_id: 1847,
				creator_username: "Blue Dragon".to_owned(),
				status: BeatmapsetStatus::Ranked,
			},
			song: Song {
				artist: "xi".to_owned(),
				title: "FREEDOM DiVE".to_owned(),
				bpm: 222.22,
				length: 263.0,
			},
			mode: PhantomData,
		}
	}
}

// }}}
