pub mod beatmap;
pub mod hitcounts;
pub mod mods;
pub mod ruleset;
pub mod score;
pub mod stat_conversion;
