//! Compensates for simulators that ignore Hidden in their pp breakdown.
//!
//! The pp total is rebuilt from the skill components, with aim and speed
//! bonuses growing as the approach rate drops and a flat accuracy bonus. The
//! constants are empirical and must stay exactly as they are.

use crate::osu::mods::{ApiMod, GameMod, ModAcronym};
use crate::simulation::OsuSimulatedScore;

pub const SKILL_EXPONENT: f64 = 1.1;
pub const HIDDEN_AR_BONUS: f64 = 0.04;
pub const HIDDEN_AR_PIVOT: f64 = 12.0;
pub const HIDDEN_ACCURACY_BONUS: f64 = 1.08;

/// `(Σ skill^1.1)^(1/1.1)`
pub fn combine_skills(skills: [f64; 4]) -> f64 {
	skills
		.iter()
		.map(|skill| skill.max(0.0).powf(SKILL_EXPONENT))
		.sum::<f64>()
		.powf(1.0 / SKILL_EXPONENT)
}

/// Applies the Hidden bonus when it was requested but not simulated.
///
/// Returns whether the score was modified.
pub fn correct_for_hidden(requested: &[GameMod], score: &mut OsuSimulatedScore) -> bool {
	let hidden = ModAcronym::from_static("HD");
	let requested_hidden = requested.iter().any(|m| m.acronym() == hidden);
	let simulated_hidden = score.score.mods.iter().any(|m| m.acronym == hidden);
	if !requested_hidden || simulated_hidden {
		return false;
	}

	let attributes = &mut score.performance_attributes;
	let total = combine_skills([
		attributes.aim,
		attributes.speed,
		attributes.accuracy,
		attributes.flashlight,
	]);

	// Without a breakdown there is nothing to rescale
	if total > 0.0 {
		let multiplier = attributes.pp / total;
		let ar_bonus =
			1.0 + HIDDEN_AR_BONUS * (HIDDEN_AR_PIVOT - score.difficulty_attributes.approach_rate);

		attributes.aim *= ar_bonus;
		attributes.speed *= ar_bonus;
		attributes.accuracy *= HIDDEN_ACCURACY_BONUS;
		attributes.pp = combine_skills([
			attributes.aim,
			attributes.speed,
			attributes.accuracy,
			attributes.flashlight,
		]) * multiplier;
	}

	score.score.mods.push(ApiMod::plain(hidden));
	true
}

// }}}
