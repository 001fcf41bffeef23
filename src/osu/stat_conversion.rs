//! Conversions between difficulty stats and the millisecond windows they
//! describe.
//!
//! None of these clamp. Mods that need a bounded result (Hard Rock caps at
//! 10, speed mods may push AR past 10) are responsible for that themselves.

/// Preempt time at AR 0.
pub const AR0_MS: f64 = 1800.0;
/// Preempt time at AR 5, where the slope changes.
pub const AR5_MS: f64 = 1200.0;

// {{{ Approach rate
#[inline]
pub fn approach_rate_to_ms(ar: f64) -> f64 {
	if ar <= 5.0 {
		AR0_MS - 120.0 * ar
	} else {
		AR5_MS - 150.0 * (ar - 5.0)
	}
}

#[inline]
pub fn ms_to_approach_rate(ms: f64) -> f64 {
	if ms >= AR5_MS {
		(AR0_MS - ms) / 120.0
	} else {
		(AR5_MS - ms) / 150.0 + 5.0
	}
}
// }}}
// {{{ Overall difficulty
/// Width of the 300 hit window in osu!standard.
#[inline]
pub fn osu_od_to_ms(od: f64) -> f64 {
	80.0 - 6.0 * od
}

#[inline]
pub fn ms_to_osu_od(ms: f64) -> f64 {
	(80.0 - ms) / 6.0
}

/// Width of the great hit window in osu!taiko.
#[inline]
pub fn taiko_od_to_ms(od: f64) -> f64 {
	50.0 - 3.0 * od
}

#[inline]
pub fn ms_to_taiko_od(ms: f64) -> f64 {
	(50.0 - ms) / 3.0
}
// }}}
// {{{ Rate adjustment
/// Shrinks a window by a playback rate, going through the ms domain.
#[inline]
pub fn scale_through_ms(
	value: f64,
	rate: f64,
	to_ms: impl Fn(f64) -> f64,
	from_ms: impl Fn(f64) -> f64,
) -> f64 {
	from_ms(to_ms(value) / rate)
}
// }}}
// {{{ Tests
#[cfg(test)]
mod stat_conversion_tests {
	use super::*;

	const EPSILON: f64 = 1e-9;

	#[test]
	fn approach_rate_round_trips() {
		for i in -20..=120 {
			let ar = i as f64 / 10.0;
			let back = ms_to_approach_rate(approach_rate_to_ms(ar));
			assert!((back - ar).abs() < EPSILON, "AR {ar} came back as {back}");
		}
	}

	#[test]
	fn overall_difficulty_round_trips() {
		for i in -20..=120 {
			let od = i as f64 / 10.0;
			assert!((ms_to_osu_od(osu_od_to_ms(od)) - od).abs() < EPSILON);
			assert!((ms_to_taiko_od(taiko_od_to_ms(od)) - od).abs() < EPSILON);
		}
	}

	#[test]
	fn known_windows() {
		assert_eq!(approach_rate_to_ms(0.0), 1800.0);
		assert_eq!(approach_rate_to_ms(5.0), 1200.0);
		assert_eq!(approach_rate_to_ms(9.0), 600.0);
		assert_eq!(approach_rate_to_ms(10.0), 450.0);
		assert_eq!(osu_od_to_ms(8.0), 32.0);
		assert_eq!(taiko_od_to_ms(5.0), 35.0);
	}

	#[test]
	fn double_time_on_ar9() {
		let ar = scale_through_ms(9.0, 1.5, approach_rate_to_ms, ms_to_approach_rate);
		assert!((ar - (10.0 + 1.0 / 3.0)).abs() < EPSILON);
	}

	#[test]
	fn half_time_crosses_the_ar5_boundary() {
		// 1200ms / 0.75 = 1600ms, which lives on the slow slope
		let ar = scale_through_ms(5.0, 0.75, approach_rate_to_ms, ms_to_approach_rate);
		assert!((ar - (200.0 / 120.0)).abs() < EPSILON);
	}
}
// }}}
