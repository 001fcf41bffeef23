use anyhow::anyhow;

use crate::context::{ErrorKind, TagError, TaggedError};
use crate::osu::mods::acronym::ModAcronym;
use crate::osu::ruleset::Ruleset;

/// One row of an incompatibility table: a mod, and everything it cannot be
/// combined with.
pub type IncompatibilityEntry = (&'static str, &'static [&'static str]);

/// Static description of the mods a ruleset knows about.
#[derive(Debug)]
pub struct ModCatalog {
	ruleset: Ruleset,

	/// Every valid acronym, mapped to the acronyms it cannot coexist with.
	incompatibilities: &'static [IncompatibilityEntry],

	/// Order in which stat-affecting mods are folded over a beatmap.
	///
	/// Stat overrides come before speed changes, since the latter go through
	/// the millisecond domain and their result depends on the starting stats.
	apply_order: &'static [&'static str],

	star_rating_changing: &'static [&'static str],
}

impl ModCatalog {
	pub const fn new(
		ruleset: Ruleset,
		incompatibilities: &'static [IncompatibilityEntry],
		apply_order: &'static [&'static str],
		star_rating_changing: &'static [&'static str],
	) -> Self {
		Self {
			ruleset,
			incompatibilities,
			apply_order,
			star_rating_changing,
		}
	}

	#[inline]
	pub fn ruleset(&self) -> Ruleset {
		self.ruleset
	}

	// {{{ Queries
	#[inline]
	pub fn valid_mods(&self) -> impl Iterator<Item = ModAcronym> + '_ {
		self.incompatibilities
			.iter()
			.map(|(acronym, _)| ModAcronym::from_static(acronym))
	}

	#[inline]
	pub fn is_valid(&self, acronym: ModAcronym) -> bool {
		self.entry(acronym).is_some()
	}

	#[inline]
	pub fn mod_apply_order(&self) -> impl Iterator<Item = ModAcronym> + '_ {
		self.apply_order.iter().map(|a| ModAcronym::from_static(a))
	}

	#[inline]
	pub fn star_rating_changing_mods(&self) -> impl Iterator<Item = ModAcronym> + '_ {
		self.star_rating_changing
			.iter()
			.map(|a| ModAcronym::from_static(a))
	}

	#[inline]
	pub fn changes_star_rating(&self, acronym: ModAcronym) -> bool {
		self.star_rating_changing.iter().any(|a| acronym.is(a))
	}

	#[inline]
	fn entry(&self, acronym: ModAcronym) -> Option<&'static IncompatibilityEntry> {
		self.incompatibilities.iter().find(|(a, _)| acronym.is(a))
	}

	/// Acronyms `acronym` cannot be combined with, or `None` for unknown mods.
	pub fn incompatible_with(&self, acronym: ModAcronym) -> Option<Vec<ModAcronym>> {
		let (_, incompatible) = self.entry(acronym)?;
		Some(
			incompatible
				.iter()
				.map(|a| ModAcronym::from_static(a))
				.collect(),
		)
	}
	// }}}
	// {{{ Compatibility
	/// Checks whether `b` may be applied alongside `a`, from `a`'s side of the
	/// table.
	///
	/// # Panics
	///
	/// Panics when `a` isn't part of this catalog. Callers are expected to only
	/// ever hand in acronyms coming from this ruleset's mod variants, so an
	/// unknown one means the catalog and the mods have drifted apart.
	pub fn are_mods_compatible(&self, a: ModAcronym, b: ModAcronym) -> bool {
		if a == b {
			return false;
		}

		let Some((_, incompatible)) = self.entry(a) else {
			panic!(
				"Mod {a} is missing from the {} mod catalog",
				self.ruleset
			);
		};

		!incompatible.iter().any(|i| b.is(i))
	}

	/// Validates a user-provided combination.
	pub fn validate(&self, mods: &[ModAcronym]) -> Result<(), TaggedError> {
		for acronym in mods {
			if !self.is_valid(*acronym) {
				return Err(anyhow!("{acronym} is not a valid {} mod", self.ruleset)
					.tag(ErrorKind::User));
			}
		}

		for (i, a) in mods.iter().enumerate() {
			for b in &mods[i + 1..] {
				if !self.are_mods_compatible(*a, *b) || !self.are_mods_compatible(*b, *a) {
					return Err(
						anyhow!("{a} cannot be combined with {b}").tag(ErrorKind::User)
					);
				}
			}
		}

		Ok(())
	}
	// }}}
}

// {{{ Tests
#[cfg(test)]
mod catalog_tests {
	use super::*;

	fn acronym(raw: &'static str) -> ModAcronym {
		ModAcronym::from_static(raw)
	}

	/// Every table must be symmetric: if `a` lists `b`, `b` must list `a`.
	#[test]
	fn tables_are_symmetric() {
		for ruleset in Ruleset::RULESETS {
			let catalog = ruleset.catalog();
			for a in catalog.valid_mods() {
				for b in catalog.valid_mods() {
					assert_eq!(
						catalog.are_mods_compatible(a, b),
						catalog.are_mods_compatible(b, a),
						"{ruleset} catalog is asymmetric for {a} / {b}"
					);
				}
			}
		}
	}

	#[test]
	fn tables_only_reference_known_mods() {
		for ruleset in Ruleset::RULESETS {
			let catalog = ruleset.catalog();
			for a in catalog.valid_mods() {
				for b in catalog.incompatible_with(a).unwrap() {
					assert!(
						catalog.is_valid(b),
						"{ruleset}: {a} references unknown mod {b}"
					);
				}
			}

			for a in catalog.mod_apply_order() {
				assert!(catalog.is_valid(a), "{ruleset}: unknown mod {a} in apply order");
			}

			for a in catalog.star_rating_changing_mods() {
				assert!(catalog.is_valid(a), "{ruleset}: unknown star rating mod {a}");
			}
		}
	}

	#[test]
	fn tables_have_no_duplicate_rows() {
		for ruleset in Ruleset::RULESETS {
			let mods: Vec<_> = ruleset.catalog().valid_mods().collect();
			let mut deduped = mods.clone();
			deduped.sort();
			deduped.dedup();
			assert_eq!(mods.len(), deduped.len(), "{ruleset} has duplicate rows");
		}
	}

	#[test]
	fn mods_are_never_compatible_with_themselves() {
		for ruleset in Ruleset::RULESETS {
			let catalog = ruleset.catalog();
			for a in catalog.valid_mods() {
				assert!(!catalog.are_mods_compatible(a, a));
			}
		}
	}

	#[test]
	fn speed_mods_exclude_each_other() {
		let catalog = Ruleset::Standard.catalog();
		assert!(!catalog.are_mods_compatible(acronym("DT"), acronym("HT")));
		assert!(!catalog.are_mods_compatible(acronym("NC"), acronym("DT")));
		assert!(catalog.are_mods_compatible(acronym("HD"), acronym("DT")));
		assert!(!catalog.are_mods_compatible(acronym("ez"), acronym("HR")));
	}

	#[test]
	#[should_panic(expected = "missing from the osu!taiko mod catalog")]
	fn unknown_mods_are_a_programming_error() {
		Ruleset::Taiko
			.catalog()
			.are_mods_compatible(acronym("TP"), acronym("HD"));
	}

	#[test]
	fn validation_reports_user_errors() {
		let catalog = Ruleset::Standard.catalog();
		let ok = ModAcronym::parse_combination("HDDTHR").unwrap();
		assert!(catalog.validate(&ok).is_ok());

		let clash = ModAcronym::parse_combination("DTHT").unwrap();
		let err = catalog.validate(&clash).unwrap_err();
		assert_eq!(err.kind, ErrorKind::User);

		let unknown = ModAcronym::parse_combination("HDXX").unwrap();
		assert!(catalog.validate(&unknown).is_err());

		let keys = ModAcronym::parse_combination("4K").unwrap();
		assert!(catalog.validate(&keys).is_err());
		assert!(Ruleset::Mania.catalog().validate(&keys).is_ok());

		let twice = ModAcronym::parse_combination("HDhd").unwrap();
		assert!(catalog.validate(&twice).is_err());
	}

	#[test]
	fn speed_mods_come_after_stat_overrides() {
		for ruleset in Ruleset::RULESETS {
			let order: Vec<_> = ruleset.catalog().mod_apply_order().collect();
			let position = |raw: &str| order.iter().position(|a| a.is(raw)).unwrap();
			assert!(position("DA") < position("DT"));
			assert!(position("HR") < position("NC"));
			assert!(position("EZ") < position("HT"));
		}
	}
}
// }}}
