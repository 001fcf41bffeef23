use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::context::{ErrorKind, TagError, TaggedError};

/// Two character mod identifier, such as `DT` or `4K`.
///
/// Acronyms are normalised to uppercase on construction, which makes
/// equality (and hence every membership test) case-insensitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModAcronym([u8; 2]);

impl ModAcronym {
	pub fn new(raw: &str) -> Result<Self, TaggedError> {
		let bytes = raw.trim().as_bytes();
		if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
			return Err(anyhow!("{raw:?} is not a valid mod acronym").tag(ErrorKind::User));
		}

		Ok(Self([
			bytes[0].to_ascii_uppercase(),
			bytes[1].to_ascii_uppercase(),
		]))
	}

	/// Builds an acronym out of a hardcoded table entry.
	///
	/// # Panics
	///
	/// Panics when `raw` isn't two alphanumeric characters. The tables this is
	/// used on are static, so this signals a programming error.
	#[inline]
	pub fn from_static(raw: &'static str) -> Self {
		match Self::new(raw) {
			Ok(acronym) => acronym,
			Err(e) => panic!("Invalid hardcoded mod acronym: {}", e.error),
		}
	}

	#[inline]
	pub fn as_str(&self) -> &str {
		// Both bytes are ascii alphanumerics
		std::str::from_utf8(&self.0).unwrap_or("??")
	}

	/// Case-insensitive comparison against a raw acronym.
	#[inline]
	pub fn is(&self, other: &str) -> bool {
		self.as_str().eq_ignore_ascii_case(other)
	}

	/// Splits a concatenated combination (e.g. `"HDdt"`) into acronyms.
	///
	/// Leading `+` signs and whitespace are ignored.
	pub fn parse_combination(raw: &str) -> Result<Vec<Self>, TaggedError> {
		let cleaned: String = raw
			.trim()
			.trim_start_matches('+')
			.chars()
			.filter(|c| !c.is_whitespace() && *c != ',')
			.collect();

		if !cleaned.is_ascii() || cleaned.len() % 2 != 0 {
			return Err(
				anyhow!("{raw:?} is not a valid mod combination").tag(ErrorKind::User)
			);
		}

		cleaned
			.as_bytes()
			.chunks(2)
			.map(|chunk| Self::new(std::str::from_utf8(chunk).unwrap_or_default()))
			.collect()
	}
}

impl Display for ModAcronym {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl Debug for ModAcronym {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModAcronym({})", self.as_str())
	}
}

impl FromStr for ModAcronym {
	type Err = TaggedError;

	#[inline]
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl PartialEq<&str> for ModAcronym {
	#[inline]
	fn eq(&self, other: &&str) -> bool {
		self.is(other)
	}
}

impl Serialize for ModAcronym {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for ModAcronym {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::new(&raw).map_err(|e| serde::de::Error::custom(e.error))
	}
}

// }}}
