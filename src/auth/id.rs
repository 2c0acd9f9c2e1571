//! Strongly typed identifiers used by the strategy.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:ident) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (provider, portal).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (provider, portal).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (provider, portal).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier must consist of ASCII digits only.
	#[error("{kind} identifier must be numeric.")]
	NotNumeric {
		/// Kind of identifier (portal).
		kind: &'static str,
	},
}

def_id! { ProviderId, "Identifier naming an OAuth provider.", "Provider", validate_view }
def_id! { PortalId, "HubSpot portal identifier sent as `portalId`.", "Portal", validate_numeric_view }

impl ProviderId {
	/// Identifier used by the HubSpot strategy.
	pub fn hubspot() -> Self {
		Self("hubspot".into())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn validate_numeric_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	validate_view(kind, view)?;

	if !view.bytes().all(|b| b.is_ascii_digit()) {
		return Err(IdentifierError::NotNumeric { kind });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_padding_and_empty_values() {
		assert!(ProviderId::new(" hubspot").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderId::new("hubspot ").is_err(), "Trailing whitespace must be rejected.");
		assert!(ProviderId::new("").is_err());
		assert_eq!(ProviderId::hubspot().as_ref(), "hubspot");
	}

	#[test]
	fn portal_ids_must_be_numeric() {
		let portal = PortalId::new("12345").expect("Numeric portal id should be valid.");

		assert_eq!(portal.as_ref(), "12345");
		assert_eq!(
			PortalId::new("12a45").expect_err("Alphanumeric portal id should be rejected."),
			IdentifierError::NotNumeric { kind: "Portal" }
		);
		assert!(PortalId::new(&"9".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let portal: PortalId =
			serde_json::from_str("\"62515\"").expect("Portal id should deserialize successfully.");

		assert_eq!(portal.as_ref(), "62515");
		assert!(serde_json::from_str::<PortalId>("\"with space\"").is_err());
		let json = serde_json::to_string(&portal).expect("Portal id should serialize.");

		assert_eq!(json, "\"62515\"");
	}
}
