//! Scope values accepted by the strategy.
//!
//! HubSpot scopes are requested verbatim and in caller order, so unlike a normalized set the
//! list form keeps duplicates and ordering intact. A pre-joined string passes through
//! unchanged regardless of the configured separator.

// std
use std::slice::{self, Iter};
// self
use crate::_prelude::*;

/// Requested scope: either a pre-joined string or a list joined with the provider separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
	/// Already-joined scope string, forwarded as-is.
	Single(String),
	/// Individual scopes joined with the configured separator.
	List(Vec<String>),
}
impl Scope {
	/// Builds a list scope from any iterator of scope names.
	pub fn list<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::List(scopes.into_iter().map(Into::into).collect())
	}

	/// Returns true when the scope would render as an empty parameter.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Single(value) => value.is_empty(),
			Self::List(values) => values.iter().all(String::is_empty),
		}
	}

	/// Renders the `scope` parameter, or `None` when nothing was requested.
	pub fn join(&self, separator: &str) -> Option<String> {
		if self.is_empty() {
			return None;
		}

		match self {
			Self::Single(value) => Some(value.clone()),
			Self::List(values) => Some(values.join(separator)),
		}
	}

	/// Iterator over individual scope entries (a single string yields itself).
	pub fn iter(&self) -> ScopeIter<'_> {
		match self {
			Self::Single(value) => ScopeIter { inner: slice::from_ref(value).iter() },
			Self::List(values) => ScopeIter { inner: values.iter() },
		}
	}
}
impl From<&str> for Scope {
	fn from(value: &str) -> Self {
		Self::Single(value.to_owned())
	}
}
impl From<String> for Scope {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}
impl From<Vec<String>> for Scope {
	fn from(values: Vec<String>) -> Self {
		Self::List(values)
	}
}
impl<const N: usize> From<[&str; N]> for Scope {
	fn from(values: [&str; N]) -> Self {
		Self::list(values)
	}
}
impl Display for Scope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(" ").unwrap_or_default())
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a Scope {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_scopes_join_in_caller_order() {
		let scope = Scope::from(["contacts", "forms"]);

		assert_eq!(scope.join(" "), Some("contacts forms".into()));
		assert_eq!(scope.join(","), Some("contacts,forms".into()));
		assert_eq!(Scope::from(["forms", "contacts"]).join(" "), Some("forms contacts".into()));
	}

	#[test]
	fn single_scopes_pass_through_unchanged() {
		let scope = Scope::from("contacts,forms");

		assert_eq!(scope.join(" "), Some("contacts,forms".into()));
		assert_eq!(scope.iter().collect::<Vec<_>>(), vec!["contacts,forms"]);
	}

	#[test]
	fn empty_scopes_render_nothing() {
		assert_eq!(Scope::from("").join(" "), None);
		assert_eq!(Scope::List(Vec::new()).join(" "), None);
	}

	#[test]
	fn deserializes_from_string_or_list() {
		let single: Scope =
			serde_json::from_str("\"oauth contacts\"").expect("String scope should deserialize.");
		let list: Scope =
			serde_json::from_str(r#"["oauth","contacts"]"#).expect("List should deserialize.");

		assert_eq!(single, Scope::from("oauth contacts"));
		assert_eq!(list, Scope::from(["oauth", "contacts"]));
		assert_eq!(list.to_string(), "oauth contacts");
	}
}
