//! Token pairs handed from the exchanger to the verification step.

// self
use crate::{_prelude::*, auth::Secret};

/// Raw parameters returned alongside the tokens (`token_type`, `expires_in`, `scope`, ...).
pub type TokenParams = BTreeMap<String, Value>;

/// Tokens obtained from the token endpoint (or supplied directly on the callback).
#[derive(Clone, PartialEq)]
pub struct TokenGrant {
	/// Access token; callers must avoid logging it.
	pub access_token: Secret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Extra exchange parameters exposed to `WithParams` verifiers.
	pub params: TokenParams,
}
impl TokenGrant {
	/// Creates a grant without extra parameters.
	pub fn new(access_token: impl Into<Secret>, refresh_token: Option<Secret>) -> Self {
		Self { access_token: access_token.into(), refresh_token, params: TokenParams::new() }
	}

	/// Attaches a raw exchange parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Lifetime hint in seconds, when the token endpoint reported one.
	pub fn expires_in(&self) -> Option<u64> {
		self.params.get("expires_in").and_then(Value::as_u64)
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("params", &self.params)
			.finish()
	}
}
