//! Phase selection from the inbound query.

// self
use crate::{_prelude::*, flows::FlowRequest};

/// Branch a dispatch takes, decided solely from the inbound query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowPhase {
	/// Provider redirected back with an `error` parameter.
	ProviderError,
	/// Callback already carries an access/refresh token pair.
	DirectToken,
	/// Callback carries an authorization `code`.
	CodeExchange,
	/// Nothing to complete; start the flow.
	Authorize,
}
impl FlowPhase {
	/// Selects the phase, checking `error`, then the token pair, then `code`.
	pub fn select(request: &FlowRequest) -> Self {
		FlowStep::select(request).phase()
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowPhase::ProviderError => "provider_error",
			FlowPhase::DirectToken => "direct_token",
			FlowPhase::CodeExchange => "code_exchange",
			FlowPhase::Authorize => "authorize",
		}
	}
}
impl Display for FlowPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Selected phase together with the query values it consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStep<'a> {
	/// See [`FlowPhase::ProviderError`].
	ProviderError,
	/// See [`FlowPhase::DirectToken`].
	DirectToken {
		/// `access_token` query value.
		access_token: &'a str,
		/// `refresh_token` query value.
		refresh_token: &'a str,
	},
	/// See [`FlowPhase::CodeExchange`].
	CodeExchange {
		/// `code` query value.
		code: &'a str,
	},
	/// See [`FlowPhase::Authorize`].
	Authorize,
}
impl<'a> FlowStep<'a> {
	/// Selects the step, checking `error`, then the token pair, then `code`.
	pub fn select(request: &'a FlowRequest) -> Self {
		if request.query_value("error").is_some() {
			return Self::ProviderError;
		}
		if let Some((access_token, refresh_token)) = request.direct_tokens() {
			return Self::DirectToken { access_token, refresh_token };
		}

		match request.query_value("code") {
			Some(code) => Self::CodeExchange { code },
			None => Self::Authorize,
		}
	}

	/// Phase label of this step.
	pub const fn phase(&self) -> FlowPhase {
		match self {
			Self::ProviderError => FlowPhase::ProviderError,
			Self::DirectToken { .. } => FlowPhase::DirectToken,
			Self::CodeExchange { .. } => FlowPhase::CodeExchange,
			Self::Authorize => FlowPhase::Authorize,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_wins_over_every_other_parameter() {
		let request =
			FlowRequest::new("/cb?error=access_denied&code=c&access_token=a&refresh_token=r");

		assert_eq!(FlowPhase::select(&request), FlowPhase::ProviderError);
	}

	#[test]
	fn token_pair_wins_over_code() {
		let request = FlowRequest::new("/cb?code=c&access_token=a&refresh_token=r");

		assert_eq!(FlowPhase::select(&request), FlowPhase::DirectToken);
		assert_eq!(
			FlowPhase::select(&FlowRequest::new("/cb?code=c&access_token=a")),
			FlowPhase::CodeExchange
		);
	}

	#[test]
	fn steps_carry_the_selected_query_values() {
		let request = FlowRequest::new("/cb?code=c&access_token=a&refresh_token=r");

		assert_eq!(
			FlowStep::select(&request),
			FlowStep::DirectToken { access_token: "a", refresh_token: "r" }
		);
		assert_eq!(
			FlowStep::select(&FlowRequest::new("/cb?code=c&refresh_token=r")),
			FlowStep::CodeExchange { code: "c" }
		);
		let failed = FlowRequest::new("/cb?error=x&code=c");

		assert_eq!(FlowStep::select(&failed).phase(), FlowPhase::ProviderError);
	}

	#[test]
	fn empty_values_fall_through_to_authorize() {
		let request = FlowRequest::new("/login?error=&code=");

		assert_eq!(FlowPhase::select(&request), FlowPhase::Authorize);
		assert_eq!(FlowPhase::select(&FlowRequest::new("/login")), FlowPhase::Authorize);
	}
}
