//! Dispatch outcomes handed back to the route handler.

// self
use crate::{_prelude::*, auth::Secret, obs::DispatchOutcome, profile::Profile};

/// Result of a single dispatch; exactly one is produced per call.
#[derive(Debug)]
pub enum AuthOutcome<U> {
	/// Send the user agent to `location` (HTTP 302).
	Redirect {
		/// Fully-formed authorization URL.
		location: Url,
	},
	/// Verification accepted the user.
	Success(AuthSuccess<U>),
	/// Login failed without an internal error (provider error or rejected user).
	Fail {
		/// Details supplied by the verifier, if any.
		info: Option<Value>,
	},
	/// Login could not complete.
	Error {
		/// What went wrong.
		cause: Error,
	},
}
impl<U> AuthOutcome<U> {
	/// Label used for spans and metrics.
	pub fn label(&self) -> DispatchOutcome {
		match self {
			Self::Redirect { .. } => DispatchOutcome::Redirect,
			Self::Success(_) => DispatchOutcome::Success,
			Self::Fail { .. } => DispatchOutcome::Fail,
			Self::Error { .. } => DispatchOutcome::Error,
		}
	}

	/// Redirect target, when the outcome is a redirect.
	pub fn redirect_location(&self) -> Option<&Url> {
		match self {
			Self::Redirect { location } => Some(location),
			_ => None,
		}
	}
}

/// Payload of a successful login.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSuccess<U> {
	/// Application user returned by the verifier.
	pub user: U,
	/// Details returned by the verifier, if any.
	pub info: Option<Value>,
	/// Access token the user was verified with.
	pub access_token: Secret,
	/// Refresh token, when one was issued.
	pub refresh_token: Option<Secret>,
	/// Profile handed to the verifier.
	pub profile: Profile,
}
