//! Optional observability helpers for dispatches.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `hubspot_oauth2.dispatch` with the `phase`
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `hubspot_oauth2_dispatch_total` counter once per
//!   dispatch, labeled by `phase` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
	/// User agent was sent to the authorization endpoint.
	Redirect,
	/// Verification accepted the user.
	Success,
	/// Provider or verifier refused the login.
	Fail,
	/// A collaborator or the callback resolution failed.
	Error,
}
impl DispatchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DispatchOutcome::Redirect => "redirect",
			DispatchOutcome::Success => "success",
			DispatchOutcome::Fail => "fail",
			DispatchOutcome::Error => "error",
		}
	}
}
impl Display for DispatchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
