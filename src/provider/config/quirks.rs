// self
use crate::_prelude::*;

/// Provider-specific toggles resolved once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Sends the access token as `Authorization: Bearer` on profile GETs instead of an
	/// `access_token` query parameter.
	pub use_authorization_header_for_get: bool,
	/// Skips the profile round trip and hands verifiers a synthesized profile.
	pub skip_user_profile: bool,
	/// Forwards strategy token params (HubSpot: `portalId`) on the code exchange as well.
	pub include_portal_in_exchange: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			use_authorization_header_for_get: true,
			skip_user_profile: true,
			include_portal_in_exchange: false,
		}
	}
}
