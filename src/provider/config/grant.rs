// self
use crate::_prelude::*;

/// OAuth 2.0 grant types performed by the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant.
	AuthorizationCode,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
