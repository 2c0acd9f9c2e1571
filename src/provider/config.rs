//! Provider configuration data structures shared by the dispatcher and its collaborators.
//!
//! The module exposes the validated configuration, its builder, and the serde-facing
//! settings layer so applications can load credentials from any format.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Grant helpers used by token exchanges.
pub mod grant;
/// Provider-specific quirk toggles.
pub mod quirks;
/// Deserializable settings that feed the builder.
pub mod settings;

pub use builder::*;
pub use grant::*;
pub use quirks::*;
pub use settings::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, Scope, Secret},
};

/// Default HubSpot authorization endpoint.
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://app.hubspot.com/auth/authenticate/";
/// Default HubSpot token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://app.hubspot.com/auth/token";
/// Default HubSpot account-details endpoint used to load profiles.
pub const DEFAULT_PROFILE_ENDPOINT: &str = "https://api.hubapi.com/integrations/v1/me";
/// Default separator used when joining list scopes.
pub const DEFAULT_SCOPE_SEPARATOR: &str = " ";

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Endpoint set declared by a provider configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for code exchanges.
	pub token: Url,
	/// Endpoint queried by the HTTP profile loader.
	pub profile: Url,
}

/// Immutable provider configuration consumed by the dispatcher.
///
/// Built once at startup through [`ProviderConfigBuilder`] and shared behind an `Arc`; nothing
/// in the crate mutates it afterwards, so any number of concurrent dispatches may read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Provider identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// OAuth 2.0 client identifier (HubSpot App ID).
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Default callback URL, absolute or relative to the inbound request.
	pub callback_url: Option<String>,
	/// Separator used to join list scopes.
	pub scope_separator: String,
	/// Scope requested when the caller supplies none.
	pub default_scope: Option<Scope>,
	/// Client authentication mechanism for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderConfig {
	/// Creates a builder seeded with HubSpot's endpoints and defaults.
	pub fn hubspot() -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(ProviderId::hubspot())
			.authorization_endpoint(DEFAULT_AUTHORIZATION_ENDPOINT)
			.token_endpoint(DEFAULT_TOKEN_ENDPOINT)
			.profile_endpoint(DEFAULT_PROFILE_ENDPOINT)
	}

	/// Creates an empty builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(id)
	}
}
