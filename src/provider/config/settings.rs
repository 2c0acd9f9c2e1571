// self
use crate::{
	_prelude::*,
	auth::{ProviderId, Scope, Secret},
	provider::{ClientAuthMethod, ProviderConfig, ProviderConfigBuilder, ProviderConfigError},
};

/// Deserializable strategy settings, typically loaded from the application's config file.
///
/// Field names follow the camelCase option names HubSpot integrations already use
/// (`clientId`, `callbackUrl`, ...); the legacy `clientID`/`callbackURL`/`authorizationURL`/
/// `tokenURL` spellings are accepted as aliases. Unset fields fall back to HubSpot defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
	/// HubSpot App ID.
	#[serde(alias = "clientID")]
	pub client_id: Option<String>,
	/// HubSpot App secret.
	pub client_secret: Option<Secret>,
	/// Default callback URL (absolute or relative).
	#[serde(alias = "callbackURL")]
	pub callback_url: Option<String>,
	/// Authorization endpoint override.
	#[serde(alias = "authorizationURL")]
	pub authorization_endpoint: Option<String>,
	/// Token endpoint override.
	#[serde(alias = "tokenURL")]
	pub token_endpoint: Option<String>,
	/// Profile endpoint override.
	pub profile_endpoint: Option<String>,
	/// Scope separator override.
	pub scope_separator: Option<String>,
	/// Default scope, either a string or a list.
	pub scope: Option<Scope>,
	/// Skip the profile round trip.
	pub skip_user_profile: Option<bool>,
	/// Send profile GETs with a bearer header.
	pub use_authorization_header_for_get: Option<bool>,
	/// Forward `portalId` on the code exchange.
	pub include_portal_in_exchange: Option<bool>,
	/// Token endpoint client authentication.
	pub client_auth_method: Option<ClientAuthMethod>,
}
impl ProviderSettings {
	/// Converts the settings into a builder seeded with HubSpot defaults.
	pub fn into_builder(self) -> ProviderConfigBuilder {
		let mut builder = ProviderConfig::builder(ProviderId::hubspot());
		let defaults = ProviderConfig::hubspot();

		builder.authorization_endpoint =
			self.authorization_endpoint.or(defaults.authorization_endpoint);
		builder.token_endpoint = self.token_endpoint.or(defaults.token_endpoint);
		builder.profile_endpoint = self.profile_endpoint.or(defaults.profile_endpoint);
		builder.client_id = self.client_id;
		builder.client_secret = self.client_secret;
		builder.callback_url = self.callback_url;
		builder.default_scope = self.scope;

		if let Some(separator) = self.scope_separator {
			builder.scope_separator = separator;
		}
		if let Some(method) = self.client_auth_method {
			builder.client_auth_method = method;
		}
		if let Some(skip) = self.skip_user_profile {
			builder.quirks.skip_user_profile = skip;
		}
		if let Some(use_header) = self.use_authorization_header_for_get {
			builder.quirks.use_authorization_header_for_get = use_header;
		}
		if let Some(include) = self.include_portal_in_exchange {
			builder.quirks.include_portal_in_exchange = include;
		}

		builder
	}

	/// Validates the settings and produces an immutable configuration.
	pub fn into_config(self) -> Result<ProviderConfig, ProviderConfigError> {
		self.into_builder().build()
	}
}
impl TryFrom<ProviderSettings> for ProviderConfig {
	type Error = ProviderConfigError;

	fn try_from(settings: ProviderSettings) -> Result<Self, Self::Error> {
		settings.into_config()
	}
}
