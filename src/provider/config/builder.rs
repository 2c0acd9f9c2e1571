// self
use crate::{
	_prelude::*,
	auth::{ProviderId, Scope, Secret},
	provider::{
		ClientAuthMethod, DEFAULT_PROFILE_ENDPOINT, DEFAULT_SCOPE_SEPARATOR, ProviderConfig,
		ProviderEndpoints, ProviderQuirks,
	},
};

/// Errors raised while constructing or validating a provider configuration.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderConfigError {
	/// Client identifier is required.
	#[error("Missing client id.")]
	MissingClientId,
	/// Client secret is required.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Authorization endpoint is required.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is required.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoint is not an absolute URL.
	#[error("The {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint value that failed validation.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedEndpointScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Scope separator must be non-empty and printable.
	#[error("Scope separator must be a non-empty printable string.")]
	InvalidScopeSeparator {
		/// Invalid separator that was supplied.
		separator: String,
	},
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Identifier for the configuration being constructed.
	pub id: ProviderId,
	/// Authorization endpoint (required).
	pub authorization_endpoint: Option<String>,
	/// Token endpoint (required).
	pub token_endpoint: Option<String>,
	/// Profile endpoint; HubSpot's account-details endpoint when unset.
	pub profile_endpoint: Option<String>,
	/// OAuth 2.0 client identifier (required).
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret (required).
	pub client_secret: Option<Secret>,
	/// Default callback URL.
	pub callback_url: Option<String>,
	/// Separator used to join list scopes.
	pub scope_separator: String,
	/// Scope requested when callers supply none.
	pub default_scope: Option<Scope>,
	/// Client authentication method for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorization_endpoint: None,
			token_endpoint: None,
			profile_endpoint: None,
			client_id: None,
			client_secret: None,
			callback_url: None,
			scope_separator: DEFAULT_SCOPE_SEPARATOR.into(),
			default_scope: None,
			client_auth_method: ClientAuthMethod::default(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: impl Into<String>) -> Self {
		self.authorization_endpoint = Some(url.into());

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
		self.token_endpoint = Some(url.into());

		self
	}

	/// Sets the profile endpoint.
	pub fn profile_endpoint(mut self, url: impl Into<String>) -> Self {
		self.profile_endpoint = Some(url.into());

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the default callback URL (absolute or relative).
	pub fn callback_url(mut self, url: impl Into<String>) -> Self {
		self.callback_url = Some(url.into());

		self
	}

	/// Overrides the scope separator (defaults to a single space).
	pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separator = separator.into();

		self
	}

	/// Sets the scope requested when callers supply none.
	pub fn default_scope(mut self, scope: impl Into<Scope>) -> Self {
		self.default_scope = Some(scope.into());

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let client_id = self
			.client_id
			.filter(|value| !value.is_empty())
			.ok_or(ProviderConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|value| !value.is_empty())
			.ok_or(ProviderConfigError::MissingClientSecret)?;
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderConfigError::MissingAuthorizationEndpoint)
			.and_then(|raw| parse_endpoint("authorization", &raw))?;
		let token = self
			.token_endpoint
			.ok_or(ProviderConfigError::MissingTokenEndpoint)
			.and_then(|raw| parse_endpoint("token", &raw))?;
		let profile = parse_endpoint(
			"profile",
			self.profile_endpoint.as_deref().unwrap_or(DEFAULT_PROFILE_ENDPOINT),
		)?;

		validate_scope_separator(&self.scope_separator)?;

		Ok(ProviderConfig {
			id: self.id,
			endpoints: ProviderEndpoints { authorization, token, profile },
			client_id,
			client_secret,
			callback_url: self.callback_url,
			scope_separator: self.scope_separator,
			default_scope: self.default_scope,
			client_auth_method: self.client_auth_method,
			quirks: self.quirks,
		})
	}
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ProviderConfigError> {
	let url = Url::parse(raw).map_err(|source| ProviderConfigError::InvalidEndpoint {
		endpoint: name,
		url: raw.to_owned(),
		source,
	})?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(ProviderConfigError::UnsupportedEndpointScheme {
			endpoint: name,
			url: url.to_string(),
		}),
	}
}

fn validate_scope_separator(separator: &str) -> Result<(), ProviderConfigError> {
	if separator.is_empty() || separator.chars().any(char::is_control) {
		Err(ProviderConfigError::InvalidScopeSeparator { separator: separator.to_owned() })
	} else {
		Ok(())
	}
}
