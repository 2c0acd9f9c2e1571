//! Authorization-code exchange: the [`TokenExchanger`] seam and its `oauth2`-backed default.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenGrant, TokenParams},
	error::{ConfigError, ExchangeError, TransientError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{
		ClientAuthMethod, GrantType, ProviderConfig, ProviderErrorContext, ProviderErrorKind,
		ProviderStrategy,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by [`TokenExchanger::exchange`].
pub type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenGrant, ExchangeError>> + 'a + Send>>;

/// Parameters accompanying an authorization code on its way to the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeParams {
	/// Grant type sent as `grant_type`.
	pub grant_type: GrantType,
	/// Resolved absolute callback URL sent as `redirect_uri`.
	pub redirect_uri: Option<Url>,
	/// Provider-specific form parameters.
	pub extra: BTreeMap<String, String>,
}
impl ExchangeParams {
	/// Creates `authorization_code` parameters for the provided redirect URI.
	pub fn authorization_code(redirect_uri: Option<Url>) -> Self {
		Self { grant_type: GrantType::AuthorizationCode, redirect_uri, extra: BTreeMap::new() }
	}

	/// Replaces the provider-specific form parameters.
	pub fn with_extra(mut self, extra: BTreeMap<String, String>) -> Self {
		self.extra = extra;

		self
	}
}

/// Swaps an authorization code for tokens.
///
/// Codes are single-use: implementations must not retry a code that reached the provider.
pub trait TokenExchanger
where
	Self: Send + Sync,
{
	/// Performs the token endpoint round trip.
	fn exchange<'a>(&'a self, code: &'a str, params: &'a ExchangeParams) -> ExchangeFuture<'a>;
}

/// Maps HTTP transport failures into [`ExchangeError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an exchange error.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> ExchangeError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> ExchangeError {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => transient(meta, format!(
				"HTTP client error occurred while calling the token endpoint: {message}"
			)),
			_ => transient(meta, "HTTP client error occurred while calling the token endpoint"),
		}
	}
}

/// [`TokenExchanger`] built on `oauth2`'s basic client.
///
/// The client is configured once from a [`ProviderConfig`]; every exchange borrows it together
/// with a fresh [`ResponseMetadataSlot`].
pub struct OAuth2TokenExchanger<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
	strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> OAuth2TokenExchanger<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds an exchanger for the configured token endpoint and client credentials.
	pub fn from_config(
		config: &ProviderConfig,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self, ConfigError> {
		let auth_url = AuthUrl::new(config.endpoints.authorization.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let token_url = TokenUrl::new(config.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if matches!(config.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
			strategy,
		})
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2TokenExchanger<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds an exchanger backed by the crate's reqwest transport.
	pub fn reqwest(
		config: &ProviderConfig,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: ReqwestHttpClient,
	) -> Result<Self, ConfigError> {
		Self::from_config(config, strategy, http_client, ReqwestTransportErrorMapper)
	}
}
impl<C, M> TokenExchanger for OAuth2TokenExchanger<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn exchange<'a>(&'a self, code: &'a str, params: &'a ExchangeParams) -> ExchangeFuture<'a> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let mut request =
				self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

			if let Some(redirect_uri) = &params.redirect_uri {
				let redirect_url = RedirectUrl::new(redirect_uri.to_string())
					.map_err(|source| ConfigError::InvalidRedirect { source })?;

				request = request.set_redirect_uri(Cow::Owned(redirect_url));
			}
			for (key, value) in &params.extra {
				request = request.add_extra_param(key.as_str(), value.as_str());
			}

			let response = request.request_async(&instrumented).await.map_err(|err| {
				map_request_error(
					self.strategy.as_ref(),
					params.grant_type,
					meta.take(),
					err,
					self.error_mapper.as_ref(),
				)
			})?;

			Ok(map_token_response(response))
		})
	}
}
impl<C, M> Debug for OAuth2TokenExchanger<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2TokenExchanger")
			.field("client_id", self.oauth_client.client_id())
			.finish_non_exhaustive()
	}
}

fn map_token_response(response: BasicTokenResponse) -> TokenGrant {
	let mut params = TokenParams::new();

	if let Ok(token_type) = serde_json::to_value(response.token_type()) {
		params.insert("token_type".into(), token_type);
	}
	if let Some(expires_in) = response.expires_in() {
		params.insert("expires_in".into(), expires_in.as_secs().into());
	}
	if let Some(scopes) = response.scopes() {
		let joined = scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" ");

		params.insert("scope".into(), joined.into());
	}

	TokenGrant {
		access_token: Secret::new(response.access_token().secret().to_owned()),
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().to_owned())),
		params,
	}
}

fn map_request_error<E, M>(
	strategy: &dyn ProviderStrategy,
	grant: GrantType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> ExchangeError
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(strategy, grant, response, meta_ref),
		RequestTokenError::Request(error) => mapper.map_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, body) => match meta_status(meta_ref) {
			Some(status) if !(200..300).contains(&status) =>
				map_unstructured_error(strategy, grant, status, &body, meta_ref),
			status => TransientError::TokenResponseParse { source: error, status }.into(),
		},
		RequestTokenError::Other(message) => transient(meta_ref, message),
	}
}

fn map_server_response_error(
	strategy: &dyn ProviderStrategy,
	grant: GrantType,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> ExchangeError {
	let mut ctx =
		ProviderErrorContext::new(grant).with_oauth_error(response.error().as_ref().to_string());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let reason = response
		.error_description()
		.cloned()
		.unwrap_or_else(|| response.error().as_ref().to_string());

	classified_error(strategy.classify_token_error(&ctx), reason, meta)
}

/// Error statuses whose body is not an OAuth error document (plain text, HTML).
fn map_unstructured_error(
	strategy: &dyn ProviderStrategy,
	grant: GrantType,
	status: u16,
	body: &[u8],
	meta: Option<&ResponseMetadata>,
) -> ExchangeError {
	let ctx = ProviderErrorContext::new(grant)
		.with_http_status(status)
		.with_body_preview(String::from_utf8_lossy(body));
	let reason = ctx.body_preview.clone().unwrap_or_default();

	classified_error(strategy.classify_token_error(&ctx), reason, meta)
}

fn classified_error(
	kind: ProviderErrorKind,
	reason: String,
	meta: Option<&ResponseMetadata>,
) -> ExchangeError {
	match kind {
		ProviderErrorKind::InvalidGrant => ExchangeError::InvalidGrant { reason },
		ProviderErrorKind::InvalidClient => ExchangeError::InvalidClient { reason },
		ProviderErrorKind::InsufficientScope => ExchangeError::InsufficientScope { reason },
		ProviderErrorKind::Transient =>
			transient(meta, format!("Token endpoint rejected the request: {reason}")),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> ExchangeError {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::from(err).into()
}

fn transient(meta: Option<&ResponseMetadata>, message: impl Into<String>) -> ExchangeError {
	TransientError::TokenEndpoint {
		message: message.into(),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
