//! Provider strategy hooks that customize authorization redirects and token exchanges.
//!
//! Implementations contribute provider-specific parameters and normalize error mapping
//! without tying the dispatcher to any particular HTTP client.

// self
use crate::{_prelude::*, flows::FlowOptions, provider::GrantType};

/// Strategy hook that lets providers extend requests and classify errors.
///
/// Implementors are required to be `Send + Sync` so a single strategy can back any number of
/// concurrent dispatches. Only [`authorization_params`](Self::authorization_params) is
/// mandatory; the other hooks fall back to provider-neutral behavior.
pub trait ProviderStrategy: Send + Sync {
	/// Extra query parameters merged into the authorization redirect.
	///
	/// Reserved keys (`response_type`, `client_id`, `redirect_uri`, `scope`, `state`) are
	/// owned by the dispatcher; values returned for them are ignored.
	fn authorization_params(&self, options: &FlowOptions) -> BTreeMap<String, String>;

	/// Extra form parameters for the code exchange, sent only when the configuration opts in.
	fn token_params(&self, _options: &FlowOptions) -> BTreeMap<String, String> {
		BTreeMap::new()
	}

	/// Maps a token endpoint failure into the crate's error taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		classify_default(ctx)
	}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the authorization grant (bad or reused code).
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Requested scopes were refused.
	InsufficientScope,
	/// Failure is temporary.
	Transient,
}

/// Context passed to provider strategies when classifying token errors.
///
/// The struct keeps only primitive data (status codes, OAuth fields, body preview) so
/// strategies stay decoupled from the HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Grant type associated with the failing request.
	pub grant_type: GrantType,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided grant type.
	pub fn new(grant_type: GrantType) -> Self {
		Self {
			grant_type,
			http_status: None,
			oauth_error: None,
			error_description: None,
			body_preview: None,
		}
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview for providers that return non-JSON payloads.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// HubSpot strategy: forwards the caller's `portalId` to the authorization endpoint (and to
/// the token endpoint when the configuration opts in).
#[derive(Clone, Copy, Debug, Default)]
pub struct HubSpotStrategy;
impl HubSpotStrategy {
	/// Query/form key HubSpot uses for the tenant identifier.
	pub const PORTAL_ID_PARAM: &'static str = "portalId";
}
impl Display for HubSpotStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("hubspot-strategy")
	}
}
impl ProviderStrategy for HubSpotStrategy {
	fn authorization_params(&self, options: &FlowOptions) -> BTreeMap<String, String> {
		let mut params = BTreeMap::new();

		if let Some(portal) = &options.portal_id {
			params.insert(Self::PORTAL_ID_PARAM.into(), portal.to_string());
		}

		params
	}

	fn token_params(&self, options: &FlowOptions) -> BTreeMap<String, String> {
		self.authorization_params(options)
	}
}

/// RFC-guided classification: structured OAuth fields first, then body hints, then the HTTP
/// status.
pub fn classify_default(ctx: &ProviderErrorContext) -> ProviderErrorKind {
	if let Some(kind) =
		classify_oauth_error(ctx.oauth_error.as_deref(), ctx.error_description.as_deref())
	{
		return kind;
	}
	if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
		return kind;
	}

	classify_status(ctx.http_status)
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf: String = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_body(error_description))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let lowered = body?.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}
