//! Inbound request description and per-call dispatch options.

// crates.io
use oauth2::http::{
	Request,
	header::{HOST, HeaderName},
};
use rand::{Rng, distr::Alphanumeric};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{PortalId, Scope},
	error::CallbackError,
};

const STATE_LEN: usize = 32;
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Transport-agnostic view of the request being dispatched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowRequest {
	/// Decoded query parameters; the first occurrence of a key wins.
	pub query: BTreeMap<String, String>,
	/// Raw `Host` header value.
	pub host: Option<String>,
	/// Raw `X-Forwarded-Proto` header value.
	pub forwarded_proto: Option<String>,
	/// Path plus query string as received.
	pub path: String,
	/// Whether the connection itself was TLS-terminated by the application.
	pub encrypted: bool,
}
impl FlowRequest {
	/// Creates a request for `path` (which may carry a query string) and decodes its query.
	pub fn new(path: impl Into<String>) -> Self {
		let path = path.into();
		let query = parse_query(&path);

		Self { query, host: None, forwarded_proto: None, path, encrypted: false }
	}

	/// Builds a request description from an `http` request.
	///
	/// The host falls back to the URI authority when no `Host` header is present (HTTP/2).
	pub fn from_http_request<B>(request: &Request<B>, encrypted: bool) -> Self {
		let headers = request.headers();
		let uri = request.uri();
		let path = uri.path_and_query().map(|value| value.as_str()).unwrap_or("/");
		let host = headers
			.get(HOST)
			.and_then(|value| value.to_str().ok())
			.or_else(|| uri.authority().map(|authority| authority.as_str()));
		let forwarded_proto = headers.get(X_FORWARDED_PROTO).and_then(|value| value.to_str().ok());
		let mut flow_request = Self::new(path).with_encrypted(encrypted);

		flow_request.host = host.map(ToOwned::to_owned);
		flow_request.forwarded_proto = forwarded_proto.map(ToOwned::to_owned);

		flow_request
	}

	/// Sets the `Host` header value.
	pub fn with_host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());

		self
	}

	/// Sets the `X-Forwarded-Proto` header value.
	pub fn with_forwarded_proto(mut self, proto: impl Into<String>) -> Self {
		self.forwarded_proto = Some(proto.into());

		self
	}

	/// Marks the connection as TLS-terminated by the application.
	pub fn with_encrypted(mut self, encrypted: bool) -> Self {
		self.encrypted = encrypted;

		self
	}

	/// Adds or replaces a query parameter without touching [`path`](Self::path).
	pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Returns a query parameter; empty values count as absent.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str).filter(|value| !value.is_empty())
	}

	/// Token pair supplied directly on the callback, when both halves are present.
	pub fn direct_tokens(&self) -> Option<(&str, &str)> {
		Some((self.query_value("access_token")?, self.query_value("refresh_token")?))
	}

	/// Scheme the client used to reach the application (`https` behind TLS or a TLS proxy).
	pub fn scheme(&self) -> &'static str {
		if self.encrypted || self.forwarded_proto.as_deref() == Some("https") {
			"https"
		} else {
			"http"
		}
	}

	/// Reconstructs the absolute URL the client originally requested.
	pub fn original_url(&self) -> Result<Url, CallbackError> {
		let host = self.host.as_deref().ok_or(CallbackError::MissingHost)?;
		let raw = format!("{}://{host}{}", self.scheme(), self.path);

		Url::parse(&raw).map_err(|source| CallbackError::InvalidOrigin { url: raw, source })
	}
}

/// Per-call options supplied by the route handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowOptions {
	/// Callback URL overriding the configured one.
	pub callback_url: Option<String>,
	/// Scope overriding the configured default.
	pub scope: Option<Scope>,
	/// Opaque `state` forwarded to the authorization endpoint.
	pub state: Option<String>,
	/// HubSpot portal to pre-select during authorization.
	pub portal_id: Option<PortalId>,
}
impl FlowOptions {
	/// Overrides the callback URL (absolute or relative).
	pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
		self.callback_url = Some(url.into());

		self
	}

	/// Overrides the requested scope.
	pub fn with_scope(mut self, scope: impl Into<Scope>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the `state` parameter.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Sets a freshly generated alphanumeric `state`; callers persist it to compare on return.
	pub fn with_random_state(self) -> Self {
		self.with_state(random_string(STATE_LEN))
	}

	/// Pre-selects a HubSpot portal.
	pub fn with_portal_id(mut self, portal_id: PortalId) -> Self {
		self.portal_id = Some(portal_id);

		self
	}
}

fn parse_query(path: &str) -> BTreeMap<String, String> {
	let mut query = BTreeMap::new();
	let Some((_, raw)) = path.split_once('?') else {
		return query;
	};

	for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
		query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
	}

	query
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
