//! Error taxonomy shared by the dispatcher, the token exchanger, and the profile loader.
//!
//! [`Error`] is the cause carried by [`AuthOutcome::Error`](crate::flows::AuthOutcome::Error);
//! the nested enums describe which collaborator failed. Construction-time problems live in
//! [`ProviderConfigError`](crate::provider::ProviderConfigError) and never surface per request.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error accepted from application callbacks and custom transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical dispatch failure surfaced through `AuthOutcome::Error`.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Callback URL could not be resolved against the inbound request.
	#[error(transparent)]
	Callback(#[from] CallbackError),
	/// Authorization code exchange failed.
	#[error("Failed to obtain access token.")]
	Exchange {
		/// Underlying exchange failure.
		#[source]
		source: ExchangeError,
	},
	/// Profile loading failed.
	#[error(transparent)]
	Profile(#[from] ProfileError),
	/// Verification callback reported an internal error.
	#[error("Verification callback reported an error.")]
	Verification(#[source] BoxError),
}
impl Error {
	/// Wraps an application error raised by the verification callback.
	pub fn verification(src: impl Into<BoxError>) -> Self {
		Self::Verification(src.into())
	}
}
impl From<ExchangeError> for Error {
	fn from(source: ExchangeError) -> Self {
		Self::Exchange { source }
	}
}

/// Failures raised while resolving a relative callback URL.
#[derive(Debug, ThisError)]
pub enum CallbackError {
	/// Relative callback requires a `Host` header to rebuild the originating URL.
	#[error("Request carries no Host header; relative callback URL cannot be resolved.")]
	MissingHost,
	/// Originating request URL could not be reconstructed.
	#[error("Originating request URL `{url}` is invalid.")]
	InvalidOrigin {
		/// Reconstructed URL that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Callback URL is malformed.
	#[error("Callback URL `{url}` is invalid.")]
	InvalidCallback {
		/// Offending callback URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failures raised by a [`TokenExchanger`](crate::oauth::TokenExchanger).
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider rejected the grant (e.g., bad or reused code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Requested scopes exceed what the application may request.
	#[error("Requested scopes were refused: {reason}.")]
	InsufficientScope {
		/// Provider-supplied reason string.
		reason: String,
	},
}

/// Configuration and request-construction failures raised by the exchanger.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider endpoint cannot be used by the OAuth client.
	#[error("Provider configuration contains an invalid endpoint URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry with a fresh authorization).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised by a [`ProfileLoader`](crate::profile::ProfileLoader).
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// Profile endpoint could not be reached.
	#[error("Failed to fetch user profile.")]
	Transport(#[from] TransportError),
	/// Profile endpoint answered with a non-success status.
	#[error("Profile endpoint responded with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
	},
	/// Profile payload could not be parsed.
	#[error("Failed to parse user profile.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Application-defined loader failure.
	#[error("Profile loader failed.")]
	Other(#[source] BoxError),
}
