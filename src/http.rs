//! Transport primitives shared by the token exchanger and the profile loader.
//!
//! [`TokenHttpClient`] is the only seam between the `oauth2` exchange and an HTTP stack.
//! Handles publish the status and `Retry-After` hint of the last response into a
//! [`ResponseMetadataSlot`] so failed exchanges can be classified with consistent metadata.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// HTTP transport able to execute OAuth token exchanges while recording response metadata.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back every
/// concurrent dispatch; the handles they return own whatever state they need so their
/// request futures stay `Send`.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that records outcomes in `slot`.
	///
	/// Handles clear the slot with [`ResponseMetadataSlot::take`] before sending and call
	/// [`ResponseMetadataSlot::store`] as soon as a status line is known.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Metadata captured from the most recent HTTP response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Reqwest-backed transport used by the default exchanger and profile loader.
///
/// Token requests must not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Issues a GET carrying `access_token`, either as a bearer header or as a query parameter.
	pub async fn authorized_get(
		&self,
		mut url: Url,
		access_token: &str,
		use_authorization_header: bool,
	) -> Result<reqwest::Response, ReqwestError> {
		if use_authorization_header {
			return self.0.get(url).bearer_auth(access_token).send().await;
		}

		url.query_pairs_mut().append_pair("access_token", access_token);

		self.0.get(url).send().await
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		InstrumentedHandle { client: self.0.clone(), slot }
	}
}

/// Handle returned by [`ReqwestHttpClient`] that records response metadata.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct InstrumentedHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let response = self
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			self.slot.store(ResponseMetadata {
				status: Some(status.as_u16()),
				retry_after: parse_retry_after(&headers),
			});

			let mut converted =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}

	let delta = OffsetDateTime::parse(raw, &Rfc2822).ok()? - OffsetDateTime::now_utc();

	delta.is_positive().then_some(delta)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn metadata_slot_is_consumed_on_take() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(429), retry_after: None });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(429));
		assert!(slot.take().is_none());
	}
}
