//! Callback URL resolution against the inbound request.

// self
use crate::{_prelude::*, error::CallbackError, flows::FlowRequest};

/// Resolves the callback URL sent as `redirect_uri`.
///
/// Absolute URLs are used verbatim; relative ones are joined against
/// [`FlowRequest::original_url`]. `None` (or an empty value) means no `redirect_uri` is sent.
pub fn resolve_callback_url(
	request: &FlowRequest,
	callback_url: Option<&str>,
) -> Result<Option<Url>, CallbackError> {
	let Some(raw) = callback_url.filter(|value| !value.is_empty()) else {
		return Ok(None);
	};
	let invalid = |source| CallbackError::InvalidCallback { url: raw.to_owned(), source };

	match Url::parse(raw) {
		Ok(url) => Ok(Some(url)),
		Err(url::ParseError::RelativeUrlWithoutBase) =>
			request.original_url()?.join(raw).map(Some).map_err(invalid),
		Err(source) => Err(invalid(source)),
	}
}
