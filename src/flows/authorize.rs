//! Authorization redirect construction.

// self
use crate::{
	_prelude::*,
	flows::FlowOptions,
	provider::{ProviderConfig, ProviderStrategy},
};

const RESERVED_PARAMS: [&str; 5] = ["response_type", "client_id", "redirect_uri", "scope", "state"];

/// Builds the authorization redirect for a dispatch that has nothing to complete.
///
/// Query order: `response_type`, `client_id`, `redirect_uri`, `scope`, `state`, then strategy
/// extras in key order. An empty per-call scope falls back to the configured default; absent
/// or empty values are otherwise omitted.
pub fn authorization_url(
	config: &ProviderConfig,
	strategy: &dyn ProviderStrategy,
	options: &FlowOptions,
	redirect_uri: Option<&Url>,
) -> Url {
	let scope = options
		.scope
		.as_ref()
		.filter(|scope| !scope.is_empty())
		.or(config.default_scope.as_ref())
		.and_then(|scope| scope.join(&config.scope_separator));
	let state = options.state.as_deref().filter(|state| !state.is_empty());
	let extras = strategy.authorization_params(options);
	let mut url = config.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);

	if let Some(redirect_uri) = redirect_uri {
		pairs.append_pair("redirect_uri", redirect_uri.as_str());
	}
	if let Some(scope) = &scope {
		pairs.append_pair("scope", scope);
	}
	if let Some(state) = state {
		pairs.append_pair("state", state);
	}

	for (key, value) in &extras {
		if !RESERVED_PARAMS.contains(&key.as_str()) {
			pairs.append_pair(key, value);
		}
	}

	drop(pairs);

	url
}
