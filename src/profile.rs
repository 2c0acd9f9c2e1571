//! User profiles handed to verification callbacks and the loaders that produce them.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, Secret},
	error::ProfileError,
};
#[cfg(feature = "reqwest")]
use crate::{error::TransportError, http::ReqwestHttpClient, provider::ProviderConfig};

/// Boxed future returned by [`ProfileLoader::load`].
pub type ProfileFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Profile, ProfileError>> + 'a + Send>>;

/// Normalized HubSpot account details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	/// Provider that issued the access token.
	pub provider: ProviderId,
	/// HubSpot portal (hub) identifier, when known.
	pub id: Option<String>,
	/// Portal time zone, e.g. `US/Eastern`.
	pub time_zone: Option<String>,
	/// Portal currency code, e.g. `USD`.
	pub currency: Option<String>,
	/// Raw payload returned by the profile endpoint.
	pub raw: Value,
}
impl Profile {
	/// Minimal profile used when the profile round trip is skipped.
	pub fn synthesized(provider: ProviderId) -> Self {
		Self { provider, id: None, time_zone: None, currency: None, raw: Value::Null }
	}

	/// Parses a HubSpot account-details payload (`portalId`, `timeZone`, `currency`, ...).
	pub fn from_account_details(provider: ProviderId, body: &[u8]) -> Result<Self, ProfileError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let raw: Value = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProfileError::Parse { source })?;
		let details: AccountDetails = serde_path_to_error::deserialize(&raw)
			.map_err(|source| ProfileError::Parse { source })?;

		Ok(Self {
			provider,
			id: details.portal_id.map(PortalRef::into_string),
			time_zone: details.time_zone,
			currency: details.currency,
			raw,
		})
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountDetails {
	portal_id: Option<PortalRef>,
	time_zone: Option<String>,
	currency: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortalRef {
	Number(u64),
	Text(String),
}
impl PortalRef {
	fn into_string(self) -> String {
		match self {
			Self::Number(value) => value.to_string(),
			Self::Text(value) => value,
		}
	}
}

/// Loads the user profile for an access token.
pub trait ProfileLoader
where
	Self: Send + Sync,
{
	/// Fetches and normalizes the profile associated with `access_token`.
	fn load<'a>(&'a self, access_token: &'a Secret) -> ProfileFuture<'a>;
}

/// Loader that never touches the network and returns [`Profile::synthesized`].
#[derive(Clone, Debug)]
pub struct SyntheticProfileLoader {
	provider: ProviderId,
}
impl SyntheticProfileLoader {
	/// Creates a loader producing profiles tagged with `provider`.
	pub fn new(provider: ProviderId) -> Self {
		Self { provider }
	}
}
impl Default for SyntheticProfileLoader {
	fn default() -> Self {
		Self::new(ProviderId::hubspot())
	}
}
impl ProfileLoader for SyntheticProfileLoader {
	fn load<'a>(&'a self, _access_token: &'a Secret) -> ProfileFuture<'a> {
		Box::pin(async move { Ok(Profile::synthesized(self.provider.clone())) })
	}
}

/// Loader that queries the configured profile endpoint over HTTP.
///
/// The access token travels as a bearer header or as an `access_token` query parameter,
/// following [`ProviderQuirks::use_authorization_header_for_get`](crate::provider::ProviderQuirks).
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct HttpProfileLoader {
	http_client: ReqwestHttpClient,
	endpoint: Url,
	provider: ProviderId,
	use_authorization_header: bool,
}
#[cfg(feature = "reqwest")]
impl HttpProfileLoader {
	/// Builds a loader for the configured profile endpoint.
	pub fn from_config(config: &ProviderConfig, http_client: ReqwestHttpClient) -> Self {
		Self {
			http_client,
			endpoint: config.endpoints.profile.clone(),
			provider: config.id.clone(),
			use_authorization_header: config.quirks.use_authorization_header_for_get,
		}
	}
}
#[cfg(feature = "reqwest")]
impl ProfileLoader for HttpProfileLoader {
	fn load<'a>(&'a self, access_token: &'a Secret) -> ProfileFuture<'a> {
		Box::pin(async move {
			let response = self
				.http_client
				.authorized_get(
					self.endpoint.clone(),
					access_token.expose(),
					self.use_authorization_header,
				)
				.await
				.map_err(TransportError::from)?;
			let status = response.status();

			if !status.is_success() {
				return Err(ProfileError::Status { status: status.as_u16() });
			}

			let body = response.bytes().await.map_err(TransportError::from)?;

			Profile::from_account_details(self.provider.clone(), &body)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn account_details_become_a_profile() {
		let profile = Profile::from_account_details(
			ProviderId::hubspot(),
			br#"{"portalId":62515,"timeZone":"US/Eastern","currency":"USD","utcOffset":"-05:00"}"#,
		)
		.expect("Account details should parse.");

		assert_eq!(profile.id.as_deref(), Some("62515"));
		assert_eq!(profile.time_zone.as_deref(), Some("US/Eastern"));
		assert_eq!(profile.currency.as_deref(), Some("USD"));
		assert_eq!(profile.raw["utcOffset"], "-05:00");
	}

	#[test]
	fn parse_failures_report_the_offending_path() {
		let err = Profile::from_account_details(ProviderId::hubspot(), br#"{"timeZone":42}"#)
			.expect_err("A numeric time zone must be rejected.");

		match err {
			ProfileError::Parse { source } => assert_eq!(source.path().to_string(), "timeZone"),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[tokio::test]
	async fn synthetic_loader_skips_the_network() {
		let loader = SyntheticProfileLoader::default();
		let profile =
			loader.load(&Secret::new("token")).await.expect("Synthetic loading should succeed.");

		assert_eq!(profile, Profile::synthesized(ProviderId::hubspot()));
	}
}
