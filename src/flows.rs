//! Request dispatch: the single entry point that starts or completes a HubSpot login.

pub mod authorize;
pub mod callback;
pub mod outcome;
pub mod phase;
pub mod request;
pub mod verify;

pub use authorize::*;
pub use callback::*;
pub use outcome::*;
pub use phase::*;
pub use request::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenGrant},
	oauth::{ExchangeParams, TokenExchanger},
	obs::{self, FlowSpan},
	profile::{Profile, ProfileLoader, SyntheticProfileLoader},
	provider::{ProviderConfig, ProviderStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError, http::ReqwestHttpClient, oauth::OAuth2TokenExchanger,
	profile::HttpProfileLoader, provider::HubSpotStrategy,
};

/// Chooses between starting a login and completing one, then drives it to an [`AuthOutcome`].
///
/// The dispatcher owns nothing mutable: configuration and collaborators sit behind `Arc`s, so
/// one instance serves any number of concurrent requests. Each [`dispatch`](Self::dispatch)
/// performs at most one token exchange, one profile load, and one verifier call.
pub struct AuthenticationDispatcher<U> {
	config: Arc<ProviderConfig>,
	strategy: Arc<dyn ProviderStrategy>,
	exchanger: Arc<dyn TokenExchanger>,
	profile_loader: Arc<dyn ProfileLoader>,
	verifier: Verifier<U>,
}
impl<U> AuthenticationDispatcher<U>
where
	U: 'static + Send,
{
	/// Creates a dispatcher; profiles are synthesized until a loader is attached.
	pub fn new(
		config: impl Into<Arc<ProviderConfig>>,
		strategy: Arc<dyn ProviderStrategy>,
		exchanger: Arc<dyn TokenExchanger>,
		verifier: Verifier<U>,
	) -> Self {
		let config = config.into();
		let profile_loader = Arc::new(SyntheticProfileLoader::new(config.id.clone()));

		Self { config, strategy, exchanger, profile_loader, verifier }
	}

	/// Replaces the profile loader consulted when `skip_user_profile` is off.
	pub fn with_profile_loader(mut self, profile_loader: Arc<dyn ProfileLoader>) -> Self {
		self.profile_loader = profile_loader;

		self
	}

	/// Configuration the dispatcher was built with.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Handles one inbound request.
	///
	/// Never fails: collaborator and resolution failures surface as [`AuthOutcome::Error`].
	pub async fn dispatch(&self, request: &FlowRequest, options: &FlowOptions) -> AuthOutcome<U> {
		let step = FlowStep::select(request);
		let phase = step.phase();
		let span = FlowSpan::new(phase, "dispatch");
		let outcome = span
			.instrument(self.run(step, request, options))
			.await
			.unwrap_or_else(|cause| AuthOutcome::Error { cause });

		obs::record_dispatch_outcome(phase, outcome.label());

		outcome
	}

	async fn run(
		&self,
		step: FlowStep<'_>,
		request: &FlowRequest,
		options: &FlowOptions,
	) -> Result<AuthOutcome<U>> {
		match step {
			FlowStep::ProviderError => Ok(AuthOutcome::Fail { info: None }),
			FlowStep::DirectToken { access_token, refresh_token } => {
				let grant = TokenGrant::new(access_token, Some(Secret::new(refresh_token)));

				self.complete(request, grant).await
			},
			FlowStep::CodeExchange { code } => {
				let redirect_uri = self.resolve_callback(request, options)?;
				let extra = if self.config.quirks.include_portal_in_exchange {
					self.strategy.token_params(options)
				} else {
					BTreeMap::new()
				};
				let params = ExchangeParams::authorization_code(redirect_uri).with_extra(extra);
				let grant = self.exchanger.exchange(code, &params).await?;

				self.complete(request, grant).await
			},
			FlowStep::Authorize => {
				let redirect_uri = self.resolve_callback(request, options)?;
				let location = authorization_url(
					&self.config,
					self.strategy.as_ref(),
					options,
					redirect_uri.as_ref(),
				);

				Ok(AuthOutcome::Redirect { location })
			},
		}
	}

	fn resolve_callback(
		&self,
		request: &FlowRequest,
		options: &FlowOptions,
	) -> Result<Option<Url>> {
		let callback_url = options
			.callback_url
			.as_deref()
			.filter(|value| !value.is_empty())
			.or(self.config.callback_url.as_deref());

		Ok(resolve_callback_url(request, callback_url)?)
	}

	async fn complete(&self, request: &FlowRequest, grant: TokenGrant) -> Result<AuthOutcome<U>> {
		let profile = if self.config.quirks.skip_user_profile {
			Profile::synthesized(self.config.id.clone())
		} else {
			self.profile_loader.load(&grant.access_token).await?
		};
		let access_token = grant.access_token.clone();
		let refresh_token = grant.refresh_token.clone();

		match self.verifier.verify(request, grant, profile.clone()).await {
			VerifyResult::Verified { user, info } => Ok(AuthOutcome::Success(AuthSuccess {
				user,
				info,
				access_token,
				refresh_token,
				profile,
			})),
			VerifyResult::Rejected { info } => Ok(AuthOutcome::Fail { info }),
			VerifyResult::Errored(cause) => Err(Error::Verification(cause)),
		}
	}
}
#[cfg(feature = "reqwest")]
impl<U> AuthenticationDispatcher<U>
where
	U: 'static + Send,
{
	/// Builds a HubSpot dispatcher on the crate's reqwest transport.
	pub fn reqwest(config: ProviderConfig, verifier: Verifier<U>) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::default();
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(HubSpotStrategy);
		let exchanger =
			OAuth2TokenExchanger::reqwest(&config, strategy.clone(), http_client.clone())?;
		let profile_loader = HttpProfileLoader::from_config(&config, http_client);

		Ok(Self::new(config, strategy, Arc::new(exchanger), verifier)
			.with_profile_loader(Arc::new(profile_loader)))
	}
}
impl<U> Debug for AuthenticationDispatcher<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticationDispatcher")
			.field("config", &self.config)
			.field("verifier", &self.verifier)
			.finish_non_exhaustive()
	}
}
