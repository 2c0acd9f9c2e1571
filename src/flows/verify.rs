//! Application verification callbacks.
//!
//! A [`Verifier`] turns the tokens and profile of a completed flow into an application user.
//! The four shapes differ only in which extra inputs they receive; the shape is fixed when the
//! dispatcher is built.

// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenGrant, TokenParams},
	flows::FlowRequest,
	profile::Profile,
};

/// Boxed future returned by every verifier shape.
pub type VerifyFuture<U> = Pin<Box<dyn Future<Output = VerifyResult<U>> + Send>>;

type PlainFn<U> = dyn Fn(Secret, Option<Secret>, Profile) -> VerifyFuture<U> + Send + Sync;
type ParamsFn<U> =
	dyn Fn(Secret, Option<Secret>, TokenParams, Profile) -> VerifyFuture<U> + Send + Sync;
type RequestFn<U> =
	dyn Fn(FlowRequest, Secret, Option<Secret>, Profile) -> VerifyFuture<U> + Send + Sync;
type RequestParamsFn<U> =
	dyn Fn(FlowRequest, Secret, Option<Secret>, TokenParams, Profile) -> VerifyFuture<U>
		+ Send
		+ Sync;

/// Verdict reported by a verification callback.
#[derive(Debug)]
pub enum VerifyResult<U> {
	/// User accepted.
	Verified {
		/// Application user.
		user: U,
		/// Optional details forwarded to the success outcome.
		info: Option<Value>,
	},
	/// No matching user; the login fails without an error.
	Rejected {
		/// Optional details forwarded to the fail outcome.
		info: Option<Value>,
	},
	/// Verification could not complete.
	Errored(BoxError),
}
impl<U> VerifyResult<U> {
	/// Accepts `user` without extra details.
	pub fn verified(user: U) -> Self {
		Self::Verified { user, info: None }
	}

	/// Accepts `user` with extra details.
	pub fn verified_with(user: U, info: impl Into<Value>) -> Self {
		Self::Verified { user, info: Some(info.into()) }
	}

	/// Rejects the login without details.
	pub fn rejected() -> Self {
		Self::Rejected { info: None }
	}

	/// Rejects the login with details (e.g. a message for the login page).
	pub fn rejected_with(info: impl Into<Value>) -> Self {
		Self::Rejected { info: Some(info.into()) }
	}

	/// Reports an internal failure.
	pub fn errored(cause: impl Into<BoxError>) -> Self {
		Self::Errored(cause.into())
	}
}

/// Verification callback, tagged by the inputs it consumes.
pub enum Verifier<U> {
	/// `(access_token, refresh_token, profile)`.
	Plain(Arc<PlainFn<U>>),
	/// `(access_token, refresh_token, params, profile)`.
	WithParams(Arc<ParamsFn<U>>),
	/// `(request, access_token, refresh_token, profile)`.
	WithRequest(Arc<RequestFn<U>>),
	/// `(request, access_token, refresh_token, params, profile)`.
	WithRequestAndParams(Arc<RequestParamsFn<U>>),
}
impl<U> Verifier<U>
where
	U: 'static + Send,
{
	/// Wraps a callback receiving the tokens and the profile.
	pub fn plain<F, Fut>(f: F) -> Self
	where
		F: 'static + Send + Sync + Fn(Secret, Option<Secret>, Profile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::Plain(Arc::new(move |access: Secret, refresh: Option<Secret>, profile: Profile| {
			Box::pin(f(access, refresh, profile)) as VerifyFuture<U>
		}))
	}

	/// Wraps a callback that also receives the raw exchange parameters.
	pub fn with_params<F, Fut>(f: F) -> Self
	where
		F: 'static + Send + Sync + Fn(Secret, Option<Secret>, TokenParams, Profile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::WithParams(Arc::new(
			move |access: Secret, refresh: Option<Secret>, params: TokenParams, profile: Profile| {
				Box::pin(f(access, refresh, params, profile)) as VerifyFuture<U>
			},
		))
	}

	/// Wraps a callback that also receives the inbound request.
	pub fn with_request<F, Fut>(f: F) -> Self
	where
		F: 'static + Send + Sync + Fn(FlowRequest, Secret, Option<Secret>, Profile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::WithRequest(Arc::new(
			move |request: FlowRequest, access: Secret, refresh: Option<Secret>, profile: Profile| {
				Box::pin(f(request, access, refresh, profile)) as VerifyFuture<U>
			},
		))
	}

	/// Wraps a callback receiving the request, the tokens, the parameters, and the profile.
	pub fn with_request_and_params<F, Fut>(f: F) -> Self
	where
		F: 'static
			+ Send
			+ Sync
			+ Fn(FlowRequest, Secret, Option<Secret>, TokenParams, Profile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::WithRequestAndParams(Arc::new(
			move |request: FlowRequest,
			      access: Secret,
			      refresh: Option<Secret>,
			      params: TokenParams,
			      profile: Profile| {
				Box::pin(f(request, access, refresh, params, profile)) as VerifyFuture<U>
			},
		))
	}
}
impl<U> Verifier<U> {
	/// Invokes the callback with the inputs its shape asks for.
	pub fn verify(
		&self,
		request: &FlowRequest,
		grant: TokenGrant,
		profile: Profile,
	) -> VerifyFuture<U> {
		let TokenGrant { access_token, refresh_token, params } = grant;

		match self {
			Self::Plain(f) => f(access_token, refresh_token, profile),
			Self::WithParams(f) => f(access_token, refresh_token, params, profile),
			Self::WithRequest(f) => f(request.clone(), access_token, refresh_token, profile),
			Self::WithRequestAndParams(f) =>
				f(request.clone(), access_token, refresh_token, params, profile),
		}
	}

	/// Name of the callback shape.
	pub fn shape(&self) -> &'static str {
		match self {
			Self::Plain(_) => "plain",
			Self::WithParams(_) => "with_params",
			Self::WithRequest(_) => "with_request",
			Self::WithRequestAndParams(_) => "with_request_and_params",
		}
	}
}
impl<U> Clone for Verifier<U> {
	fn clone(&self) -> Self {
		match self {
			Self::Plain(f) => Self::Plain(f.clone()),
			Self::WithParams(f) => Self::WithParams(f.clone()),
			Self::WithRequest(f) => Self::WithRequest(f.clone()),
			Self::WithRequestAndParams(f) => Self::WithRequestAndParams(f.clone()),
		}
	}
}
impl<U> Debug for Verifier<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Verifier").field(&self.shape()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::ProviderId;

	fn grant() -> TokenGrant {
		TokenGrant::new("access", Some(Secret::new("refresh"))).with_param("expires_in", 21600)
	}

	#[tokio::test]
	async fn each_shape_receives_its_inputs() {
		let request = FlowRequest::new("/cb?code=c").with_host("app.example.com");
		let profile = Profile::synthesized(ProviderId::hubspot());
		let verifiers = [
			Verifier::plain(|access: Secret, _, _| async move {
				VerifyResult::verified(access.expose().to_owned())
			}),
			Verifier::with_params(|_, _, params: TokenParams, _| async move {
				VerifyResult::verified(params["expires_in"].to_string())
			}),
			Verifier::with_request(|request: FlowRequest, _, _, _| async move {
				VerifyResult::verified(request.host.unwrap_or_default())
			}),
			Verifier::with_request_and_params(
				|request: FlowRequest, _, refresh: Option<Secret>, params: TokenParams, _| {
					let refresh = refresh.as_ref().map(Secret::expose).unwrap_or_default();
					let user = format!("{}|{refresh}|{}", request.path, params.len());

					async move { VerifyResult::verified(user) }
				},
			),
		];
		let mut users = Vec::new();

		for verifier in &verifiers {
			match verifier.verify(&request, grant(), profile.clone()).await {
				VerifyResult::Verified { user, .. } => users.push(user),
				other => panic!("Unexpected verdict: {other:?}."),
			}
		}

		assert_eq!(users, ["access", "21600", "app.example.com", "/cb?code=c|refresh|1"]);
	}

	#[test]
	fn debug_names_the_shape() {
		let verifier: Verifier<()> =
			Verifier::plain(|_, _, _| async { VerifyResult::rejected() });

		assert_eq!(format!("{verifier:?}"), "Verifier(\"plain\")");
		assert_eq!(verifier.clone().shape(), "plain");
	}
}
