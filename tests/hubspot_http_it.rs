#![cfg(feature = "reqwest")]

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
use time::Duration;
// self
use oauth2_hubspot::{
	auth::Secret,
	error::{ExchangeError, ProfileError, TransientError},
	flows::{
		AuthOutcome, AuthenticationDispatcher, FlowOptions, FlowRequest, Verifier, VerifyResult,
	},
	http::ReqwestHttpClient,
	oauth::{ExchangeParams, OAuth2TokenExchanger, ReqwestTransportErrorMapper, TokenExchanger},
	profile::{HttpProfileLoader, Profile, ProfileLoader},
	provider::{ClientAuthMethod, HubSpotStrategy, ProviderConfig, ProviderQuirks},
	url::Url,
};

const TOKEN_PATH: &str = "/oauth/v1/token";
const PROFILE_PATH: &str = "/integrations/v1/me";
const CALLBACK: &str = "https://app.example.com/auth/callback";
const TOKEN_BODY: &str = r#"{"access_token":"access-it","refresh_token":"refresh-it","token_type":"bearer","expires_in":21600}"#;
const PROFILE_BODY: &str =
	r#"{"portalId":62515,"timeZone":"US/Eastern","currency":"USD","utcOffset":"-05:00"}"#;

fn build_config(
	server: &MockServer,
	method: ClientAuthMethod,
	quirks: ProviderQuirks,
) -> ProviderConfig {
	ProviderConfig::hubspot()
		.client_id("app-it")
		.client_secret("secret-it")
		.authorization_endpoint(server.url("/oauth/authorize"))
		.token_endpoint(server.url(TOKEN_PATH))
		.profile_endpoint(server.url(PROFILE_PATH))
		.callback_url("/auth/callback")
		.client_auth_method(method)
		.quirks(quirks)
		.build()
		.expect("Mock provider configuration should build successfully.")
}

fn post_config(server: &MockServer) -> ProviderConfig {
	build_config(server, ClientAuthMethod::ClientSecretPost, ProviderQuirks::default())
}

fn build_exchanger(
	config: &ProviderConfig,
) -> OAuth2TokenExchanger<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	OAuth2TokenExchanger::reqwest(config, Arc::new(HubSpotStrategy), ReqwestHttpClient::default())
		.expect("Exchanger should build from the mock configuration.")
}

fn callback_params() -> ExchangeParams {
	ExchangeParams::authorization_code(Some(
		Url::parse(CALLBACK).expect("Callback fixture should parse successfully."),
	))
}

#[tokio::test]
async fn exchange_posts_credentials_in_the_form_body() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("grant_type=authorization_code")
				.body_includes("code=auth-code")
				.body_includes("client_id=app-it")
				.body_includes("client_secret=secret-it")
				.body_includes("redirect_uri=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let grant = build_exchanger(&config)
		.exchange("auth-code", &callback_params())
		.await
		.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(grant.access_token.expose(), "access-it");
	assert_eq!(grant.refresh_token.as_ref().map(Secret::expose), Some("refresh-it"));
	assert_eq!(grant.expires_in(), Some(21600));
	assert!(grant.params.contains_key("token_type"));
}

#[tokio::test]
async fn exchange_forwards_extra_params_and_basic_credentials() {
	let server = MockServer::start_async().await;
	let config =
		build_config(&server, ClientAuthMethod::ClientSecretBasic, ProviderQuirks::default());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header_exists("authorization")
				.body_includes("portalId=12345");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let params = callback_params()
		.with_extra(BTreeMap::from([("portalId".to_owned(), "12345".to_owned())]));

	build_exchanger(&config)
		.exchange("auth-code", &params)
		.await
		.expect("Code exchange with extra params should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn exchange_classifies_rejected_codes() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}");
		})
		.await;
	let err = build_exchanger(&config)
		.exchange("reused-code", &callback_params())
		.await
		.expect_err("A reused code should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, ExchangeError::InvalidGrant { ref reason } if reason == "already used"));
}

#[tokio::test]
async fn exchange_classifies_plain_text_error_bodies() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes("code=expired-code");
			then.status(400)
				.header("content-type", "text/plain")
				.body("invalid_grant: authorization code expired");
		})
		.await;
	let malformed = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes("code=garbled-code");
			then.status(200).header("content-type", "application/json").body("{\"access_token\":");
		})
		.await;
	let exchanger = build_exchanger(&config);
	let err = exchanger
		.exchange("expired-code", &callback_params())
		.await
		.expect_err("An expired code should be rejected.");

	match err {
		ExchangeError::InvalidGrant { reason } =>
			assert_eq!(reason, "invalid_grant: authorization code expired"),
		other => panic!("Unexpected exchange error: {other:?}."),
	}

	let err = exchanger
		.exchange("garbled-code", &callback_params())
		.await
		.expect_err("A truncated token response should fail.");

	rejected.assert_async().await;
	malformed.assert_async().await;

	assert!(matches!(
		err,
		ExchangeError::Transient(TransientError::TokenResponseParse { status: Some(200), .. })
	));
}

#[tokio::test]
async fn exchange_reports_retry_after_on_unavailable_provider() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(503).header("retry-after", "30");
		})
		.await;
	let err = build_exchanger(&config)
		.exchange("auth-code", &callback_params())
		.await
		.expect_err("An unavailable provider should fail the exchange.");

	mock.assert_async().await;

	match err {
		ExchangeError::Transient(TransientError::TokenEndpoint { status, retry_after, .. }) => {
			assert_eq!(status, Some(503));
			assert_eq!(retry_after, Some(Duration::seconds(30)));
		},
		other => panic!("Unexpected exchange error: {other:?}."),
	}
}

#[tokio::test]
async fn profile_loader_sends_a_bearer_header_by_default() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).header("authorization", "Bearer access-it");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let profile = HttpProfileLoader::from_config(&config, ReqwestHttpClient::default())
		.load(&Secret::new("access-it"))
		.await
		.expect("Profile should load.");

	mock.assert_async().await;

	assert_eq!(profile.id.as_deref(), Some("62515"));
	assert_eq!(profile.time_zone.as_deref(), Some("US/Eastern"));
	assert_eq!(profile.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn profile_loader_can_send_the_token_as_a_query_parameter() {
	let server = MockServer::start_async().await;
	let quirks =
		ProviderQuirks { use_authorization_header_for_get: false, ..ProviderQuirks::default() };
	let config = build_config(&server, ClientAuthMethod::ClientSecretPost, quirks);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(PROFILE_PATH)
				.query_param("access_token", "access-it")
				.header_missing("authorization");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;

	HttpProfileLoader::from_config(&config, ReqwestHttpClient::default())
		.load(&Secret::new("access-it"))
		.await
		.expect("Profile should load with a query token.");

	mock.assert_async().await;
}

#[tokio::test]
async fn profile_loader_maps_status_and_parse_failures() {
	let server = MockServer::start_async().await;
	let config = post_config(&server);
	let loader = HttpProfileLoader::from_config(&config, ReqwestHttpClient::default());
	let mut expired = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).header("authorization", "Bearer expired");
			then.status(401).body("{\"status\":\"error\"}");
		})
		.await;
	let err = loader.load(&Secret::new("expired")).await.expect_err("Expired tokens should fail.");

	assert!(matches!(err, ProfileError::Status { status: 401 }));

	expired.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"portalId":true}"#);
		})
		.await;

	let err =
		loader.load(&Secret::new("fresh")).await.expect_err("Malformed payloads should fail.");

	assert!(matches!(err, ProfileError::Parse { .. }));
}

#[tokio::test]
async fn reqwest_dispatcher_completes_a_callback_end_to_end() {
	let server = MockServer::start_async().await;
	let quirks = ProviderQuirks { skip_user_profile: false, ..ProviderQuirks::default() };
	let config = build_config(&server, ClientAuthMethod::ClientSecretPost, quirks);
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes("code=e2e-code")
				.body_includes("redirect_uri=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).header("authorization", "Bearer access-it");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let verifier = Verifier::plain(|_, _, profile: Profile| async move {
		match profile.id {
			Some(portal) => VerifyResult::verified(format!("portal:{portal}")),
			None => VerifyResult::rejected(),
		}
	});
	let dispatcher = AuthenticationDispatcher::reqwest(config, verifier)
		.expect("Reqwest dispatcher should build.");
	let request = FlowRequest::new("/auth/callback?code=e2e-code")
		.with_host("app.example.com")
		.with_forwarded_proto("https");
	let outcome = dispatcher.dispatch(&request, &FlowOptions::default()).await;

	token.assert_async().await;
	profile.assert_async().await;

	match outcome {
		AuthOutcome::Success(success) => {
			assert_eq!(success.user, "portal:62515");
			assert_eq!(success.access_token.expose(), "access-it");
		},
		other => panic!("Expected a success outcome, got {other:?}."),
	}
}
