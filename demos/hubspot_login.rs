//! Loads HubSpot settings, builds the reqwest-backed dispatcher, and prints the authorization
//! redirect a login route would send.

// crates.io
use color_eyre::Result;
// self
use oauth2_hubspot::{
	auth::PortalId,
	flows::{
		AuthOutcome, AuthenticationDispatcher, FlowOptions, FlowRequest, Verifier, VerifyResult,
	},
	oauth2::http::Request,
	provider::ProviderSettings,
};

const SETTINGS: &str = r#"{
	"clientId": "HUBSPOT_APP_ID",
	"clientSecret": "SECRET_SAUCE",
	"callbackUrl": "/auth/hubspot/callback",
	"scope": ["oauth", "crm.objects.contacts.read"]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let settings: ProviderSettings = serde_json::from_str(SETTINGS)?;
	let verifier = Verifier::plain(|_, _, profile: oauth2_hubspot::profile::Profile| async move {
		VerifyResult::verified(profile.id.unwrap_or_else(|| "unknown-portal".into()))
	});
	let dispatcher = AuthenticationDispatcher::reqwest(settings.into_config()?, verifier)?;
	let inbound = Request::get("/auth/hubspot")
		.header("host", "www.example.net")
		.header("x-forwarded-proto", "https")
		.body(())?;
	let request = FlowRequest::from_http_request(&inbound, false);
	let options =
		FlowOptions::default().with_portal_id(PortalId::new("62515")?).with_random_state();

	match dispatcher.dispatch(&request, &options).await {
		AuthOutcome::Redirect { location } => {
			println!("Send your user to {location}.");
			let state = options.state.unwrap_or_default();

			println!("Persist state `{state}` to compare on the callback.");
		},
		AuthOutcome::Success(success) => println!("Signed in as {}.", success.user),
		AuthOutcome::Fail { info } => eprintln!("Login refused: {info:?}."),
		AuthOutcome::Error { cause } => return Err(cause.into()),
	}

	Ok(())
}
