//! HubSpot OAuth 2.0 login strategy: authorization redirects, callback dispatch, code exchange,
//! and profile verification in one async crate.
//!
//! The entry point is [`flows::AuthenticationDispatcher`]: hand it an inbound
//! [`flows::FlowRequest`] plus per-call [`flows::FlowOptions`] and it answers with exactly one
//! [`flows::AuthOutcome`]. Network round trips live behind [`oauth::TokenExchanger`] and
//! [`profile::ProfileLoader`], so the dispatcher stays transport agnostic.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod provider;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
