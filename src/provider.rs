//! Provider-facing configuration (data) and strategies (behavior).
//!
//! `config` exposes the validated, immutable [`ProviderConfig`] covering HubSpot's endpoints,
//! client credentials, scope defaults, and the quirk toggles that older integrations flipped on
//! a shared client object. `strategy` defines [`ProviderStrategy`], the composition hook that
//! contributes provider-specific authorization/token parameters and classifies token errors.

pub mod config;
pub mod strategy;

pub use config::*;
pub use strategy::*;
