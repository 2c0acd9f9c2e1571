//! Token secrets and the grants returned by a code exchange.

pub mod grant;
pub mod secret;
