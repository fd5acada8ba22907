//! Page objects for the Swag Labs Android app.
//!
//! Each page owns a [`LocatorRegistry`](crate::locator::LocatorRegistry) with
//! its screen's locators and shares the session's
//! [`ActionEngine`](crate::engine::ActionEngine). Pages add no logic of their
//! own beyond composing engine calls.

mod authentication;
mod products;

pub use authentication::{AuthElement, AuthenticationPage, LOCKED_OUT_MESSAGE};
pub use products::ProductsPage;
