//! # swagdroid-core
//!
//! Page-object UI test library for the Swag Labs Android sample app, driven
//! through an Appium server.
//!
//! Scenarios call page objects; page objects call the retrying
//! [`engine::ActionEngine`]; the engine talks to the device through the
//! [`driver::AutomationDriver`] trait, implemented over HTTP by
//! [`appium_driver::AppiumDriver`].
//!
//! ## Modules
//!
//! - [`engine`] - Element actions with wait-for-state and stale-element retry
//! - [`swipe`] - Swipe gestures and swipe-until-visible search
//! - [`gesture`] - Swipe directions and screen-relative geometry
//! - [`locator`] - Named locators with lazy, cached element lookup
//! - [`pages`] - Page objects for the login and products screens
//! - [`scenario`] - End-to-end login scenarios
//! - [`suite`] - Per-scenario sessions, filtering and failure screenshots
//! - [`report`] - Run records and the JSON Lines run log
//! - [`app`] - One app session and its page objects
//! - [`config`] - Credentials from the environment and session settings
//! - [`driver`] - The driver session boundary and its errors
//! - [`appium_driver`] / [`appium_client`] - W3C WebDriver over HTTP
//! - [`protocol`] - WebDriver wire types
//! - [`input`] - W3C input source sequences (touch swipes, key typing)
//! - [`action`] / [`element`] / [`data`] - Shared value types and test data
//!
//! ## Example
//!
//! ```no_run
//! use swagdroid_core::app::App;
//! use swagdroid_core::config::{Credentials, SessionConfig};
//! use swagdroid_core::scenario::Scenario;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_env()?;
//! let app = App::launch(&SessionConfig::load()).await?;
//! let result = Scenario::StandardUserLogin.run(&app, &credentials).await;
//! app.quit().await?;
//! result?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod app;
pub mod appium_client;
pub mod appium_driver;
pub mod config;
pub mod data;
pub mod driver;
pub mod element;
pub mod engine;
pub mod gesture;
pub mod input;
pub mod locator;
pub mod pages;
pub mod protocol;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod swipe;
