//! Entry point to one app session.
//!
//! [`App`] owns the driver of a session and the [`ActionEngine`] shared by
//! every page object it hands out. Pages are built fresh on each call, so
//! their cached handles never outlive the screen they were found on.

use std::sync::Arc;

use crate::appium_driver::AppiumDriver;
use crate::config::SessionConfig;
use crate::driver::{AutomationDriver, DriverError};
use crate::engine::{ActionEngine, EngineSettings};
use crate::pages::{AuthenticationPage, ProductsPage};

pub struct App {
    driver: Arc<dyn AutomationDriver>,
    engine: Arc<ActionEngine>,
}

impl App {
    /// Start an Appium session for the Swag Labs app described by `config`.
    pub async fn launch(config: &SessionConfig) -> Result<Self, DriverError> {
        let driver = AppiumDriver::start(config).await?;
        Ok(Self::with_driver(Arc::new(driver)))
    }

    pub fn with_driver(driver: Arc<dyn AutomationDriver>) -> Self {
        Self::with_settings(driver, EngineSettings::default())
    }

    pub fn with_settings(driver: Arc<dyn AutomationDriver>, settings: EngineSettings) -> Self {
        let engine = Arc::new(ActionEngine::with_settings(driver.clone(), settings));
        Self { driver, engine }
    }

    pub fn engine(&self) -> &Arc<ActionEngine> {
        &self.engine
    }

    pub fn authentication_page(&self) -> AuthenticationPage {
        AuthenticationPage::new(self.engine.clone())
    }

    pub fn products_page(&self) -> ProductsPage {
        ProductsPage::new(self.engine.clone())
    }

    /// Capture the current screen as PNG bytes.
    pub async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.driver.screenshot().await
    }

    /// End the session. Safe to call more than once.
    pub async fn quit(&self) -> Result<(), DriverError> {
        self.driver.quit().await
    }
}
