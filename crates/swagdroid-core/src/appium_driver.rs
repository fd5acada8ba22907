//! [`AutomationDriver`] implementation backed by an Appium server session.
//!
//! [`AppiumDriver`] creates a UiAutomator2 session from a [`SessionConfig`]
//! and maps every trait method onto one W3C WebDriver endpoint through
//! [`AppiumClient`].
//!
//! # Example
//!
//! ```no_run
//! use swagdroid_core::appium_driver::AppiumDriver;
//! use swagdroid_core::config::SessionConfig;
//! use swagdroid_core::driver::AutomationDriver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = AppiumDriver::start(&SessionConfig::load()).await?;
//! let size = driver.window_size().await?;
//! println!("{}x{}", size.width, size.height);
//! driver.quit().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::appium_client::AppiumClient;
use crate::config::SessionConfig;
use crate::driver::{AutomationDriver, DriverError};
use crate::element::{ElementHandle, ScreenSize};
use crate::input::InputSequence;
use crate::locator::Locator;
use crate::protocol::{
    ActionsRequest, NewSessionRequest, NewSessionResponse, SendKeysRequest, TimeoutsRequest,
    WindowRect, WireElement,
};

/// An [`AutomationDriver`] bound to one Appium session.
///
/// The session id is cleared by [`quit`](AutomationDriver::quit); later
/// commands fail with [`DriverError::NotConnected`].
pub struct AppiumDriver {
    client: AppiumClient,
    session_id: Mutex<Option<String>>,
}

impl AppiumDriver {
    /// Create a new session on the server named in `config`.
    ///
    /// Applies the configured implicit wait before returning.
    #[instrument(skip_all, fields(server = %config.server_url, device = %config.device_name))]
    pub async fn start(config: &SessionConfig) -> Result<Self, DriverError> {
        let client = AppiumClient::new(&config.server_url, config.http_timeout())?;
        let created: NewSessionResponse = client
            .post("session", &NewSessionRequest::new(config.capabilities()))
            .await?;
        info!(session_id = %created.session_id, "session created");

        let driver = Self::attach(client, created.session_id);
        if config.implicit_wait_ms > 0 {
            driver.set_implicit_wait(config.implicit_wait()).await?;
        }
        Ok(driver)
    }

    /// Wrap an already created session.
    pub fn attach(client: AppiumClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: Mutex::new(Some(session_id.into())),
        }
    }

    /// The live session id, if the session has not been quit.
    pub async fn session_id(&self) -> Option<String> {
        self.session_id.lock().await.clone()
    }

    async fn session_path(&self, suffix: &str) -> Result<String, DriverError> {
        let id = self
            .session_id
            .lock()
            .await
            .clone()
            .ok_or(DriverError::NotConnected)?;
        Ok(format!("session/{}{}", id, suffix))
    }

    async fn element_path(&self, element: &ElementHandle, suffix: &str) -> Result<String, DriverError> {
        self.session_path(&format!("/element/{}{}", element.id, suffix))
            .await
    }

    /// Set the server-side implicit wait for element lookups.
    pub async fn set_implicit_wait(&self, wait: Duration) -> Result<(), DriverError> {
        let path = self.session_path("/timeouts").await?;
        self.client
            .post::<(), _>(&path, &TimeoutsRequest { implicit: wait.as_millis() as u64 })
            .await
    }
}

#[async_trait]
impl AutomationDriver for AppiumDriver {
    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, DriverError> {
        let path = self.session_path("/element").await?;
        let element: WireElement = self.client.post(&path, locator).await?;
        ElementHandle::try_from(element)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let path = self.element_path(element, "/click").await?;
        self.client.post::<(), _>(&path, &json!({})).await
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let path = self.element_path(element, "/clear").await?;
        self.client.post::<(), _>(&path, &json!({})).await
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let path = self.element_path(element, "/value").await?;
        self.client.post::<(), _>(&path, &SendKeysRequest { text }).await
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError> {
        let path = self.element_path(element, "/text").await?;
        self.client.get(&path).await
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let path = self.element_path(element, "/enabled").await?;
        self.client.get(&path).await
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let path = self.element_path(element, "/displayed").await?;
        self.client.get(&path).await
    }

    async fn window_size(&self) -> Result<ScreenSize, DriverError> {
        let path = self.session_path("/window/rect").await?;
        let rect: WindowRect = self.client.get(&path).await?;
        Ok(rect.into())
    }

    async fn perform_actions(&self, sequences: &[InputSequence]) -> Result<(), DriverError> {
        let path = self.session_path("/actions").await?;
        self.client
            .post::<(), _>(&path, &ActionsRequest { actions: sequences })
            .await
    }

    async fn release_actions(&self) -> Result<(), DriverError> {
        let path = self.session_path("/actions").await?;
        self.client.delete::<()>(&path).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let path = self.session_path("/screenshot").await?;
        let encoded: String = self.client.get(&path).await?;
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| DriverError::JsonParse(format!("invalid screenshot data: {}", e)))
    }

    async fn quit(&self) -> Result<(), DriverError> {
        let Some(id) = self.session_id.lock().await.take() else {
            debug!("quit on a closed session");
            return Ok(());
        };
        self.client
            .delete::<Value>(&format!("session/{}", id))
            .await?;
        info!(session_id = %id, "session deleted");
        Ok(())
    }
}
