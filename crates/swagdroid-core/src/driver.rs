//! Automation driver trait for backend-agnostic UI automation.
//!
//! This module defines the [`AutomationDriver`] trait: the session boundary the
//! action engine, swipe-search and page objects are written against. The
//! production backend is [`AppiumDriver`](crate::appium_driver::AppiumDriver),
//! which speaks W3C WebDriver over HTTP; tests substitute in-memory fakes.
//!
//! The two error conditions the engine must tell apart are
//! [`DriverError::StaleElement`] (the handle no longer maps to a live node,
//! recovered by refresh and retry) and [`DriverError::NoSuchElement`] (the
//! locator matched nothing, treated as "not yet visible" while waiting).

use async_trait::async_trait;
use thiserror::Error;

use crate::element::{ElementHandle, ScreenSize};
use crate::input::InputSequence;
use crate::locator::Locator;

/// Errors that can occur during automation driver operations.
///
/// This enum unifies errors from all backends behind a single type,
/// allowing consumers to handle errors uniformly regardless of the
/// underlying automation backend.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The element handle is no longer attached to the view hierarchy.
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// No element matched the locator.
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// The server-side operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The server rejected the session request.
    #[error("Session not created: {0}")]
    SessionNotCreated(String),

    /// There is no live session (never started, quit, or expired).
    #[error("Not connected to an automation session")]
    NotConnected,

    /// A command failed with a W3C error code and message.
    #[error("Command failed ({code}): {message}")]
    CommandFailed {
        /// The W3C error code, e.g. `"element not interactable"`.
        code: String,
        /// The server-provided message.
        message: String,
    },

    /// The HTTP transport to the automation server failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a response payload.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The backend does not implement this operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl DriverError {
    /// Returns true if the handle went stale (recoverable by re-resolving).
    pub fn is_stale(&self) -> bool {
        matches!(self, DriverError::StaleElement(_))
    }

    /// Returns true if the locator matched no element.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NoSuchElement(_))
    }
}

/// Trait for backend-agnostic Android UI automation.
///
/// Implementors provide element lookup, element commands, gestures and
/// session teardown for a single driver session. All methods are async; a
/// session is used by one scenario at a time, so implementations only need
/// `&self` access that is safe to share behind an `Arc`.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    /// Find the first element matching `locator`.
    ///
    /// Returns [`DriverError::NoSuchElement`] if nothing matches.
    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, DriverError>;

    /// Click (tap) an element.
    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Clear an editable element's contents.
    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Send keystrokes to an element.
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Clear an element and type `text` into it.
    ///
    /// The default implementation calls [`clear`](Self::clear) then
    /// [`send_keys`](Self::send_keys).
    async fn clear_and_type(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.clear(element).await?;
        self.send_keys(element, text).await
    }

    /// Read an element's visible text.
    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Read whether an element is enabled.
    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Read whether an element is displayed.
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Get the current window size.
    async fn window_size(&self) -> Result<ScreenSize, DriverError>;

    /// Perform W3C input action sequences.
    async fn perform_actions(&self, sequences: &[InputSequence]) -> Result<(), DriverError>;

    /// Release all pressed keys and pointers.
    ///
    /// The default implementation does nothing.
    async fn release_actions(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Capture a screenshot of the current screen.
    ///
    /// # Returns
    ///
    /// Raw PNG image bytes.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Err(DriverError::Unsupported("screenshot not supported by this backend".to_string()))
    }

    /// End the session. Further commands fail with [`DriverError::NotConnected`].
    async fn quit(&self) -> Result<(), DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::StaleElement("el-1".to_string());
        assert!(err.to_string().contains("Stale element"));

        let err = DriverError::NoSuchElement("test-LOGIN".to_string());
        assert!(err.to_string().contains("test-LOGIN"));

        let err = DriverError::NotConnected;
        assert!(err.to_string().contains("Not connected"));

        let err = DriverError::CommandFailed {
            code: "element not interactable".to_string(),
            message: "covered by keyboard".to_string(),
        };
        assert!(err.to_string().contains("element not interactable"));
        assert!(err.to_string().contains("covered by keyboard"));
    }

    #[test]
    fn test_error_classification() {
        assert!(DriverError::StaleElement(String::new()).is_stale());
        assert!(!DriverError::StaleElement(String::new()).is_not_found());
        assert!(DriverError::NoSuchElement(String::new()).is_not_found());
        assert!(!DriverError::Timeout(String::new()).is_stale());
        assert!(!DriverError::NotConnected.is_not_found());
    }
}
