//! Shared element and screen types for driver-based automation.
//!
//! These types cross the [`AutomationDriver`](crate::driver::AutomationDriver)
//! boundary and are independent of any specific backend implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// W3C web element identifier key used in `find element` responses.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy JSON Wire Protocol element key, still returned by some Appium builds.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// An opaque reference to a UI node in the driver session's current view tree.
///
/// Handles are owned by the driver session and go stale when the underlying
/// view hierarchy is rebuilt. Never assume a handle outlives a wait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// The driver-assigned element id.
    pub id: String,
}

impl ElementHandle {
    /// Wraps a driver-assigned element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element({})", self.id)
    }
}

/// The screen (window) dimensions reported by the driver.
///
/// Read fresh for every gesture since orientation can change between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in device pixels.
    pub width: i32,
    /// Height in device pixels.
    pub height: i32,
}

impl ScreenSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// The state an element must reach before an action is performed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    /// Present and displayed.
    Visible,
    /// Present, displayed and enabled.
    Clickable,
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementState::Visible => f.write_str("visible"),
            ElementState::Clickable => f.write_str("clickable"),
        }
    }
}
