//! Locators and the per-page locator registry.
//!
//! A [`Locator`] is a strategy plus value. Pages declare their locators under
//! symbolic names in a [`LocatorRegistry`], which resolves them lazily against
//! the driver and caches the resulting [`ElementHandle`]s for locators marked
//! cacheable. [`LocatorRegistry::refresh_all`] drops every cached handle so the
//! next resolve re-binds against the current view tree.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use swagdroid_core::driver::AutomationDriver;
//! use swagdroid_core::locator::{Locator, LocatorRegistry};
//!
//! # async fn example(driver: Arc<dyn AutomationDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! let locators = LocatorRegistry::builder(driver)
//!     .cached("login_button", Locator::accessibility_id("test-LOGIN"))
//!     .build();
//!
//! let handle = locators.resolve("login_button").await?;
//! locators.refresh_all().await;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::driver::{AutomationDriver, DriverError};
use crate::element::ElementHandle;
use crate::engine::EngineError;

/// Element lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Android `content-desc`, exposed by Appium as `accessibility id`.
    #[serde(rename = "accessibility id")]
    AccessibilityId,
    /// Structural XPath expression over the UiAutomator2 page source.
    #[serde(rename = "xpath")]
    XPath,
}

impl Strategy {
    /// The W3C `using` value for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::AccessibilityId => "accessibility id",
            Strategy::XPath => "xpath",
        }
    }
}

/// A strategy + value pair used to find an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    #[serde(rename = "using")]
    pub strategy: Strategy,
    pub value: String,
}

impl Locator {
    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::AccessibilityId,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: value.into(),
        }
    }

    /// XPath for an Android `TextView` with exactly `text`.
    pub fn text_view(text: &str) -> Self {
        Self::xpath(format!("//android.widget.TextView[@text='{}']", text))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.value)
    }
}

/// A declared locator and whether its handle may be cached between uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSpec {
    pub locator: Locator,
    pub cache: bool,
}

/// Builder for a [`LocatorRegistry`].
pub struct LocatorRegistryBuilder {
    driver: Arc<dyn AutomationDriver>,
    specs: HashMap<&'static str, LocatorSpec>,
}

impl LocatorRegistryBuilder {
    /// Declare a locator whose handle is cached until the next refresh.
    pub fn cached(mut self, name: &'static str, locator: Locator) -> Self {
        self.specs.insert(name, LocatorSpec { locator, cache: true });
        self
    }

    /// Declare a locator that is looked up again on every resolve.
    pub fn uncached(mut self, name: &'static str, locator: Locator) -> Self {
        self.specs.insert(name, LocatorSpec { locator, cache: false });
        self
    }

    pub fn build(self) -> LocatorRegistry {
        LocatorRegistry {
            driver: self.driver,
            specs: self.specs,
            cache: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }
}

/// Symbolic-name registry of a page's locators with lazy, refreshable caching.
pub struct LocatorRegistry {
    driver: Arc<dyn AutomationDriver>,
    specs: HashMap<&'static str, LocatorSpec>,
    cache: Mutex<HashMap<&'static str, ElementHandle>>,
    generation: AtomicU64,
}

impl LocatorRegistry {
    pub fn builder(driver: Arc<dyn AutomationDriver>) -> LocatorRegistryBuilder {
        LocatorRegistryBuilder {
            driver,
            specs: HashMap::new(),
        }
    }

    /// The driver this registry resolves against.
    pub fn driver(&self) -> &Arc<dyn AutomationDriver> {
        &self.driver
    }

    /// Looks up the declaration for `name`.
    pub fn spec(&self, name: &str) -> Result<&LocatorSpec, EngineError> {
        self.specs
            .get(name)
            .ok_or_else(|| EngineError::UnknownLocator(name.to_string()))
    }

    /// Resolve `name` to an element handle.
    ///
    /// Cached handles are returned as-is and may be stale. Otherwise the
    /// driver is queried; [`DriverError::NoSuchElement`] is passed through.
    pub async fn resolve(&self, name: &str) -> Result<ElementHandle, EngineError> {
        let (key, spec) = self
            .specs
            .get_key_value(name)
            .ok_or_else(|| EngineError::UnknownLocator(name.to_string()))?;

        if spec.cache {
            if let Some(handle) = self.cache.lock().await.get(key) {
                trace!(element = name, handle = %handle, "cached handle");
                return Ok(handle.clone());
            }
        }

        let handle = self
            .driver
            .find_element(&spec.locator)
            .await
            .map_err(|e| match e {
                DriverError::NoSuchElement(_) => {
                    DriverError::NoSuchElement(format!("{} ({})", name, spec.locator))
                }
                other => other,
            })?;
        debug!(element = name, locator = %spec.locator, handle = %handle, "resolved locator");

        if spec.cache {
            self.cache.lock().await.insert(*key, handle.clone());
        }
        Ok(handle)
    }

    /// Drop every cached handle so the next resolve re-binds.
    pub async fn refresh_all(&self) {
        self.cache.lock().await.clear();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "refreshed locators");
    }

    /// Number of refreshes performed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of handles currently cached.
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_wire_names() {
        assert_eq!(Strategy::AccessibilityId.as_str(), "accessibility id");
        assert_eq!(Strategy::XPath.as_str(), "xpath");
    }

    #[test]
    fn locator_serializes_as_find_element_body() {
        let locator = Locator::accessibility_id("test-Username");
        let json = serde_json::to_value(&locator).unwrap();
        assert_eq!(json, serde_json::json!({ "using": "accessibility id", "value": "test-Username" }));
    }

    #[test]
    fn text_view_builds_xpath() {
        let locator = Locator::text_view("PRODUCTS");
        assert_eq!(locator.strategy, Strategy::XPath);
        assert_eq!(locator.value, "//android.widget.TextView[@text='PRODUCTS']");
        assert_eq!(locator.to_string(), "xpath=//android.widget.TextView[@text='PRODUCTS']");
    }
}
