//! Retrying element action engine.
//!
//! [`ActionEngine`] performs one logical UI action (click, type, read text,
//! query enabled/displayed) against a named element of a page, surviving
//! handle invalidation. Each attempt waits for the action's precondition with
//! a bounded timeout, then executes it. A stale-element error at any step
//! refreshes the page's locators and retries, up to
//! [`MAX_RETRY_COUNT`] attempts.
//!
//! Wait timeouts are not retried. Interactions surface them as
//! [`EngineError::Timeout`]; queries degrade to a default value, as they do
//! when the retry budget runs out. Use the `query_*` methods to see which of
//! the two happened.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use swagdroid_core::driver::AutomationDriver;
//! use swagdroid_core::engine::ActionEngine;
//! use swagdroid_core::locator::{Locator, LocatorRegistry};
//!
//! # async fn example(driver: Arc<dyn AutomationDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ActionEngine::new(driver.clone());
//! let locators = LocatorRegistry::builder(driver)
//!     .cached("login_button", Locator::accessibility_id("test-LOGIN"))
//!     .build();
//!
//! engine.click(&locators, "login_button").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::action::{ActionOutput, ElementAction};
use crate::driver::{AutomationDriver, DriverError};
use crate::element::{ElementHandle, ElementState};
use crate::input::InputSequence;
use crate::locator::LocatorRegistry;

/// Maximum attempts for one element action.
pub const MAX_RETRY_COUNT: u32 = 3;

/// Maximum gestures issued by one swipe-search.
pub const MAX_SWIPES_COUNT: u32 = 5;

/// Per-attempt bound on waiting for an element's precondition.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between precondition polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Pointer transit time of a swipe.
pub const DEFAULT_SWIPE_TRANSIT: Duration = Duration::from_millis(100);

/// Errors surfaced by the action engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The page declares no locator under this name.
    #[error("Unknown locator '{0}'")]
    UnknownLocator(String),

    /// The element did not reach the required state in time.
    #[error("Timed out after {}ms waiting for '{element}' to be {state}", .timeout.as_millis())]
    Timeout {
        element: String,
        state: ElementState,
        timeout: Duration,
    },

    /// The driver reported an error.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl EngineError {
    pub fn is_stale(&self) -> bool {
        matches!(self, EngineError::Driver(e) if e.is_stale())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Driver(e) if e.is_not_found())
    }
}

/// Timing and budget knobs for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub max_retries: u32,
    pub max_swipes: u32,
    pub swipe_transit: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: MAX_RETRY_COUNT,
            max_swipes: MAX_SWIPES_COUNT,
            swipe_transit: DEFAULT_SWIPE_TRANSIT,
        }
    }
}

/// How a [`perform`](ActionEngine::perform) call ended without a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performed {
    /// The action ran and produced a value.
    Completed(ActionOutput),
    /// Every attempt hit a stale element.
    RetriesExhausted,
}

/// Result of a state query that distinguishes a real answer from giving up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// The element was read.
    Value(T),
    /// Every attempt hit a stale element.
    RetriesExhausted,
    /// The element never became visible within the wait timeout.
    TimedOut,
}

impl<T> QueryOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Value(v) => QueryOutcome::Value(f(v)),
            QueryOutcome::RetriesExhausted => QueryOutcome::RetriesExhausted,
            QueryOutcome::TimedOut => QueryOutcome::TimedOut,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            QueryOutcome::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The value, or `default` if the engine gave up.
    pub fn value_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

/// Executes element actions with wait-for-state and stale-element retry.
///
/// One engine is shared (behind an `Arc`) by all page objects of a session;
/// each page passes its own [`LocatorRegistry`].
pub struct ActionEngine {
    pub(crate) driver: Arc<dyn AutomationDriver>,
    pub(crate) settings: EngineSettings,
}

impl ActionEngine {
    /// Creates an engine with [`EngineSettings::default`].
    pub fn new(driver: Arc<dyn AutomationDriver>) -> Self {
        Self::with_settings(driver, EngineSettings::default())
    }

    pub fn with_settings(driver: Arc<dyn AutomationDriver>, settings: EngineSettings) -> Self {
        Self { driver, settings }
    }

    /// Returns a reference to the underlying driver.
    pub fn driver(&self) -> &Arc<dyn AutomationDriver> {
        &self.driver
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Wait until `name` reaches `state`, polling until the wait timeout.
    ///
    /// "No such element" keeps polling. A stale handle is returned as an
    /// error immediately so the caller can refresh.
    pub async fn wait_for(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        state: ElementState,
    ) -> Result<ElementHandle, EngineError> {
        let start = Instant::now();
        loop {
            match self.probe_state(locators, name, state).await {
                Ok(Some(handle)) => {
                    debug!(element = name, %state, elapsed_ms = start.elapsed().as_millis() as u64, "element ready");
                    return Ok(handle);
                }
                Ok(None) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
            if start.elapsed() >= self.settings.wait_timeout {
                return Err(EngineError::Timeout {
                    element: name.to_string(),
                    state,
                    timeout: self.settings.wait_timeout,
                });
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    async fn probe_state(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        state: ElementState,
    ) -> Result<Option<ElementHandle>, EngineError> {
        let handle = locators.resolve(name).await?;
        if !self.driver.is_displayed(&handle).await? {
            return Ok(None);
        }
        if state == ElementState::Clickable && !self.driver.is_enabled(&handle).await? {
            return Ok(None);
        }
        Ok(Some(handle))
    }

    /// Perform `action` on `name`, retrying on stale elements.
    ///
    /// Returns [`Performed::RetriesExhausted`] instead of an error when every
    /// attempt went stale. Wait timeouts and other driver errors are returned
    /// as errors without retrying.
    pub async fn perform(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        action: &ElementAction,
    ) -> Result<Performed, EngineError> {
        let span = info_span!("element_action", action = action.name(), element = name);
        async {
            let start = Instant::now();
            let mut retry_count = 0;
            while retry_count < self.settings.max_retries {
                match self.attempt(locators, name, action).await {
                    Ok(output) => {
                        debug!(
                            attempts = retry_count + 1,
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "action complete"
                        );
                        return Ok(Performed::Completed(output));
                    }
                    Err(e) if e.is_stale() => {
                        retry_count += 1;
                        locators.refresh_all().await;
                        info!(retry = retry_count, "stale element reference, retrying");
                    }
                    Err(e) => return Err(e),
                }
            }
            warn!(attempts = retry_count, "retries exhausted on stale element");
            Ok(Performed::RetriesExhausted)
        }
        .instrument(span)
        .await
    }

    async fn attempt(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        action: &ElementAction,
    ) -> Result<ActionOutput, EngineError> {
        let handle = self.wait_for(locators, name, action.precondition()).await?;
        let output = match action {
            ElementAction::Click => {
                self.driver.click(&handle).await?;
                ActionOutput::Done
            }
            ElementAction::Type { text } => {
                self.driver.clear_and_type(&handle, text).await?;
                ActionOutput::Done
            }
            ElementAction::TypeViaActions { text } => {
                self.driver
                    .perform_actions(&[InputSequence::type_text(text)])
                    .await?;
                ActionOutput::Done
            }
            ElementAction::ReadText => ActionOutput::Text(self.driver.text(&handle).await?),
            ElementAction::IsEnabled => ActionOutput::Flag(self.driver.is_enabled(&handle).await?),
            ElementAction::IsDisplayed => {
                ActionOutput::Flag(self.driver.is_displayed(&handle).await?)
            }
        };
        Ok(output)
    }

    async fn interact(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        action: ElementAction,
    ) -> Result<(), EngineError> {
        if let Performed::RetriesExhausted = self.perform(locators, name, &action).await? {
            warn!(element = name, action = action.name(), "action skipped after stale retries");
        }
        Ok(())
    }

    async fn query(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        action: ElementAction,
    ) -> Result<QueryOutcome<ActionOutput>, EngineError> {
        match self.perform(locators, name, &action).await {
            Ok(Performed::Completed(output)) => Ok(QueryOutcome::Value(output)),
            Ok(Performed::RetriesExhausted) => Ok(QueryOutcome::RetriesExhausted),
            Err(EngineError::Timeout { .. }) => {
                debug!(element = name, action = action.name(), "query timed out");
                Ok(QueryOutcome::TimedOut)
            }
            Err(e) => Err(e),
        }
    }

    fn degrade<T>(name: &str, outcome: QueryOutcome<T>, default: T) -> T {
        match outcome {
            QueryOutcome::Value(v) => v,
            QueryOutcome::RetriesExhausted | QueryOutcome::TimedOut => {
                warn!(element = name, outcome = outcome_kind(&outcome), "query returned default");
                default
            }
        }
    }

    /// Click `name` once it is clickable.
    pub async fn click(&self, locators: &LocatorRegistry, name: &str) -> Result<(), EngineError> {
        self.interact(locators, name, ElementAction::Click).await
    }

    /// Clear `name` and type `text` into it once it is visible.
    pub async fn type_text(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        text: &str,
    ) -> Result<(), EngineError> {
        self.interact(locators, name, ElementAction::Type { text: text.to_string() })
            .await
    }

    /// Wait for `name` to be visible, then type `text` with key actions.
    pub async fn type_via_actions(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        text: &str,
    ) -> Result<(), EngineError> {
        self.interact(locators, name, ElementAction::TypeViaActions { text: text.to_string() })
            .await
    }

    pub async fn query_text(
        &self,
        locators: &LocatorRegistry,
        name: &str,
    ) -> Result<QueryOutcome<String>, EngineError> {
        Ok(self
            .query(locators, name, ElementAction::ReadText)
            .await?
            .map(|o| o.into_text().unwrap_or_default()))
    }

    pub async fn query_enabled(
        &self,
        locators: &LocatorRegistry,
        name: &str,
    ) -> Result<QueryOutcome<bool>, EngineError> {
        Ok(self
            .query(locators, name, ElementAction::IsEnabled)
            .await?
            .map(|o| o.into_flag().unwrap_or_default()))
    }

    pub async fn query_displayed(
        &self,
        locators: &LocatorRegistry,
        name: &str,
    ) -> Result<QueryOutcome<bool>, EngineError> {
        Ok(self
            .query(locators, name, ElementAction::IsDisplayed)
            .await?
            .map(|o| o.into_flag().unwrap_or_default()))
    }

    /// Read the text of `name`, or an empty string if the engine gives up.
    pub async fn text(&self, locators: &LocatorRegistry, name: &str) -> Result<String, EngineError> {
        let outcome = self.query_text(locators, name).await?;
        Ok(Self::degrade(name, outcome, String::new()))
    }

    /// Whether `name` is enabled; `false` if the engine gives up.
    pub async fn is_enabled(&self, locators: &LocatorRegistry, name: &str) -> Result<bool, EngineError> {
        let outcome = self.query_enabled(locators, name).await?;
        Ok(Self::degrade(name, outcome, false))
    }

    /// Whether `name` is displayed; `false` if the engine gives up.
    ///
    /// A `false` here cannot be told apart from a true negative. Use
    /// [`query_displayed`](Self::query_displayed) when that matters.
    pub async fn is_displayed(&self, locators: &LocatorRegistry, name: &str) -> Result<bool, EngineError> {
        let outcome = self.query_displayed(locators, name).await?;
        Ok(Self::degrade(name, outcome, false))
    }
}

fn outcome_kind<T>(outcome: &QueryOutcome<T>) -> &'static str {
    match outcome {
        QueryOutcome::Value(_) => "value",
        QueryOutcome::RetriesExhausted => "retries_exhausted",
        QueryOutcome::TimedOut => "timed_out",
    }
}
