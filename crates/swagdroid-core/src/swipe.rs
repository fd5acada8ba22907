//! Swipe gestures and swipe-until-visible search.
//!
//! [`ActionEngine::swipe_to_element`] brings an off-screen element into view
//! by swiping in one direction until a direct visibility check passes or the
//! swipe budget ([`MAX_SWIPES_COUNT`](crate::engine::MAX_SWIPES_COUNT)) is
//! spent. Running out of swipes is not an error: the caller's next action on
//! the element fails instead.
//!
//! The visibility check goes straight to the driver and does not refresh
//! stale handles, unlike the engine's retrying actions.

use tracing::{debug, info_span, warn, Instrument};

use crate::engine::{ActionEngine, EngineError};
use crate::gesture::{swipe_points, Direction};
use crate::input::InputSequence;
use crate::locator::LocatorRegistry;

/// Result of one direct visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The element is present and displayed.
    Visible,
    /// The element is absent or reports not displayed.
    NotVisible,
    /// The handle went stale during the check.
    Stale,
}

/// How a swipe-search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// The element was visible after `swipes` gestures.
    Found { swipes: u32 },
    /// The budget ran out after `swipes` gestures.
    Exhausted { swipes: u32 },
}

impl SwipeOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SwipeOutcome::Found { .. })
    }

    /// Number of gestures issued.
    pub fn swipes(&self) -> u32 {
        match self {
            SwipeOutcome::Found { swipes } | SwipeOutcome::Exhausted { swipes } => *swipes,
        }
    }
}

impl ActionEngine {
    /// Perform one swipe in `direction`, measured against the current screen.
    pub async fn swipe(&self, direction: Direction) -> Result<(), EngineError> {
        let size = self.driver.window_size().await?;
        let (start, end) = swipe_points(size, direction);
        debug!(
            %direction,
            start_x = start.x,
            start_y = start.y,
            end_x = end.x,
            end_y = end.y,
            "swipe"
        );
        self.driver
            .perform_actions(&[InputSequence::swipe(start, end, self.settings.swipe_transit)])
            .await?;
        Ok(())
    }

    /// Check whether `name` is visible right now, without waiting.
    ///
    /// "No such element" and stale handles are reported as values; other
    /// driver errors propagate.
    pub async fn check_visibility(
        &self,
        locators: &LocatorRegistry,
        name: &str,
    ) -> Result<Visibility, EngineError> {
        let handle = match locators.resolve(name).await {
            Ok(handle) => handle,
            Err(e) if e.is_not_found() => return Ok(Visibility::NotVisible),
            Err(e) if e.is_stale() => return Ok(Visibility::Stale),
            Err(e) => return Err(e),
        };
        match self.driver.is_displayed(&handle).await {
            Ok(true) => Ok(Visibility::Visible),
            Ok(false) => Ok(Visibility::NotVisible),
            Err(e) if e.is_not_found() => Ok(Visibility::NotVisible),
            Err(e) if e.is_stale() => Ok(Visibility::Stale),
            Err(e) => Err(e.into()),
        }
    }

    /// Swipe in `direction` until `name` is visible, at most
    /// `max_swipes` times.
    pub async fn swipe_to_element(
        &self,
        locators: &LocatorRegistry,
        name: &str,
        direction: Direction,
    ) -> Result<SwipeOutcome, EngineError> {
        let span = info_span!("swipe_to_element", element = name, %direction);
        async {
            let mut swipes = 0;
            while swipes < self.settings.max_swipes {
                match self.check_visibility(locators, name).await? {
                    Visibility::Visible => {
                        debug!(swipes, "element visible");
                        return Ok(SwipeOutcome::Found { swipes });
                    }
                    visibility => debug!(swipes, ?visibility, "element not visible yet"),
                }
                self.swipe(direction).await?;
                swipes += 1;
            }
            warn!(swipes, "swipe budget exhausted before element became visible");
            Ok(SwipeOutcome::Exhausted { swipes })
        }
        .instrument(span)
        .await
    }
}
