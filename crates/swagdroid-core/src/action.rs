//! Element action types for the retrying action engine.
//!
//! Each [`ElementAction`] names one logical UI action and the element state it
//! requires before it runs. The engine executes them through
//! [`ActionEngine::perform`](crate::engine::ActionEngine::perform) and hands
//! back an [`ActionOutput`].
//!
//! # Action Types
//!
//! - **Interaction**: [`ElementAction::Click`], [`ElementAction::Type`], [`ElementAction::TypeViaActions`]
//! - **Queries**: [`ElementAction::ReadText`], [`ElementAction::IsEnabled`], [`ElementAction::IsDisplayed`]

use serde::{Deserialize, Serialize};

use crate::element::ElementState;

/// A single logical action against a named element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementAction {
    /// Click the element once it is clickable.
    Click,

    /// Clear the element and send `text` to it.
    Type {
        /// The text to type.
        text: String,
    },

    /// Wait for the element, then type `text` through W3C key actions.
    TypeViaActions {
        /// The text to type.
        text: String,
    },

    /// Read the element's text.
    ReadText,

    /// Read the element's enabled state.
    IsEnabled,

    /// Read the element's displayed state.
    IsDisplayed,
}

impl ElementAction {
    /// Returns a short, static name for this action suitable for use in
    /// tracing span metadata. Avoids Debug-formatting typed text.
    pub fn name(&self) -> &'static str {
        match self {
            ElementAction::Click => "click",
            ElementAction::Type { .. } => "type",
            ElementAction::TypeViaActions { .. } => "type_via_actions",
            ElementAction::ReadText => "read_text",
            ElementAction::IsEnabled => "is_enabled",
            ElementAction::IsDisplayed => "is_displayed",
        }
    }

    /// The state the element must reach before the action runs.
    pub fn precondition(&self) -> ElementState {
        match self {
            ElementAction::Click => ElementState::Clickable,
            _ => ElementState::Visible,
        }
    }

    /// Whether this action only reads state.
    ///
    /// Queries degrade to a default value when the engine gives up; other
    /// actions surface wait timeouts as errors.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            ElementAction::ReadText | ElementAction::IsEnabled | ElementAction::IsDisplayed
        )
    }
}

/// The value produced by a completed [`ElementAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    /// The action had no return value.
    Done,
    /// Text read from the element.
    Text(String),
    /// A boolean state read from the element.
    Flag(bool),
}

impl ActionOutput {
    pub fn into_text(self) -> Option<String> {
        match self {
            ActionOutput::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_flag(self) -> Option<bool> {
        match self {
            ActionOutput::Flag(flag) => Some(flag),
            _ => None,
        }
    }
}
