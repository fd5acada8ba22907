//! W3C input source sequences for the `actions` endpoint.
//!
//! A swipe is a single touch pointer performing move -> down -> move -> up.
//! Typing through key actions is a key source with one down/up pair per
//! character.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gesture::Point;

/// Identifier used for the swipe pointer input source.
pub const TOUCH_POINTER_ID: &str = "finger1";

/// Identifier used for the keyboard input source.
pub const KEYBOARD_ID: &str = "keyboard";

/// Left button / primary touch contact.
const PRIMARY_BUTTON: u8 = 0;

/// One input source and its ordered actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputSequence {
    Pointer {
        id: String,
        parameters: PointerParameters,
        actions: Vec<PointerAction>,
    },
    Key {
        id: String,
        actions: Vec<KeyAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerParameters {
    pub pointer_type: PointerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Viewport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerAction {
    PointerMove {
        duration: u64,
        x: i32,
        y: i32,
        origin: Origin,
    },
    PointerDown {
        button: u8,
    },
    PointerUp {
        button: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyAction {
    KeyDown { value: String },
    KeyUp { value: String },
}

impl InputSequence {
    /// A touch swipe from `start` to `end` with the given transit time.
    pub fn swipe(start: Point, end: Point, transit: Duration) -> Self {
        InputSequence::Pointer {
            id: TOUCH_POINTER_ID.to_string(),
            parameters: PointerParameters {
                pointer_type: PointerKind::Touch,
            },
            actions: vec![
                PointerAction::PointerMove {
                    duration: 0,
                    x: start.x,
                    y: start.y,
                    origin: Origin::Viewport,
                },
                PointerAction::PointerDown { button: PRIMARY_BUTTON },
                PointerAction::PointerMove {
                    duration: transit.as_millis() as u64,
                    x: end.x,
                    y: end.y,
                    origin: Origin::Viewport,
                },
                PointerAction::PointerUp { button: PRIMARY_BUTTON },
            ],
        }
    }

    /// Key presses typing `text` into whatever has focus.
    pub fn type_text(text: &str) -> Self {
        let actions = text
            .chars()
            .flat_map(|c| {
                [
                    KeyAction::KeyDown { value: c.to_string() },
                    KeyAction::KeyUp { value: c.to_string() },
                ]
            })
            .collect();
        InputSequence::Key {
            id: KEYBOARD_ID.to_string(),
            actions,
        }
    }

    /// Returns the first and last pointer positions of a pointer sequence.
    pub fn pointer_path(&self) -> Option<(Point, Point)> {
        let InputSequence::Pointer { actions, .. } = self else {
            return None;
        };
        let mut moves = actions.iter().filter_map(|a| match a {
            PointerAction::PointerMove { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        });
        let first = moves.next()?;
        let last = moves.last().unwrap_or(first);
        Some((first, last))
    }

    /// Reassembles the text typed by a key sequence.
    pub fn typed_text(&self) -> Option<String> {
        let InputSequence::Key { actions, .. } = self else {
            return None;
        };
        Some(
            actions
                .iter()
                .filter_map(|a| match a {
                    KeyAction::KeyDown { value } => Some(value.as_str()),
                    KeyAction::KeyUp { .. } => None,
                })
                .collect(),
        )
    }
}
