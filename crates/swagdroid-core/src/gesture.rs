//! Swipe gesture geometry.
//!
//! Pure computation of swipe start/end coordinates from a [`ScreenSize`] and a
//! [`Direction`]. Every swipe starts at the screen center. The end point for
//! [`Direction::Up`] and [`Direction::Right`] lies beyond the visible area;
//! the driver clamps it, this module does not.
//!
//! # Example
//!
//! ```
//! use swagdroid_core::element::ScreenSize;
//! use swagdroid_core::gesture::{swipe_points, Direction, Point};
//!
//! let (start, end) = swipe_points(ScreenSize::new(1080, 2280), Direction::Down);
//! assert_eq!(start, Point::new(540, 1140));
//! assert_eq!(end, Point::new(540, 570));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::ScreenSize;

/// Fraction of the screen used for the near end point (down/left).
const NEAR_FRACTION: f64 = 0.25;

/// Fraction of the screen used for the far end point (up/right).
const FAR_FRACTION: f64 = 1.25;

/// Swipe direction, named after the way the content is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!(
                "Invalid swipe direction '{}'. Use: up, down, left, right",
                other
            )),
        }
    }
}

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

fn scaled(extent: i32, fraction: f64) -> i32 {
    (extent as f64 * fraction) as i32
}

/// Computes the `(start, end)` points of a swipe in `direction`.
///
/// Start is `(W/2, H/2)` with integer division. Only the axis of movement
/// changes for the end point; fractional results are truncated.
pub fn swipe_points(size: ScreenSize, direction: Direction) -> (Point, Point) {
    let start = Point::new(size.width / 2, size.height / 2);
    let end = match direction {
        Direction::Down => Point::new(start.x, scaled(size.height, NEAR_FRACTION)),
        Direction::Up => Point::new(start.x, scaled(size.height, FAR_FRACTION)),
        Direction::Left => Point::new(scaled(size.width, NEAR_FRACTION), start.y),
        Direction::Right => Point::new(scaled(size.width, FAR_FRACTION), start.y),
    };
    (start, end)
}
