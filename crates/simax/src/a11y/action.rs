/*!
Accessibility actions and gesture directions.
*/

use crate::types::SimaxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Actions an element may advertise and the engine may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Action {
  /// Activate the element (tap).
  Press,
  /// Confirm a default choice (dialogs).
  Confirm,
  /// Dismiss or cancel.
  Cancel,
  /// Open a contextual menu.
  ShowMenu,
  ScrollUp,
  ScrollDown,
  ScrollLeft,
  ScrollRight,
}

impl Action {
  pub const ALL: &'static [Action] = &[
    Action::Press,
    Action::Confirm,
    Action::Cancel,
    Action::ShowMenu,
    Action::ScrollUp,
    Action::ScrollDown,
    Action::ScrollLeft,
    Action::ScrollRight,
  ];

  /// Scroll action matching a swipe direction.
  pub const fn scroll(direction: Direction) -> Self {
    match direction {
      Direction::Up => Self::ScrollUp,
      Direction::Down => Self::ScrollDown,
      Direction::Left => Self::ScrollLeft,
      Direction::Right => Self::ScrollRight,
    }
  }
}

/// Swipe/scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Up => "up",
      Self::Down => "down",
      Self::Left => "left",
      Self::Right => "right",
    }
  }

  pub const fn opposite(&self) -> Self {
    match self {
      Self::Up => Self::Down,
      Self::Down => Self::Up,
      Self::Left => Self::Right,
      Self::Right => Self::Left,
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Direction {
  type Err = SimaxError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "up" => Ok(Self::Up),
      "down" => Ok(Self::Down),
      "left" => Ok(Self::Left),
      "right" => Ok(Self::Right),
      _ => Err(SimaxError::InvalidArgument(format!(
        "Invalid direction: {s}. Use 'up', 'down', 'left', or 'right'"
      ))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_case_insensitively() {
    assert_eq!("UP".parse::<Direction>().ok(), Some(Direction::Up));
    assert_eq!(" left ".parse::<Direction>().ok(), Some(Direction::Left));
  }

  #[test]
  fn rejects_unknown_direction() {
    let err = "sideways".parse::<Direction>().unwrap_err();
    assert_eq!(
      err.to_string(),
      "Invalid direction: sideways. Use 'up', 'down', 'left', or 'right'"
    );
  }

  #[test]
  fn opposite_is_involution() {
    for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
      assert_eq!(d.opposite().opposite(), d);
      assert_ne!(d.opposite(), d);
    }
  }
}
