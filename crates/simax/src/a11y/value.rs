/*!
Attribute values.

Raw platform values are decoded once at the platform boundary into this enum.
*/

#![allow(missing_docs)]

use crate::types::Frame;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Decoded attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value")]
#[ts(export)]
pub enum Value {
  /// Text content (titles, labels, text field contents)
  String(String),

  /// Numeric value (sliders, steppers). Integers are stored as whole f64 values.
  Number(f64),

  /// Boolean state (enabled, checkboxes)
  Boolean(bool),

  /// Geometry (`AXFrame`)
  Frame(Frame),

  /// Anything else, kept as the platform's own description.
  Opaque(String),
}

impl Value {
  /// Get as string reference if this is a String value.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      Self::Number(_) | Self::Boolean(_) | Self::Frame(_) | Self::Opaque(_) => None,
    }
  }

  /// Get as owned String, converting numbers and bools to their string representation.
  #[allow(clippy::cast_possible_truncation)] // Intentional: formatting display value
  pub fn into_string(self) -> String {
    match self {
      Self::String(s) | Self::Opaque(s) => s,
      Self::Number(n) => {
        // Format integers without decimal point
        if n.fract() == 0.0 {
          format!("{}", n as i64)
        } else {
          n.to_string()
        }
      }
      Self::Boolean(b) => b.to_string(),
      Self::Frame(f) => format!("{{{}, {}, {}, {}}}", f.x, f.y, f.width, f.height),
    }
  }

  /// Get as bool. Numbers are treated as 0 = false (macOS checkboxes).
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Boolean(b) => Some(*b),
      Self::Number(n) => Some(*n != 0.0),
      Self::String(_) | Self::Frame(_) | Self::Opaque(_) => None,
    }
  }

  pub const fn as_frame(&self) -> Option<Frame> {
    match self {
      Self::Frame(f) => Some(*f),
      Self::String(_) | Self::Number(_) | Self::Boolean(_) | Self::Opaque(_) => None,
    }
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Self::String(s)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Self::String(s.to_owned())
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Self::Boolean(b)
  }
}

impl From<Frame> for Value {
  fn from(f: Frame) -> Self {
    Self::Frame(f)
  }
}
