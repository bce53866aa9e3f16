/*!
Uniform result value returned by every public operation.

Serializes as `{"success": bool, "message": string, "data": any | null}`.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Success/failure with a human-readable message and optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Outcome {
  /// Whether the operation achieved what was asked.
  #[serde(rename = "success")]
  pub is_success: bool,
  pub message: String,
  /// Operation-specific payload, e.g. an element summary.
  pub data: Option<serde_json::Value>,
}

impl Outcome {
  /// Successful outcome without payload.
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      is_success: true,
      message: message.into(),
      data: None,
    }
  }

  /// Failed outcome without payload.
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      is_success: false,
      message: message.into(),
      data: None,
    }
  }

  /// Attach a serializable payload. Payloads that fail to serialize are
  /// logged and dropped rather than turning a success into a failure.
  #[must_use]
  pub fn with_data(mut self, data: impl Serialize) -> Self {
    match serde_json::to_value(data) {
      Ok(value) => self.data = Some(value),
      Err(e) => log::warn!("Dropping unserializable outcome payload: {e}"),
    }
    self
  }
}
