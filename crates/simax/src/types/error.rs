/*! Error types for simulator operations. */

use crate::a11y::Action;

/// Errors that can occur while driving the simulator.
///
/// Only [`SimaxError::is_fatal`] variants escape public operations; the rest
/// are folded into an [`crate::Outcome`] before returning.
#[derive(Debug, thiserror::Error)]
pub enum SimaxError {
  #[error("Accessibility permission is required. Enable it in System Settings.")]
  PermissionDenied,

  #[error("iOS Simulator app is not running.")]
  SimulatorNotRunning,

  #[error("{}", window_not_found_message(.title.as_deref()))]
  WindowNotFound { title: Option<String> },

  #[error("Action '{action:?}' failed: {reason}")]
  ActionFailed { action: Action, reason: String },

  #[error("Failed to set value: {reason}")]
  SetValueFailed { reason: String },

  #[error("Failed to synthesize keyboard event: {0}")]
  EventSynthesis(String),

  #[error("{0}")]
  InvalidArgument(String),

  #[error("{0}")]
  Recording(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl SimaxError {
  /// Preconditions that make every further step pointless.
  pub const fn is_fatal(&self) -> bool {
    matches!(
      self,
      Self::PermissionDenied | Self::SimulatorNotRunning | Self::WindowNotFound { .. }
    )
  }
}

fn window_not_found_message(title: Option<&str>) -> String {
  match title {
    Some(title) => format!("Simulator window not found for title: {title}"),
    None => "Simulator window not found.".to_owned(),
  }
}

/// Result type for simulator operations.
pub type SimaxResult<T> = Result<T, SimaxError>;
