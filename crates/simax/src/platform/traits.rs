/*!
Platform abstraction traits.

These traits define the contract between the engine and the OS accessibility
layer. The engine only uses these traits, never platform-specific types, so
every traversal and alert strategy runs unchanged against an in-memory tree.
*/

use std::fmt::Debug;
use std::hash::Hash;

use crate::a11y::Value;
use crate::types::{ProcessId, SimaxResult};

/// Opaque element handle. Clone is cheap; equality is element identity.
pub trait PlatformHandle: Clone + Hash + Eq + Debug + 'static {}

/// A key press, as a virtual key code plus modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
  /// Virtual key code (macOS `kVK_*`).
  pub code: u16,
  /// Hold Command while pressing.
  pub command: bool,
}

impl KeyStroke {
  /// Return.
  pub const RETURN: Self = Self::plain(36);
  /// Tab.
  pub const TAB: Self = Self::plain(48);
  /// Space bar.
  pub const SPACE: Self = Self::plain(49);
  /// Escape.
  pub const ESCAPE: Self = Self::plain(53);
  /// Enter on the numeric keypad.
  pub const KEYPAD_ENTER: Self = Self::plain(76);
  /// Left arrow.
  pub const LEFT_ARROW: Self = Self::plain(123);
  /// Right arrow.
  pub const RIGHT_ARROW: Self = Self::plain(124);
  /// Cmd+. (the classic "cancel" chord).
  pub const COMMAND_PERIOD: Self = Self {
    code: 47,
    command: true,
  };

  /// Key without modifiers.
  pub const fn plain(code: u16) -> Self {
    Self {
      code,
      command: false,
    }
  }
}

/// Operations the engine needs from the OS accessibility layer.
///
/// Every call is a blocking round-trip. Lookups return `None`/empty rather
/// than erroring; only mutating calls report failures.
pub trait Platform {
  /// Element handle type for this platform.
  type Handle: PlatformHandle;

  /// Check if this process is trusted for accessibility.
  fn is_trusted(&self) -> bool;

  /// Find a running application by bundle identifier.
  fn find_application(&self, bundle_id: &str) -> Option<ProcessId>;

  /// Whether a previously found process is still alive.
  fn is_running(&self, pid: ProcessId) -> bool;

  /// Bring an application to the foreground.
  fn activate_application(&self, pid: ProcessId);

  /// Root accessibility element for a process.
  fn application_element(&self, pid: ProcessId) -> Self::Handle;

  /// Read and decode an attribute. `None` when missing or unsupported.
  fn attribute(&self, element: &Self::Handle, name: &str) -> Option<Value>;

  /// Read an element-valued attribute (`AXFocusedWindow`, ...).
  fn element_attribute(&self, element: &Self::Handle, name: &str) -> Option<Self::Handle>;

  /// Read an element-array attribute (`AXChildren`, `AXWindows`).
  fn element_list_attribute(&self, element: &Self::Handle, name: &str) -> Vec<Self::Handle>;

  /// Names of the actions the element advertises.
  fn action_names(&self, element: &Self::Handle) -> Vec<String>;

  /// Invoke a named action.
  fn perform_action(&self, element: &Self::Handle, action: &str) -> SimaxResult<()>;

  /// Write an attribute.
  fn set_attribute(&self, element: &Self::Handle, name: &str, value: &Value) -> SimaxResult<()>;

  /// Hit-test a screen point within an application.
  fn element_at_position(&self, app: &Self::Handle, x: f64, y: f64) -> Option<Self::Handle>;

  /// Post one key event to a process, or system-wide when `target` is `None`.
  fn post_key(&self, target: Option<ProcessId>, key: KeyStroke, key_down: bool) -> SimaxResult<()>;

  /// Type one character into whatever currently has keyboard focus.
  fn type_character(&self, target: Option<ProcessId>, c: char) -> SimaxResult<()>;
}
