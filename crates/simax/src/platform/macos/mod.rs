/*!
macOS accessibility backend.

# Module Structure

- `handles.rs` - `AXUIElement` handle: attribute reads/writes, actions, hit-testing
- `process.rs` - trust check, `NSRunningApplication` discovery and activation
- `keyboard.rs` - `CGEvent` key and character synthesis
*/

mod handles;
mod keyboard;
mod process;

pub use handles::ElementHandle;

use crate::a11y::{Action, Value};
use crate::platform::{action_from_platform, KeyStroke, Platform};
use crate::types::{ProcessId, SimaxError, SimaxResult};

#[allow(clippy::cast_possible_wrap)] // macOS PIDs fit in pid_t
pub(super) const fn raw_pid(pid: ProcessId) -> i32 {
  pid.0 as i32
}

/// [`Platform`] backed by the macOS accessibility API.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacPlatform;

impl MacPlatform {
  /// The native backend. Stateless; every call goes straight to the OS.
  pub const fn new() -> Self {
    Self
  }
}

impl Platform for MacPlatform {
  type Handle = ElementHandle;

  fn is_trusted(&self) -> bool {
    process::is_trusted()
  }

  fn find_application(&self, bundle_id: &str) -> Option<ProcessId> {
    process::find_by_bundle_id(bundle_id)
  }

  fn is_running(&self, pid: ProcessId) -> bool {
    process::is_running(pid)
  }

  fn activate_application(&self, pid: ProcessId) {
    process::activate(pid);
  }

  fn application_element(&self, pid: ProcessId) -> ElementHandle {
    ElementHandle::application(raw_pid(pid))
  }

  fn attribute(&self, element: &ElementHandle, name: &str) -> Option<Value> {
    element.attribute(name)
  }

  fn element_attribute(&self, element: &ElementHandle, name: &str) -> Option<ElementHandle> {
    element.element(name)
  }

  fn element_list_attribute(&self, element: &ElementHandle, name: &str) -> Vec<ElementHandle> {
    element.elements(name)
  }

  fn action_names(&self, element: &ElementHandle) -> Vec<String> {
    element.action_names()
  }

  fn perform_action(&self, element: &ElementHandle, action: &str) -> SimaxResult<()> {
    element
      .perform_action(action)
      .map_err(|e| SimaxError::ActionFailed {
        action: action_from_platform(action).unwrap_or(Action::Press),
        reason: format!("{e:?}"),
      })
  }

  fn set_attribute(&self, element: &ElementHandle, name: &str, value: &Value) -> SimaxResult<()> {
    element
      .set_attribute(name, value)
      .map_err(|e| SimaxError::SetValueFailed {
        reason: format!("{name}: {e:?}"),
      })
  }

  fn element_at_position(&self, app: &ElementHandle, x: f64, y: f64) -> Option<ElementHandle> {
    app.element_at_position(x, y)
  }

  fn post_key(&self, target: Option<ProcessId>, key: KeyStroke, key_down: bool) -> SimaxResult<()> {
    keyboard::post_key(target, key, key_down)
  }

  fn type_character(&self, target: Option<ProcessId>, c: char) -> SimaxResult<()> {
    keyboard::type_character(target, c)
  }
}
