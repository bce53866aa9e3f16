/*!
Keyboard event synthesis through `CGEvent`.

Key presses go to a specific process when a PID is known, otherwise to the
HID event tap (whatever has keyboard focus system-wide).
*/

#![allow(unsafe_code)]

use crate::platform::KeyStroke;
use crate::types::{ProcessId, SimaxError, SimaxResult};
use objc2_core_foundation::CFRetained;
use objc2_core_graphics::{
  CGEvent, CGEventFlags, CGEventSource, CGEventSourceStateID, CGEventTapLocation,
};

fn source() -> SimaxResult<CFRetained<CGEventSource>> {
  CGEventSource::new(CGEventSourceStateID::HIDSystemState)
    .ok_or_else(|| SimaxError::EventSynthesis("could not create event source".into()))
}

fn post(event: &CGEvent, target: Option<ProcessId>) {
  match target {
    Some(pid) => CGEvent::post_to_pid(super::raw_pid(pid), Some(event)),
    None => CGEvent::post(CGEventTapLocation::HIDEventTap, Some(event)),
  }
}

/// Post one key-down or key-up event.
pub(super) fn post_key(target: Option<ProcessId>, key: KeyStroke, key_down: bool) -> SimaxResult<()> {
  let source = source()?;
  let event = CGEvent::new_keyboard_event(Some(&source), key.code, key_down)
    .ok_or_else(|| SimaxError::EventSynthesis(format!("key code {}", key.code)))?;
  if key.command {
    CGEvent::set_flags(Some(&event), CGEventFlags::MaskCommand);
  }
  post(&event, target);
  Ok(())
}

/// Type one character by attaching it as the event's Unicode payload.
pub(super) fn type_character(target: Option<ProcessId>, c: char) -> SimaxResult<()> {
  let mut units = [0u16; 2];
  let encoded = c.encode_utf16(&mut units);
  let source = source()?;

  for key_down in [true, false] {
    let event = CGEvent::new_keyboard_event(Some(&source), 0, key_down)
      .ok_or_else(|| SimaxError::EventSynthesis(format!("character {c:?}")))?;
    // SAFETY: `encoded` is a live UTF-16 buffer of exactly `len` units
    unsafe {
      CGEvent::keyboard_set_unicode_string(Some(&event), encoded.len() as _, encoded.as_ptr());
    }
    post(&event, target);
  }
  Ok(())
}
