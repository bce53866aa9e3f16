/*! Opaque `AXUIElement` handles with safe accessor methods.

All AX FFI for element reads and writes is encapsulated here; the rest of the
crate only sees decoded [`Value`]s and other handles.
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::a11y::Value;
use crate::platform::ax_attribute;
use crate::platform::PlatformHandle;
use crate::types::Frame;
use objc2_application_services::{AXError, AXUIElement, AXValue as AXValueRef, AXValueType};
use objc2_core_foundation::{
  CFArray, CFBoolean, CFHash, CFNumber, CFRetained, CFString, CFType, CGPoint, CGRect, CGSize,
};
use std::ffi::c_void;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

// FFI bindings not exposed by objc2-core-foundation
extern "C" {
  fn CFEqual(cf1: *const c_void, cf2: *const c_void) -> u8;
  fn CFCopyDescription(cf: *const c_void) -> *const CFString;
}

/// Handle to one accessibility element. Clone is cheap (reference counted).
#[derive(Clone)]
pub struct ElementHandle {
  inner: CFRetained<AXUIElement>,
  /// `CFHash`, computed once so map lookups stay local.
  cached_hash: u64,
}

impl ElementHandle {
  pub(super) fn new(element: CFRetained<AXUIElement>) -> Self {
    let cached_hash = CFHash(Some(&*element)) as u64;
    Self {
      inner: element,
      cached_hash,
    }
  }

  /// Root element of a process.
  pub(super) fn application(pid: i32) -> Self {
    Self::new(unsafe { AXUIElement::new_application(pid) })
  }

  /// Compare with another handle using `CFEqual` (local, no IPC).
  fn cf_equal(&self, other: &Self) -> bool {
    // as_ptr() yields the CF object itself, not the wrapper.
    let self_ptr = CFRetained::as_ptr(&self.inner).as_ptr().cast::<c_void>();
    let other_ptr = CFRetained::as_ptr(&other.inner).as_ptr().cast::<c_void>();
    unsafe { CFEqual(self_ptr, other_ptr) != 0 }
  }

  /// Read and decode an attribute.
  pub(super) fn attribute(&self, name: &str) -> Option<Value> {
    if name == ax_attribute::FRAME {
      return self.frame().map(Value::Frame);
    }
    let raw = self.raw_attribute(&CFString::from_str(name))?;
    Some(decode(&raw))
  }

  /// `AXFrame`, falling back to `AXPosition` + `AXSize`.
  pub(super) fn frame(&self) -> Option<Frame> {
    if let Some(rect) = self
      .raw_attribute(&CFString::from_static_str(ax_attribute::FRAME))
      .as_deref()
      .and_then(rect_of)
    {
      return Some(rect);
    }
    let pos = self.raw_attribute(&CFString::from_static_str("AXPosition"))?;
    let size = self.raw_attribute(&CFString::from_static_str("AXSize"))?;
    parse_bounds(&pos, &size)
  }

  /// Element-valued attribute (`AXFocusedWindow`, `AXMainWindow`, ...).
  pub(super) fn element(&self, name: &str) -> Option<Self> {
    let value = self.raw_attribute(&CFString::from_str(name))?;
    let element = value.downcast::<AXUIElement>().ok()?;
    Some(Self::new(element))
  }

  /// Element-array attribute (`AXChildren`, `AXWindows`).
  pub(super) fn elements(&self, name: &str) -> Vec<Self> {
    let Some(value) = self.raw_attribute(&CFString::from_str(name)) else {
      return Vec::new();
    };
    let Ok(array) = value.downcast::<CFArray>() else {
      return Vec::new();
    };
    // SAFETY: element-array attributes only ever hold AXUIElements
    let typed: CFRetained<CFArray<AXUIElement>> = unsafe { CFRetained::cast_unchecked(array) };
    (0..typed.len())
      .filter_map(|i| typed.get(i))
      .map(Self::new)
      .collect()
  }

  /// Names of the actions this element advertises.
  pub(super) fn action_names(&self) -> Vec<String> {
    unsafe {
      let mut actions_ref: *const CFArray<CFString> = std::ptr::null();
      let Some(out) = NonNull::new((&raw mut actions_ref).cast::<*const CFArray>()) else {
        return Vec::new();
      };
      let result = self.inner.copy_action_names(out);
      if result != AXError::Success || actions_ref.is_null() {
        return Vec::new();
      }
      let actions =
        CFRetained::<CFArray<CFString>>::from_raw(NonNull::new_unchecked(actions_ref.cast_mut()));
      (0..actions.len())
        .filter_map(|i| actions.get(i))
        .map(|s| s.to_string())
        .collect()
    }
  }

  pub(super) fn perform_action(&self, action: &str) -> Result<(), AXError> {
    let action_name = CFString::from_str(action);
    let result = unsafe { self.inner.perform_action(&action_name) };
    if result == AXError::Success {
      Ok(())
    } else {
      Err(result)
    }
  }

  /// Write an attribute. Frames and opaque values cannot be written.
  pub(super) fn set_attribute(&self, name: &str, value: &Value) -> Result<(), AXError> {
    let attr = CFString::from_str(name);
    let result = unsafe {
      match value {
        Value::String(s) => self.inner.set_attribute_value(&attr, &CFString::from_str(s)),
        // Checkbox-like controls take CFNumber 0/1, not CFBoolean
        Value::Boolean(b) => self
          .inner
          .set_attribute_value(&attr, &CFNumber::new_i32(i32::from(*b))),
        Value::Number(n) => self.inner.set_attribute_value(&attr, &CFNumber::new_f64(*n)),
        Value::Frame(_) | Value::Opaque(_) => AXError::IllegalArgument,
      }
    };
    if result == AXError::Success {
      Ok(())
    } else {
      Err(result)
    }
  }

  /// Hit-test a screen point (application elements only).
  pub(super) fn element_at_position(&self, x: f64, y: f64) -> Option<Self> {
    unsafe {
      let mut element_ptr: *const AXUIElement = std::ptr::null();
      let result =
        self
          .inner
          .copy_element_at_position(x as f32, y as f32, NonNull::new(&raw mut element_ptr)?);
      if result != AXError::Success || element_ptr.is_null() {
        return None;
      }
      let element = CFRetained::from_raw(NonNull::new_unchecked(element_ptr.cast_mut()));
      Some(Self::new(element))
    }
  }

  fn raw_attribute(&self, attr: &CFString) -> Option<CFRetained<CFType>> {
    unsafe {
      let mut value: *const CFType = std::ptr::null();
      let result = self
        .inner
        .copy_attribute_value(attr, NonNull::new(&raw mut value)?);
      if result != AXError::Success || value.is_null() {
        return None;
      }
      Some(CFRetained::from_raw(NonNull::new_unchecked(value.cast_mut())))
    }
  }
}

/// Decode a CF value into the engine's closed value set.
fn decode(value: &CFType) -> Value {
  if let Some(s) = value.downcast_ref::<CFString>() {
    return Value::String(s.to_string());
  }
  if let Some(b) = value.downcast_ref::<CFBoolean>() {
    return Value::Boolean(b.as_bool());
  }
  if let Some(n) = value.downcast_ref::<CFNumber>().and_then(CFNumber::as_f64) {
    return Value::Number(n);
  }
  if let Some(rect) = rect_of(value) {
    return Value::Frame(rect);
  }
  Value::Opaque(describe(value))
}

fn describe(value: &CFType) -> String {
  let ptr = (value as *const CFType).cast::<c_void>();
  let description = unsafe { CFCopyDescription(ptr) };
  match NonNull::new(description.cast_mut()) {
    Some(description) => unsafe { CFRetained::from_raw(description) }.to_string(),
    None => String::new(),
  }
}

/// `AXValue` holding a `CGRect`.
fn rect_of(value: &CFType) -> Option<Frame> {
  let ax_value = value.downcast_ref::<AXValueRef>()?;
  unsafe {
    if ax_value.r#type() != AXValueType::CGRect {
      return None;
    }
    let mut rect = CGRect {
      origin: CGPoint { x: 0.0, y: 0.0 },
      size: CGSize {
        width: 0.0,
        height: 0.0,
      },
    };
    if !ax_value.value(
      AXValueType::CGRect,
      NonNull::new((&raw mut rect).cast::<c_void>())?,
    ) {
      return None;
    }
    Some(Frame::new(
      rect.origin.x,
      rect.origin.y,
      rect.size.width,
      rect.size.height,
    ))
  }
}

fn parse_bounds(position: &CFType, size: &CFType) -> Option<Frame> {
  let pos = position.downcast_ref::<AXValueRef>()?;
  let sz = size.downcast_ref::<AXValueRef>()?;

  unsafe {
    if pos.r#type() != AXValueType::CGPoint || sz.r#type() != AXValueType::CGSize {
      return None;
    }
    let mut point = CGPoint { x: 0.0, y: 0.0 };
    let mut size_val = CGSize {
      width: 0.0,
      height: 0.0,
    };

    if !pos.value(
      AXValueType::CGPoint,
      NonNull::new((&raw mut point).cast::<c_void>())?,
    ) {
      return None;
    }
    if !sz.value(
      AXValueType::CGSize,
      NonNull::new((&raw mut size_val).cast::<c_void>())?,
    ) {
      return None;
    }

    Some(Frame::new(point.x, point.y, size_val.width, size_val.height))
  }
}

impl Hash for ElementHandle {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.cached_hash.hash(state);
  }
}

impl PartialEq for ElementHandle {
  fn eq(&self, other: &Self) -> bool {
    if self.cached_hash != other.cached_hash {
      return false;
    }
    let result = self.cf_equal(other);
    if result {
      log::trace!("ElementHandle::eq: hash={:#x} matched, CFEqual=true", self.cached_hash);
    } else {
      log::debug!(
        "ElementHandle::eq: hash={:#x} collision, CFEqual=false",
        self.cached_hash
      );
    }
    result
  }
}

impl Eq for ElementHandle {}

impl std::fmt::Debug for ElementHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "ElementHandle({:#x})", self.cached_hash)
  }
}

impl PlatformHandle for ElementHandle {}
