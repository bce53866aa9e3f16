/*!
Read-only queries: the full tree and per-element state.

State queries succeed with a typed payload whenever the element can be
examined; only a missing element (for text and attribute reads) is a failure.
*/

use super::Simax;
use crate::a11y::{Attribute, Value};
use crate::platform::Platform;
use crate::types::{Outcome, SimaxResult, UiElement};

/// JSON form of a raw attribute value. Whole numbers become integers.
#[allow(clippy::cast_possible_truncation)] // guarded by the fract/range check
fn attribute_json(value: Value) -> serde_json::Value {
  match value {
    Value::String(s) | Value::Opaque(s) => serde_json::Value::String(s),
    Value::Boolean(b) => serde_json::Value::Bool(b),
    Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => serde_json::Value::from(n as i64),
    Value::Number(n) => serde_json::Value::from(n),
    Value::Frame(frame) => serde_json::to_value(frame).unwrap_or(serde_json::Value::Null),
  }
}

impl<P: Platform> Simax<P> {
  /// Materialize the accessibility tree of the target window.
  pub fn get_ui_tree(&mut self) -> SimaxResult<UiElement> {
    self.run(|t, app, window| t.build_tree(app, window))
  }

  /// Resolve `identifier` and describe the match.
  pub fn find_element(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| match t.find_element(app, window, identifier) {
      Some(found) => {
        Outcome::success(format!("Element found: {identifier}")).with_data(t.summary(&found))
      }
      None => Outcome::failure(format!("Element not found: {identifier}")),
    })
  }

  /// Whether the element has a positive size at a non-negative origin.
  /// Data: `bool`.
  pub fn is_element_visible(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(found) = t.find_element(app, window, identifier) else {
        return Outcome::success("Element not found").with_data(false);
      };
      let Some(frame) = t.frame(&found) else {
        return Outcome::success("Element has no frame").with_data(false);
      };
      let visible = frame.is_visible();
      Outcome::success(format!("Visibility: {visible}")).with_data(visible)
    })
  }

  /// Whether the element is enabled. Elements without `AXEnabled` count as
  /// enabled. Data: `bool`.
  pub fn is_element_enabled(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(found) = t.find_element(app, window, identifier) else {
        return Outcome::success("Element not found").with_data(false);
      };
      match t.attribute(&found, Attribute::Enabled) {
        None => Outcome::success("Element enabled (no AXEnabled attr)").with_data(true),
        Some(value) => {
          let enabled = match value.as_bool() {
            Some(b) => b,
            None => !value.into_string().is_empty(),
          };
          Outcome::success(format!("Enabled: {enabled}")).with_data(enabled)
        }
      }
    })
  }

  /// Visible text: value, then label, then title. Data: `string`.
  pub fn get_element_text(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(found) = t.find_element(app, window, identifier) else {
        return Outcome::failure(format!("Element not found: {identifier}"));
      };
      let text = t
        .text(&found, Attribute::Value)
        .or_else(|| t.text(&found, Attribute::Label))
        .or_else(|| t.text(&found, Attribute::Title))
        .unwrap_or_default();
      Outcome::success("Text retrieved").with_data(text)
    })
  }

  /// Read any attribute by its platform name (`AXRole`, `AXValue`, ...).
  pub fn get_element_attribute(&mut self, identifier: &str, attribute: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(found) = t.find_element(app, window, identifier) else {
        return Outcome::failure(format!("Element not found: {identifier}"));
      };
      match t.raw_attribute(&found, attribute) {
        Some(value) => {
          Outcome::success(format!("Attribute {attribute} retrieved")).with_data(attribute_json(value))
        }
        None => Outcome::success(format!("Attribute {attribute} not found")),
      }
    })
  }

  /// Number of elements scoring above zero for `identifier`. Data: `number`.
  pub fn get_element_count(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let count = t.count_matching(app, window, identifier);
      Outcome::success(format!("Found {count} matching elements")).with_data(count)
    })
  }
}
