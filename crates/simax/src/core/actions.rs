/*!
Element actions: tap, text input, and window targeting.
*/

use super::traversal::Traversal;
use super::Simax;
use crate::a11y::{Action, Attribute, Value};
use crate::platform::{action_to_platform, attribute_to_platform, Platform};
use crate::types::{Outcome, SimaxError, SimaxResult};
use serde_json::json;
use std::thread;

impl<P: Platform> Traversal<'_, P> {
  /// Press to focus, whether or not the element advertises `AXPress`.
  fn focus(&self, element: &P::Handle) {
    let press = action_to_platform(Action::Press);
    if let Err(e) = self.platform().perform_action(element, press) {
      log::debug!("Focus press on {element:?} failed: {e}");
    }
  }

  /// Type `text` one character at a time into the focused element.
  fn type_text(&self, text: &str) -> SimaxResult<()> {
    for c in text.chars() {
      self.platform().type_character(None, c)?;
      thread::sleep(self.config.key_delay);
    }
    Ok(())
  }
}

impl<P: Platform> Simax<P> {
  /// Resolve `identifier` and press it.
  pub fn tap_element(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(target) = t.find_element(app, window, identifier) else {
        return Outcome::failure(format!("Element not found: {identifier}"));
      };
      if t.press(&target) {
        Outcome::success("Tapped element")
      } else {
        Outcome::failure(format!("Press action failed: {identifier}"))
      }
    })
  }

  /// Replace the value of a text element.
  ///
  /// The element is pressed first to give it focus. When the value cannot be
  /// written directly, the text is typed as keyboard events instead.
  pub fn input_text(&mut self, identifier: &str, text: &str) -> SimaxResult<Outcome> {
    self.run(|t, app, window| {
      let Some(target) = t.find_element(app, window, identifier) else {
        return Outcome::failure(format!("Element not found: {identifier}"));
      };
      t.focus(&target);

      let value_name = attribute_to_platform(Attribute::Value);
      match t.platform().set_attribute(&target, value_name, &Value::from(text)) {
        Ok(()) => return Outcome::success("Text input applied via AXValue"),
        Err(e) => log::debug!("AXValue rejected for {identifier}, typing instead: {e}"),
      }
      match t.type_text(text) {
        Ok(()) => Outcome::success("Text input applied via keyboard events"),
        Err(e) => Outcome::failure(e.to_string()),
      }
    })
  }

  /// Restrict later operations to windows whose title contains `title`.
  ///
  /// `None` or a blank title clears the restriction. A title that matches no
  /// window is rejected and the previous target is kept.
  pub fn set_target_window_title(&mut self, title: Option<&str>) -> SimaxResult<Outcome> {
    self.trust.ensure(&self.platform, self.config.trust_cache_ttl)?;
    self.cache.reset();

    let normalized = title.map(str::trim).filter(|t| !t.is_empty());
    let previous = self.locator.target_title().map(str::to_owned);
    self.locator.set_target_title(normalized.map(str::to_owned));

    let Some(title) = normalized else {
      return Ok(Outcome::success("Target window cleared").with_data(json!({ "title_contains": null })));
    };

    match self.locator.window(&self.platform, &self.config) {
      Ok(_) => Ok(Outcome::success("Target window set").with_data(json!({ "title_contains": title }))),
      Err(e) => {
        self.locator.set_target_title(previous);
        if matches!(e, SimaxError::WindowNotFound { .. }) {
          Ok(Outcome::failure(e.to_string()))
        } else {
          Err(e)
        }
      }
    }
  }
}
