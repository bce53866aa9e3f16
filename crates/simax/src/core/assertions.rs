/*!
Assertions over element queries.

Each assertion is a success with an "Assertion passed" message or a failure
with an "Assertion failed" message. A query that could not run at all turns
into "Assertion error".
*/

use super::Simax;
use crate::platform::Platform;
use crate::types::{Outcome, SimaxResult};

fn passed(what: &str) -> Outcome {
  Outcome::success(format!("Assertion passed: {what}"))
}

fn failed(what: &str) -> Outcome {
  Outcome::failure(format!("Assertion failed: {what}"))
}

fn error(query: &Outcome) -> Outcome {
  Outcome::failure(format!("Assertion error: {}", query.message))
}

impl<P: Platform> Simax<P> {
  /// Passes when `identifier` resolves.
  pub fn assert_element_exists(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    let found = self.run(|t, app, window| t.find_element(app, window, identifier).is_some())?;
    Ok(if found {
      passed(&format!("Element exists: {identifier}"))
    } else {
      failed(&format!("Element not found: {identifier}"))
    })
  }

  /// Passes when `identifier` does not resolve.
  pub fn assert_element_not_exists(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    let found = self.run(|t, app, window| t.find_element(app, window, identifier).is_some())?;
    Ok(if found {
      failed(&format!("Element exists but should not: {identifier}"))
    } else {
      passed(&format!("Element does not exist: {identifier}"))
    })
  }

  /// Passes when [`is_element_visible`](Self::is_element_visible) reports `true`.
  pub fn assert_element_visible(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    let query = self.is_element_visible(identifier)?;
    Ok(match flag(&query) {
      None => error(&query),
      Some(true) => passed(&format!("Element is visible: {identifier}")),
      Some(false) => failed(&format!("Element not visible: {identifier}")),
    })
  }

  /// Passes when [`is_element_enabled`](Self::is_element_enabled) reports `true`.
  pub fn assert_element_enabled(&mut self, identifier: &str) -> SimaxResult<Outcome> {
    let query = self.is_element_enabled(identifier)?;
    Ok(match flag(&query) {
      None => error(&query),
      Some(true) => passed(&format!("Element is enabled: {identifier}")),
      Some(false) => failed(&format!("Element not enabled: {identifier}")),
    })
  }

  /// Exact, case-sensitive comparison against the element's text.
  pub fn assert_text_equals(&mut self, identifier: &str, expected: &str) -> SimaxResult<Outcome> {
    let query = self.get_element_text(identifier)?;
    let Some(actual) = text(&query) else {
      return Ok(error(&query));
    };
    Ok(if actual == expected {
      passed(&format!("Text equals '{expected}'"))
    } else {
      failed(&format!(
        "Text mismatch for '{identifier}'. Expected: '{expected}', Actual: '{actual}'"
      ))
    })
  }

  /// Case-sensitive substring check against the element's text.
  pub fn assert_text_contains(&mut self, identifier: &str, substring: &str) -> SimaxResult<Outcome> {
    let query = self.get_element_text(identifier)?;
    let Some(actual) = text(&query) else {
      return Ok(error(&query));
    };
    Ok(if actual.contains(substring) {
      passed(&format!("Text contains '{substring}'"))
    } else {
      failed(&format!(
        "Text does not contain '{substring}'. Actual text: '{actual}'"
      ))
    })
  }

  /// Passes when exactly `expected` elements match.
  pub fn assert_element_count(&mut self, identifier: &str, expected: usize) -> SimaxResult<Outcome> {
    let query = self.get_element_count(identifier)?;
    let Some(actual) = query.data.as_ref().and_then(serde_json::Value::as_u64) else {
      return Ok(error(&query));
    };
    Ok(if usize::try_from(actual).is_ok_and(|n| n == expected) {
      passed(&format!("Element count is {expected}"))
    } else {
      failed(&format!(
        "Element count mismatch for '{identifier}'. Expected: {expected}, Actual: {actual}"
      ))
    })
  }
}

/// Boolean payload of a successful query.
fn flag(query: &Outcome) -> Option<bool> {
  if !query.is_success {
    return None;
  }
  query.data.as_ref().and_then(serde_json::Value::as_bool)
}

/// Text payload of a successful query.
fn text(query: &Outcome) -> Option<&str> {
  if !query.is_success {
    return None;
  }
  query.data.as_ref().and_then(serde_json::Value::as_str)
}
