/*!
Wait engine - poll until a predicate holds or a deadline passes.

Each iteration starts from a fresh cache and a freshly resolved window. While
the window looks unchanged (same title, child count, and frame) the interval
grows, so a static screen is polled less often than a busy one.
*/

use super::traversal::Traversal;
use super::Simax;
use crate::a11y::Attribute;
use crate::config::deadline_after;
use crate::platform::Platform;
use crate::types::{ElementSummary, Outcome, SimaxResult};
use std::thread;
use std::time::{Duration, Instant};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);
const SETTLING_CAP: Duration = Duration::from_millis(600);
const STABLE_CAP: Duration = Duration::from_secs(1);

/// Poll interval after `stable` consecutive unchanged iterations.
pub(crate) fn next_poll_interval(base: Duration, stable: u32) -> Duration {
  let base = base.max(MIN_POLL_INTERVAL);
  match stable {
    0 => base,
    1..=2 => base.mul_f64(1.25).min(SETTLING_CAP),
    _ => base.mul_f64(1.8).min(STABLE_CAP),
  }
}

impl<P: Platform> Traversal<'_, P> {
  /// Cheap fingerprint of the window used to detect a static screen.
  pub(crate) fn window_signature(&mut self, window: &P::Handle) -> String {
    let title = self.text(window, Attribute::Title).unwrap_or_default();
    let children = self.children(window).len();
    let frame = self
      .frame(window)
      .map(|f| format!("{}:{}:{}:{}", f.x, f.y, f.width, f.height))
      .unwrap_or_default();
    format!("{title}|{children}|{frame}")
  }
}

impl<P: Platform> Simax<P> {
  /// Re-run `probe` until it yields a value or `timeout` elapses.
  ///
  /// Fatal errors end the wait. A platform read that fails mid-poll comes
  /// back as absent, so that round just misses and the next one retries.
  fn poll_until<T>(
    &mut self,
    timeout: Duration,
    label: &str,
    mut probe: impl FnMut(&mut Traversal<'_, P>, &P::Handle, &P::Handle) -> Option<T>,
  ) -> SimaxResult<Option<T>> {
    self.trust.ensure(&self.platform, self.config.trust_cache_ttl)?;
    let deadline = deadline_after(timeout);
    let mut last_signature: Option<String> = None;
    let mut stable = 0;

    while Instant::now() < deadline {
      let round = self.run(|t, app, window| match probe(t, app, window) {
        Some(found) => Ok(found),
        None => Err(t.window_signature(window)),
      })?;
      match round {
        Ok(found) => return Ok(Some(found)),
        Err(signature) => {
          if last_signature.as_ref() == Some(&signature) {
            stable += 1;
          } else {
            stable = 0;
            last_signature = Some(signature);
          }
        }
      }

      let remaining = deadline.saturating_duration_since(Instant::now());
      if remaining.is_zero() {
        break;
      }
      thread::sleep(next_poll_interval(self.config.poll_interval, stable).min(remaining));
    }
    log::debug!("{label} gave up after {timeout:?}");
    Ok(None)
  }

  /// Wait until `identifier` resolves to an element.
  pub fn wait_for_element(&mut self, identifier: &str, timeout: Duration) -> SimaxResult<Outcome> {
    let found = self.poll_until(timeout, "wait_for_element", |t, app, window| {
      t.find_element(app, window, identifier).map(|e| t.summary(&e))
    })?;
    Ok(match found {
      Some(summary) => Outcome::success(format!("Element found: {identifier}")).with_data(summary),
      None => Outcome::failure(format!(
        "Timeout waiting for element: {identifier} (after {}s)",
        timeout.as_secs_f64()
      )),
    })
  }

  /// Wait until `identifier` no longer resolves.
  pub fn wait_for_element_gone(&mut self, identifier: &str, timeout: Duration) -> SimaxResult<Outcome> {
    let gone = self.poll_until(timeout, "wait_for_element_gone", |t, app, window| {
      t.find_element(app, window, identifier).is_none().then_some(())
    })?;
    Ok(match gone {
      Some(()) => Outcome::success(format!("Element gone: {identifier}")),
      None => Outcome::failure(format!(
        "Timeout waiting for element to disappear: {identifier} (after {}s)",
        timeout.as_secs_f64()
      )),
    })
  }

  /// Wait until some element's value, label, or title matches `text`.
  pub fn wait_for_text(&mut self, text: &str, timeout: Duration) -> SimaxResult<Outcome> {
    let found: Option<ElementSummary> = self.poll_until(timeout, "wait_for_text", |t, app, window| {
      t.find_by_text(app, window, text).map(|e| t.summary(&e))
    })?;
    Ok(match found {
      Some(summary) => Outcome::success(format!("Text found: {text}")).with_data(summary),
      None => Outcome::failure(format!(
        "Timeout waiting for text: {text} (after {}s)",
        timeout.as_secs_f64()
      )),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{engine, MockPlatform};
  use crate::types::{Frame, SimaxError};

  mod backoff {
    use super::*;

    #[test]
    fn grows_while_stable() {
      let base = Duration::from_millis(500);
      assert_eq!(next_poll_interval(base, 0), base);
      assert!(next_poll_interval(base, 2) > next_poll_interval(base, 0));
      assert!(next_poll_interval(base, 5) >= next_poll_interval(base, 2));
    }

    #[test]
    fn caps_apply() {
      let base = Duration::from_millis(500);
      assert_eq!(next_poll_interval(base, 1), Duration::from_millis(600));
      assert_eq!(next_poll_interval(base, 9), Duration::from_millis(900));
      assert_eq!(next_poll_interval(Duration::from_secs(2), 9), STABLE_CAP);
    }

    #[test]
    fn tiny_base_is_raised() {
      assert_eq!(next_poll_interval(Duration::ZERO, 0), MIN_POLL_INTERVAL);
    }
  }

  mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
      #[test]
      fn monotonic_in_stability(base_ms in 50u64..=600, a in 0u32..10, b in 0u32..10) {
        let base = Duration::from_millis(base_ms);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(next_poll_interval(base, lo) <= next_poll_interval(base, hi));
        prop_assert!(next_poll_interval(base, hi) <= STABLE_CAP);
      }
    }
  }

  mod signature {
    use super::*;
    use crate::config::Config;
    use crate::core::cache::ElementCache;

    #[test]
    fn reflects_title_children_and_frame() {
      let mock = MockPlatform::new();
      let config = Config::default();
      let mut cache = ElementCache::new();
      let before = Traversal::new(&mock, &mut cache, &config).window_signature(&mock.window());
      assert_eq!(before, "iPhone 15 - iOS 17|0|0:0:400:800");

      mock.add(mock.window(), "AXButton");
      cache.reset();
      let after = Traversal::new(&mock, &mut cache, &config).window_signature(&mock.window());
      assert_ne!(before, after);
    }
  }

  mod waits {
    use super::*;

    #[test]
    fn element_already_present() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "Continue", Frame::new(0.0, 0.0, 100.0, 40.0));
      let outcome = engine(&mock)
        .wait_for_element("continue", Duration::from_secs(1))
        .unwrap();
      assert_eq!(outcome.message, "Element found: continue");
      let data = outcome.data.unwrap();
      assert_eq!(data["role"], "AXButton");
      assert_eq!(data["label"], "Continue");
    }

    #[test]
    fn timeout_names_query_and_duration() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock)
        .wait_for_element("Ghost", Duration::from_millis(100))
        .unwrap();
      assert!(!outcome.is_success);
      assert_eq!(outcome.message, "Timeout waiting for element: Ghost (after 0.1s)");
    }

    #[test]
    fn unbounded_timeout_returns_on_match() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "Go", Frame::new(0.0, 0.0, 60.0, 30.0));
      let outcome = engine(&mock)
        .wait_for_element("go", Duration::MAX)
        .unwrap();
      assert!(outcome.is_success, "{}", outcome.message);
    }

    #[test]
    fn zero_timeout_never_probes() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock).wait_for_element("x", Duration::ZERO).unwrap();
      assert_eq!(outcome.message, "Timeout waiting for element: x (after 0s)");
    }

    #[test]
    fn element_gone() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock)
        .wait_for_element_gone("Spinner", Duration::from_secs(1))
        .unwrap();
      assert_eq!(outcome.message, "Element gone: Spinner");

      mock.button(mock.window(), "Spinner", Frame::new(0.0, 0.0, 40.0, 40.0));
      let outcome = engine(&mock)
        .wait_for_element_gone("Spinner", Duration::from_millis(60))
        .unwrap();
      assert_eq!(
        outcome.message,
        "Timeout waiting for element to disappear: Spinner (after 0.06s)"
      );
    }

    #[test]
    fn text_found_by_value() {
      let mock = MockPlatform::new();
      let label = mock.add(mock.window(), "AXStaticText");
      mock.set(label, "AXValue", "Welcome back");
      let outcome = engine(&mock)
        .wait_for_text("welcome", Duration::from_secs(1))
        .unwrap();
      assert_eq!(outcome.message, "Text found: welcome");
    }

    #[test]
    fn failed_reads_are_retried() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "Continue", Frame::new(0.0, 0.0, 100.0, 40.0));
      mock.fail_reads(40);
      let outcome = engine(&mock)
        .wait_for_element("continue", Duration::from_secs(3))
        .unwrap();
      assert!(outcome.is_success, "{}", outcome.message);
      assert!(mock.attribute_reads() > 40, "later rounds read again");
    }

    #[test]
    fn missing_window_ends_the_wait() {
      let mock = MockPlatform::new();
      mock.unlink(mock.app(), "AXFocusedWindow");
      mock.unlink(mock.app(), "AXWindows");
      let result = engine(&mock).wait_for_text("hi", Duration::from_millis(60));
      assert!(
        matches!(result, Err(SimaxError::WindowNotFound { .. })),
        "window loss is fatal"
      );
    }

    #[test]
    fn appears_while_waiting() {
      let mock = MockPlatform::new();
      let background = mock.clone();
      let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(80));
        background.button(background.window(), "Ready", Frame::new(0.0, 0.0, 60.0, 30.0));
      });
      let outcome = engine(&mock)
        .wait_for_element("ready", Duration::from_secs(3))
        .unwrap();
      handle.join().unwrap();
      assert!(outcome.is_success, "{}", outcome.message);
    }
  }
}
