/*!
Gestures: coordinate taps, long presses, swipes, scroll-to, and retries.

There is no synthetic touch input. Every gesture resolves to an accessibility
action (`AXPress`, `AXScroll*`) on the smallest element that advertises it.
*/

use super::resolver::{Visit, WalkLimits};
use super::traversal::Traversal;
use super::Simax;
use crate::a11y::{Action, Direction};
use crate::platform::Platform;
use crate::types::{Outcome, Point, SimaxResult};
use std::thread;
use std::time::Duration;

impl<P: Platform> Traversal<'_, P> {
  /// Element at `point` that advertises `action`.
  ///
  /// A direct hit-test wins if the hit element supports the action;
  /// otherwise the smallest framed element containing the point does.
  pub(crate) fn actionable_at(
    &mut self,
    app: &P::Handle,
    root: &P::Handle,
    point: Point,
    action: Action,
  ) -> Option<P::Handle> {
    if let Some(hit) = self.platform().element_at_position(app, point.x, point.y) {
      if self.has_action(&hit, action) {
        return Some(hit);
      }
    }

    let limits = WalkLimits {
      max_depth: self.config.max_depth,
      grid_scan: false,
    };
    let mut best: Option<(f64, P::Handle)> = None;
    self.walk::<()>(app, root, limits, |t, node| {
      let Some(frame) = t.frame(node) else {
        return Visit::Descend;
      };
      if !frame.contains(point) {
        return Visit::Prune;
      }
      if t.has_action(node, action) {
        let smaller = match &best {
          Some((area, _)) => frame.area() < *area,
          None => true,
        };
        if smaller {
          best = Some((frame.area(), node.clone()));
        }
      }
      Visit::Descend
    });
    best.map(|(_, element)| element)
  }

  /// Fire the scroll action for `direction` on the best target.
  ///
  /// Probes the start point (default: window centre), then the centre line at
  /// 40% and 60% height, then the window, then the application.
  pub(crate) fn swipe_in(
    &mut self,
    app: &P::Handle,
    window: &P::Handle,
    direction: Direction,
    start: Option<Point>,
  ) -> Outcome {
    let Some(frame) = self.frame(window) else {
      return Outcome::failure("Could not get simulator window frame");
    };
    let action = Action::scroll(direction);
    let center = frame.center();
    let probes = [
      start.unwrap_or(center),
      frame.point_at(0.5, 0.4),
      frame.point_at(0.5, 0.6),
    ];

    for probe in probes {
      if let Some(target) = self.actionable_at(app, window, probe, action) {
        if self.perform(&target, action) {
          return Outcome::success(format!("Swiped {direction} via AX scroll action"));
        }
      }
    }
    if self.perform(window, action) || self.perform(app, action) {
      return Outcome::success(format!("Swiped {direction} via AX scroll action"));
    }

    if self.config.strict_actions {
      Outcome::failure("No AX scroll actions available for swipe.")
    } else {
      Outcome::success("Swipe skipped: no AX scroll actions available.")
    }
  }
}

/// Wording for a retried operation's messages.
struct RetryLabels {
  done: &'static str,
  verb: &'static str,
}

impl<P: Platform> Simax<P> {
  /// Press the smallest pressable element at `(x, y)`.
  pub fn tap_coordinates(&mut self, x: f64, y: f64) -> SimaxResult<Outcome> {
    let strict = self.config.strict_actions;
    self.run(|t, app, window| {
      let Some(target) = t.actionable_at(app, window, Point::new(x, y), Action::Press) else {
        return if strict {
          Outcome::failure(format!("No pressable element found at coordinates ({x}, {y})."))
        } else {
          Outcome::success("Tap skipped: no element found at coordinates.")
        };
      };
      if t.press(&target) {
        Outcome::success("Tapped coordinates via AXPress")
      } else if strict {
        Outcome::failure(format!("AXPress not supported for element at coordinates ({x}, {y})."))
      } else {
        Outcome::success("Tap skipped: AXPress not supported for element at coordinates.")
      }
    })
  }

  /// Press an element, then hold for `duration`.
  pub fn long_press(&mut self, identifier: &str, duration: Duration) -> SimaxResult<Outcome> {
    let strict = self.config.strict_actions;
    let outcome = self.run(|t, app, window| {
      let Some(target) = t.find_element(app, window, identifier) else {
        return Err(if strict {
          Outcome::failure(format!("Element not found for long press: {identifier}"))
        } else {
          Outcome::success(format!("Long press skipped: element not found: {identifier}"))
        });
      };
      if t.press(&target) {
        Ok(())
      } else if strict {
        Err(Outcome::failure(format!("AXPress not supported for long press: {identifier}")))
      } else {
        Err(Outcome::success(format!(
          "Long press skipped: AXPress not supported: {identifier}"
        )))
      }
    })?;

    Ok(match outcome {
      Ok(()) => {
        thread::sleep(duration);
        Outcome::success(format!("Long press simulated via AXPress: {identifier}"))
      }
      Err(skipped) => skipped,
    })
  }

  /// Press the element at `(x, y)`, then hold for `duration`.
  pub fn long_press_coordinates(&mut self, x: f64, y: f64, duration: Duration) -> SimaxResult<Outcome> {
    let strict = self.config.strict_actions;
    let outcome = self.run(|t, app, window| {
      let Some(target) = t.actionable_at(app, window, Point::new(x, y), Action::Press) else {
        return Err(if strict {
          Outcome::failure(format!("No element found for long press at ({x}, {y})."))
        } else {
          Outcome::success("Long press skipped: no element at coordinates.")
        });
      };
      if t.press(&target) {
        Ok(())
      } else if strict {
        Err(Outcome::failure(format!("AXPress not supported for long press at ({x}, {y}).")))
      } else {
        Err(Outcome::success("Long press skipped: AXPress not supported at coordinates."))
      }
    })?;

    Ok(match outcome {
      Ok(()) => {
        thread::sleep(duration);
        Outcome::success(format!("Long press simulated via AXPress at ({x}, {y})"))
      }
      Err(skipped) => skipped,
    })
  }

  /// Scroll in `direction` from `start` (default: window centre).
  pub fn swipe(&mut self, direction: Direction, start: Option<Point>) -> SimaxResult<Outcome> {
    self.run(|t, app, window| t.swipe_in(app, window, direction, start))
  }

  /// Scroll until `identifier` resolves, at most `max_scrolls` times.
  ///
  /// Scrolling "down" through content swipes up, and vice versa.
  pub fn scroll_to_element(
    &mut self,
    identifier: &str,
    max_scrolls: u32,
    direction: Direction,
  ) -> SimaxResult<Outcome> {
    if matches!(direction, Direction::Left | Direction::Right) {
      return Ok(Outcome::failure("direction must be 'down' or 'up'"));
    }
    let swipe_direction = direction.opposite();

    for i in 0..max_scrolls {
      let round = self.run(|t, app, window| match t.find_element(app, window, identifier) {
        Some(found) => Ok(t.summary(&found)),
        None => Err(t.swipe_in(app, window, swipe_direction, None)),
      })?;
      match round {
        Ok(summary) => {
          return Ok(Outcome::success(format!("Element found after {i} scrolls")).with_data(summary));
        }
        Err(swipe) if !swipe.is_success => {
          return Ok(Outcome::failure(format!("Scroll failed: {}", swipe.message)));
        }
        Err(_) => thread::sleep(self.config.scroll_settle),
      }
    }
    Ok(Outcome::failure(format!(
      "Element not found after {max_scrolls} scrolls: {identifier}"
    )))
  }

  /// [`tap_element`](Self::tap_element), retried up to `retries` extra times.
  pub fn tap_element_with_retry(
    &mut self,
    identifier: &str,
    retries: u32,
    interval: Duration,
  ) -> SimaxResult<Outcome> {
    let labels = RetryLabels {
      done: "Tapped element",
      verb: "tap element",
    };
    self.retry(&labels, retries, interval, |simax| simax.tap_element(identifier))
  }

  /// [`input_text`](Self::input_text), retried up to `retries` extra times.
  pub fn input_text_with_retry(
    &mut self,
    identifier: &str,
    text: &str,
    retries: u32,
    interval: Duration,
  ) -> SimaxResult<Outcome> {
    let labels = RetryLabels {
      done: "Input text",
      verb: "input text",
    };
    self.retry(&labels, retries, interval, |simax| simax.input_text(identifier, text))
  }

  fn retry(
    &mut self,
    labels: &RetryLabels,
    retries: u32,
    interval: Duration,
    mut op: impl FnMut(&mut Self) -> SimaxResult<Outcome>,
  ) -> SimaxResult<Outcome> {
    let mut last_error = String::new();
    for attempt in 0..=retries {
      let outcome = op(self)?;
      if outcome.is_success {
        if attempt == 0 {
          return Ok(outcome);
        }
        return Ok(Outcome::success(format!("{} after {attempt} retries", labels.done)));
      }
      last_error = outcome.message;
      if attempt < retries {
        log::debug!(
          "{} failed (attempt {}/{}): {last_error}",
          labels.verb,
          attempt + 1,
          retries + 1
        );
        thread::sleep(interval);
      }
    }
    Ok(Outcome::failure(format!(
      "Failed to {} after {} attempts: {last_error}",
      labels.verb,
      retries + 1
    )))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::testing::{engine, fast_config, MockPlatform};
  use crate::types::{Frame, SimaxError};
  use crate::SimaxBuilder;

  fn strict(mock: &MockPlatform) -> Simax<MockPlatform> {
    SimaxBuilder::new()
      .config(Config {
        strict_actions: true,
        ..fast_config()
      })
      .build_with(mock.clone())
  }

  mod tap_coordinates {
    use super::*;

    #[test]
    fn presses_smallest_enclosing_element() {
      let mock = MockPlatform::new();
      let card = mock.add(mock.window(), "AXGroup");
      mock.set_frame(card, Frame::new(0.0, 0.0, 400.0, 400.0));
      mock.set_actions(card, &["AXPress"]);
      let inner = mock.add(card, "AXButton");
      mock.set_frame(inner, Frame::new(100.0, 100.0, 60.0, 30.0));
      mock.set_actions(inner, &["AXPress"]);

      let outcome = engine(&mock).tap_coordinates(120.0, 110.0).unwrap();
      assert_eq!(outcome.message, "Tapped coordinates via AXPress");
      assert_eq!(mock.pressed(), vec![inner], "walk found the inner button");
    }

    #[test]
    fn direct_hit_is_preferred() {
      let mock = MockPlatform::new();
      let button = mock.button(mock.window(), "Go", Frame::new(10.0, 10.0, 50.0, 20.0));
      engine(&mock).tap_coordinates(20.0, 20.0).unwrap();
      assert_eq!(mock.pressed(), vec![button]);
    }

    #[test]
    fn strict_mode_toggles_soft_skip() {
      let mock = MockPlatform::new();

      let soft = engine(&mock).tap_coordinates(5.0, 5.0).unwrap();
      assert!(soft.is_success, "soft-skip is a success");
      assert_eq!(soft.message, "Tap skipped: no element found at coordinates.");

      let hard = strict(&mock).tap_coordinates(5.0, 5.0).unwrap();
      assert!(!hard.is_success);
      assert_eq!(hard.message, "No pressable element found at coordinates (5, 5).");
    }

    #[test]
    fn failing_press_is_reported_by_mode() {
      let mock = MockPlatform::new();
      let button = mock.button(mock.window(), "Go", Frame::new(10.0, 10.0, 50.0, 20.0));
      mock.fail_action(button, "AXPress");

      let soft = engine(&mock).tap_coordinates(20.0, 20.0).unwrap();
      assert_eq!(
        soft.message,
        "Tap skipped: AXPress not supported for element at coordinates."
      );
      let hard = strict(&mock).tap_coordinates(20.0, 20.0).unwrap();
      assert!(!hard.is_success);
    }

    #[test]
    fn permission_denied_is_an_error() {
      let mock = MockPlatform::new();
      mock.set_trusted(false);
      assert!(matches!(
        engine(&mock).tap_coordinates(1.0, 1.0),
        Err(SimaxError::PermissionDenied)
      ));
    }
  }

  mod long_press {
    use super::*;

    #[test]
    fn presses_and_holds() {
      let mock = MockPlatform::new();
      let button = mock.button(mock.window(), "Photo", Frame::new(0.0, 0.0, 80.0, 80.0));
      let outcome = engine(&mock).long_press("photo", Duration::ZERO).unwrap();
      assert_eq!(outcome.message, "Long press simulated via AXPress: photo");
      assert_eq!(mock.pressed(), vec![button]);
    }

    #[test]
    fn missing_element_soft_skips() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock).long_press("ghost", Duration::ZERO).unwrap();
      assert!(outcome.is_success);
      assert_eq!(outcome.message, "Long press skipped: element not found: ghost");

      let strict = strict(&mock).long_press("ghost", Duration::ZERO).unwrap();
      assert_eq!(strict.message, "Element not found for long press: ghost");
    }

    #[test]
    fn coordinates_variant() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "Photo", Frame::new(0.0, 0.0, 80.0, 80.0));
      let outcome = engine(&mock)
        .long_press_coordinates(40.0, 40.0, Duration::ZERO)
        .unwrap();
      assert_eq!(outcome.message, "Long press simulated via AXPress at (40, 40)");
    }
  }

  mod swipe {
    use super::*;

    #[test]
    fn scrolls_enclosing_scroll_area() {
      let mock = MockPlatform::new();
      let scroll = mock.add(mock.window(), "AXScrollArea");
      mock.set_frame(scroll, Frame::new(0.0, 100.0, 400.0, 600.0));
      mock.set_actions(scroll, &["AXScrollDown", "AXScrollUp"]);

      let outcome = engine(&mock).swipe(Direction::Up, None).unwrap();
      assert_eq!(outcome.message, "Swiped up via AX scroll action");
      assert_eq!(mock.performed(), vec![(scroll, "AXScrollUp".to_owned())]);
    }

    #[test]
    fn falls_back_to_window_then_app() {
      let mock = MockPlatform::new();
      mock.set_actions(mock.app(), &["AXScrollLeft"]);
      let outcome = engine(&mock).swipe(Direction::Left, None).unwrap();
      assert!(outcome.is_success);
      assert_eq!(mock.performed(), vec![(mock.app(), "AXScrollLeft".to_owned())]);
    }

    #[test]
    fn no_scroll_actions_soft_skips_unless_strict() {
      let mock = MockPlatform::new();
      let soft = engine(&mock).swipe(Direction::Down, None).unwrap();
      assert_eq!(soft.message, "Swipe skipped: no AX scroll actions available.");
      let hard = strict(&mock).swipe(Direction::Down, None).unwrap();
      assert_eq!(hard.message, "No AX scroll actions available for swipe.");
      assert!(!hard.is_success);
    }

    #[test]
    fn window_without_frame_fails() {
      let mock = MockPlatform::new();
      mock.unset(mock.window(), "AXFrame");
      let outcome = engine(&mock).swipe(Direction::Down, None).unwrap();
      assert_eq!(outcome.message, "Could not get simulator window frame");
    }
  }

  mod scroll_to_element {
    use super::*;

    #[test]
    fn found_immediately() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "Footer", Frame::new(0.0, 700.0, 400.0, 40.0));
      let outcome = engine(&mock)
        .scroll_to_element("footer", 5, Direction::Down)
        .unwrap();
      assert_eq!(outcome.message, "Element found after 0 scrolls");
      assert!(outcome.data.is_some(), "summary attached");
    }

    #[test]
    fn scrolling_down_swipes_up_until_exhausted() {
      let mock = MockPlatform::new();
      mock.set_actions(mock.window(), &["AXScrollUp"]);
      let outcome = engine(&mock)
        .scroll_to_element("footer", 3, Direction::Down)
        .unwrap();
      assert_eq!(outcome.message, "Element not found after 3 scrolls: footer");
      assert_eq!(mock.performed().len(), 3);
      assert!(mock.performed().iter().all(|(_, a)| a == "AXScrollUp"));
    }

    #[test]
    fn failed_reads_cost_a_round_not_the_search() {
      let mock = MockPlatform::new();
      mock.set_actions(mock.window(), &["AXScrollUp"]);
      mock.button(mock.window(), "Footer", Frame::new(0.0, 700.0, 400.0, 40.0));
      mock.fail_reads(40);
      let outcome = engine(&mock)
        .scroll_to_element("footer", 10, Direction::Down)
        .unwrap();
      assert!(outcome.is_success, "{}", outcome.message);
    }

    #[test]
    fn simulator_exit_is_fatal() {
      let mock = MockPlatform::new();
      mock.set_running(false);
      let result = engine(&mock).scroll_to_element("footer", 3, Direction::Down);
      assert!(matches!(result, Err(SimaxError::SimulatorNotRunning)));
    }

    #[test]
    fn strict_swipe_failure_stops_early() {
      let mock = MockPlatform::new();
      let outcome = strict(&mock)
        .scroll_to_element("footer", 3, Direction::Up)
        .unwrap();
      assert_eq!(
        outcome.message,
        "Scroll failed: No AX scroll actions available for swipe."
      );
    }

    #[test]
    fn horizontal_direction_is_rejected() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock)
        .scroll_to_element("footer", 3, Direction::Left)
        .unwrap();
      assert_eq!(outcome.message, "direction must be 'down' or 'up'");
    }
  }

  mod retry {
    use super::*;

    #[test]
    fn first_success_is_returned_as_is() {
      let mock = MockPlatform::new();
      mock.button(mock.window(), "OK", Frame::new(0.0, 0.0, 50.0, 20.0));
      let outcome = engine(&mock)
        .tap_element_with_retry("OK", 2, Duration::ZERO)
        .unwrap();
      assert_eq!(outcome.message, "Tapped element");
    }

    #[test]
    fn exhausted_retries_report_last_failure() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock)
        .tap_element_with_retry("OK", 2, Duration::ZERO)
        .unwrap();
      assert!(!outcome.is_success);
      assert_eq!(
        outcome.message,
        "Failed to tap element after 3 attempts: Element not found: OK"
      );
    }

    #[test]
    fn input_retry_wording() {
      let mock = MockPlatform::new();
      let outcome = engine(&mock)
        .input_text_with_retry("Email", "a@b.c", 0, Duration::ZERO)
        .unwrap();
      assert_eq!(
        outcome.message,
        "Failed to input text after 1 attempts: Element not found: Email"
      );
    }
  }
}
