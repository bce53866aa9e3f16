/*!
System alert handling.

One attempt is an escalating strategy chain:

1. Find an alert container (`AXAlert`/`AXDialog`/`AXSheet` or a dialog
   subrole). If found, collect its buttons, pick one by localized label or by
   geometry, press it, and fall back to probing coordinates where alert
   buttons usually sit.
2. No container: look for plausible prompt buttons in the window without grid
   scanning. Press the chosen one, else send keyboard shortcuts, else probe
   coordinates.

`Simax::handle_permission_alert` repeats attempts within the retry budget and
the overall deadline until a check finds nothing left to dismiss.
*/

use super::resolver::{Visit, WalkLimits};
use super::traversal::Traversal;
use super::Simax;
use crate::a11y::{Action, Attribute, Role};
use crate::config::{deadline_after, AlertLabels};
use crate::platform::{is_alert_container, role_from_platform, KeyStroke, Platform};
use crate::types::{Frame, Outcome, ProcessId, SimaxError, SimaxResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::thread;
use std::time::Instant;
use ts_rs::TS;

const CONTAINER_SEARCH_DEPTH: usize = 16;
const FAST_SEARCH_DEPTH: usize = 12;
/// Above this many framed buttons without a dominant axis, geometry is
/// ambiguous and selection defers to the coordinate probe.
const MAX_GEOMETRIC_BUTTONS: usize = 4;
const AXIS_DOMINANCE: f64 = 1.2;

const ALLOW_X_RATIOS: [f64; 2] = [0.72, 0.78];
const DENY_X_RATIOS: [f64; 2] = [0.28, 0.22];
const PROBE_Y_RATIOS: [f64; 4] = [0.62, 0.68, 0.72, 0.76];

const DISMISSED: &str = "Alert dismissed";
const NO_ALERT: &str = "No alert detected.";
const TIMED_OUT: &str = "Timed out while handling permission alert.";
const PRESS_FAILED: &str = "Failed to press alert button.";
const STILL_VISIBLE: &str = "Alert still visible after retries.";

/// Which alert button to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AlertAction {
  /// Accept ("Allow", "OK", ...).
  Allow,
  /// Decline ("Don't Allow", "Not Now", ...).
  Deny,
}

impl FromStr for AlertAction {
  type Err = SimaxError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "allow" => Ok(Self::Allow),
      "deny" => Ok(Self::Deny),
      _ => Err(SimaxError::InvalidArgument(
        "Action must be 'allow' or 'deny'.".to_owned(),
      )),
    }
  }
}

impl AlertAction {
  const fn x_ratios(self) -> [f64; 2] {
    match self {
      Self::Allow => ALLOW_X_RATIOS,
      Self::Deny => DENY_X_RATIOS,
    }
  }

  fn key_sequences(self) -> &'static [&'static [KeyStroke]] {
    match self {
      Self::Allow => &[
        &[KeyStroke::RETURN],
        &[KeyStroke::KEYPAD_ENTER],
        &[KeyStroke::SPACE],
      ],
      Self::Deny => &[
        &[KeyStroke::ESCAPE],
        &[KeyStroke::COMMAND_PERIOD],
        &[KeyStroke::TAB, KeyStroke::RETURN],
        &[KeyStroke::LEFT_ARROW, KeyStroke::RETURN],
        &[KeyStroke::RIGHT_ARROW, KeyStroke::RETURN],
      ],
    }
  }
}

/// A button found while looking for an alert.
#[derive(Debug, Clone)]
pub(crate) struct ButtonCandidate<H> {
  pub(crate) element: H,
  pub(crate) title: Option<String>,
  pub(crate) label: Option<String>,
  pub(crate) identifier: Option<String>,
  pub(crate) value: Option<String>,
  pub(crate) frame: Option<Frame>,
}

impl<H> ButtonCandidate<H> {
  /// First non-empty of title, label, value, identifier; trimmed, lowercased.
  fn display_text(&self) -> String {
    [&self.title, &self.label, &self.value, &self.identifier]
      .into_iter()
      .flatten()
      .find(|s| !s.is_empty())
      .map(|s| s.trim().to_lowercase())
      .unwrap_or_default()
  }
}

/// Keep buttons that look like a prompt's action buttons: big enough and
/// roughly centred in the window.
pub(crate) fn filter_prompt_buttons<H>(buttons: Vec<ButtonCandidate<H>>, window: Option<Frame>) -> Vec<ButtonCandidate<H>> {
  let Some(window) = window else {
    return Vec::new();
  };
  let min_width = (window.width * 0.18).max(80.0);
  let min_height = (window.height * 0.03).max(28.0);

  buttons
    .into_iter()
    .filter(|button| {
      let Some(frame) = button.frame else {
        return false;
      };
      if frame.width < min_width || frame.height < min_height {
        return false;
      }
      let center = frame.center();
      let x_ok = center.x >= window.x + window.width * 0.18 && center.x <= window.x + window.width * 0.82;
      let y_ok = center.y >= window.y + window.height * 0.25 && center.y <= window.y + window.height * 0.95;
      x_ok && y_ok
    })
    .collect()
}

/// Index of the button to press, or `None` when no strategy decides.
pub(crate) fn select_alert_button<H>(
  buttons: &[ButtonCandidate<H>],
  action: AlertAction,
  labels: &AlertLabels,
) -> Option<usize> {
  select_by_label(buttons, action, labels).or_else(|| select_by_geometry(buttons, action))
}

fn select_by_label<H>(buttons: &[ButtonCandidate<H>], action: AlertAction, labels: &AlertLabels) -> Option<usize> {
  let table = match action {
    AlertAction::Allow => &labels.allow,
    AlertAction::Deny => &labels.deny,
  };
  buttons.iter().position(|button| {
    let text = button.display_text();
    table.iter().any(|label| label.to_lowercase() == text)
  })
}

/// Vertical stacks: topmost allows, bottommost denies. Otherwise rightmost
/// allows, leftmost denies. Without frames: first allows, last denies.
fn select_by_geometry<H>(buttons: &[ButtonCandidate<H>], action: AlertAction) -> Option<usize> {
  let framed: Vec<(usize, Frame)> = buttons
    .iter()
    .enumerate()
    .filter_map(|(i, b)| b.frame.map(|f| (i, f)))
    .collect();

  if framed.is_empty() {
    return match action {
      AlertAction::Allow => (!buttons.is_empty()).then_some(0),
      AlertAction::Deny => buttons.len().checked_sub(1),
    };
  }

  let spread = |value: fn(&Frame) -> f64| {
    let values = framed.iter().map(|(_, f)| value(f));
    let max = values.clone().fold(f64::MIN, f64::max);
    let min = values.fold(f64::MAX, f64::min);
    max - min
  };
  let x_span = spread(|f| f.center().x);
  let y_span = spread(|f| f.center().y);
  let vertical = y_span > x_span * AXIS_DOMINANCE;
  let horizontal = x_span > y_span * AXIS_DOMINANCE;

  if framed.len() > MAX_GEOMETRIC_BUTTONS && !vertical && !horizontal {
    log::debug!(
      "{} buttons in no clear layout, leaving selection to the coordinate probe",
      framed.len()
    );
    return None;
  }

  let key: fn(&Frame) -> f64 = if vertical { |f| f.y } else { |f| f.x };
  let first = framed
    .iter()
    .min_by(|a, b| key(&a.1).total_cmp(&key(&b.1)))
    .map(|(i, _)| *i);
  let last = framed
    .iter()
    .max_by(|a, b| key(&a.1).total_cmp(&key(&b.1)))
    .map(|(i, _)| *i);

  match (action, vertical) {
    (AlertAction::Allow, true) | (AlertAction::Deny, false) => first,
    (AlertAction::Allow, false) | (AlertAction::Deny, true) => last,
  }
}

/// Result of one alert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptOutcome {
  /// Something was pressed or typed; re-check after settling.
  Acted,
  /// No alert and nothing to act on.
  NothingFound,
  /// An alert is showing but nothing in it could be pressed.
  PressFailed,
}

impl<P: Platform> Traversal<'_, P> {
  /// First alert-like container under `root`, or `None` (also on deadline).
  pub(crate) fn find_alert_container(
    &mut self,
    app: &P::Handle,
    root: &P::Handle,
    deadline: Instant,
  ) -> Option<P::Handle> {
    let limits = WalkLimits {
      max_depth: self.config.max_depth.min(CONTAINER_SEARCH_DEPTH),
      grid_scan: true,
    };
    self
      .walk(app, root, limits, |t, node| {
        if Instant::now() >= deadline {
          return Visit::Stop(None);
        }
        let role = t.role(node);
        let subrole = t.text(node, Attribute::Subrole);
        if is_alert_container(role.as_deref(), subrole.as_deref()) {
          Visit::Stop(Some(node.clone()))
        } else {
          Visit::Descend
        }
      })
      .flatten()
  }

  fn collect_buttons(
    &mut self,
    app: &P::Handle,
    root: &P::Handle,
    limits: WalkLimits,
    deadline: Option<Instant>,
  ) -> Vec<ButtonCandidate<P::Handle>> {
    let mut buttons = Vec::new();
    self.walk::<()>(app, root, limits, |t, node| {
      if deadline.is_some_and(|d| Instant::now() >= d) {
        return Visit::Stop(());
      }
      if t.role(node).as_deref().map(role_from_platform) == Some(Role::Button) {
        let fields = t.fields(node);
        buttons.push(ButtonCandidate {
          element: node.clone(),
          title: fields.title,
          label: fields.label,
          identifier: fields.identifier,
          value: fields.value,
          frame: t.frame(node),
        });
      }
      Visit::Descend
    });
    buttons
  }

  fn press_selected(&mut self, buttons: &[ButtonCandidate<P::Handle>], action: AlertAction) -> bool {
    let Some(chosen) =
      select_alert_button(buttons, action, &self.config.alert_labels).and_then(|i| buttons.get(i))
    else {
      return false;
    };
    log::debug!("Pressing alert button {:?}", chosen.display_text());
    self.press(&chosen.element)
  }

  fn largest_group_frame(&mut self, app: &P::Handle, window: &P::Handle) -> Option<Frame> {
    let limits = WalkLimits {
      max_depth: self.config.max_depth,
      grid_scan: false,
    };
    let mut best: Option<Frame> = None;
    self.walk::<()>(app, window, limits, |t, node| {
      if t.is_plain_group(node) {
        match (t.frame(node), best) {
          (Some(frame), Some(current)) if frame.area() > current.area() => best = Some(frame),
          (Some(frame), None) => best = Some(frame),
          _ => {}
        }
      }
      Visit::Descend
    });
    best
  }

  /// Press whatever sits where alert buttons usually are, inside the largest
  /// group in the window.
  fn tap_alert_by_coordinates(&mut self, app: &P::Handle, window: &P::Handle, action: AlertAction) -> bool {
    let Some(content) = self.largest_group_frame(app, window) else {
      return false;
    };
    for x_ratio in action.x_ratios() {
      for y_ratio in PROBE_Y_RATIOS {
        let point = content.point_at(x_ratio, y_ratio);
        if let Some(target) = self.actionable_at(app, window, point, Action::Press) {
          if self.press(&target) {
            return true;
          }
        }
        thread::sleep(self.config.probe_delay);
      }
    }
    false
  }

  /// Send the first key sequence that posts cleanly.
  fn press_alert_keys(&mut self, pid: Option<ProcessId>, action: AlertAction) -> bool {
    action
      .key_sequences()
      .iter()
      .any(|sequence| sequence.iter().all(|key| self.tap_key(pid, *key)))
  }

  fn tap_key(&self, pid: Option<ProcessId>, key: KeyStroke) -> bool {
    let posted = self.platform().post_key(pid, key, true).and_then(|()| {
      thread::sleep(self.config.key_delay);
      self.platform().post_key(pid, key, false)
    });
    match posted {
      Ok(()) => true,
      Err(e) => {
        log::debug!("Keyboard fallback failed for key {}: {e}", key.code);
        false
      }
    }
  }

  fn alert_attempt(
    &mut self,
    app: &P::Handle,
    window: &P::Handle,
    action: AlertAction,
    pid: Option<ProcessId>,
    deadline: Instant,
  ) -> AttemptOutcome {
    if let Some(container) = self.find_alert_container(app, window, deadline) {
      let limits = WalkLimits {
        max_depth: self.config.max_depth.min(CONTAINER_SEARCH_DEPTH),
        grid_scan: true,
      };
      let buttons = self.collect_buttons(app, &container, limits, Some(deadline));
      let acted = self.press_selected(&buttons, action) || self.tap_alert_by_coordinates(app, window, action);
      return if acted {
        AttemptOutcome::Acted
      } else {
        AttemptOutcome::PressFailed
      };
    }

    let limits = WalkLimits {
      max_depth: self.config.max_depth.min(FAST_SEARCH_DEPTH),
      grid_scan: false,
    };
    let window_frame = self.frame(window);
    let buttons = filter_prompt_buttons(self.collect_buttons(app, window, limits, None), window_frame);
    if !buttons.is_empty() && (self.press_selected(&buttons, action) || self.press_alert_keys(pid, action)) {
      return AttemptOutcome::Acted;
    }
    if self.tap_alert_by_coordinates(app, window, action) {
      AttemptOutcome::Acted
    } else {
      AttemptOutcome::NothingFound
    }
  }
}

impl<P: Platform> Simax<P> {
  /// Dismiss a system alert by pressing its allow or deny button.
  ///
  /// Fails with "No alert detected." only if the first attempt finds nothing.
  pub fn handle_permission_alert(&mut self, action: AlertAction) -> SimaxResult<Outcome> {
    let deadline = deadline_after(self.config.alert_timeout);

    for attempt in 0..=self.config.alert_retry_count {
      if Instant::now() >= deadline {
        return Ok(Outcome::failure(TIMED_OUT));
      }
      let (app, window) = self.prepare()?;
      let pid = self.locator.pid();
      let mut traversal = Traversal::new(&self.platform, &mut self.cache, &self.config);

      match traversal.alert_attempt(&app, &window, action, pid, deadline) {
        AttemptOutcome::Acted => {
          log::debug!("Alert attempt {attempt} acted, settling");
          thread::sleep(self.config.settle_delay);
        }
        AttemptOutcome::NothingFound if attempt == 0 => return Ok(Outcome::failure(NO_ALERT)),
        AttemptOutcome::NothingFound => return Ok(Outcome::success(DISMISSED)),
        AttemptOutcome::PressFailed => return Ok(Outcome::failure(PRESS_FAILED)),
      }
    }

    let gone = self.run(|t, app, window| t.find_alert_container(app, window, deadline).is_none())?;
    Ok(if gone {
      Outcome::success(DISMISSED)
    } else {
      Outcome::failure(STILL_VISIBLE)
    })
  }
}
