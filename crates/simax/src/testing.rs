/*!
In-memory `Platform` for tests.

Nodes live in an arena behind a shared mutex so tests keep a clone of the
platform and mutate the "OS" between engine calls. Node 0 is the Simulator
application, node 1 its only (focused) window.
*/

#![allow(clippy::indexing_slicing, clippy::unwrap_used)]

use crate::a11y::{Action, Value};
use crate::config::Config;
use crate::core::{Simax, SimaxBuilder};
use crate::platform::{action_from_platform, KeyStroke, Platform, PlatformHandle};
use crate::types::{Frame, ProcessId, SimaxError, SimaxResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

pub(crate) const MOCK_PID: ProcessId = ProcessId(4242);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MockHandle(usize);

impl PlatformHandle for MockHandle {}

#[derive(Debug, Default)]
struct MockNode {
  attributes: HashMap<String, Value>,
  links: HashMap<String, Vec<usize>>,
  actions: Vec<String>,
  failing_actions: HashSet<String>,
  detach_on_press: Vec<(usize, usize)>,
}

#[derive(Debug)]
struct MockState {
  nodes: Vec<MockNode>,
  trusted: bool,
  running: bool,
  reject_set_value: bool,
  hit_regions: Vec<(Frame, usize)>,
  attempted: Vec<(MockHandle, String)>,
  performed: Vec<(MockHandle, String)>,
  keys: Vec<(Option<ProcessId>, KeyStroke, bool)>,
  typed: String,
  failing_reads: usize,
  attribute_reads: usize,
  trust_checks: usize,
  app_lookups: usize,
}

impl MockState {
  fn detach(&mut self, parent: usize, child: usize) {
    if let Some(children) = self.nodes[parent].links.get_mut("AXChildren") {
      children.retain(|c| *c != child);
    }
    let mut gone = vec![child];
    let mut i = 0;
    while i < gone.len() {
      let node = gone[i];
      if let Some(children) = self.nodes[node].links.get("AXChildren") {
        for c in children {
          if !gone.contains(c) {
            gone.push(*c);
          }
        }
      }
      i += 1;
    }
    self.hit_regions.retain(|(_, n)| !gone.contains(n));
  }
}

#[derive(Debug, Clone)]
pub(crate) struct MockPlatform {
  state: Arc<Mutex<MockState>>,
}

impl MockPlatform {
  /// Trusted, running Simulator with one 400x800 window at the origin.
  pub(crate) fn new() -> Self {
    let mock = Self {
      state: Arc::new(Mutex::new(MockState {
        nodes: Vec::new(),
        trusted: true,
        running: true,
        reject_set_value: false,
        hit_regions: Vec::new(),
        attempted: Vec::new(),
        performed: Vec::new(),
        keys: Vec::new(),
        typed: String::new(),
        failing_reads: 0,
        attribute_reads: 0,
        trust_checks: 0,
        app_lookups: 0,
      })),
    };
    let app = mock.add_detached("AXApplication");
    let window = mock.add(app, "AXWindow");
    mock.set(window, "AXTitle", "iPhone 15 - iOS 17");
    mock.set(window, "AXFrame", Frame::new(0.0, 0.0, 400.0, 800.0));
    mock.link(app, "AXWindows", &[window]);
    mock.link(app, "AXFocusedWindow", &[window]);
    mock
  }

  pub(crate) const fn app(&self) -> MockHandle {
    MockHandle(0)
  }

  pub(crate) const fn window(&self) -> MockHandle {
    MockHandle(1)
  }

  /// Node with no parent (reachable only via hit-testing or links).
  pub(crate) fn add_detached(&self, role: &str) -> MockHandle {
    let mut state = self.state.lock();
    let mut node = MockNode::default();
    node.attributes.insert("AXRole".into(), Value::from(role));
    state.nodes.push(node);
    MockHandle(state.nodes.len() - 1)
  }

  pub(crate) fn add(&self, parent: MockHandle, role: &str) -> MockHandle {
    let child = self.add_detached(role);
    self.attach(parent, child);
    child
  }

  pub(crate) fn attach(&self, parent: MockHandle, child: MockHandle) {
    self.state.lock().nodes[parent.0]
      .links
      .entry("AXChildren".into())
      .or_default()
      .push(child.0);
  }

  pub(crate) fn detach(&self, parent: MockHandle, child: MockHandle) {
    self.state.lock().detach(parent.0, child.0);
  }

  pub(crate) fn set(&self, element: MockHandle, name: &str, value: impl Into<Value>) {
    self.state.lock().nodes[element.0]
      .attributes
      .insert(name.to_owned(), value.into());
  }

  pub(crate) fn unset(&self, element: MockHandle, name: &str) {
    self.state.lock().nodes[element.0].attributes.remove(name);
  }

  pub(crate) fn set_frame(&self, element: MockHandle, frame: Frame) {
    self.set(element, "AXFrame", frame);
  }

  pub(crate) fn link(&self, element: MockHandle, name: &str, targets: &[MockHandle]) {
    self.state.lock().nodes[element.0]
      .links
      .insert(name.to_owned(), targets.iter().map(|t| t.0).collect());
  }

  pub(crate) fn unlink(&self, element: MockHandle, name: &str) {
    self.state.lock().nodes[element.0].links.remove(name);
  }

  pub(crate) fn set_actions(&self, element: MockHandle, actions: &[&str]) {
    self.state.lock().nodes[element.0].actions = actions.iter().map(|a| (*a).to_owned()).collect();
  }

  /// Advertise the action but fail when it is performed.
  pub(crate) fn fail_action(&self, element: MockHandle, action: &str) {
    self.state.lock().nodes[element.0]
      .failing_actions
      .insert(action.to_owned());
  }

  /// Make `element` the answer for hit-tests inside `frame`.
  pub(crate) fn hit_region(&self, element: MockHandle, frame: Frame) {
    self.state.lock().hit_regions.push((frame, element.0));
  }

  /// Pressing `button` removes `child` from `parent` (a dismissed alert).
  pub(crate) fn detach_on_press(&self, button: MockHandle, parent: MockHandle, child: MockHandle) {
    self.state.lock().nodes[button.0]
      .detach_on_press
      .push((parent.0, child.0));
  }

  /// Pressable, hit-testable button with a label.
  pub(crate) fn button(&self, parent: MockHandle, label: &str, frame: Frame) -> MockHandle {
    let button = self.add(parent, "AXButton");
    self.set(button, "AXLabel", label);
    self.set_frame(button, frame);
    self.set_actions(button, &["AXPress"]);
    self.hit_region(button, frame);
    button
  }

  pub(crate) fn set_trusted(&self, trusted: bool) {
    self.state.lock().trusted = trusted;
  }

  pub(crate) fn set_running(&self, running: bool) {
    self.state.lock().running = running;
  }

  /// The next `count` attribute reads fail (read as absent).
  pub(crate) fn fail_reads(&self, count: usize) {
    self.state.lock().failing_reads = count;
  }

  pub(crate) fn reject_set_value(&self) {
    self.state.lock().reject_set_value = true;
  }

  /// Successful actions, in order.
  pub(crate) fn performed(&self) -> Vec<(MockHandle, String)> {
    self.state.lock().performed.clone()
  }

  /// Every action request, including ones that failed.
  pub(crate) fn attempted(&self) -> Vec<(MockHandle, String)> {
    self.state.lock().attempted.clone()
  }

  pub(crate) fn pressed(&self) -> Vec<MockHandle> {
    self
      .performed()
      .into_iter()
      .filter(|(_, a)| a == "AXPress")
      .map(|(h, _)| h)
      .collect()
  }

  pub(crate) fn keys(&self) -> Vec<(Option<ProcessId>, KeyStroke, bool)> {
    self.state.lock().keys.clone()
  }

  pub(crate) fn typed(&self) -> String {
    self.state.lock().typed.clone()
  }

  pub(crate) fn value_of(&self, element: MockHandle, name: &str) -> Option<Value> {
    self.state.lock().nodes[element.0].attributes.get(name).cloned()
  }

  pub(crate) fn attribute_reads(&self) -> usize {
    self.state.lock().attribute_reads
  }

  pub(crate) fn trust_checks(&self) -> usize {
    self.state.lock().trust_checks
  }

  pub(crate) fn app_lookups(&self) -> usize {
    self.state.lock().app_lookups
  }
}

impl Platform for MockPlatform {
  type Handle = MockHandle;

  fn is_trusted(&self) -> bool {
    let mut state = self.state.lock();
    state.trust_checks += 1;
    state.trusted
  }

  fn find_application(&self, _bundle_id: &str) -> Option<ProcessId> {
    let mut state = self.state.lock();
    state.app_lookups += 1;
    state.running.then_some(MOCK_PID)
  }

  fn is_running(&self, pid: ProcessId) -> bool {
    pid == MOCK_PID && self.state.lock().running
  }

  fn activate_application(&self, _pid: ProcessId) {}

  fn application_element(&self, _pid: ProcessId) -> MockHandle {
    MockHandle(0)
  }

  fn attribute(&self, element: &MockHandle, name: &str) -> Option<Value> {
    let mut state = self.state.lock();
    state.attribute_reads += 1;
    if state.failing_reads > 0 {
      state.failing_reads -= 1;
      return None;
    }
    state.nodes.get(element.0)?.attributes.get(name).cloned()
  }

  fn element_attribute(&self, element: &MockHandle, name: &str) -> Option<MockHandle> {
    self.element_list_attribute(element, name).into_iter().next()
  }

  fn element_list_attribute(&self, element: &MockHandle, name: &str) -> Vec<MockHandle> {
    let state = self.state.lock();
    state
      .nodes
      .get(element.0)
      .and_then(|n| n.links.get(name))
      .map(|ids| ids.iter().map(|i| MockHandle(*i)).collect())
      .unwrap_or_default()
  }

  fn action_names(&self, element: &MockHandle) -> Vec<String> {
    self.state.lock().nodes[element.0].actions.clone()
  }

  fn perform_action(&self, element: &MockHandle, action: &str) -> SimaxResult<()> {
    let mut state = self.state.lock();
    state.attempted.push((*element, action.to_owned()));
    let node = &state.nodes[element.0];
    if !node.actions.iter().any(|a| a == action) || node.failing_actions.contains(action) {
      return Err(SimaxError::ActionFailed {
        action: action_from_platform(action).unwrap_or(Action::Press),
        reason: "kAXErrorCannotComplete".into(),
      });
    }
    let detaches = node.detach_on_press.clone();
    state.performed.push((*element, action.to_owned()));
    if action == "AXPress" {
      for (parent, child) in detaches {
        state.detach(parent, child);
      }
    }
    Ok(())
  }

  fn set_attribute(&self, element: &MockHandle, name: &str, value: &Value) -> SimaxResult<()> {
    let mut state = self.state.lock();
    if state.reject_set_value {
      return Err(SimaxError::SetValueFailed {
        reason: "kAXErrorAttributeUnsupported".into(),
      });
    }
    state.nodes[element.0]
      .attributes
      .insert(name.to_owned(), value.clone());
    Ok(())
  }

  fn element_at_position(&self, _app: &MockHandle, x: f64, y: f64) -> Option<MockHandle> {
    let point = crate::types::Point::new(x, y);
    let state = self.state.lock();
    let mut best: Option<(f64, usize)> = None;
    for (frame, node) in &state.hit_regions {
      let smaller = match best {
        Some((area, _)) => frame.area() < area,
        None => true,
      };
      if frame.contains(point) && smaller {
        best = Some((frame.area(), *node));
      }
    }
    best.map(|(_, node)| MockHandle(node))
  }

  fn post_key(&self, target: Option<ProcessId>, key: KeyStroke, key_down: bool) -> SimaxResult<()> {
    self.state.lock().keys.push((target, key, key_down));
    Ok(())
  }

  fn type_character(&self, _target: Option<ProcessId>, c: char) -> SimaxResult<()> {
    self.state.lock().typed.push(c);
    Ok(())
  }
}

/// Config with every sleep removed and a fast poll.
pub(crate) fn fast_config() -> Config {
  Config {
    poll_interval: Duration::from_millis(5),
    window_cache_ttl: Duration::ZERO,
    settle_delay: Duration::ZERO,
    probe_delay: Duration::ZERO,
    scroll_settle: Duration::ZERO,
    key_delay: Duration::ZERO,
    ..Config::default()
  }
}

pub(crate) fn engine(mock: &MockPlatform) -> Simax<MockPlatform> {
  SimaxBuilder::new().config(fast_config()).build_with(mock.clone())
}
