/*!
Element cache - per-operation memoization of platform lookups.

Every lookup issues at most one platform query per (element, slot) between
two resets, including lookups that found nothing. There is no expiry inside a
reset window; `Simax` resets at the top of every public operation so the next
call always sees fresh OS state.
*/

use crate::a11y::{Action, Value};
use crate::platform::{action_from_platform, ax_attribute, Platform, PlatformHandle};
use crate::types::Frame;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub(crate) struct ElementCache<H> {
  attributes: HashMap<H, HashMap<String, Option<Value>>>,
  children: HashMap<H, Vec<H>>,
  frames: HashMap<H, Option<Frame>>,
  actions: HashMap<H, HashSet<Action>>,
}

impl<H: PlatformHandle> ElementCache<H> {
  pub(crate) fn new() -> Self {
    Self {
      attributes: HashMap::new(),
      children: HashMap::new(),
      frames: HashMap::new(),
      actions: HashMap::new(),
    }
  }

  /// Forget everything.
  pub(crate) fn reset(&mut self) {
    self.attributes.clear();
    self.children.clear();
    self.frames.clear();
    self.actions.clear();
  }

  pub(crate) fn attribute<P>(&mut self, platform: &P, element: &H, name: &str) -> Option<Value>
  where
    P: Platform<Handle = H>,
  {
    let slots = self.attributes.entry(element.clone()).or_default();
    if let Some(cached) = slots.get(name) {
      return cached.clone();
    }
    let fetched = platform.attribute(element, name);
    slots.insert(name.to_owned(), fetched.clone());
    fetched
  }

  pub(crate) fn children<P>(&mut self, platform: &P, element: &H) -> Vec<H>
  where
    P: Platform<Handle = H>,
  {
    self
      .children
      .entry(element.clone())
      .or_insert_with(|| platform.element_list_attribute(element, ax_attribute::CHILDREN))
      .clone()
  }

  pub(crate) fn frame<P>(&mut self, platform: &P, element: &H) -> Option<Frame>
  where
    P: Platform<Handle = H>,
  {
    *self.frames.entry(element.clone()).or_insert_with(|| {
      platform
        .attribute(element, ax_attribute::FRAME)
        .and_then(|v| v.as_frame())
    })
  }

  pub(crate) fn has_action<P>(&mut self, platform: &P, element: &H, action: Action) -> bool
  where
    P: Platform<Handle = H>,
  {
    self
      .actions
      .entry(element.clone())
      .or_insert_with(|| {
        platform
          .action_names(element)
          .iter()
          .filter_map(|name| action_from_platform(name))
          .collect()
      })
      .contains(&action)
  }
}
