/*!
Traversal context: platform, cache, and config for one public operation.

Tree building, resolution, gestures, and alert handling are all methods on
`Traversal`, so every lookup they make goes through the same cache.
*/

use super::cache::ElementCache;
use crate::a11y::{Action, Attribute, Value};
use crate::config::Config;
use crate::matching::MatchFields;
use crate::platform::{action_to_platform, attribute_to_platform, ax_role, Platform};
use crate::types::{ElementSummary, Frame};

pub(crate) struct Traversal<'a, P: Platform> {
  platform: &'a P,
  cache: &'a mut ElementCache<P::Handle>,
  pub(crate) config: &'a Config,
}

/// Owned copy of the scoring fields of one element.
#[derive(Debug, Default, Clone)]
pub(crate) struct ElementFields {
  pub(crate) role: Option<String>,
  pub(crate) identifier: Option<String>,
  pub(crate) label: Option<String>,
  pub(crate) title: Option<String>,
  pub(crate) value: Option<String>,
}

impl ElementFields {
  pub(crate) fn as_match(&self) -> MatchFields<'_> {
    MatchFields {
      role: self.role.as_deref(),
      identifier: self.identifier.as_deref(),
      label: self.label.as_deref(),
      title: self.title.as_deref(),
      value: self.value.as_deref(),
    }
  }
}

impl<'a, P: Platform> Traversal<'a, P> {
  pub(crate) fn new(platform: &'a P, cache: &'a mut ElementCache<P::Handle>, config: &'a Config) -> Self {
    Self {
      platform,
      cache,
      config,
    }
  }

  pub(crate) const fn platform(&self) -> &'a P {
    self.platform
  }

  /// Raw cached attribute by platform name (pass-through reads).
  pub(crate) fn raw_attribute(&mut self, element: &P::Handle, name: &str) -> Option<Value> {
    self.cache.attribute(self.platform, element, name)
  }

  pub(crate) fn attribute(&mut self, element: &P::Handle, attribute: Attribute) -> Option<Value> {
    self.raw_attribute(element, attribute_to_platform(attribute))
  }

  /// Attribute as non-empty text. Non-string values are stringified.
  pub(crate) fn text(&mut self, element: &P::Handle, attribute: Attribute) -> Option<String> {
    self
      .attribute(element, attribute)
      .map(Value::into_string)
      .filter(|s| !s.is_empty())
  }

  pub(crate) fn role(&mut self, element: &P::Handle) -> Option<String> {
    self.text(element, Attribute::Role)
  }

  pub(crate) fn children(&mut self, element: &P::Handle) -> Vec<P::Handle> {
    self.cache.children(self.platform, element)
  }

  pub(crate) fn frame(&mut self, element: &P::Handle) -> Option<Frame> {
    self.cache.frame(self.platform, element)
  }

  pub(crate) fn has_action(&mut self, element: &P::Handle, action: Action) -> bool {
    self.cache.has_action(self.platform, element, action)
  }

  /// Perform an advertised action. Unadvertised actions are not attempted.
  pub(crate) fn perform(&mut self, element: &P::Handle, action: Action) -> bool {
    if !self.has_action(element, action) {
      return false;
    }
    match self.platform.perform_action(element, action_to_platform(action)) {
      Ok(()) => true,
      Err(e) => {
        log::debug!("{action:?} failed on {element:?}: {e}");
        false
      }
    }
  }

  pub(crate) fn press(&mut self, element: &P::Handle) -> bool {
    self.perform(element, Action::Press)
  }

  pub(crate) fn fields(&mut self, element: &P::Handle) -> ElementFields {
    ElementFields {
      role: self.role(element),
      identifier: self.text(element, Attribute::Identifier),
      label: self.text(element, Attribute::Label),
      title: self.text(element, Attribute::Title),
      value: self.text(element, Attribute::Value),
    }
  }

  pub(crate) fn summary(&mut self, element: &P::Handle) -> ElementSummary {
    let fields = self.fields(element);
    ElementSummary {
      role: fields.role.unwrap_or_else(|| ax_role::UNKNOWN.to_owned()),
      identifier: fields.identifier,
      label: fields.label,
      title: fields.title,
      value: fields.value,
      frame: self.frame(element),
    }
  }
}
