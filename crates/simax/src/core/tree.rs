/*!
Tree builder - materializes the accessibility graph into a `UiElement` tree.

## Invariants

1. **Bounded**: nodes deeper than `max_depth` become leaves.
2. **Acyclic**: a handle already visited in this build becomes a leaf.
3. **Grid fallback**: a childless plain group with a frame gets synthetic
   children discovered by hit-testing a grid over its frame. Hits are
   deduplicated by signature and never include the group itself.
*/

use super::traversal::Traversal;
use crate::a11y::{Attribute, Role};
use crate::platform::{ax_role, role_from_platform, Platform};
use crate::types::{ElementIdCounter, Frame, UiElement};
use std::collections::HashSet;

const MIN_GRID_STEP: f64 = 5.0;

/// Identity of a hit-test result independent of its handle.
///
/// The platform may hand back a fresh handle for the same element on every
/// hit-test, so handle equality alone would not deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ElementSignature {
  role: Option<String>,
  identifier: Option<String>,
  label: Option<String>,
  title: Option<String>,
  frame: Option<[i64; 4]>,
}

/// Grid spacing for a frame: the configured step, widened so that the grid
/// stays within `max_points`, and never below 5 points.
#[allow(clippy::cast_precision_loss)]
fn grid_step(frame: &Frame, configured: u32, max_points: u32) -> f64 {
  let mut step = f64::from(configured).max(MIN_GRID_STEP);
  if max_points > 0 && frame.area() > 0.0 {
    let desired = (frame.area() / f64::from(max_points)).sqrt().floor();
    if desired > step {
      step = desired;
    }
  }
  step.max(MIN_GRID_STEP)
}

impl<P: Platform> Traversal<'_, P> {
  /// Build the tree rooted at `root`. IDs are assigned in pre-order from 1.
  pub(crate) fn build_tree(&mut self, app: &P::Handle, root: &P::Handle) -> UiElement {
    let mut ids = ElementIdCounter::new();
    let mut visited = HashSet::new();
    self.build_node(app, root, 0, &mut visited, &mut ids)
  }

  fn build_node(
    &mut self,
    app: &P::Handle,
    element: &P::Handle,
    depth: usize,
    visited: &mut HashSet<P::Handle>,
    ids: &mut ElementIdCounter,
  ) -> UiElement {
    let fields = self.fields(element);
    let mut node = UiElement {
      id: ids.next_id(),
      role: fields.role.unwrap_or_else(|| ax_role::UNKNOWN.to_owned()),
      title: fields.title,
      label: fields.label,
      identifier: fields.identifier,
      value: fields.value,
      frame: self.frame(element),
      children: Vec::new(),
    };

    if depth > self.config.max_depth {
      log::warn!(
        "Max depth {} exceeded at {} ({}), truncating",
        self.config.max_depth,
        node.role,
        node.id
      );
      return node;
    }
    if !visited.insert(element.clone()) {
      log::debug!("Revisited {element:?}, emitting as leaf");
      return node;
    }

    for child in self.expand(app, element) {
      let built = self.build_node(app, &child, depth + 1, visited, ids);
      node.children.push(built);
    }
    node
  }

  /// Children of `element`, or grid-scan hits for a childless plain group.
  pub(crate) fn expand(&mut self, app: &P::Handle, element: &P::Handle) -> Vec<P::Handle> {
    let children = self.children(element);
    if !children.is_empty() || !self.is_plain_group(element) {
      return children;
    }
    match self.frame(element) {
      Some(frame) => self.grid_scan(app, element, &frame),
      None => children,
    }
  }

  pub(crate) fn is_plain_group(&mut self, element: &P::Handle) -> bool {
    self.role(element).as_deref().map(role_from_platform) == Some(Role::Group)
  }

  /// Hit-test a grid over `frame` and return the distinct elements found.
  #[allow(clippy::while_float)]
  pub(crate) fn grid_scan(&mut self, app: &P::Handle, parent: &P::Handle, frame: &Frame) -> Vec<P::Handle> {
    if frame.is_empty() {
      return Vec::new();
    }
    let max_points = self.config.max_grid_points;
    let step = grid_step(frame, self.config.grid_step, max_points);

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut scanned = 0;

    let mut x = frame.x;
    'columns: while x <= frame.x + frame.width {
      let mut y = frame.y;
      while y <= frame.y + frame.height {
        if scanned >= max_points {
          break 'columns;
        }
        scanned += 1;

        if let Some(hit) = self.platform().element_at_position(app, x, y) {
          if &hit != parent {
            let signature = self.signature(&hit);
            if seen.insert(signature) {
              found.push(hit);
            }
          }
        }
        y += step;
      }
      x += step;
    }

    log::debug!(
      "Grid scan over {frame:?} (step {step}) probed {scanned} points, found {} elements",
      found.len()
    );
    found
  }

  fn signature(&mut self, element: &P::Handle) -> ElementSignature {
    ElementSignature {
      role: self.role(element),
      identifier: self.text(element, Attribute::Identifier),
      label: self.text(element, Attribute::Label),
      title: self.text(element, Attribute::Title),
      frame: self.frame(element).map(|f| f.rounded()),
    }
  }
}
