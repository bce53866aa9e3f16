/*!
Element resolver - breadth-first search over live handles.

The walk mirrors the tree builder's bounds (depth, visited set, grid-scan
expansion of childless groups) without materializing a tree, so a query can
stop early and callers get a handle they can act on.
*/

use super::traversal::{ElementFields, Traversal};
use crate::matching::{self, BestMatch, Candidate};
use crate::platform::Platform;
use std::collections::{HashSet, VecDeque};

/// Visitor decision for one node of a walk.
#[derive(Debug)]
pub(crate) enum Visit<B> {
  /// Keep going, including this node's children.
  Descend,
  /// Keep going, but skip this node's subtree.
  Prune,
  /// End the walk with a result.
  Stop(B),
}

/// Bounds for one walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WalkLimits {
  pub(crate) max_depth: usize,
  pub(crate) grid_scan: bool,
}

impl<P: Platform> Traversal<'_, P> {
  pub(crate) fn default_limits(&self) -> WalkLimits {
    WalkLimits {
      max_depth: self.config.max_depth,
      grid_scan: true,
    }
  }

  /// Breadth-first walk from `root`. Nodes deeper than `max_depth` are
  /// visited but never expanded.
  pub(crate) fn walk<B>(
    &mut self,
    app: &P::Handle,
    root: &P::Handle,
    limits: WalkLimits,
    mut visit: impl FnMut(&mut Self, &P::Handle) -> Visit<B>,
  ) -> Option<B> {
    let mut queue = VecDeque::from([(root.clone(), 0usize)]);
    let mut visited = HashSet::new();

    while let Some((node, depth)) = queue.pop_front() {
      if !visited.insert(node.clone()) {
        continue;
      }
      match visit(self, &node) {
        Visit::Stop(result) => return Some(result),
        Visit::Prune => continue,
        Visit::Descend => {}
      }
      if depth > limits.max_depth {
        continue;
      }
      let children = if limits.grid_scan {
        self.expand(app, &node)
      } else {
        self.children(&node)
      };
      queue.extend(children.into_iter().map(|c| (c, depth + 1)));
    }
    None
  }

  /// Best match for a fuzzy identifier query, or `None`.
  pub(crate) fn find_element(&mut self, app: &P::Handle, root: &P::Handle, query: &str) -> Option<P::Handle> {
    let query = matching::normalize_query(query);
    self.best_by(app, root, |fields| matching::element_score(&fields.as_match(), &query))
  }

  /// Best match on visible text (value, label, title), or `None`.
  pub(crate) fn find_by_text(&mut self, app: &P::Handle, root: &P::Handle, text: &str) -> Option<P::Handle> {
    let query = matching::normalize_query(text);
    self.best_by(app, root, |fields| matching::text_score(&fields.as_match(), &query))
  }

  /// Number of nodes with a non-zero score for `query`.
  pub(crate) fn count_matching(&mut self, app: &P::Handle, root: &P::Handle, query: &str) -> usize {
    let query = matching::normalize_query(query);
    let limits = self.default_limits();
    let mut count = 0;
    self.walk::<()>(app, root, limits, |t, node| {
      if matching::element_score(&t.fields(node).as_match(), &query) > 0 {
        count += 1;
      }
      Visit::Descend
    });
    count
  }

  fn best_by(
    &mut self,
    app: &P::Handle,
    root: &P::Handle,
    score: impl Fn(&ElementFields) -> u32,
  ) -> Option<P::Handle> {
    let limits = self.default_limits();
    let mut best = BestMatch::new();
    self.walk::<()>(app, root, limits, |t, node| {
      let fields = t.fields(node);
      let points = score(&fields);
      if points > 0 {
        let frame = t.frame(node);
        best.offer(node.clone(), Candidate::new(points, &fields.as_match(), frame));
      }
      Visit::Descend
    });
    best.into_inner()
  }
}
