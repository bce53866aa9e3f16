/*! Materialized UI element tree. */

use super::{ElementId, Frame};
use crate::matching::{self, BestMatch, Candidate, MatchFields};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use ts_rs::TS;

/// Immutable snapshot of one accessibility node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UiElement {
  /// Unique within the tree this element was built in.
  pub id: ElementId,
  /// Platform role string (e.g. `AXButton`).
  pub role: String,
  /// `AXTitle`.
  pub title: Option<String>,
  /// `AXLabel`.
  pub label: Option<String>,
  /// `AXIdentifier` (the app's accessibilityIdentifier).
  pub identifier: Option<String>,
  /// `AXValue`, stringified.
  pub value: Option<String>,
  pub frame: Option<Frame>,
  /// Children in platform order.
  pub children: Vec<UiElement>,
}

impl UiElement {
  fn match_fields(&self) -> MatchFields<'_> {
    MatchFields {
      role: Some(&self.role),
      identifier: self.identifier.as_deref(),
      label: self.label.as_deref(),
      title: self.title.as_deref(),
      value: self.value.as_deref(),
    }
  }

  /// All nodes in breadth-first order, starting with `self`.
  pub fn breadth_first(&self) -> Vec<&UiElement> {
    let mut out = Vec::new();
    let mut queue = VecDeque::from([self]);
    while let Some(node) = queue.pop_front() {
      out.push(node);
      queue.extend(node.children.iter());
    }
    out
  }

  /// Best-scoring node for a fuzzy identifier/label/title/value query.
  pub fn find(&self, query: &str) -> Option<&UiElement> {
    let query = matching::normalize_query(query);
    let mut best = BestMatch::new();
    for node in self.breadth_first() {
      let fields = node.match_fields();
      let score = matching::element_score(&fields, &query);
      best.offer(node, Candidate::new(score, &fields, node.frame));
    }
    best.into_inner()
  }

  /// Best node whose visible text (value, label, title) matches.
  pub fn find_by_text(&self, text: &str) -> Option<&UiElement> {
    let query = matching::normalize_query(text);
    let mut best = BestMatch::new();
    for node in self.breadth_first() {
      let fields = node.match_fields();
      let score = matching::text_score(&fields, &query);
      best.offer(node, Candidate::new(score, &fields, node.frame));
    }
    best.into_inner()
  }

  /// This node without its subtree.
  pub fn summary(&self) -> ElementSummary {
    ElementSummary {
      role: self.role.clone(),
      identifier: self.identifier.clone(),
      label: self.label.clone(),
      title: self.title.clone(),
      value: self.value.clone(),
      frame: self.frame,
    }
  }
}

/// Flat description of a resolved element, returned as operation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElementSummary {
  pub role: String,
  pub identifier: Option<String>,
  pub label: Option<String>,
  pub title: Option<String>,
  pub value: Option<String>,
  pub frame: Option<Frame>,
}
