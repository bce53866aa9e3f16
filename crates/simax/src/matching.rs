/*!
Query scoring shared by the live resolver and materialized trees.

Identifier matches always outrank human-visible text, and an exact match
outranks a prefix, which outranks a substring. Ties fall back to geometry.
*/

use crate::platform::role_from_platform;
use crate::types::Frame;

const IDENTIFIER_EXACT: u32 = 120;
const IDENTIFIER_PREFIX: u32 = 95;
const IDENTIFIER_SUBSTRING: u32 = 90;
const TEXT_EXACT: u32 = 85;
const TEXT_PREFIX: u32 = 70;
const TEXT_SUBSTRING: u32 = 65;
const INTERACTIVE_BONUS: u32 = 3;

const VISIBLE_TEXT_EXACT: u32 = 100;
const VISIBLE_TEXT_SUBSTRING: u32 = 70;

/// Borrowed view of the fields a query is scored against.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MatchFields<'a> {
  pub(crate) role: Option<&'a str>,
  pub(crate) identifier: Option<&'a str>,
  pub(crate) label: Option<&'a str>,
  pub(crate) title: Option<&'a str>,
  pub(crate) value: Option<&'a str>,
}

pub(crate) fn normalize_query(query: &str) -> String {
  query.trim().to_lowercase()
}

fn tiered(field: Option<&str>, query: &str, exact: u32, prefix: u32, substring: u32) -> u32 {
  let Some(field) = field.filter(|f| !f.is_empty()) else {
    return 0;
  };
  let field = field.to_lowercase();
  if field == query {
    exact
  } else if field.starts_with(query) {
    prefix
  } else if query.chars().count() > 1 && field.contains(query) {
    substring
  } else {
    0
  }
}

/// Score an element against a normalized query. Zero means no match.
pub(crate) fn element_score(fields: &MatchFields<'_>, query: &str) -> u32 {
  if query.is_empty() {
    return 0;
  }

  let mut score = tiered(
    fields.identifier,
    query,
    IDENTIFIER_EXACT,
    IDENTIFIER_PREFIX,
    IDENTIFIER_SUBSTRING,
  );
  if score == 0 {
    score = [fields.label, fields.title, fields.value]
      .into_iter()
      .map(|text| tiered(text, query, TEXT_EXACT, TEXT_PREFIX, TEXT_SUBSTRING))
      .max()
      .unwrap_or(0);
  }

  let interactive = fields
    .role
    .map(role_from_platform)
    .is_some_and(|role| role.is_primary_control());
  if score > 0 && interactive {
    score += INTERACTIVE_BONUS;
  }
  score
}

/// Score visible text only (value, label, title). Identifiers are ignored.
pub(crate) fn text_score(fields: &MatchFields<'_>, query: &str) -> u32 {
  if query.is_empty() {
    return 0;
  }
  let texts: Vec<String> = [fields.value, fields.label, fields.title]
    .into_iter()
    .flatten()
    .map(str::to_lowercase)
    .collect();

  if texts.iter().any(|t| t == query) {
    VISIBLE_TEXT_EXACT
  } else if query.chars().count() > 1 && texts.iter().any(|t| t.contains(query)) {
    VISIBLE_TEXT_SUBSTRING
  } else {
    0
  }
}

/// Properties consulted when two candidates score equally.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
  pub(crate) score: u32,
  pub(crate) has_identifier: bool,
  pub(crate) frame: Option<Frame>,
}

impl Candidate {
  pub(crate) fn new(score: u32, fields: &MatchFields<'_>, frame: Option<Frame>) -> Self {
    Self {
      score,
      has_identifier: fields.identifier.is_some_and(|id| !id.is_empty()),
      frame,
    }
  }

  /// Tie-break between equal scores: identifier presence, then smaller area.
  fn beats(&self, current: &Self) -> bool {
    if self.has_identifier != current.has_identifier {
      return self.has_identifier;
    }
    match (self.frame, current.frame) {
      (Some(mine), Some(theirs)) => mine.area() < theirs.area(),
      (mine, _) => mine.is_some(),
    }
  }
}

/// Running best match over a traversal.
#[derive(Debug)]
pub(crate) struct BestMatch<T> {
  best: Option<(T, Candidate)>,
}

impl<T> BestMatch<T> {
  pub(crate) const fn new() -> Self {
    Self { best: None }
  }

  pub(crate) fn offer(&mut self, item: T, candidate: Candidate) {
    if candidate.score == 0 {
      return;
    }
    let replace = match &self.best {
      None => true,
      Some((_, current)) => {
        candidate.score > current.score
          || (candidate.score == current.score && candidate.beats(current))
      }
    };
    if replace {
      self.best = Some((item, candidate));
    }
  }

  pub(crate) fn into_inner(self) -> Option<T> {
    self.best.map(|(item, _)| item)
  }
}
