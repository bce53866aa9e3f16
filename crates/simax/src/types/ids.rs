/*! Branded ID types for type-safe references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Element identifier, unique only within one built tree.
///
/// Numbering starts at 1 for every tree build; IDs from different builds
/// must not be compared.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct ElementId(pub u32);

/// Monotonic ID source for a single tree build.
#[derive(Debug)]
pub(crate) struct ElementIdCounter(u32);

impl ElementIdCounter {
  pub(crate) const fn new() -> Self {
    Self(1)
  }

  pub(crate) fn next_id(&mut self) -> ElementId {
    let id = ElementId(self.0);
    self.0 = self.0.saturating_add(1);
    id
  }
}

/// Process ID - branded type to distinguish from other u32 values.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct ProcessId(pub u32);
