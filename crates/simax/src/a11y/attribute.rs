/*!
Closed set of attributes the engine reads.

Platform strings live in `platform/mapping.rs`; only
`Simax::get_element_attribute` passes arbitrary names through.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Element attribute understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Attribute {
  Role,
  Subrole,
  Title,
  /// Accessibility label (what VoiceOver reads).
  Label,
  /// Developer-assigned accessibility identifier.
  Identifier,
  Value,
  Frame,
  Enabled,
  Children,
  Windows,
  FocusedWindow,
  MainWindow,
}
