/*!
Semantic UI roles.

Roles describe what an element *is* in the UI hierarchy.
Platform-specific role strings are mapped in `platform/mapping.rs`.
*/

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Semantic UI role.
///
/// Elements keep their raw platform role string; this enum is what engine
/// decisions (grid scans, alert detection, scoring bonuses) are made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
  // === Structural / Containers ===
  Application,
  Window,
  /// Plain layout group. Simulator content often arrives as childless groups.
  Group,
  ScrollArea,
  Toolbar,

  // === Modal surfaces ===
  Alert,
  Dialog,
  Sheet,

  // === Navigation ===
  Menu,
  MenuItem,
  Tab,
  TabList,

  // === Collections ===
  List,
  Row,
  Table,
  Cell,

  // === Interactive ===
  Button,
  Link,
  TextField,
  TextArea,
  SearchField,
  ComboBox,
  Checkbox,
  RadioButton,
  Slider,
  Stepper,
  ProgressBar,

  // === Static content ===
  StaticText,
  Heading,
  Image,

  // === Generic / Fallback ===
  /// Known platform elements without specific semantics (scroll bars, etc).
  GenericElement,

  /// Platform role didn't map to anything known.
  #[default]
  Unknown,
}

impl Role {
  /// Roles that host system alerts and permission prompts.
  pub const fn is_alert_container(&self) -> bool {
    matches!(self, Self::Alert | Self::Dialog | Self::Sheet)
  }

  /// Controls a user most likely means when naming an element.
  pub const fn is_primary_control(&self) -> bool {
    matches!(
      self,
      Self::Button | Self::TextField | Self::SearchField | Self::TextArea
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alert_containers() {
    assert!(Role::Alert.is_alert_container());
    assert!(Role::Sheet.is_alert_container());
    assert!(!Role::Window.is_alert_container());
    assert!(!Role::Group.is_alert_container());
  }

  #[test]
  fn primary_controls_include_text_entry() {
    assert!(Role::Button.is_primary_control());
    assert!(Role::SearchField.is_primary_control());
    assert!(!Role::StaticText.is_primary_control());
    assert!(!Role::Link.is_primary_control(), "links do not get a bonus");
  }
}
