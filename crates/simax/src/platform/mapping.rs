/*!
Bidirectional mappings between engine accessibility types and AX* strings.

The iOS Simulator is reached through the macOS accessibility API, so these
strings are what every `Platform` implementation speaks.
*/

use crate::a11y::{Action, Attribute, Role};

/// AX attribute string constants (kAX*Attribute).
pub(crate) mod ax_attribute {
  pub(crate) const ROLE: &str = "AXRole";
  pub(crate) const SUBROLE: &str = "AXSubrole";
  pub(crate) const TITLE: &str = "AXTitle";
  pub(crate) const LABEL: &str = "AXLabel";
  pub(crate) const IDENTIFIER: &str = "AXIdentifier";
  pub(crate) const VALUE: &str = "AXValue";
  pub(crate) const FRAME: &str = "AXFrame";
  pub(crate) const ENABLED: &str = "AXEnabled";
  pub(crate) const CHILDREN: &str = "AXChildren";
  pub(crate) const WINDOWS: &str = "AXWindows";
  pub(crate) const FOCUSED_WINDOW: &str = "AXFocusedWindow";
  pub(crate) const MAIN_WINDOW: &str = "AXMainWindow";
}

/// Convert an engine attribute to its AX string.
pub(crate) const fn attribute_to_platform(a: Attribute) -> &'static str {
  match a {
    Attribute::Role => ax_attribute::ROLE,
    Attribute::Subrole => ax_attribute::SUBROLE,
    Attribute::Title => ax_attribute::TITLE,
    Attribute::Label => ax_attribute::LABEL,
    Attribute::Identifier => ax_attribute::IDENTIFIER,
    Attribute::Value => ax_attribute::VALUE,
    Attribute::Frame => ax_attribute::FRAME,
    Attribute::Enabled => ax_attribute::ENABLED,
    Attribute::Children => ax_attribute::CHILDREN,
    Attribute::Windows => ax_attribute::WINDOWS,
    Attribute::FocusedWindow => ax_attribute::FOCUSED_WINDOW,
    Attribute::MainWindow => ax_attribute::MAIN_WINDOW,
  }
}

/// AX action string constants (kAX*Action).
pub(crate) mod ax_action {
  pub(crate) const PRESS: &str = "AXPress";
  pub(crate) const CONFIRM: &str = "AXConfirm";
  pub(crate) const CANCEL: &str = "AXCancel";
  pub(crate) const SHOW_MENU: &str = "AXShowMenu";
  pub(crate) const SCROLL_UP: &str = "AXScrollUp";
  pub(crate) const SCROLL_DOWN: &str = "AXScrollDown";
  pub(crate) const SCROLL_LEFT: &str = "AXScrollLeft";
  pub(crate) const SCROLL_RIGHT: &str = "AXScrollRight";
}

/// Convert our Action to its AX string.
pub(crate) const fn action_to_platform(a: Action) -> &'static str {
  match a {
    Action::Press => ax_action::PRESS,
    Action::Confirm => ax_action::CONFIRM,
    Action::Cancel => ax_action::CANCEL,
    Action::ShowMenu => ax_action::SHOW_MENU,
    Action::ScrollUp => ax_action::SCROLL_UP,
    Action::ScrollDown => ax_action::SCROLL_DOWN,
    Action::ScrollLeft => ax_action::SCROLL_LEFT,
    Action::ScrollRight => ax_action::SCROLL_RIGHT,
  }
}

/// Convert an AX action string to our Action.
pub(crate) fn action_from_platform(s: &str) -> Option<Action> {
  match s {
    ax_action::PRESS => Some(Action::Press),
    ax_action::CONFIRM => Some(Action::Confirm),
    ax_action::CANCEL => Some(Action::Cancel),
    ax_action::SHOW_MENU => Some(Action::ShowMenu),
    ax_action::SCROLL_UP => Some(Action::ScrollUp),
    ax_action::SCROLL_DOWN => Some(Action::ScrollDown),
    ax_action::SCROLL_LEFT => Some(Action::ScrollLeft),
    ax_action::SCROLL_RIGHT => Some(Action::ScrollRight),
    _ => None,
  }
}

/// AX role string constants (kAX*Role).
pub(crate) mod ax_role {
  // Structural
  pub(crate) const APPLICATION: &str = "AXApplication";
  pub(crate) const WINDOW: &str = "AXWindow";
  pub(crate) const GROUP: &str = "AXGroup";
  pub(crate) const SCROLL_AREA: &str = "AXScrollArea";
  pub(crate) const TOOLBAR: &str = "AXToolbar";

  // Modal surfaces
  pub(crate) const ALERT: &str = "AXAlert";
  pub(crate) const DIALOG: &str = "AXDialog";
  pub(crate) const SHEET: &str = "AXSheet";

  // Navigation
  pub(crate) const MENU: &str = "AXMenu";
  pub(crate) const MENU_ITEM: &str = "AXMenuItem";
  pub(crate) const TAB: &str = "AXTab";
  pub(crate) const TAB_GROUP: &str = "AXTabGroup";

  // Collections
  pub(crate) const LIST: &str = "AXList";
  pub(crate) const ROW: &str = "AXRow";
  pub(crate) const TABLE: &str = "AXTable";
  pub(crate) const CELL: &str = "AXCell";

  // Interactive
  pub(crate) const BUTTON: &str = "AXButton";
  pub(crate) const DEFAULT_BUTTON: &str = "AXDefaultButton";
  pub(crate) const MENU_BUTTON: &str = "AXMenuButton";
  pub(crate) const LINK: &str = "AXLink";
  pub(crate) const TEXT_FIELD: &str = "AXTextField";
  pub(crate) const SECURE_TEXT_FIELD: &str = "AXSecureTextField";
  pub(crate) const TEXT_AREA: &str = "AXTextArea";
  pub(crate) const SEARCH_FIELD: &str = "AXSearchField";
  pub(crate) const COMBO_BOX: &str = "AXComboBox";
  pub(crate) const CHECKBOX: &str = "AXCheckBox";
  pub(crate) const RADIO_BUTTON: &str = "AXRadioButton";
  pub(crate) const SLIDER: &str = "AXSlider";
  pub(crate) const STEPPER: &str = "AXStepper";
  pub(crate) const INCREMENTOR: &str = "AXIncrementor";
  pub(crate) const PROGRESS_INDICATOR: &str = "AXProgressIndicator";

  // Static content
  pub(crate) const STATIC_TEXT: &str = "AXStaticText";
  pub(crate) const HEADING: &str = "AXHeading";
  pub(crate) const IMAGE: &str = "AXImage";

  // Generic elements (known, non-semantic chrome)
  pub(crate) const SCROLL_BAR: &str = "AXScrollBar";
  pub(crate) const VALUE_INDICATOR: &str = "AXValueIndicator";
  pub(crate) const SPLITTER: &str = "AXSplitter";
  pub(crate) const LAYOUT_AREA: &str = "AXLayoutArea";
  pub(crate) const LAYOUT_ITEM: &str = "AXLayoutItem";

  pub(crate) const UNKNOWN: &str = "AXUnknown";
}

/// AX subrole string constants that mark system prompts.
pub(crate) mod ax_subrole {
  pub(crate) const DIALOG: &str = "AXDialog";
  pub(crate) const SYSTEM_DIALOG: &str = "AXSystemDialog";
}

/// Convert an AX role string to our Role.
///
/// Exact strings only; `AXSplitGroup` and friends are not plain groups.
pub(crate) fn role_from_platform(platform_role: &str) -> Role {
  match platform_role {
    // Structural
    ax_role::APPLICATION => Role::Application,
    ax_role::WINDOW => Role::Window,
    ax_role::GROUP => Role::Group,
    ax_role::SCROLL_AREA => Role::ScrollArea,
    ax_role::TOOLBAR => Role::Toolbar,

    // Modal surfaces
    ax_role::ALERT => Role::Alert,
    ax_role::DIALOG => Role::Dialog,
    ax_role::SHEET => Role::Sheet,

    // Navigation
    ax_role::MENU => Role::Menu,
    ax_role::MENU_ITEM => Role::MenuItem,
    ax_role::TAB => Role::Tab,
    ax_role::TAB_GROUP => Role::TabList,

    // Collections
    ax_role::LIST => Role::List,
    ax_role::ROW => Role::Row,
    ax_role::TABLE => Role::Table,
    ax_role::CELL => Role::Cell,

    // Interactive
    ax_role::BUTTON | ax_role::DEFAULT_BUTTON | ax_role::MENU_BUTTON => Role::Button,
    ax_role::LINK => Role::Link,
    ax_role::TEXT_FIELD | ax_role::SECURE_TEXT_FIELD => Role::TextField,
    ax_role::TEXT_AREA => Role::TextArea,
    ax_role::SEARCH_FIELD => Role::SearchField,
    ax_role::COMBO_BOX => Role::ComboBox,
    ax_role::CHECKBOX => Role::Checkbox,
    ax_role::RADIO_BUTTON => Role::RadioButton,
    ax_role::SLIDER => Role::Slider,
    ax_role::STEPPER | ax_role::INCREMENTOR => Role::Stepper,
    ax_role::PROGRESS_INDICATOR => Role::ProgressBar,

    // Static content
    ax_role::STATIC_TEXT => Role::StaticText,
    ax_role::HEADING => Role::Heading,
    ax_role::IMAGE => Role::Image,

    ax_role::SCROLL_BAR
    | ax_role::VALUE_INDICATOR
    | ax_role::SPLITTER
    | ax_role::LAYOUT_AREA
    | ax_role::LAYOUT_ITEM => Role::GenericElement,

    ax_role::UNKNOWN => Role::Unknown,

    _ => {
      log::trace!("Unmapped AX role: {platform_role}");
      Role::Unknown
    }
  }
}

/// Whether a role/subrole pair describes a system alert or sheet.
pub(crate) fn is_alert_container(role: Option<&str>, subrole: Option<&str>) -> bool {
  role.map(role_from_platform).is_some_and(|r| r.is_alert_container())
    || matches!(
      subrole,
      Some(ax_subrole::DIALOG | ax_subrole::SYSTEM_DIALOG)
    )
}
