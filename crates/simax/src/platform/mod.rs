/*!
Platform layer: the `Platform` trait plus OS implementations.

The macOS implementation is only compiled on macOS; elsewhere the engine can
still be driven through any other `Platform` implementation.
*/

mod mapping;
mod traits;

pub(crate) use mapping::{
  action_from_platform, action_to_platform, attribute_to_platform, ax_attribute, ax_role,
  is_alert_container, role_from_platform,
};
pub use traits::{KeyStroke, Platform, PlatformHandle};

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::{ElementHandle, MacPlatform};
