/*!
Simax - accessibility-tree navigation for the iOS Simulator

Drives the Simulator app through the macOS accessibility API: reads the UI
tree, resolves elements by fuzzy identifier, presses them, waits for state,
and dismisses system permission alerts.

```ignore
use simax::{AlertAction, Simax};
use std::time::Duration;

let mut simax = Simax::new();

// Every operation returns an Outcome; only fatal conditions are `Err`.
let outcome = simax.tap_element("Continue")?;
assert!(outcome.is_success);

simax.handle_permission_alert(AlertAction::Allow)?;
simax.wait_for_text("Welcome", Duration::from_secs(5))?;

// Snapshot of the whole window
let tree = simax.get_ui_tree()?;
if let Some(button) = tree.find("sign in") {
    println!("{:?}", button.frame);
}
```
*/

mod config;
mod core;
mod matching;
mod recording;
mod types;

pub mod a11y;
pub mod platform;

#[cfg(test)]
mod testing;

pub use crate::config::{clamped_seconds, AlertLabels, Config, MAX_TIMEOUT_SECONDS, SIMULATOR_BUNDLE_ID};
pub use crate::core::{AlertAction, Simax, SimaxBuilder};
pub use crate::recording::{Launcher, RecordingInfo, RecordingRegistry, DEFAULT_DEVICE};
pub use types::*;
