/*!
Core Simax instance - owns the platform, configuration, and per-call state.

# Module Structure

- `mod.rs` - Simax struct, construction, per-operation preamble
- `cache.rs` - per-operation memoization of platform lookups
- `locator.rs` - Simulator process/window discovery and the trust check
- `traversal.rs` - the per-operation context every algorithm runs on
- `tree.rs` - tree materialization with grid-scan fallback
- `resolver.rs` - breadth-first scored search over live handles
- `alerts.rs` - system alert dismissal
- `wait.rs` - polling with adaptive backoff
- `gestures.rs` - coordinate taps, long presses, swipes, scroll-to, retries
- `actions.rs` - tap, text input, target window selection
- `queries.rs` - tree and element state reads
- `assertions.rs` - pass/fail checks over queries

Every public operation runs the same preamble: check accessibility trust,
reset the element cache, resolve `(application, window)`. Fatal conditions
come back as `Err`; everything else is an [`Outcome`](crate::Outcome).

# Example

```ignore
let mut simax = Simax::new();
let outcome = simax.tap_element("Continue")?;
println!("{}", outcome.message);
```
*/

mod actions;
mod alerts;
mod assertions;
mod cache;
mod gestures;
mod locator;
mod queries;
mod resolver;
mod traversal;
mod tree;
mod wait;

pub use alerts::AlertAction;

use crate::config::Config;
use crate::platform::Platform;
use crate::types::SimaxResult;
use cache::ElementCache;
use locator::{TrustState, WindowLocator};
use std::time::Duration;
use traversal::Traversal;

#[cfg(target_os = "macos")]
use crate::platform::MacPlatform;

/// Accessibility navigation engine for one Simulator.
///
/// Operations take `&mut self`; one instance serves one caller at a time.
pub struct Simax<P: Platform> {
  platform: P,
  config: Config,
  cache: ElementCache<P::Handle>,
  locator: WindowLocator<P::Handle>,
  trust: TrustState,
}

impl<P: Platform> std::fmt::Debug for Simax<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Simax")
      .field("config", &self.config)
      .field("target_window_title", &self.locator.target_title())
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a Simax instance.
///
/// Starts from [`Config::from_env`].
///
/// # Example
///
/// ```ignore
/// let simax = SimaxBuilder::new()
///     .strict_actions(true)
///     .target_window_title("iPhone 15")
///     .build();
/// ```
#[derive(Debug, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct SimaxBuilder {
  config: Config,
}

impl Default for SimaxBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl SimaxBuilder {
  /// Builder seeded from the environment.
  pub fn new() -> Self {
    Self {
      config: Config::from_env(),
    }
  }

  /// Replace the whole configuration.
  pub fn config(mut self, config: Config) -> Self {
    self.config = config;
    self
  }

  /// Fail instead of soft-skipping when no element can take an action.
  pub const fn strict_actions(mut self, strict: bool) -> Self {
    self.config.strict_actions = strict;
    self
  }

  /// Only consider windows whose title contains `title` (case-insensitive).
  pub fn target_window_title(mut self, title: impl Into<String>) -> Self {
    self.config.target_window_title = Some(title.into());
    self
  }

  /// Overall deadline for [`Simax::handle_permission_alert`].
  pub const fn alert_timeout(mut self, timeout: Duration) -> Self {
    self.config.alert_timeout = timeout;
    self
  }

  /// Build on an explicit platform backend.
  pub fn build_with<P: Platform>(self, platform: P) -> Simax<P> {
    Simax {
      platform,
      locator: WindowLocator::new(self.config.target_window_title.clone()),
      config: self.config,
      cache: ElementCache::new(),
      trust: TrustState::default(),
    }
  }

  /// Build on the native macOS backend.
  #[cfg(target_os = "macos")]
  pub fn build(self) -> Simax<MacPlatform> {
    self.build_with(MacPlatform::new())
  }
}

#[cfg(target_os = "macos")]
impl Simax<MacPlatform> {
  /// Engine on the native backend, configured from the environment.
  ///
  /// For custom configuration, use [`Simax::builder()`].
  pub fn new() -> Self {
    SimaxBuilder::new().build()
  }

  /// Create a builder for configuring a new instance.
  pub fn builder() -> SimaxBuilder {
    SimaxBuilder::new()
  }
}

#[cfg(target_os = "macos")]
impl Default for Simax<MacPlatform> {
  fn default() -> Self {
    Self::new()
  }
}

impl<P: Platform> Simax<P> {
  /// Active configuration.
  pub const fn config(&self) -> &Config {
    &self.config
  }

  /// Platform backend.
  pub const fn platform(&self) -> &P {
    &self.platform
  }

  /// Trust check, cache reset, window resolution.
  fn prepare(&mut self) -> SimaxResult<(P::Handle, P::Handle)> {
    self.trust.ensure(&self.platform, self.config.trust_cache_ttl)?;
    self.cache.reset();
    self.locator.window(&self.platform, &self.config)
  }

  /// Run `op` against a fresh traversal of the current window.
  fn run<T>(&mut self, op: impl FnOnce(&mut Traversal<'_, P>, &P::Handle, &P::Handle) -> T) -> SimaxResult<T> {
    let (app, window) = self.prepare()?;
    let mut traversal = Traversal::new(&self.platform, &mut self.cache, &self.config);
    Ok(op(&mut traversal, &app, &window))
  }
}
