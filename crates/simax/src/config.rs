/*!
Configuration for the simulator engine.

All values have sensible defaults. `Config::from_env()` reads the
`IOS_SIM_*` environment variables once; `SimaxBuilder` can override any field:

```ignore
use simax::{Config, Simax};

let config = Config {
    strict_actions: true,
    ..Config::from_env()
};
let simax = Simax::builder().config(config).build();
```
*/

use std::time::{Duration, Instant};

/// Bundle identifier of the Simulator app hosting iOS devices.
pub const SIMULATOR_BUNDLE_ID: &str = "com.apple.iphonesimulator";

/// Longest timeout accepted from the environment or the command line (one day).
pub const MAX_TIMEOUT_SECONDS: f64 = 86_400.0;

const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 86_400);

const MIN_GRID_STEP: u32 = 5;
const MIN_ALERT_TIMEOUT: Duration = Duration::from_millis(500);

/// Localized button labels used to classify alert buttons.
///
/// Matched case-insensitively against the trimmed button text.
#[derive(Debug, Clone)]
pub struct AlertLabels {
  /// Button labels that accept a prompt ("Allow", "OK", ...).
  pub allow: Vec<String>,
  /// Button labels that decline a prompt ("Don't Allow", "Not Now", ...).
  pub deny: Vec<String>,
}

impl Default for AlertLabels {
  fn default() -> Self {
    let owned = |labels: &[&str]| labels.iter().map(|s| (*s).to_owned()).collect();
    Self {
      allow: owned(&[
        "allow",
        "ok",
        "확인",
        "허용",
        "always allow",
        "allow once",
        "allow while using app",
        "allow while using the app",
      ]),
      deny: owned(&[
        "don't allow",
        "don\u{2019}t allow",
        "deny",
        "not now",
        "later",
        "취소",
        "허용 안 함",
        "허용하지 않음",
      ]),
    }
  }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
  /// Bundle identifier of the app that owns the simulator windows.
  /// Default: `com.apple.iphonesimulator`.
  pub bundle_id: String,

  /// Only use windows whose title contains this (case-insensitive).
  /// Env: `IOS_SIM_WINDOW_TITLE`. Default: none (focused window).
  pub target_window_title: Option<String>,

  /// Grid spacing in points for scanning childless groups.
  /// Env: `IOS_SIM_GRID_STEP`. Default: 40, never below 5.
  pub grid_step: u32,

  /// Upper bound on hit-test points per grid scan.
  /// Env: `IOS_SIM_MAX_GRID_POINTS`. Default: 400.
  pub max_grid_points: u32,

  /// Maximum tree depth; deeper nodes are truncated to leaves.
  /// Env: `IOS_SIM_MAX_DEPTH`. Default: 40.
  pub max_depth: usize,

  /// Report missing pressable/scrollable targets as failures instead of
  /// soft-skipped successes.
  /// Env: `IOS_SIM_STRICT_ACTIONS`. Default: false.
  pub strict_actions: bool,

  /// Bring the Simulator to the front when it is (re)discovered.
  /// Env: `IOS_SIM_ACTIVATE_APP`. Default: false.
  pub activate_app: bool,

  /// How long a passing accessibility-trust check is reused.
  /// Env: `IOS_SIM_ACCESSIBILITY_TRUST_CACHE_TTL_SECONDS`. Default: 5s.
  pub trust_cache_ttl: Duration,

  /// Overall deadline for one `handle_permission_alert` call.
  /// Env: `IOS_SIM_ALERT_TIMEOUT_SECONDS`. Default: 8s, at least 0.5s.
  pub alert_timeout: Duration,

  /// Extra attempts after the first when dismissing an alert.
  /// Default: 3.
  pub alert_retry_count: u32,

  /// Base interval for wait loops before adaptive growth.
  /// Default: 500ms.
  pub poll_interval: Duration,

  /// Lifetime of the cached (app, window) pair.
  /// Default: 200ms.
  pub window_cache_ttl: Duration,

  /// Pause after an alert press before re-checking.
  /// Default: 200ms.
  pub settle_delay: Duration,

  /// Pause between coordinate probes.
  /// Default: 50ms.
  pub probe_delay: Duration,

  /// Pause after each swipe in `scroll_to_element`.
  /// Default: 300ms.
  pub scroll_settle: Duration,

  /// Gap between key-down and key-up events.
  /// Default: 10ms.
  pub key_delay: Duration,

  /// Allow/deny label tables for alert buttons.
  pub alert_labels: AlertLabels,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bundle_id: SIMULATOR_BUNDLE_ID.to_owned(),
      target_window_title: None,
      grid_step: 40,
      max_grid_points: 400,
      max_depth: 40,
      strict_actions: false,
      activate_app: false,
      trust_cache_ttl: Duration::from_secs(5),
      alert_timeout: Duration::from_secs(8),
      alert_retry_count: 3,
      poll_interval: Duration::from_millis(500),
      window_cache_ttl: Duration::from_millis(200),
      settle_delay: Duration::from_millis(200),
      probe_delay: Duration::from_millis(50),
      scroll_settle: Duration::from_millis(300),
      key_delay: Duration::from_millis(10),
      alert_labels: AlertLabels::default(),
    }
  }
}

impl Config {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Defaults overridden by `IOS_SIM_*` environment variables.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Like [`Config::from_env`], reading variables through `lookup`.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let defaults = Self::default();
    let title = lookup("IOS_SIM_WINDOW_TITLE")
      .map(|t| t.trim().to_owned())
      .filter(|t| !t.is_empty());

    Self {
      target_window_title: title,
      grid_step: parse_or("IOS_SIM_GRID_STEP", &lookup, defaults.grid_step).max(MIN_GRID_STEP),
      max_grid_points: parse_or("IOS_SIM_MAX_GRID_POINTS", &lookup, defaults.max_grid_points),
      max_depth: parse_or("IOS_SIM_MAX_DEPTH", &lookup, defaults.max_depth),
      strict_actions: flag_or("IOS_SIM_STRICT_ACTIONS", &lookup, defaults.strict_actions),
      activate_app: flag_or("IOS_SIM_ACTIVATE_APP", &lookup, defaults.activate_app),
      trust_cache_ttl: seconds_or(
        "IOS_SIM_ACCESSIBILITY_TRUST_CACHE_TTL_SECONDS",
        &lookup,
        defaults.trust_cache_ttl,
      ),
      alert_timeout: seconds_or("IOS_SIM_ALERT_TIMEOUT_SECONDS", &lookup, defaults.alert_timeout)
        .max(MIN_ALERT_TIMEOUT),
      ..defaults
    }
  }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T
where
  T: std::str::FromStr + Copy,
{
  let Some(raw) = lookup(key) else {
    return default;
  };
  raw.trim().parse().unwrap_or_else(|_| {
    log::warn!("Ignoring {key}={raw:?}: not a valid number");
    default
  })
}

fn flag_or(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: bool) -> bool {
  lookup(key).map_or(default, |raw| {
    !matches!(
      raw.trim().to_lowercase().as_str(),
      "0" | "false" | "no" | "off"
    )
  })
}

fn seconds_or(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: Duration) -> Duration {
  let secs: f64 = parse_or(key, lookup, default.as_secs_f64());
  if secs > MAX_TIMEOUT_SECONDS {
    log::warn!("{key}={secs} is above {MAX_TIMEOUT_SECONDS}s, clamping");
  }
  clamped_seconds(secs)
}

/// Seconds as a [`Duration`], clamped to `0..=MAX_TIMEOUT_SECONDS`.
///
/// Negative and NaN inputs become zero.
pub fn clamped_seconds(secs: f64) -> Duration {
  // f64::max ignores NaN, f64::clamp would propagate it
  Duration::try_from_secs_f64(secs.max(0.0).min(MAX_TIMEOUT_SECONDS)).unwrap_or(Duration::ZERO)
}

/// `now + timeout`, or a point far in the future when that would overflow.
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
  let now = Instant::now();
  now
    .checked_add(timeout)
    .or_else(|| now.checked_add(FAR_FUTURE))
    .unwrap_or(now)
}
