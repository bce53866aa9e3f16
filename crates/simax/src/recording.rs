/*!
Screen recording through `xcrun simctl io <device> recordVideo`.

At most one recording runs per device. Stopping sends SIGINT so `simctl` can
finalize the file, then escalates to SIGTERM if it does not exit in time.
*/

use crate::config::deadline_after;
use crate::types::{SimaxError, SimaxResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use ts_rs::TS;

/// Device used when none is given and `IOS_SIM_DEVICE_ID` is unset.
pub const DEFAULT_DEVICE: &str = "booted";

const DEVICE_ENV: &str = "IOS_SIM_DEVICE_ID";
const DEFAULT_GRACE: Duration = Duration::from_secs(5);
const EXIT_POLL: Duration = Duration::from_millis(20);

/// Spawns the recorder process for `(device, output)`.
pub type Launcher = Box<dyn Fn(&str, &Path) -> std::io::Result<Child> + Send + Sync>;

/// Where a recording is (or was) being written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordingInfo {
  /// Simulator UDID, or `booted`.
  pub device_id: String,
  /// Output video file.
  pub path: String,
}

type Signal = fn(&mut Child) -> SimaxResult<()>;

/// How a recorder is asked to stop, gently first.
#[derive(Debug, Clone, Copy)]
struct StopSignals {
  interrupt: Signal,
  terminate: Signal,
}

const PROCESS_SIGNALS: StopSignals = StopSignals {
  interrupt,
  terminate,
};

#[derive(Debug)]
struct ActiveRecording {
  child: Child,
  path: PathBuf,
}

/// Registry of in-flight recordings, keyed by device.
pub struct RecordingRegistry {
  active: Mutex<HashMap<String, ActiveRecording>>,
  launcher: Launcher,
  signals: StopSignals,
  grace: Duration,
}

impl std::fmt::Debug for RecordingRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RecordingRegistry")
      .field("devices", &self.active.lock().keys().collect::<Vec<_>>())
      .field("grace", &self.grace)
      .finish_non_exhaustive()
  }
}

impl Default for RecordingRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl RecordingRegistry {
  /// Registry that records with `xcrun simctl`.
  pub fn new() -> Self {
    Self::with_launcher(Box::new(simctl_record))
  }

  /// Registry with a custom recorder process.
  pub fn with_launcher(launcher: Launcher) -> Self {
    Self {
      active: Mutex::new(HashMap::new()),
      launcher,
      signals: PROCESS_SIGNALS,
      grace: DEFAULT_GRACE,
    }
  }

  /// How long each stop signal is given before escalating.
  #[must_use]
  pub const fn grace(mut self, grace: Duration) -> Self {
    self.grace = grace;
    self
  }

  /// Start recording `device` (default: `$IOS_SIM_DEVICE_ID` or `booted`).
  ///
  /// Without `output`, writes `~/Downloads/simulator_recording_<secs>.mp4`.
  pub fn start(&self, device: Option<&str>, output: Option<&Path>) -> SimaxResult<RecordingInfo> {
    let device = resolve_device(device);
    let mut active = self.active.lock();
    if active.contains_key(&device) {
      return Err(SimaxError::Recording(
        "Recording already in progress for device.".into(),
      ));
    }

    let path = match output {
      Some(path) => expand_home(path),
      None => default_output_path()?,
    };
    let child = (self.launcher)(&device, &path)?;
    log::info!("Recording {device} to {}", path.display());

    let info = RecordingInfo {
      device_id: device.clone(),
      path: path.display().to_string(),
    };
    active.insert(device, ActiveRecording { child, path });
    Ok(info)
  }

  /// Stop the recording for `device` and wait for the file to be finalized.
  ///
  /// If stopping fails part-way, the recorder is killed before the error is
  /// returned, so no process outlives its registry entry.
  pub fn stop(&self, device: Option<&str>) -> SimaxResult<RecordingInfo> {
    let device = resolve_device(device);
    let Some(mut recording) = self.active.lock().remove(&device) else {
      return Err(SimaxError::Recording("No active recording for device.".into()));
    };

    let stopped = match recording.child.try_wait() {
      Ok(Some(_)) => {
        return Err(SimaxError::Recording(
          "Recording process already stopped.".into(),
        ))
      }
      Ok(None) => self.shut_down(&device, &mut recording.child),
      Err(e) => Err(e.into()),
    };
    if let Err(e) = stopped {
      log::warn!("Stopping recorder for {device} failed ({e}), killing it");
      force_kill(&mut recording.child);
      return Err(e);
    }

    Ok(RecordingInfo {
      device_id: device,
      path: recording.path.display().to_string(),
    })
  }

  /// Interrupt, then terminate, then kill, waiting `grace` between steps.
  fn shut_down(&self, device: &str, child: &mut Child) -> SimaxResult<()> {
    (self.signals.interrupt)(child)?;
    if wait_for_exit(child, self.grace)? {
      return Ok(());
    }
    log::warn!("Recorder for {device} ignored SIGINT, terminating");
    (self.signals.terminate)(child)?;
    if !wait_for_exit(child, self.grace)? {
      child.kill()?;
      child.wait()?;
    }
    Ok(())
  }

  /// Whether a recording for `device` is registered.
  pub fn is_recording(&self, device: Option<&str>) -> bool {
    self.active.lock().contains_key(&resolve_device(device))
  }
}

fn resolve_device(device: Option<&str>) -> String {
  device
    .map(str::trim)
    .filter(|d| !d.is_empty())
    .map(str::to_owned)
    .or_else(|| std::env::var(DEVICE_ENV).ok().filter(|d| !d.trim().is_empty()))
    .unwrap_or_else(|| DEFAULT_DEVICE.to_owned())
}

fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), home_dir()) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

fn recording_file_name(secs: u64) -> String {
  format!("simulator_recording_{secs}.mp4")
}

fn default_output_path() -> SimaxResult<PathBuf> {
  let home = home_dir().ok_or_else(|| SimaxError::Recording("HOME is not set.".into()))?;
  let downloads = home.join("Downloads");
  std::fs::create_dir_all(&downloads)?;
  let secs = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map_or(0, |d| d.as_secs());
  Ok(downloads.join(recording_file_name(secs)))
}

fn simctl_record(device: &str, path: &Path) -> std::io::Result<Child> {
  Command::new("xcrun")
    .args(["simctl", "io", device, "recordVideo"])
    .arg(path)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
}

/// Poll until the child exits or `timeout` elapses. `true` once exited.
fn wait_for_exit(child: &mut Child, timeout: Duration) -> SimaxResult<bool> {
  let deadline = deadline_after(timeout);
  loop {
    if child.try_wait()?.is_some() {
      return Ok(true);
    }
    if Instant::now() >= deadline {
      return Ok(false);
    }
    thread::sleep(EXIT_POLL);
  }
}

/// Kill and reap, logging rather than returning failures.
fn force_kill(child: &mut Child) {
  if let Err(e) = child.kill() {
    log::debug!("Killing recorder {} failed: {e}", child.id());
  }
  if let Err(e) = child.wait() {
    log::debug!("Reaping recorder {} failed: {e}", child.id());
  }
}

#[cfg(unix)]
fn send_signal(child: &Child, sig: libc::c_int) -> SimaxResult<()> {
  let pid = libc::pid_t::try_from(child.id())
    .map_err(|_| SimaxError::Recording(format!("Invalid recorder pid {}", child.id())))?;
  #[allow(unsafe_code)]
  // SAFETY: kill(2) has no memory-safety preconditions; the pid belongs to a
  // child we have not reaped yet.
  let rc = unsafe { libc::kill(pid, sig) };
  if rc == 0 {
    Ok(())
  } else {
    Err(std::io::Error::last_os_error().into())
  }
}

#[cfg(unix)]
fn interrupt(child: &mut Child) -> SimaxResult<()> {
  send_signal(child, libc::SIGINT)
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> SimaxResult<()> {
  send_signal(child, libc::SIGTERM)
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) -> SimaxResult<()> {
  child.kill().map_err(Into::into)
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> SimaxResult<()> {
  child.kill().map_err(Into::into)
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;

  fn spawning(program: &'static str, args: &'static [&'static str]) -> RecordingRegistry {
    RecordingRegistry::with_launcher(Box::new(move |_, _| Command::new(program).args(args).spawn()))
      .grace(Duration::from_millis(300))
  }

  fn sleeper() -> RecordingRegistry {
    spawning("sleep", &["5"])
  }

  fn shell(script: &'static str) -> RecordingRegistry {
    RecordingRegistry::with_launcher(Box::new(move |_, _| Command::new("sh").args(["-c", script]).spawn()))
      .grace(Duration::from_millis(300))
  }

  mod start {
    use super::*;

    #[test]
    fn second_start_for_same_device_is_rejected() {
      let registry = sleeper();
      let out = Path::new("/tmp/simax-a.mp4");
      let info = registry.start(Some("A"), Some(out)).unwrap();
      assert_eq!(info.device_id, "A");
      assert_eq!(info.path, "/tmp/simax-a.mp4");

      let err = registry.start(Some("A"), Some(out)).unwrap_err();
      assert_eq!(err.to_string(), "Recording already in progress for device.");
      assert!(registry.start(Some("B"), Some(out)).is_ok(), "other devices are independent");

      registry.stop(Some("A")).unwrap();
      registry.stop(Some("B")).unwrap();
    }

    #[test]
    fn launcher_failure_registers_nothing() {
      let registry = RecordingRegistry::with_launcher(Box::new(|_, _| {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "xcrun"))
      }));
      assert!(matches!(
        registry.start(Some("A"), Some(Path::new("/tmp/x.mp4"))),
        Err(SimaxError::Io(_))
      ));
      assert!(!registry.is_recording(Some("A")));
    }
  }

  mod stop {
    use super::*;

    #[test]
    fn interrupts_running_recorder() {
      let registry = sleeper();
      registry.start(Some("A"), Some(Path::new("/tmp/simax-a.mp4"))).unwrap();
      let started = Instant::now();
      let info = registry.stop(Some("A")).unwrap();
      assert_eq!(info.path, "/tmp/simax-a.mp4");
      assert!(started.elapsed() < Duration::from_secs(3), "SIGINT ended it");
      assert!(!registry.is_recording(Some("A")));
    }

    #[test]
    fn escalates_when_interrupt_is_ignored() {
      let registry = shell("trap '' INT; while true; do sleep 0.05; done");
      registry.start(Some("A"), Some(Path::new("/tmp/simax-a.mp4"))).unwrap();
      thread::sleep(Duration::from_millis(100));
      assert!(registry.stop(Some("A")).is_ok());
    }

    #[test]
    fn unbounded_grace_is_accepted() {
      let registry = sleeper().grace(Duration::MAX);
      registry.start(Some("A"), Some(Path::new("/tmp/simax-a.mp4"))).unwrap();
      assert!(registry.stop(Some("A")).is_ok());
    }

    #[test]
    fn failed_interrupt_still_reaps_the_recorder() {
      let pid = std::sync::Arc::new(Mutex::new(None));
      let spawned = pid.clone();
      let mut registry = RecordingRegistry::with_launcher(Box::new(move |_, _| {
        let child = Command::new("sleep").arg("5").spawn()?;
        *spawned.lock() = Some(child.id());
        Ok(child)
      }));
      registry.signals.interrupt = |_| Err(SimaxError::Recording("signal refused".into()));

      registry.start(Some("A"), Some(Path::new("/tmp/simax-a.mp4"))).unwrap();
      let err = registry.stop(Some("A")).unwrap_err();
      assert_eq!(err.to_string(), "signal refused");
      assert!(!registry.is_recording(Some("A")));

      let pid = pid.lock().unwrap().to_string();
      let alive = Command::new("kill").args(["-0", &pid]).status().unwrap();
      assert!(!alive.success(), "recorder {pid} was left running");
    }

    #[test]
    fn unknown_device() {
      let registry = sleeper();
      let err = registry.stop(Some("nobody")).unwrap_err();
      assert_eq!(err.to_string(), "No active recording for device.");
    }

    #[test]
    fn exited_recorder_is_reported_and_forgotten() {
      let registry = shell("exit 0");
      registry.start(Some("A"), Some(Path::new("/tmp/simax-a.mp4"))).unwrap();
      thread::sleep(Duration::from_millis(200));
      let err = registry.stop(Some("A")).unwrap_err();
      assert_eq!(err.to_string(), "Recording process already stopped.");
      assert!(!registry.is_recording(Some("A")));
    }
  }

  mod paths {
    use super::*;

    #[test]
    fn explicit_device_is_trimmed() {
      assert_eq!(resolve_device(Some("  ABC-123 ")), "ABC-123");
    }

    #[test]
    fn default_file_name() {
      assert_eq!(recording_file_name(1_700_000_000), "simulator_recording_1700000000.mp4");
    }

    #[test]
    fn tilde_expands_to_home() {
      let Some(home) = home_dir() else { return };
      assert_eq!(expand_home(Path::new("~/clip.mp4")), home.join("clip.mp4"));
      assert_eq!(expand_home(Path::new("/abs/clip.mp4")), PathBuf::from("/abs/clip.mp4"));
    }
  }
}
