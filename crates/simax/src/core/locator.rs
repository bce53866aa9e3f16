/*!
Window locator - resolves the Simulator process and its target window.

Also owns the accessibility-trust check, which gates every public operation.
*/

use crate::config::Config;
use crate::platform::{ax_attribute, Platform, PlatformHandle};
use crate::types::{ProcessId, SimaxError, SimaxResult};
use std::time::{Duration, Instant};

/// Cached result of the accessibility-trust query.
///
/// Only passing checks are remembered; a failure is re-queried next time.
#[derive(Debug, Default)]
pub(crate) struct TrustState {
  passed_at: Option<Instant>,
}

impl TrustState {
  pub(crate) fn ensure<P: Platform>(&mut self, platform: &P, ttl: Duration) -> SimaxResult<()> {
    if self.passed_at.is_some_and(|at| at.elapsed() < ttl) {
      return Ok(());
    }
    if platform.is_trusted() {
      self.passed_at = Some(Instant::now());
      Ok(())
    } else {
      self.passed_at = None;
      Err(SimaxError::PermissionDenied)
    }
  }
}

#[derive(Debug)]
struct CachedWindow<H> {
  app: H,
  window: H,
  title: Option<String>,
  captured_at: Instant,
}

#[derive(Debug)]
pub(crate) struct WindowLocator<H> {
  application: Option<(ProcessId, H)>,
  cached: Option<CachedWindow<H>>,
  target_title: Option<String>,
}

impl<H: PlatformHandle> WindowLocator<H> {
  pub(crate) const fn new(target_title: Option<String>) -> Self {
    Self {
      application: None,
      cached: None,
      target_title,
    }
  }

  pub(crate) fn target_title(&self) -> Option<&str> {
    self.target_title.as_deref()
  }

  /// Change the title filter. Drops the cached window.
  pub(crate) fn set_target_title(&mut self, title: Option<String>) {
    self.target_title = title;
    self.cached = None;
  }

  /// PID of the last resolved Simulator process, if any.
  pub(crate) fn pid(&self) -> Option<ProcessId> {
    self.application.as_ref().map(|(pid, _)| *pid)
  }

  /// The Simulator process and its root accessibility element.
  pub(crate) fn application<P>(&mut self, platform: &P, config: &Config) -> SimaxResult<(ProcessId, H)>
  where
    P: Platform<Handle = H>,
  {
    if let Some((pid, app)) = &self.application {
      if platform.is_running(*pid) {
        return Ok((*pid, app.clone()));
      }
      log::debug!("Simulator process {pid} is gone, rediscovering");
    }

    let pid = platform
      .find_application(&config.bundle_id)
      .ok_or(SimaxError::SimulatorNotRunning)?;
    if config.activate_app {
      platform.activate_application(pid);
    }
    let app = platform.application_element(pid);
    self.application = Some((pid, app.clone()));
    Ok((pid, app))
  }

  /// Resolve `(application, window)`, reusing a fresh cached pair.
  pub(crate) fn window<P>(&mut self, platform: &P, config: &Config) -> SimaxResult<(H, H)>
  where
    P: Platform<Handle = H>,
  {
    if let Some(cached) = &self.cached {
      if cached.captured_at.elapsed() < config.window_cache_ttl && cached.title == self.target_title {
        return Ok((cached.app.clone(), cached.window.clone()));
      }
    }

    let (_, app) = self.application(platform, config)?;
    let window = match &self.target_title {
      Some(title) => find_titled_window(platform, &app, title).ok_or_else(|| {
        SimaxError::WindowNotFound {
          title: Some(title.clone()),
        }
      })?,
      None => platform
        .element_attribute(&app, ax_attribute::FOCUSED_WINDOW)
        .or_else(|| platform.element_attribute(&app, ax_attribute::MAIN_WINDOW))
        .or_else(|| {
          platform
            .element_list_attribute(&app, ax_attribute::WINDOWS)
            .into_iter()
            .next()
        })
        .ok_or(SimaxError::WindowNotFound { title: None })?,
    };

    self.cached = Some(CachedWindow {
      app: app.clone(),
      window: window.clone(),
      title: self.target_title.clone(),
      captured_at: Instant::now(),
    });
    Ok((app, window))
  }
}

fn find_titled_window<P: Platform>(platform: &P, app: &P::Handle, title: &str) -> Option<P::Handle> {
  let needle = title.to_lowercase();
  platform
    .element_list_attribute(app, ax_attribute::WINDOWS)
    .into_iter()
    .find(|window| {
      platform
        .attribute(window, ax_attribute::TITLE)
        .and_then(|v| v.as_str().map(str::to_lowercase))
        .is_some_and(|t| t.contains(&needle))
    })
}
