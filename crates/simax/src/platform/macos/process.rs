/*!
Process discovery, liveness, and activation through `NSRunningApplication`.
*/

#![allow(unsafe_code)]

use super::raw_pid;
use crate::types::ProcessId;
use objc2::rc::{autoreleasepool, Retained};
use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication};
use objc2_application_services::AXIsProcessTrusted;
use objc2_foundation::NSString;

/// Whether this process may use the accessibility API.
pub(super) fn is_trusted() -> bool {
  unsafe { AXIsProcessTrusted() }
}

/// First live process with `bundle_id`.
pub(super) fn find_by_bundle_id(bundle_id: &str) -> Option<ProcessId> {
  // The AppKit lookups return autoreleased objects.
  autoreleasepool(|_| {
    let id = NSString::from_str(bundle_id);
    let apps = unsafe { NSRunningApplication::runningApplicationsWithBundleIdentifier(&id) };
    apps
      .iter()
      .filter(|app| unsafe { !app.isTerminated() })
      .find_map(|app| u32::try_from(unsafe { app.processIdentifier() }).ok())
      .map(ProcessId)
  })
}

fn running_application(pid: ProcessId) -> Option<Retained<NSRunningApplication>> {
  unsafe { NSRunningApplication::runningApplicationWithProcessIdentifier(raw_pid(pid)) }
}

pub(super) fn is_running(pid: ProcessId) -> bool {
  autoreleasepool(|_| running_application(pid).is_some_and(|app| unsafe { !app.isTerminated() }))
}

/// Bring every window of the process to the front.
pub(super) fn activate(pid: ProcessId) {
  autoreleasepool(|_| {
    let Some(app) = running_application(pid) else {
      log::debug!("Cannot activate PID {pid}: not running");
      return;
    };
    let activated =
      unsafe { app.activateWithOptions(NSApplicationActivationOptions::ActivateAllWindows) };
    if !activated {
      log::debug!("Activation request for PID {pid} was refused");
    }
  });
}
