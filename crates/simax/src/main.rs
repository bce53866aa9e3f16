/*!
`simax` - drive the iOS Simulator from a terminal.

Each command prints its result as JSON on stdout; logs go to stderr and are
filtered by `IOS_SIM_LOG_LEVEL` (default `info`). Failed outcomes exit with
status 1, fatal errors (no permission, Simulator not running, no window)
with status 2.
*/

use clap::{Parser, Subcommand};
use simax::a11y::Direction;
use simax::AlertAction;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "simax")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
enum Commands {
  /// Print the accessibility tree of the target window
  Tree,
  /// Resolve an element by identifier, label, title, or value
  Find { query: String },
  /// Press an element
  Tap { query: String },
  /// Press the smallest pressable element at a screen point
  TapAt { x: f64, y: f64 },
  /// Dismiss a system permission alert (allow or deny)
  Alert { action: AlertAction },
  /// Wait for an element to appear
  Wait {
    query: String,
    #[arg(default_value_t = 10.0)]
    seconds: f64,
  },
  /// Wait for text to appear anywhere in the window
  WaitText {
    text: String,
    #[arg(default_value_t = 10.0)]
    seconds: f64,
  },
  /// Scroll the content under the window centre (up, down, left, right)
  Swipe { direction: Direction },
}

fn init_logging() {
  env_logger::Builder::from_env(env_logger::Env::new().filter_or("IOS_SIM_LOG_LEVEL", "info"))
    .target(env_logger::Target::Stderr)
    .init();
}

fn print_json(value: &impl serde::Serialize) {
  match serde_json::to_string_pretty(value) {
    Ok(json) => println!("{json}"),
    Err(e) => log::error!("Failed to serialize result: {e}"),
  }
}

#[cfg(target_os = "macos")]
#[allow(clippy::needless_pass_by_value)]
fn run(command: Commands) -> simax::SimaxResult<bool> {
  use simax::clamped_seconds as seconds;

  let mut simax = simax::Simax::new();

  let outcome = match command {
    Commands::Tree => {
      print_json(&simax.get_ui_tree()?);
      return Ok(true);
    }
    Commands::Find { query } => simax.find_element(&query)?,
    Commands::Tap { query } => simax.tap_element(&query)?,
    Commands::TapAt { x, y } => simax.tap_coordinates(x, y)?,
    Commands::Alert { action } => simax.handle_permission_alert(action)?,
    Commands::Wait { query, seconds: s } => simax.wait_for_element(&query, seconds(s))?,
    Commands::WaitText { text, seconds: s } => simax.wait_for_text(&text, seconds(s))?,
    Commands::Swipe { direction } => simax.swipe(direction, None)?,
  };
  print_json(&outcome);
  Ok(outcome.is_success)
}

#[cfg(not(target_os = "macos"))]
#[allow(clippy::needless_pass_by_value)]
fn run(_command: Commands) -> simax::SimaxResult<bool> {
  Err(simax::SimaxError::InvalidArgument(
    "simax drives the macOS Simulator app and only runs on macOS.".to_owned(),
  ))
}

fn main() -> ExitCode {
  init_logging();
  let cli = Cli::parse();
  match run(cli.command) {
    Ok(true) => ExitCode::SUCCESS,
    Ok(false) => ExitCode::FAILURE,
    Err(e) => {
      log::error!("{e}");
      print_json(&serde_json::json!({ "success": false, "message": e.to_string(), "data": null }));
      ExitCode::from(2)
    }
  }
}
