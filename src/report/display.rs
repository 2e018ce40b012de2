//! Best-effort display of the saved chart image.
//!
//! Showing the chart never fails the run: a missing display or viewer is
//! logged and ignored.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Open `path` in the platform image viewer if a display is available.
///
/// Returns whether a viewer was launched.
pub fn show_image(path: &Path) -> bool {
    if !display_available(|key| std::env::var_os(key).is_some()) {
        info!("No display surface detected; chart saved to {}", path.display());
        return false;
    }

    let mut command = viewer_command(path);
    debug!("Launching viewer: {:?}", command);

    match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => true,
        Err(e) => {
            warn!("Could not open chart viewer: {}", e);
            false
        }
    }
}

/// Whether a graphical session is reachable, given an env lookup.
fn display_available(has_var: impl Fn(&str) -> bool) -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    has_var("DISPLAY") || has_var("WAYLAND_DISPLAY")
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
