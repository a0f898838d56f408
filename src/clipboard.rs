//! Clipboard publishing with a fixed fallback chain.
//!
//! Some clipboard backends hand pending content to the window that owns the
//! selection, and that content vanishes when the window is destroyed. The
//! commit path therefore publishes through external tools (or arboard) while
//! the overlay is still alive; callers must invoke [`publish`] before any
//! window teardown.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::debug_println;

/// Platform clipboard tools, tried strictly in this order. Each receives the
/// colour string over stdin. First clean exit wins.
const TOOLS: &[(&str, &[&str])] = &[
    ("xclip", &["-i"]),
    ("xsel", &["--input"]),
    ("clip", &[]),
];

/// Best-effort publish. A tool that is not installed or exits non-zero is
/// skipped; if the whole chain fails, arboard is the generic fallback. The
/// caller cannot distinguish failure from success - the session commits and
/// exits cleanly either way.
pub fn publish(colour: &str) {
    for (tool, args) in TOOLS {
        match pipe_to(tool, args, colour) {
            Ok(true) => {
                debug_println!("clipboard: published via {}", tool);
                return;
            }
            Ok(false) => log::warn!("clipboard tool {} exited non-zero", tool),
            // Almost always "not found"; try the next mechanism
            Err(e) => debug_println!("clipboard: {} unavailable ({})", tool, e),
        }
    }

    match arboard::Clipboard::new().and_then(|mut c| c.set_text(colour.to_owned())) {
        Ok(()) => debug_println!("clipboard: published via arboard"),
        Err(e) => log::warn!("clipboard publish failed on every mechanism: {}", e),
    }
}

/// Run `tool` with the text piped to stdin. `Ok(true)` on a clean exit,
/// `Ok(false)` on a non-zero exit, `Err` if the tool could not be spawned.
fn pipe_to(tool: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    Ok(child.wait()?.success())
}
