// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the application data directory.
///
/// Only read from; photos never leave the session, so nothing is created here.
pub fn data_dir() -> PathBuf {
    resolve(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// XDG data dir, then `~/.local/share`, then `/tmp` as a last resort.
fn resolve(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    let base = match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".local").join("share"),
        _ => PathBuf::from("/tmp"),
    };
    base.join("bildpress")
}
