// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export settings loaded from `config.json` in the data directory.

use std::path::Path;

use bildpress_core::ExportConfig;
use bildpress_core::error::{BildpressError, Result};
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Load export settings, falling back to defaults when the file is missing or
/// unreadable.
pub fn load_config(data_dir: &Path) -> ExportConfig {
    let path = data_dir.join(CONFIG_FILE);
    match read_config(&path) {
        Ok(config) => {
            info!(path = %path.display(), "export settings loaded");
            config
        }
        Err(BildpressError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            ExportConfig::default()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "settings file ignored, using defaults");
            ExportConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<ExportConfig> {
    let data = std::fs::read_to_string(path)?;
    let config: ExportConfig = serde_json::from_str(&data)?;
    Ok(config.sanitized())
}
