// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.

use serde::{Deserialize, Serialize};

use crate::types::{EXPORT_FILE_NAME, PageLayout};

/// Resolution used when a configured DPI is missing or nonsensical.
pub const DEFAULT_DPI: f32 = 72.0;

/// Settings that shape the exported PDF.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Page-per-image placement.
    pub layout: PageLayout,
    /// Pixels per inch used to size pages and images.
    pub dpi: f32,
    /// Margin around the image for [`PageLayout::Paper`].
    pub margin_mm: f32,
    /// Title written to the PDF /Info dictionary.
    pub title: String,
    /// File name offered for download.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: PageLayout::FitImage,
            dpi: DEFAULT_DPI,
            margin_mm: 15.0,
            title: "Converted Images".into(),
            file_name: EXPORT_FILE_NAME.into(),
        }
    }
}

impl ExportConfig {
    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            self.dpi = DEFAULT_DPI;
        }
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            self.margin_mm = 0.0;
        }
        if self.file_name.trim().is_empty() {
            self.file_name = EXPORT_FILE_NAME.into();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaperSize;

    #[test]
    fn partial_json_uses_defaults() {
        let config: ExportConfig = serde_json::from_str(r#"{ "dpi": 150.0 }"#).unwrap();
        assert_eq!(config.dpi, 150.0);
        assert_eq!(config.layout, PageLayout::FitImage);
        assert_eq!(config.file_name, "converted.pdf");
    }

    #[test]
    fn paper_layout_round_trips_through_json() {
        let config = ExportConfig {
            layout: PageLayout::Paper {
                size: PaperSize::Letter,
            },
            ..ExportConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ExportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn sanitized_repairs_bad_values() {
        let config = ExportConfig {
            dpi: -3.0,
            margin_mm: f32::NAN,
            file_name: "  ".into(),
            ..ExportConfig::default()
        }
        .sanitized();
        assert_eq!(config.dpi, DEFAULT_DPI);
        assert_eq!(config.margin_mm, 0.0);
        assert_eq!(config.file_name, EXPORT_FILE_NAME);
    }
}
