// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the status line.
//
// Every failure a user can trigger collapses to "nothing happened" or
// "export unavailable"; this module says which, in plain English.

use crate::error::BildpressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth simply trying again.
    Transient,
    /// User must do something first (add a photo, pick another file).
    ActionRequired,
    /// Retrying the same input will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same action again can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    /// Message and suggestion on one line, for the status bar.
    pub fn one_line(&self) -> String {
        format!("{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BildpressError` into a `HumanError`.
pub fn humanize_error(err: &BildpressError) -> HumanError {
    match err {
        // -- Image errors --
        BildpressError::ImageError(detail) => humanize_image_error(detail),

        BildpressError::UnsupportedImage(kind) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Please choose a JPEG, PNG, TIFF, BMP, WebP or GIF photo. (File type: {kind})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Registry errors --
        BildpressError::InvalidOrder(_) => HumanError {
            message: "The new order didn't match the photo list.".into(),
            suggestion: "The list has been left as it was. Try moving the photo again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BildpressError::NotFound(name) => HumanError {
            message: format!("{name} is no longer in the list."),
            suggestion: "It may already have been removed. Nothing was changed.".into(),
            retriable: false,
            severity: Severity::Transient,
        },

        // -- Export errors --
        BildpressError::EmptyInput => HumanError {
            message: "There are no photos to convert yet.".into(),
            suggestion: "Capture or upload at least one photo and keep it, then convert again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildpressError::PdfError(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Try again. If this keeps happening, remove the most recently added photo and retry.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        BildpressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different folder.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildpressError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Default settings are being used instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Parse decoder details into human-readable messages.
fn humanize_image_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("unsupported") || (lower.contains("format") && lower.contains("not")) {
        HumanError {
            message: "This image is in a format we can't read.".into(),
            suggestion: "Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else if lower.contains("eof") || lower.contains("truncated") || lower.contains("unexpected end") {
        HumanError {
            message: "This image seems to be incomplete.".into(),
            suggestion: "The file may not have finished copying. Try taking or uploading the photo again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else if lower.contains("dimension") || lower.contains("too large") || lower.contains("limit") {
        HumanError {
            message: "This image is too large.".into(),
            suggestion: "Try a smaller photo, or lower the camera resolution.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: format!("The image may be damaged. Try another photo. (Detail: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}
