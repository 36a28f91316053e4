// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session — command handlers for one user's photo collection.
//
// Each handler runs to completion, updates the session, and returns a fresh
// `SessionView`. Pages never touch the registry directly; they render a view
// and call handlers. Failures become status messages, never panics.

use std::collections::HashMap;
use std::path::Path;

use bildpress_core::error::{BildpressError, Result};
use bildpress_core::human_errors::{Severity, humanize_error};
use bildpress_core::types::{ExportArtifact, SessionId};
use bildpress_core::ExportConfig;
use bildpress_document::{ImageContent, PdfExporter};
use bildpress_registry::{AddOutcome, ImageRegistry};
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::services::preview;

/// Tone of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Feedback for the last command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn from_error(err: &BildpressError) -> Self {
        let human = humanize_error(err);
        let kind = match human.severity {
            Severity::Transient | Severity::ActionRequired => StatusKind::Warning,
            Severity::Permanent => StatusKind::Error,
        };
        Self::new(kind, human.one_line())
    }
}

/// A decoded capture waiting for Keep or Discard.
#[derive(Debug, Clone)]
struct PendingCapture {
    label: String,
    content: ImageContent,
    preview: Option<String>,
}

impl PendingCapture {
    fn new(label: String, content: ImageContent) -> Self {
        let preview = preview::data_url(&content)
            .inspect_err(|err| warn!(%label, error = %err, "Preview unavailable"))
            .ok();
        Self {
            label,
            content,
            preview,
        }
    }
}

/// Read-only snapshot of the pending capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingView {
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// PNG data URL of a thumbnail, when one could be encoded.
    pub preview: Option<String>,
}

/// Read-only snapshot of one kept photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub added_at: DateTime<Local>,
    pub preview: Option<String>,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

/// Everything a page needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub pending: Option<PendingView>,
    pub rows: Vec<RowView>,
    pub can_export: bool,
    pub status: Option<StatusMessage>,
}

/// One user's photos and the exporter that turns them into a PDF.
pub struct Session {
    id: SessionId,
    registry: ImageRegistry,
    exporter: PdfExporter,
    pending: Option<PendingCapture>,
    /// Thumbnails of kept photos, by display name.
    previews: HashMap<String, String>,
    status: Option<StatusMessage>,
}

impl Session {
    pub fn new(config: ExportConfig) -> Self {
        let id = SessionId::new();
        info!(session = %id, "Session started");
        Self {
            id,
            registry: ImageRegistry::new(),
            exporter: PdfExporter::new(config),
            pending: None,
            previews: HashMap::new(),
            status: None,
        }
    }

    // -- Rendering ------------------------------------------------------------

    /// Pure read of the current state.
    pub fn view(&self) -> SessionView {
        let last = self.registry.len().saturating_sub(1);
        let rows = self
            .registry
            .items()
            .iter()
            .enumerate()
            .map(|(idx, item)| RowView {
                name: item.display_name().to_string(),
                width: item.content().width(),
                height: item.content().height(),
                added_at: item.added_at().with_timezone(&Local),
                preview: self.previews.get(item.display_name().as_str()).cloned(),
                can_move_up: idx > 0,
                can_move_down: idx < last,
            })
            .collect();

        SessionView {
            session_id: self.id,
            pending: self.pending.as_ref().map(|p| PendingView {
                label: p.label.clone(),
                width: p.content.width(),
                height: p.content.height(),
                preview: p.preview.clone(),
            }),
            rows,
            can_export: !self.registry.is_empty(),
            status: self.status.clone(),
        }
    }

    // -- Capture --------------------------------------------------------------

    /// Decode captured or uploaded bytes into the pending slot, replacing any
    /// earlier pending capture.
    pub fn stage_capture(&mut self, bytes: &[u8], label: impl Into<String>) -> SessionView {
        let label = label.into();
        match ImageContent::decode(bytes) {
            Ok(content) => {
                info!(session = %self.id, %label, "Capture staged");
                self.pending = Some(PendingCapture::new(label, content));
                self.status = None;
            }
            Err(err) => self.fail("stage_capture", &err),
        }
        self.view()
    }

    /// Read a file chosen in the upload dialog and stage it.
    pub fn stage_file(&mut self, path: &Path) -> SessionView {
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match ImageContent::open(path) {
            Ok(content) => {
                info!(session = %self.id, %label, "Upload staged");
                self.pending = Some(PendingCapture::new(label, content));
                self.status = None;
            }
            Err(err) => self.fail("stage_file", &err),
        }
        self.view()
    }

    /// Keep the pending capture: it enters the registry unless it is a
    /// duplicate.
    pub fn keep_pending(&mut self) -> SessionView {
        let Some(pending) = self.pending.take() else {
            self.status = Some(StatusMessage::new(StatusKind::Info, "No photo to keep."));
            return self.view();
        };

        match self.registry.add(pending.content) {
            Ok(AddOutcome::Accepted(name)) => {
                if let Some(preview) = pending.preview {
                    self.previews.insert(name.to_string(), preview);
                }
                self.status = Some(StatusMessage::new(
                    StatusKind::Success,
                    format!("Photo added as {name}!"),
                ));
            }
            Ok(AddOutcome::Duplicate { existing }) => {
                self.status = Some(StatusMessage::new(
                    StatusKind::Info,
                    format!("This photo is already in the list as {existing}."),
                ));
            }
            Err(err) => self.fail("keep_pending", &err),
        }
        self.view()
    }

    /// Throw the pending capture away.
    pub fn discard_pending(&mut self) -> SessionView {
        if self.pending.take().is_some() {
            self.status = Some(StatusMessage::new(StatusKind::Info, "Photo discarded!"));
        }
        self.view()
    }

    // -- Arrangement ----------------------------------------------------------

    /// Delete a kept photo by name. Stale names leave the list unchanged.
    pub fn delete(&mut self, name: &str) -> SessionView {
        match self.registry.delete(name) {
            Some(_) => {
                self.previews.remove(name);
                self.status = Some(StatusMessage::new(
                    StatusKind::Info,
                    format!("{name} removed."),
                ));
            }
            None => self.fail("delete", &BildpressError::NotFound(name.to_owned())),
        }
        self.view()
    }

    /// Apply a full new order of names.
    pub fn reorder<S: AsRef<str>>(&mut self, names: &[S]) -> SessionView {
        match self.registry.reorder(names) {
            Ok(()) => self.status = None,
            Err(err) => self.fail("reorder", &err),
        }
        self.view()
    }

    /// Swap a photo with the one before it.
    pub fn move_up(&mut self, name: &str) -> SessionView {
        match self.registry.position(name) {
            Some(0) => {}
            Some(idx) => self.apply_move(name, idx - 1),
            None => self.fail("move_up", &BildpressError::NotFound(name.to_owned())),
        }
        self.view()
    }

    /// Swap a photo with the one after it.
    pub fn move_down(&mut self, name: &str) -> SessionView {
        match self.registry.position(name) {
            Some(idx) if idx + 1 < self.registry.len() => self.apply_move(name, idx + 1),
            Some(_) => {}
            None => self.fail("move_down", &BildpressError::NotFound(name.to_owned())),
        }
        self.view()
    }

    fn apply_move(&mut self, name: &str, to_index: usize) {
        match self.registry.move_item(name, to_index) {
            Ok(()) => self.status = None,
            Err(err) => self.fail("move", &err),
        }
    }

    // -- Export ---------------------------------------------------------------

    /// Render the kept photos, in order, as one PDF.
    pub fn export(&mut self) -> Result<ExportArtifact> {
        let pages = self.registry.export_order();
        match self.exporter.export_artifact(&pages) {
            Ok(artifact) => {
                info!(session = %self.id, pages = artifact.page_count, "PDF exported");
                self.status = Some(StatusMessage::new(
                    StatusKind::Success,
                    format!("PDF ready ({} pages).", artifact.page_count),
                ));
                Ok(artifact)
            }
            Err(err) => {
                self.fail("export", &err);
                Err(err)
            }
        }
    }

    /// Render and save the PDF to `path`.
    pub fn export_to(&mut self, path: &Path) -> SessionView {
        if let Ok(artifact) = self.export() {
            match std::fs::write(path, &artifact.bytes) {
                Ok(()) => {
                    info!(session = %self.id, path = %path.display(), "PDF saved");
                    self.status = Some(StatusMessage::new(
                        StatusKind::Success,
                        format!("Saved {} ({} pages).", path.display(), artifact.page_count),
                    ));
                }
                Err(err) => self.fail("export_to", &BildpressError::Io(err)),
            }
        }
        self.view()
    }

    /// File name the save dialog should suggest.
    pub fn export_file_name(&self) -> &str {
        &self.exporter.config().file_name
    }

    fn fail(&mut self, command: &str, err: &BildpressError) {
        warn!(session = %self.id, command, error = %err, "Command had no effect");
        self.status = Some(StatusMessage::from_error(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildpress_document::PdfReader;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32, shade: u8) -> Vec<u8> {
        ImageContent::from_rgb(RgbImage::from_pixel(width, height, Rgb([shade, 0, 255 - shade])))
            .to_png_bytes()
            .unwrap()
    }

    fn pixels(encoded: &[u8]) -> Vec<u8> {
        ImageContent::decode(encoded).unwrap().as_rgb().as_raw().clone()
    }

    fn row_names(view: &SessionView) -> Vec<&str> {
        view.rows.iter().map(|row| row.name.as_str()).collect()
    }

    fn keep(session: &mut Session, bytes: &[u8]) -> SessionView {
        session.stage_capture(bytes, "camera");
        session.keep_pending()
    }

    #[test]
    fn new_session_is_empty_and_cannot_export() {
        let session = Session::new(ExportConfig::default());
        let view = session.view();
        assert!(view.rows.is_empty());
        assert!(view.pending.is_none());
        assert!(!view.can_export);
    }

    #[test]
    fn staged_capture_waits_for_keep() {
        let mut session = Session::new(ExportConfig::default());
        let view = session.stage_capture(&png(4, 3, 10), "IMG_0001.png");

        let pending = view.pending.unwrap();
        assert_eq!(pending.label, "IMG_0001.png");
        assert_eq!((pending.width, pending.height), (4, 3));
        assert!(view.rows.is_empty());

        let view = session.keep_pending();
        assert!(view.pending.is_none());
        assert_eq!(row_names(&view), vec!["Image_1"]);
        assert_eq!(view.status.unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn previews_follow_pending_and_kept_photos() {
        let mut session = Session::new(ExportConfig::default());
        let view = session.stage_capture(&png(400, 200, 10), "camera");
        let pending_preview = view.pending.unwrap().preview.unwrap();
        assert!(pending_preview.starts_with("data:image/png;base64,"));

        let view = session.keep_pending();
        assert_eq!(view.rows[0].preview.as_deref(), Some(pending_preview.as_str()));

        keep(&mut session, &png(2, 2, 99));
        let view = session.delete("Image_1");
        assert_eq!(row_names(&view), vec!["Image_2"]);
        assert!(view.rows[0].preview.is_some());
        assert!(!session.previews.contains_key("Image_1"));
    }

    #[test]
    fn rows_carry_when_each_photo_was_kept() {
        let mut session = Session::new(ExportConfig::default());
        keep(&mut session, &png(2, 2, 1));
        keep(&mut session, &png(2, 2, 2));

        let view = session.reorder(&["Image_2", "Image_1"]);
        assert_eq!(row_names(&view), vec!["Image_2", "Image_1"]);
        assert!(view.rows[1].added_at <= view.rows[0].added_at);
    }

    #[test]
    fn discard_drops_the_capture() {
        let mut session = Session::new(ExportConfig::default());
        session.stage_capture(&png(2, 2, 1), "camera");
        let view = session.discard_pending();
        assert!(view.pending.is_none());
        assert!(view.rows.is_empty());
        assert_eq!(view.status.unwrap().text, "Photo discarded!");
    }

    #[test]
    fn undecodable_upload_is_reported_not_staged() {
        let mut session = Session::new(ExportConfig::default());
        let view = session.stage_capture(b"not a photo", "notes.txt");
        assert!(view.pending.is_none());
        assert!(view.status.is_some());
    }

    #[test]
    fn keeping_a_duplicate_reports_the_original_name() {
        let mut session = Session::new(ExportConfig::default());
        keep(&mut session, &png(3, 3, 50));
        let view = keep(&mut session, &png(3, 3, 50));

        assert_eq!(row_names(&view), vec!["Image_1"]);
        let status = view.status.unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.contains("Image_1"));
    }

    #[test]
    fn keep_without_pending_is_harmless() {
        let mut session = Session::new(ExportConfig::default());
        let view = session.keep_pending();
        assert!(view.rows.is_empty());
        assert_eq!(view.status.unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn moves_respect_the_ends_of_the_list() {
        let mut session = Session::new(ExportConfig::default());
        keep(&mut session, &png(2, 2, 1));
        keep(&mut session, &png(2, 2, 2));
        keep(&mut session, &png(2, 2, 3));

        let view = session.move_up("Image_1");
        assert_eq!(row_names(&view), vec!["Image_1", "Image_2", "Image_3"]);
        assert!(!view.rows[0].can_move_up);
        assert!(!view.rows[2].can_move_down);

        let view = session.move_up("Image_3");
        assert_eq!(row_names(&view), vec!["Image_1", "Image_3", "Image_2"]);

        let view = session.move_down("Image_1");
        assert_eq!(row_names(&view), vec!["Image_3", "Image_1", "Image_2"]);

        let view = session.move_down("Image_2");
        assert_eq!(row_names(&view), vec!["Image_3", "Image_1", "Image_2"]);
    }

    #[test]
    fn stale_names_change_nothing() {
        let mut session = Session::new(ExportConfig::default());
        keep(&mut session, &png(2, 2, 1));

        let before = row_names(&session.view()).join(",");
        for view in [
            session.delete("Image_9"),
            session.move_up("Image_9"),
            session.move_down("Image_9"),
            session.reorder(&["Image_1", "Image_1"]),
        ] {
            assert_eq!(row_names(&view).join(","), before);
            assert_eq!(view.status.unwrap().kind, StatusKind::Warning);
        }
    }

    #[test]
    fn export_of_empty_session_is_unavailable() {
        let mut session = Session::new(ExportConfig::default());
        let err = session.export().unwrap_err();
        assert!(matches!(err, BildpressError::EmptyInput));
        assert_eq!(session.view().status.unwrap().kind, StatusKind::Warning);
    }

    #[test]
    fn full_walkthrough_exports_in_chosen_order() {
        let mut session = Session::new(ExportConfig::default());
        let a = png(4, 2, 10);
        let b = png(3, 5, 200);

        keep(&mut session, &a);
        let view = keep(&mut session, &a);
        assert_eq!(row_names(&view), vec!["Image_1"]);

        let view = keep(&mut session, &b);
        assert_eq!(row_names(&view), vec!["Image_1", "Image_2"]);

        let view = session.reorder(&["Image_2", "Image_1"]);
        assert_eq!(row_names(&view), vec!["Image_2", "Image_1"]);

        let artifact = session.export().unwrap();
        assert_eq!(artifact.file_name, "converted.pdf");
        assert_eq!(artifact.mime_type, "application/pdf");
        let reader = PdfReader::from_bytes(&artifact.bytes).unwrap();
        assert_eq!(reader.page_image_sizes().unwrap(), vec![(3, 5), (4, 2)]);
        assert_eq!(reader.page_image_data().unwrap(), vec![pixels(&b), pixels(&a)]);

        let view = session.delete("Image_1");
        assert_eq!(row_names(&view), vec!["Image_2"]);
    }

    #[test]
    fn export_to_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(session_file_name());
        let mut session = Session::new(ExportConfig::default());
        keep(&mut session, &png(2, 2, 7));

        let view = session.export_to(&path);
        assert_eq!(view.status.unwrap().kind, StatusKind::Success);
        assert_eq!(PdfReader::open(&path).unwrap().page_count(), 1);
    }

    #[test]
    fn stage_file_uses_the_file_name_as_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, png(3, 3, 90)).unwrap();

        let mut session = Session::new(ExportConfig::default());
        let view = session.stage_file(&path);
        assert_eq!(view.pending.unwrap().label, "receipt.png");
    }

    #[test]
    fn stage_file_rejects_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("converted.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let mut session = Session::new(ExportConfig::default());
        let view = session.stage_file(&path);
        assert!(view.pending.is_none());
        let status = view.status.unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("isn't supported"));
    }

    fn session_file_name() -> String {
        Session::new(ExportConfig::default()).export_file_name().to_owned()
    }
}
