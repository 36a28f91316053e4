// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter page — capture or upload photos, keep or discard each one,
// arrange the kept photos, and save them as a single PDF.
//
// "Capture" opens a native file dialog for image selection.

use dioxus::prelude::*;

use bildpress_core::types::DocumentType;

use crate::session::{Session, StatusKind};

#[component]
pub fn Converter() -> Element {
    let mut session = use_context::<Signal<Session>>();
    let view = session.read().view();

    let status_colour = |kind: StatusKind| match kind {
        StatusKind::Success => "#1e8e3e",
        StatusKind::Info => "#666",
        StatusKind::Warning => "#b26a00",
        StatusKind::Error => "#d93025",
    };

    rsx! {
        div {
            h1 { "\u{1F4F8} Image to PDF Converter" }
            p { style: "color: #666;", "Capture or upload photos, put them in order, and download one PDF." }

            // Capture / upload button
            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                onclick: move |_| {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", DocumentType::image_extensions())
                        .pick_file()
                    {
                        tracing::info!(path = %path.display(), "image chosen");
                        session.write().stage_file(&path);
                    }
                },
                "\u{1F4F7} Capture or Upload Photo"
            }

            // Pending capture
            if let Some(pending) = view.pending.clone() {
                div { style: "padding: 12px; border: 1px solid #ccc; border-radius: 8px; margin-bottom: 16px;",
                    if let Some(src) = pending.preview.clone() {
                        img { src: "{src}", alt: "{pending.label}",
                            style: "display: block; max-width: 100%; max-height: 160px; margin: 0 auto 8px auto; border-radius: 4px;",
                        }
                    }
                    p { style: "margin: 0 0 8px 0;",
                        strong { "{pending.label}" }
                        span { style: "color: #888; margin-left: 8px;", "{pending.width}\u{00D7}{pending.height}px" }
                    }
                    div { style: "display: flex; gap: 8px;",
                        button {
                            style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white;",
                            onclick: move |_| {
                                session.write().keep_pending();
                            },
                            "\u{2705} Keep Photo"
                        }
                        button {
                            style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                            onclick: move |_| {
                                session.write().discard_pending();
                            },
                            "\u{1F5D1}\u{FE0F} Discard Photo"
                        }
                    }
                }
            }

            // Kept photos
            if view.rows.is_empty() {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "No photos kept yet."
                }
            } else {
                h3 { "\u{1F4C2} Reorder & Manage Images" }
                for row in view.rows.clone() {
                    {
                        let added = row.added_at.format("%H:%M:%S").to_string();

                        rsx! {
                            div { key: "{row.name}",
                                style: "display: flex; align-items: center; gap: 8px; padding: 8px 0; border-bottom: 1px solid #f0f0f0;",
                                if let Some(src) = row.preview.clone() {
                                    img { src: "{src}", alt: "{row.name}",
                                        style: "width: 64px; height: 64px; object-fit: cover; border-radius: 4px;",
                                    }
                                }
                                div { style: "flex: 1;",
                                    strong { "{row.name}" }
                                    p { style: "color: #888; font-size: 12px; margin: 2px 0 0 0;",
                                        "{row.width}\u{00D7}{row.height}px \u{00B7} kept {added}"
                                    }
                                }
                                button {
                                    disabled: !row.can_move_up,
                                    onclick: {
                                        let name = row.name.clone();
                                        move |_| {
                                            session.write().move_up(&name);
                                        }
                                    },
                                    "\u{25B2}"
                                }
                                button {
                                    disabled: !row.can_move_down,
                                    onclick: {
                                        let name = row.name.clone();
                                        move |_| {
                                            session.write().move_down(&name);
                                        }
                                    },
                                    "\u{25BC}"
                                }
                                button {
                                    style: "color: #ff3b30;",
                                    onclick: {
                                        let name = row.name.clone();
                                        move |_| {
                                            session.write().delete(&name);
                                        }
                                    },
                                    "\u{1F5D1}\u{FE0F} Delete"
                                }
                            }
                        }
                    }
                }
            }

            // Export
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; margin-top: 16px;",
                disabled: !view.can_export,
                onclick: move |_| {
                    let file_name = session.read().export_file_name().to_owned();
                    if let Some(path) = rfd::FileDialog::new()
                        .set_file_name(file_name)
                        .add_filter("PDF", &["pdf"])
                        .save_file()
                    {
                        session.write().export_to(&path);
                    }
                },
                "\u{1F4C4} Convert to PDF"
            }

            // Status
            if let Some(status) = view.status.clone() {
                p { style: "margin-top: 12px; color: {status_colour(status.kind)}; font-size: 14px; text-align: center;",
                    "{status.text}"
                }
            }
        }
    }
}
