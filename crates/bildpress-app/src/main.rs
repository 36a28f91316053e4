// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildpress — photos to one PDF.
//
// Entry point. Initialises logging, loads export settings, opens a session,
// and launches the Dioxus UI.

mod pages;
mod services;
mod session;

use dioxus::prelude::*;

use pages::converter::Converter;
use services::{config, data_dir};
use session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Bildpress starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    // One session per window; it lives exactly as long as the UI does.
    use_context_provider(|| {
        let settings = config::load_config(&data_dir::data_dir());
        Signal::new(Session::new(settings))
    });

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif;",
            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px; max-width: 640px; margin: 0 auto; width: 100%;",
                Converter {}
            }
        }
    }
}
