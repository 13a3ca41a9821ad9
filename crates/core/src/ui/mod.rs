//! User interface components for leafscan.
//!
//! This module provides the desktop window for selecting a leaf photo,
//! submitting it to the classification server, and rendering the diagnosis.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: Submission state machine and worker events
//! - [`settings`]: User preferences and persistence
//! - [`preview`]: Background preview loading
//! - [`app`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use leafscan_core::ui;
//! use leafscan_core::Config;
//!
//! let config = Config::load()?;
//! ui::run_app(config)?;
//! ```

mod app;
mod preview;
mod settings;
mod state;

// Public API exports
pub use app::LeafScanApp;
pub use settings::Settings;
pub use state::UiState;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Launches the desktop window and blocks until it is closed.
///
/// # Errors
///
/// Returns [`AppError::Ui`] if the native window or event loop cannot be
/// created.
pub fn run_app(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([920.0, 680.0])
            .with_title("LeafScan"),
        ..Default::default()
    };

    eframe::run_native(
        "LeafScan",
        options,
        Box::new(move |_cc| Ok(Box::new(LeafScanApp::new(config)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("failed to run UI: {e}")))
}
