//! Core library for leafscan, a plant leaf disease diagnosis client.
//!
//! The crate connects a local image (or an image URL) to a remote
//! classification service and renders the returned diagnosis, either in a
//! desktop window or programmatically through [`LeafScan`].
//!
//! # Modules
//!
//! - [`config`]: Server URL and timeout configuration
//! - [`error`]: Error types and user-facing messages
//! - [`selection`]: Pending-input state and URL validation
//! - [`image_source`]: Reading local images into upload payloads
//! - [`client`]: HTTP client for the prediction endpoints
//! - [`ui`]: Desktop window built on eframe
//!
//! # Quick start
//!
//! ```ignore
//! use leafscan_core::LeafScan;
//!
//! leafscan_core::init();
//! let app = LeafScan::new()?;
//! let diagnosis = app.analyze_file("leaf.jpg").await?;
//! println!("{}: {}", diagnosis.disease, diagnosis.confidence_percent());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod image_source;
pub mod selection;
pub mod ui;

pub use client::{PredictionClient, PredictionResult};
pub use config::Config;
pub use error::{AppError, Result};
pub use selection::PendingInput;

use std::path::Path;

/// High-level facade over the prediction client and the desktop UI.
pub struct LeafScan {
    config: Config,
}

impl LeafScan {
    /// Creates a facade from the environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the environment holds invalid
    /// values.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates a facade from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Analyzes a local image file.
    pub async fn analyze_file(&self, path: impl AsRef<Path>) -> Result<PredictionResult> {
        let client = PredictionClient::new(&self.config)?;
        client
            .submit(&PendingInput::LocalImage(path.as_ref().to_path_buf()))
            .await
    }

    /// Analyzes an image by URL, validating it before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] when the string is not an http(s)
    /// URL.
    pub async fn analyze_url(&self, url: &str) -> Result<PredictionResult> {
        if !selection::is_valid_image_url(url) {
            return Err(AppError::InvalidUrl(url.to_string()));
        }
        let client = PredictionClient::new(&self.config)?;
        client.analyze_url(url).await
    }

    /// Checks whether the configured server answers at all.
    pub async fn check_server(&self) -> Result<bool> {
        let client = PredictionClient::new(&self.config)?;
        Ok(client.ping().await)
    }

    /// Hands control to the desktop window until it is closed.
    pub fn run_interactive(self) -> Result<()> {
        ui::run_app(self.config)
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference for adjusting configuration at runtime.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

/// Initializes the library environment.
///
/// Loads `.env` files for configuration. Call once at program start.
pub fn init() {
    let _ = dotenvy::dotenv();
}
