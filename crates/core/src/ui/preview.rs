//! Background loading of preview images.
//!
//! Previews are decoded off the UI thread and sent back stamped with a
//! generation number. The UI only applies an event whose stamp matches the
//! latest request, so a slow load can never overwrite a newer selection.

use std::fs;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::image_source::to_color_image;
use crate::selection::PreviewSource;
use crate::ui::state::WorkerEvent;

/// Timeout for fetching a remote preview, independent of the analysis
/// timeout so a sluggish preview does not hold the UI hostage.
const PREVIEW_FETCH_TIMEOUT_SECS: u64 = 10;

/// Decodes the selected source on a background thread.
///
/// Every outcome is reported through `tx`; a dropped receiver just means the
/// app is shutting down and the send result is ignored.
pub(crate) fn spawn_preview_load(source: PreviewSource, generation: u64, tx: Sender<WorkerEvent>) {
    thread::spawn(move || {
        let event = match load(source) {
            Ok(image) => WorkerEvent::Preview { generation, image },
            Err(message) => {
                warn!(%message, "preview load failed");
                WorkerEvent::PreviewFailed {
                    generation,
                    message,
                }
            }
        };
        let _ = tx.send(event);
    });
}

fn load(source: PreviewSource) -> Result<eframe::egui::ColorImage, String> {
    let bytes = match source {
        PreviewSource::File(path) => {
            fs::read(&path).map_err(|e| format!("cannot read {}: {e}", path.display()))?
        }
        PreviewSource::Url(url) => fetch_url(&url)?,
    };
    let image =
        image::load_from_memory(&bytes).map_err(|e| format!("cannot decode image: {e}"))?;
    Ok(to_color_image(&image))
}

fn fetch_url(url: &str) -> Result<Vec<u8>, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start preview runtime: {e}"))?;

    runtime.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PREVIEW_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("cannot build preview client: {e}"))?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("cannot fetch preview: {e}"))?;
        if !response.status().is_success() {
            return Err(format!("preview fetch returned HTTP {}", response.status().as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("cannot read preview body: {e}"))?;
        Ok(bytes.to_vec())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn file_preview_reports_failure_for_missing_files() {
        let (tx, rx) = channel();
        spawn_preview_load(
            PreviewSource::File("/nonexistent/leaf.jpg".into()),
            7,
            tx,
        );

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::PreviewFailed { generation, .. } => assert_eq!(generation, 7),
            _ => panic!("expected a preview failure"),
        }
    }

    #[test]
    fn file_preview_decodes_a_real_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        image::DynamicImage::new_rgb8(2, 2)
            .save(&path)
            .unwrap();

        let (tx, rx) = channel();
        spawn_preview_load(PreviewSource::File(path), 3, tx);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::Preview { generation, image } => {
                assert_eq!(generation, 3);
                assert_eq!(image.size, [2, 2]);
            }
            _ => panic!("expected a decoded preview"),
        }
    }
}
