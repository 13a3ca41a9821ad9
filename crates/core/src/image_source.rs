//! Loading local image files into an upload-ready payload.
//!
//! A payload is read fully into memory before anything touches the network,
//! so an unreadable file fails the submission locally instead of producing a
//! half-written multipart body.

use std::fs;
use std::path::Path;

use eframe::egui;
use image::DynamicImage;

use crate::error::{AppError, Result};
use crate::selection::upload_filename;

/// Fallback content type when the extension does not map to a known format.
const FALLBACK_MIME: &str = "image/*";

/// An image file read into memory, ready to be sent as a multipart part.
#[derive(Clone, Debug)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: String,
}

impl ImagePayload {
    /// Reads the file at `path` and guesses its content type from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageRead`] when the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| AppError::image(format!("{}: {e}", path.display())))?;

        let mime = image::ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| FALLBACK_MIME.to_string());

        Ok(Self {
            bytes,
            filename: upload_filename(path),
            mime,
        })
    }
}

/// Converts a decoded image into the texture format egui uploads to the GPU.
pub fn to_color_image(image: &DynamicImage) -> egui::ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn payload_guesses_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.jpg");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"not a real jpeg").unwrap();

        let payload = ImagePayload::from_path(&path).unwrap();
        assert_eq!(payload.mime, "image/jpeg");
        assert_eq!(payload.filename, "leaf.jpg");
        assert_eq!(payload.bytes, b"not a real jpeg");
    }

    #[test]
    fn payload_falls_back_for_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.data");
        fs::write(&path, b"bytes").unwrap();

        let payload = ImagePayload::from_path(&path).unwrap();
        assert_eq!(payload.mime, FALLBACK_MIME);
    }

    #[test]
    fn missing_file_is_an_image_read_error() {
        let err = ImagePayload::from_path(Path::new("/nonexistent/leaf.jpg")).unwrap_err();
        assert!(matches!(err, AppError::ImageRead(_)));
    }

    #[test]
    fn conversion_preserves_dimensions() {
        let image = DynamicImage::new_rgba8(4, 3);
        let color = to_color_image(&image);
        assert_eq!(color.size, [4, 3]);
    }
}
