//! Input selection state and the URL validity predicate.
//!
//! This module owns the "what will be analyzed" state: at any moment exactly
//! one of a local image file or a remote image URL is the pending input, and
//! picking one always deactivates the other. Selection never touches the
//! network; it only updates state and asks the caller to refresh the preview.

use std::path::{Path, PathBuf};

use url::Url;

/// The input that the next submission will carry.
///
/// Exactly one variant is active at a time; a new selection of either kind
/// replaces whatever was there before. The last selection persists until it
/// is replaced, it is never cleared explicitly.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PendingInput {
    /// Nothing selected yet.
    #[default]
    None,
    /// A readable image file on the local machine.
    LocalImage(PathBuf),
    /// An image URL the server will fetch itself.
    RemoteUrl(String),
}

impl PendingInput {
    /// Returns true when no input has been selected.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// What the preview panel should render after a selection change.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewSource {
    /// Decode a local file.
    File(PathBuf),
    /// Fetch and decode a remote image.
    Url(String),
}

/// Checks whether a string is a syntactically valid image URL.
///
/// Accepts any string that parses as a URL with an `http` or `https` scheme
/// and a non-empty host. Partial text while the user is still typing fails
/// this check and is simply not an error. No reachability check is performed.
pub fn is_valid_image_url(text: &str) -> bool {
    match Url::parse(text) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Tracks the pending input across selection events.
///
/// All three entry points (file dialog, drag-and-drop, URL edits) funnel
/// through here so the "exactly one active input" invariant is enforced by
/// the [`PendingInput`] sum type rather than by convention.
#[derive(Debug, Default)]
pub struct SelectionController {
    pending: PendingInput,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current pending input.
    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    /// Clones the pending input for an in-flight submission.
    ///
    /// Taken at the moment Analyze is pressed so that a later selection
    /// change cannot alter a request that is already on the wire.
    pub fn snapshot(&self) -> PendingInput {
        self.pending.clone()
    }

    /// The user picked a file through the native dialog.
    pub fn file_picked(&mut self, path: PathBuf) -> PreviewSource {
        self.pending = PendingInput::LocalImage(path.clone());
        PreviewSource::File(path)
    }

    /// The user dropped a file onto the window.
    pub fn file_dropped(&mut self, path: PathBuf) -> PreviewSource {
        self.file_picked(path)
    }

    /// The URL text field changed.
    ///
    /// Returns a preview request only when the text is a valid URL; invalid
    /// or partial text leaves the pending input untouched.
    pub fn url_text_changed(&mut self, text: &str) -> Option<PreviewSource> {
        if !is_valid_image_url(text) {
            return None;
        }
        self.pending = PendingInput::RemoteUrl(text.to_string());
        Some(PreviewSource::Url(text.to_string()))
    }
}

/// Extracts the filename used for the multipart upload part.
pub fn upload_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_accepts_http_and_https_with_host() {
        assert!(is_valid_image_url("http://example.com/leaf.jpg"));
        assert!(is_valid_image_url("https://example.com"));
        assert!(is_valid_image_url("https://192.168.1.7:5000/sample.png"));
    }

    #[test]
    fn predicate_rejects_missing_scheme_or_host() {
        assert!(!is_valid_image_url("example.com/leaf.jpg"));
        assert!(!is_valid_image_url("http://"));
        assert!(!is_valid_image_url("https:///leaf.jpg"));
        assert!(!is_valid_image_url(""));
        assert!(!is_valid_image_url("htt"));
    }

    #[test]
    fn predicate_rejects_other_schemes() {
        assert!(!is_valid_image_url("ftp://example.com/leaf.jpg"));
        assert!(!is_valid_image_url("file:///tmp/leaf.jpg"));
    }

    #[test]
    fn picking_a_file_replaces_an_active_url() {
        let mut selection = SelectionController::new();
        selection.url_text_changed("https://example.com/leaf.jpg");
        selection.file_picked(PathBuf::from("/tmp/leaf.jpg"));

        assert_eq!(
            *selection.pending(),
            PendingInput::LocalImage(PathBuf::from("/tmp/leaf.jpg"))
        );
    }

    #[test]
    fn entering_a_url_replaces_an_active_file() {
        let mut selection = SelectionController::new();
        selection.file_dropped(PathBuf::from("/tmp/leaf.jpg"));
        let preview = selection.url_text_changed("https://example.com/leaf.jpg");

        assert_eq!(
            preview,
            Some(PreviewSource::Url("https://example.com/leaf.jpg".into()))
        );
        assert_eq!(
            *selection.pending(),
            PendingInput::RemoteUrl("https://example.com/leaf.jpg".into())
        );
    }

    #[test]
    fn partial_url_text_is_ignored_silently() {
        let mut selection = SelectionController::new();
        selection.file_picked(PathBuf::from("/tmp/leaf.jpg"));

        // Typing in progress must neither preview nor steal the selection
        assert_eq!(selection.url_text_changed("https://exa"), None);
        assert_eq!(
            *selection.pending(),
            PendingInput::LocalImage(PathBuf::from("/tmp/leaf.jpg"))
        );
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let mut selection = SelectionController::new();
        selection.file_picked(PathBuf::from("/tmp/a.jpg"));
        let snapshot = selection.snapshot();
        selection.file_picked(PathBuf::from("/tmp/b.jpg"));

        assert_eq!(snapshot, PendingInput::LocalImage(PathBuf::from("/tmp/a.jpg")));
    }

    #[test]
    fn upload_filename_falls_back_for_pathless_handles() {
        assert_eq!(upload_filename(Path::new("/tmp/leaf.jpg")), "leaf.jpg");
        assert_eq!(upload_filename(Path::new("/tmp/..")), "image");
    }
}
