//! HTTP client for the remote leaf classification service.
//!
//! Two endpoints exist: `/predict` takes the image bytes as a multipart
//! upload, `/predict-url` passes a URL the server fetches itself. Both return
//! the same JSON body, so everything after dispatch is shared.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::image_source::ImagePayload;
use crate::selection::{is_valid_image_url, PendingInput};

/// Timeout for the lightweight reachability probe, separate from the
/// analysis timeout because a ping should fail fast.
const PING_TIMEOUT_SECS: u64 = 5;

/// A diagnosis as returned by the classification service.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub class_name: String,
    pub disease: String,
    pub confidence: f32,
    pub treatment: String,
    pub prevention: String,
    /// Present in the wire format but not part of the rendered report.
    #[serde(default)]
    pub notes: String,
}

impl PredictionResult {
    /// Formats the confidence as a whole percentage, e.g. `0.873` -> `87%`.
    pub fn confidence_percent(&self) -> String {
        format!("{}%", (self.confidence * 100.0).round() as u32)
    }
}

/// Client for the prediction endpoints of a single server.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: reqwest::Client,
    server_url: String,
    timeout_secs: u64,
}

impl PredictionClient {
    /// Builds a client from the configured server URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            server_url: config.server_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn predict_endpoint(&self) -> String {
        format!("{}/predict", self.server_url)
    }

    fn predict_url_endpoint(&self) -> String {
        format!("{}/predict-url", self.server_url)
    }

    /// Dispatches the pending input to the matching endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoInputSelected`] when nothing is selected, or
    /// when a stored URL no longer passes validation.
    pub async fn submit(&self, input: &PendingInput) -> Result<PredictionResult> {
        match input {
            PendingInput::RemoteUrl(text) if is_valid_image_url(text) => {
                self.analyze_url(text).await
            }
            PendingInput::LocalImage(path) => {
                let payload = ImagePayload::from_path(path)?;
                self.analyze_image(payload).await
            }
            _ => Err(AppError::NoInputSelected),
        }
    }

    /// Uploads image bytes to `/predict` as the multipart part `image`.
    pub async fn analyze_image(&self, payload: ImagePayload) -> Result<PredictionResult> {
        let endpoint = self.predict_endpoint();
        debug!(endpoint = %endpoint, filename = %payload.filename, "uploading image");

        let part = Part::bytes(payload.bytes)
            .file_name(payload.filename)
            .mime_str(&payload.mime)
            .map_err(|e| AppError::transport(format!("invalid content type: {e}")))?;
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        self.read_prediction(response).await
    }

    /// Sends an image URL to `/predict-url` as the form field `url`.
    pub async fn analyze_url(&self, url: &str) -> Result<PredictionResult> {
        let endpoint = self.predict_url_endpoint();
        debug!(endpoint = %endpoint, url = %url, "submitting image url");

        let response = self
            .http
            .post(&endpoint)
            .form(&[("url", url)])
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        self.read_prediction(response).await
    }

    /// Probes the server root to check reachability.
    pub async fn ping(&self) -> bool {
        let request = self
            .http
            .get(format!("{}/", self.server_url))
            .timeout(Duration::from_secs(PING_TIMEOUT_SECS));
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn classify_send_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::transport(format!(
                "request timed out after {}s",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            AppError::transport(format!(
                "cannot reach server at {}: {error}",
                self.server_url
            ))
        } else {
            AppError::transport(error.to_string())
        }
    }

    async fn read_prediction(&self, response: reqwest::Response) -> Result<PredictionResult> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(format!("failed to read response body: {e}")))?;
        let result: PredictionResult = serde_json::from_str(&body)
            .map_err(|e| AppError::transport(format!("malformed response body: {e}")))?;

        info!(disease = %result.disease, confidence = result.confidence, "prediction received");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> PredictionClient {
        let config = Config::builder()
            .with_server_url("http://127.0.0.1:5000")
            .build()
            .unwrap();
        PredictionClient::new(&config).unwrap()
    }

    #[test]
    fn confidence_renders_as_rounded_whole_percent() {
        let mut result = sample_result();
        result.confidence = 0.873;
        assert_eq!(result.confidence_percent(), "87%");

        result.confidence = 0.876;
        assert_eq!(result.confidence_percent(), "88%");

        result.confidence = 1.0;
        assert_eq!(result.confidence_percent(), "100%");
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = test_client();
        assert_eq!(client.predict_endpoint(), "http://127.0.0.1:5000/predict");
        assert_eq!(
            client.predict_url_endpoint(),
            "http://127.0.0.1:5000/predict-url"
        );
    }

    #[tokio::test]
    async fn submitting_nothing_fails_without_touching_the_network() {
        let client = test_client();
        let err = client.submit(&PendingInput::None).await.unwrap_err();
        assert!(matches!(err, AppError::NoInputSelected));
    }

    #[tokio::test]
    async fn stale_invalid_url_is_treated_as_no_input() {
        let client = test_client();
        let err = client
            .submit(&PendingInput::RemoteUrl("not a url".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoInputSelected));
    }

    #[test]
    fn response_schema_parses_all_six_fields() {
        let body = r#"{
            "class_name": "Tomato___Late_blight",
            "disease": "Late Blight",
            "confidence": 0.93,
            "treatment": "Remove infected leaves.",
            "prevention": "Rotate crops.",
            "notes": "High humidity accelerates spread."
        }"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.disease, "Late Blight");
        assert_eq!(result.notes, "High humidity accelerates spread.");
    }

    #[test]
    fn notes_field_defaults_to_empty_when_absent() {
        let body = r#"{
            "class_name": "Tomato___healthy",
            "disease": "Healthy",
            "confidence": 0.99,
            "treatment": "None needed.",
            "prevention": "Keep monitoring."
        }"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.notes, "");
    }

    fn sample_result() -> PredictionResult {
        PredictionResult {
            class_name: "Tomato___Late_blight".into(),
            disease: "Late Blight".into(),
            confidence: 0.9,
            treatment: "Remove infected leaves.".into(),
            prevention: "Rotate crops.".into(),
            notes: String::new(),
        }
    }
}
