//! HTTP client for the remote conversion service
//!
//! The service owns all the hard work (signal processing, the conversion
//! model, file storage); this module only speaks its contract:
//! `GET /celebrities`, multipart `POST /convert`, and static retrieval
//! under `/results/{filename}`.

use async_trait::async_trait;
use url::Url;

use crate::catalog::Celebrity;
use crate::{Error, Result};

/// A finished audio payload ready for submission
///
/// Produced by microphone capture or a staged upload; handed to the
/// service unchanged (no client-side transcoding).
#[derive(Debug, Clone)]
pub struct AudioPayload {
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
    /// File name sent with the multipart part
    pub file_name: String,
    /// MIME type sent with the multipart part
    pub mime: String,
}

/// Response from `GET /celebrities`
#[derive(serde::Deserialize)]
struct CelebritiesResponse {
    celebrities: Vec<Celebrity>,
}

/// Response from `POST /convert`
///
/// The service also returns `success`/`message` fields; only the produced
/// filename is consumed here.
#[derive(serde::Deserialize)]
struct ConvertResponse {
    converted: String,
}

/// Seam between the workflow and the remote conversion service
#[async_trait]
pub trait VoiceService: Send + Sync {
    /// Fetch the full celebrity catalog
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] if the catalog cannot be retrieved.
    async fn fetch_celebrities(&self) -> Result<Vec<Celebrity>>;

    /// Convert an audio payload to the given celebrity's voice
    ///
    /// Returns the filename of the produced artifact, servable under
    /// `/results/{filename}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if the conversion fails or the
    /// service response is malformed.
    async fn convert(&self, celebrity_id: &str, audio: &AudioPayload) -> Result<String>;
}

/// reqwest-backed implementation of [`VoiceService`]
pub struct HttpVoiceService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVoiceService {
    /// Create a client for the service at `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The service base URL, without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VoiceService for HttpVoiceService {
    async fn fetch_celebrities(&self) -> Result<Vec<Celebrity>> {
        tracing::debug!(url = %self.base_url, "fetching celebrity catalog");

        let response = self
            .client
            .get(format!("{}/celebrities", self.base_url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "catalog request failed");
                Error::Catalog(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "catalog request rejected");
            return Err(Error::Catalog(format!("service returned {status}")));
        }

        let result: CelebritiesResponse = response
            .json()
            .await
            .map_err(|e| Error::Catalog(format!("malformed catalog response: {e}")))?;

        tracing::info!(count = result.celebrities.len(), "catalog fetched");
        Ok(result.celebrities)
    }

    async fn convert(&self, celebrity_id: &str, audio: &AudioPayload) -> Result<String> {
        tracing::debug!(
            celebrity = celebrity_id,
            audio_bytes = audio.bytes.len(),
            "starting voice conversion"
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.bytes.clone())
                    .file_name(audio.file_name.clone())
                    .mime_str(&audio.mime)
                    .map_err(|e| Error::Conversion(e.to_string()))?,
            )
            .text("celebrity", celebrity_id.to_string());

        let response = self
            .client
            .post(format!("{}/convert", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "conversion request failed");
                Error::Conversion(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received conversion response");

        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "conversion rejected");
            return Err(Error::Conversion(format!("service returned {status}: {body}")));
        }

        let result: ConvertResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, "malformed conversion response");
            Error::Conversion(format!("malformed conversion response: {e}"))
        })?;

        tracing::info!(converted = %result.converted, "conversion complete");
        Ok(result.converted)
    }
}

/// Resolve a celebrity `image` or `voice_sample` reference against the
/// service base URL
///
/// Absolute URLs pass through untouched; relative paths (the usual case,
/// e.g. `/samples/foo.mp3`) are joined onto the base.
///
/// # Errors
///
/// Returns [`Error::Config`] if the base URL is unparseable.
pub fn resolve_media_url(base_url: &str, path: &str) -> Result<String> {
    if let Ok(absolute) = Url::parse(path) {
        return Ok(absolute.into());
    }

    let base = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid server url {base_url}: {e}")))?;
    let joined = base
        .join(path)
        .map_err(|e| Error::Config(format!("invalid media path {path}: {e}")))?;
    Ok(joined.into())
}
