//! File upload staging and validation
//!
//! Files are validated before acceptance and handed to the workflow
//! unchanged. One file is staged at a time; staging a new file replaces
//! the prior one, and a rejected file leaves the prior staged file
//! untouched.

use std::path::Path;

use crate::api::AudioPayload;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::{Error, Result};

/// Accepted audio file extensions
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// MIME type for an accepted extension
fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// Validates candidate upload files against type and size limits
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_bytes: u64,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadValidator {
    /// Create a validator with a custom size limit
    #[must_use]
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// The configured size limit in bytes
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check a candidate file's name and size
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unsupported extension or a
    /// file over the size limit; the message states the limit.
    pub fn validate(&self, file_name: &str, size: u64) -> Result<()> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::Validation(format!(
                "unsupported audio type: expected one of {}",
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        if size > self.max_bytes {
            return Err(Error::Validation(format!(
                "file is too large: maximum size is {}MB",
                self.max_bytes / 1024 / 1024
            )));
        }

        Ok(())
    }
}

/// Holds the single staged upload
#[derive(Debug, Default)]
pub struct UploadStage {
    validator: UploadValidator,
    staged: Option<AudioPayload>,
}

impl UploadStage {
    /// Create a stage using the given validator
    #[must_use]
    pub const fn new(validator: UploadValidator) -> Self {
        Self {
            validator,
            staged: None,
        }
    }

    /// Validate and stage a file from disk, replacing any prior staged file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the file is rejected (the prior
    /// staged file is kept) or [`Error::Io`] if it cannot be read.
    pub fn stage_file(&mut self, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Validation("file has no name".to_string()))?
            .to_string();

        let size = std::fs::metadata(path)?.len();
        self.validator.validate(&file_name, size)?;

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let bytes = std::fs::read(path)?;
        tracing::info!(file = %file_name, bytes = bytes.len(), "upload staged");

        self.staged = Some(AudioPayload {
            bytes,
            file_name,
            mime: mime_for_extension(&extension).to_string(),
        });
        Ok(())
    }

    /// The currently staged payload, if any
    #[must_use]
    pub fn staged(&self) -> Option<&AudioPayload> {
        self.staged.as_ref()
    }

    /// Take the staged payload for submission
    #[must_use]
    pub fn take(&mut self) -> Option<AudioPayload> {
        self.staged.take()
    }

    /// Discard the staged payload
    pub fn clear(&mut self) {
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn oversized_file_rejected_with_limit_in_message() {
        let validator = UploadValidator::default();
        let err = validator
            .validate("speech.mp3", 15 * 1024 * 1024)
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("too large"), "got: {message}");
        assert!(message.contains("10MB"), "got: {message}");
    }

    #[test]
    fn unsupported_extension_rejected() {
        let validator = UploadValidator::default();

        let err = validator.validate("notes.txt", 100).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("unsupported audio type"));

        let err = validator.validate("noext", 100).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn accepted_extensions_validate_case_insensitively() {
        let validator = UploadValidator::default();

        for ext in ACCEPTED_EXTENSIONS {
            validator.validate(&format!("clip.{ext}"), 1024).unwrap();
        }
        validator.validate("CLIP.MP3", 1024).unwrap();
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_extension("mp3"), "audio/mpeg");
        assert_eq!(mime_for_extension("wav"), "audio/wav");
        assert_eq!(mime_for_extension("flac"), "audio/flac");
    }

    #[test]
    fn staging_new_file_replaces_prior() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.wav");
        let second = dir.path().join("second.mp3");
        std::fs::write(&first, b"RIFFxxxx").unwrap();
        std::fs::write(&second, b"ID3xxxx").unwrap();

        let mut stage = UploadStage::default();
        stage.stage_file(&first).unwrap();
        assert_eq!(stage.staged().unwrap().file_name, "first.wav");

        stage.stage_file(&second).unwrap();
        assert_eq!(stage.staged().unwrap().file_name, "second.mp3");
        assert_eq!(stage.staged().unwrap().mime, "audio/mpeg");
    }

    #[test]
    fn rejected_file_leaves_prior_staged_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.wav");
        let big = dir.path().join("big.wav");
        std::fs::write(&good, b"RIFFxxxx").unwrap();

        let mut file = std::fs::File::create(&big).unwrap();
        file.write_all(&vec![0u8; 2048]).unwrap();
        drop(file);

        let mut stage = UploadStage::new(UploadValidator::new(1024));
        stage.stage_file(&good).unwrap();

        let err = stage.stage_file(&big).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(stage.staged().unwrap().file_name, "good.wav");
    }

    #[test]
    fn take_empties_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.ogg");
        std::fs::write(&path, b"OggS").unwrap();

        let mut stage = UploadStage::default();
        stage.stage_file(&path).unwrap();

        let payload = stage.take().unwrap();
        assert_eq!(payload.file_name, "clip.ogg");
        assert!(stage.staged().is_none());
    }
}
