//! Voicestar - client engine for a celebrity voice-conversion service
//!
//! The conversion backend (signal processing, the voice model, storage)
//! is an external HTTP service; this crate implements the client side:
//! - Celebrity catalog with category/search filtering
//! - The record/upload -> submit -> result conversion workflow
//! - Microphone capture and upload validation
//! - Voice-sample preview playback
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 Presentation / CLI                │
//! └──────────┬──────────────────────┬────────────────┘
//!            │ intents              │ snapshots
//! ┌──────────▼──────────┐ ┌─────────▼────────────────┐
//! │    CatalogStore     │ │  ConversionController    │
//! │  (targets, filter)  │ │  (single active job)     │
//! └──────────┬──────────┘ └─────────┬────────────────┘
//!            │                      │
//! ┌──────────▼──────────────────────▼────────────────┐
//! │        Conversion service (external HTTP)        │
//! │   /celebrities  │  /convert  │  /results/{file}  │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod capture;
pub mod catalog;
pub mod config;
pub mod error;
pub mod playback;
pub mod preview;
pub mod upload;
pub mod workflow;

pub use api::{resolve_media_url, AudioPayload, HttpVoiceService, VoiceService};
pub use catalog::{CatalogStore, Category, CategoryFilter, Celebrity};
pub use config::{Config, ProgressPolicy};
pub use error::{Error, Result};
pub use upload::{UploadStage, UploadValidator};
pub use workflow::{ConversionController, JobSnapshot, JobState};
