//! Voice-sample preview playback
//!
//! Independent of the conversion workflow: plays a celebrity's short
//! reference sample. At most one preview is active at a time, and preview
//! failures degrade to a per-celebrity "unavailable" marker rather than
//! propagating.

use std::collections::HashSet;

use crate::api::resolve_media_url;
use crate::catalog::Celebrity;
use crate::playback::AudioSink;
use crate::{Error, Result};

/// Effect of a preview request on the player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    /// The requested celebrity was already playing; stop it
    Stop,
    /// Start playing the requested celebrity (stopping any other)
    Start,
}

/// Tracks which preview is active and which samples have failed
///
/// "Playing" reflects intent: a celebrity is recorded as playing when
/// playback is requested, before the audio sink confirms it started. A
/// sink failure demotes it to unavailable.
#[derive(Debug, Default)]
pub struct PreviewState {
    playing: Option<String>,
    unavailable: HashSet<String>,
}

impl PreviewState {
    /// Apply a preview request for `id`
    ///
    /// Re-requesting the playing celebrity stops it; requesting another
    /// replaces the current preview.
    pub fn request(&mut self, id: &str) -> PreviewAction {
        if self.playing.as_deref() == Some(id) {
            self.playing = None;
            return PreviewAction::Stop;
        }
        self.playing = Some(id.to_string());
        PreviewAction::Start
    }

    /// Record that the active preview finished or was stopped
    pub fn finished(&mut self, id: &str) {
        if self.playing.as_deref() == Some(id) {
            self.playing = None;
        }
    }

    /// Mark a celebrity's sample as unavailable and stop it if active
    pub fn mark_unavailable(&mut self, id: &str) {
        self.unavailable.insert(id.to_string());
        self.finished(id);
    }

    /// Identifier of the celebrity currently playing, if any
    #[must_use]
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    /// Whether a celebrity's sample previously failed to play
    #[must_use]
    pub fn is_unavailable(&self, id: &str) -> bool {
        self.unavailable.contains(id)
    }
}

/// Fetches and plays celebrity voice samples
pub struct PreviewPlayer {
    client: reqwest::Client,
    base_url: String,
    state: PreviewState,
}

impl PreviewPlayer {
    /// Create a player resolving samples against `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            state: PreviewState::default(),
        }
    }

    /// Preview state, for presentation
    #[must_use]
    pub const fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Toggle preview playback for a celebrity
    ///
    /// Returns `true` if the sample played to completion, `false` if the
    /// request stopped an active preview or the sample is unavailable.
    /// Playback errors are swallowed into the unavailable state.
    pub async fn toggle(&mut self, celebrity: &Celebrity) -> bool {
        if self.state.request(&celebrity.id) == PreviewAction::Stop {
            return false;
        }

        match self.play_sample(celebrity).await {
            Ok(()) => {
                self.state.finished(&celebrity.id);
                true
            }
            Err(e) => {
                tracing::warn!(celebrity = %celebrity.id, error = %e, "preview unavailable");
                self.state.mark_unavailable(&celebrity.id);
                false
            }
        }
    }

    async fn play_sample(&self, celebrity: &Celebrity) -> Result<()> {
        let Some(path) = celebrity.voice_sample.as_deref() else {
            return Err(Error::Preview("no voice sample".to_string()));
        };

        let url = resolve_media_url(&self.base_url, path)?;
        tracing::debug!(celebrity = %celebrity.id, url = %url, "fetching voice sample");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Preview(format!("sample fetch returned {status}")));
        }
        let bytes = response.bytes().await?;

        let sink = AudioSink::new().map_err(|e| Error::Preview(e.to_string()))?;
        // Blocking drain; run off the async runtime worker.
        tokio::task::block_in_place(|| sink.play_mp3(&bytes))
            .map_err(|e| Error::Preview(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_preview_at_a_time() {
        let mut state = PreviewState::default();

        assert_eq!(state.request("a"), PreviewAction::Start);
        assert_eq!(state.playing(), Some("a"));

        // Starting another preview replaces the current one
        assert_eq!(state.request("b"), PreviewAction::Start);
        assert_eq!(state.playing(), Some("b"));
    }

    #[test]
    fn reselecting_playing_preview_stops_it() {
        let mut state = PreviewState::default();

        state.request("a");
        assert_eq!(state.request("a"), PreviewAction::Stop);
        assert_eq!(state.playing(), None);
    }

    #[test]
    fn failed_sample_degrades_to_unavailable() {
        let mut state = PreviewState::default();

        state.request("a");
        state.mark_unavailable("a");

        assert_eq!(state.playing(), None);
        assert!(state.is_unavailable("a"));
        assert!(!state.is_unavailable("b"));
    }

    #[test]
    fn finished_clears_only_the_active_preview() {
        let mut state = PreviewState::default();

        state.request("a");
        state.finished("b");
        assert_eq!(state.playing(), Some("a"));

        state.finished("a");
        assert_eq!(state.playing(), None);
    }
}
