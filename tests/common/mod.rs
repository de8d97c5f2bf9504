//! Shared test fixtures: an in-memory stand-in for the conversion service
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use voicestar::{AudioPayload, Category, Celebrity, Error, Result, VoiceService};

fn celebrity(
    id: &str,
    name: &str,
    category: Category,
    characteristics: &[&str],
) -> Celebrity {
    Celebrity {
        id: id.to_string(),
        name: name.to_string(),
        category,
        bio: format!("{name} is a beloved star."),
        languages: vec!["hindi".to_string(), "english".to_string()],
        voice_characteristics: characteristics.iter().map(ToString::to_string).collect(),
        popularity: 90,
        debut_year: 1995,
        notable_films: vec!["First Film".to_string()],
        image: Some(format!("/images/celebrities/{id}.jpg")),
        voice_sample: Some(format!("/samples/{id}_sample.mp3")),
    }
}

/// Three-celebrity catalog in service order
pub fn fixture_catalog() -> Vec<Celebrity> {
    vec![
        celebrity("a", "Raj", Category::Bollywood, &["deep", "gravelly"]),
        celebrity("b", "Priya", Category::Tollywood, &["soft"]),
        celebrity("c", "Arjun", Category::Kollywood, &["calm", "warm"]),
    ]
}

/// A small finished-audio payload
pub fn payload() -> AudioPayload {
    AudioPayload {
        bytes: b"RIFFfakewavdata".to_vec(),
        file_name: "recording.wav".to_string(),
        mime: "audio/wav".to_string(),
    }
}

/// Programmable in-memory [`VoiceService`]
///
/// `convert` responses are scripted via [`MockService::push_result`];
/// with an empty script it returns `out123.wav`.
pub struct MockService {
    celebrities: Vec<Celebrity>,
    fail_catalog: bool,
    delay: Duration,
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: AtomicUsize,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    pub fn new() -> Self {
        Self {
            celebrities: fixture_catalog(),
            fail_catalog: false,
            delay: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Service whose catalog endpoint always fails
    pub fn failing_catalog() -> Self {
        Self {
            fail_catalog: true,
            ..Self::new()
        }
    }

    /// Delay every `convert` call, simulating a slow conversion
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue the next `convert` outcome
    pub fn push_result(&self, result: std::result::Result<&str, &str>) {
        self.script
            .lock()
            .unwrap()
            .push_back(result.map(ToString::to_string).map_err(ToString::to_string));
    }

    /// Number of `convert` calls issued so far
    pub fn convert_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceService for MockService {
    async fn fetch_celebrities(&self) -> Result<Vec<Celebrity>> {
        if self.fail_catalog {
            return Err(Error::Catalog("connection refused".to_string()));
        }
        Ok(self.celebrities.clone())
    }

    async fn convert(&self, _celebrity_id: &str, _audio: &AudioPayload) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(filename)) => Ok(filename),
            Some(Err(message)) => Err(Error::Conversion(message)),
            None => Ok("out123.wav".to_string()),
        }
    }
}
