//! Microphone capture for conversion input
//!
//! Capture performs no network activity: stopping a recording yields a
//! finished WAV payload the workflow controller submits separately.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use crate::api::AudioPayload;
use crate::{Error, Result};

/// Sample rate for voice capture (16kHz is plenty for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Raw capture from the default input device
pub struct AudioCapture {
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new capture instance
    ///
    /// # Errors
    ///
    /// Returns error if no suitable input device/config is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable capture config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            "voice capture initialized"
        );

        Ok(Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start capturing; discards any previously buffered samples
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let buffer = Arc::clone(&self.buffer);
        let stream = device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "voice capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("voice capture started");
        Ok(())
    }

    /// Stop capturing
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("voice capture stopped");
        }
    }

    /// Take the captured samples, leaving the buffer empty
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Check if currently capturing
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

/// A finished recording ready to preview or submit
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// WAV-encoded audio payload
    pub audio: AudioPayload,
    /// Recording length in whole seconds
    pub duration_secs: u64,
}

/// Microphone recorder with elapsed-time tracking
///
/// Wraps [`AudioCapture`] with the record/stop contract the workflow
/// expects: starting discards any prior unsubmitted recording, stopping
/// yields a [`CaptureResult`].
pub struct Recorder {
    capture: AudioCapture,
    started: Option<Instant>,
}

impl Recorder {
    /// Create a recorder over the default input device
    ///
    /// # Errors
    ///
    /// Returns error if the capture device cannot be opened
    pub fn new() -> Result<Self> {
        Ok(Self {
            capture: AudioCapture::new()?,
            started: None,
        })
    }

    /// Start recording, discarding any prior unsubmitted samples
    ///
    /// # Errors
    ///
    /// Returns error if capture fails to start
    pub fn start(&mut self) -> Result<()> {
        self.capture.start()?;
        self.started = Some(Instant::now());
        Ok(())
    }

    /// Elapsed recording time, one-second granularity
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.started.map_or(0, |s| s.elapsed().as_secs())
    }

    /// Check if a recording is in progress
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.capture.is_active()
    }

    /// Stop recording and return the finished payload
    ///
    /// # Errors
    ///
    /// Returns error if WAV encoding fails
    pub fn stop(&mut self) -> Result<CaptureResult> {
        self.capture.stop();
        let duration_secs = self.elapsed_secs();
        self.started = None;

        let samples = self.capture.take_buffer();
        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;

        tracing::info!(duration_secs, samples = samples.len(), "recording finished");

        Ok(CaptureResult {
            audio: AudioPayload {
                bytes: wav,
                file_name: "recording.wav".to_string(),
                mime: "audio/wav".to_string(),
            },
            duration_secs,
        })
    }
}

/// Convert f32 samples to WAV bytes for submission
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn samples_to_wav_produces_riff_header() {
        let samples: Vec<f32> = (0..1600)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect();

        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert!(wav.len() > 44);
    }

    #[test]
    fn wav_preserves_sample_count_and_spec() {
        let samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.channels, 1);

        let read: Vec<i16> = reader.samples::<i16>().map(std::result::Result::unwrap).collect();
        assert_eq!(read.len(), samples.len());
    }
}
