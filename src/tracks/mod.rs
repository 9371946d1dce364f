pub mod presets;
pub mod registry;

pub use registry::TrackRegistry;

use crate::utils::format_duration;
use serde::Serialize;

/// Audio stream discovered in a video container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrackDescriptor {
    /// ffprobe's absolute stream index, passed back verbatim on extraction
    pub stream_index: u32,
    pub codec_name: String,
    pub language: Option<String>,
    /// Channel count, 0 when ffprobe did not report one
    pub channels: u16,
    pub selected: bool,
    pub title: Option<String>,
    pub sample_rate: Option<u32>,
    pub duration_secs: Option<f64>,
}

impl AudioTrackDescriptor {
    pub fn new(stream_index: u32, codec_name: impl Into<String>, channels: u16) -> Self {
        Self {
            stream_index,
            codec_name: codec_name.into(),
            language: None,
            channels,
            selected: false,
            title: None,
            sample_rate: None,
            duration_secs: None,
        }
    }

    /// Language tag, or `placeholder` when the stream has none
    pub fn language_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.language.as_deref().unwrap_or(placeholder)
    }

    pub fn channel_layout(&self) -> &'static str {
        match self.channels {
            0 => "Unknown",
            1 => "Mono",
            2 => "Stereo",
            6 => "5.1",
            8 => "7.1",
            _ => "Multi",
        }
    }

    pub fn display_name(&self, placeholder: &str) -> String {
        let title = self
            .title
            .as_ref()
            .map(|t| format!(" - {}", t))
            .unwrap_or_default();
        let duration = self
            .duration_secs
            .map(|d| format!(" [{}]", format_duration(d)))
            .unwrap_or_default();
        format!(
            "Track {}: {} ({} {}){}{}",
            self.stream_index,
            self.language_or(placeholder),
            self.codec_name.to_uppercase(),
            self.channel_layout(),
            title,
            duration
        )
    }

    /// Size in bytes of this stream decoded to 16-bit PCM, when known
    pub fn estimated_pcm_size(&self) -> Option<u64> {
        let duration = self.duration_secs?;
        let sample_rate = self.sample_rate?;
        if self.channels == 0 || duration <= 0.0 {
            return None;
        }
        Some((duration * sample_rate as f64) as u64 * self.channels as u64 * 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_placeholder_for_missing_language() {
        let mut track = AudioTrackDescriptor::new(3, "aac", 2);
        assert_eq!(track.display_name("unknown"), "Track 3: unknown (AAC Stereo)");

        track.language = Some("jpn".to_string());
        track.title = Some("Commentary".to_string());
        assert_eq!(
            track.display_name("unknown"),
            "Track 3: jpn (AAC Stereo) - Commentary"
        );
    }

    #[test]
    fn test_estimated_pcm_size() {
        let mut track = AudioTrackDescriptor::new(1, "ac3", 6);
        assert_eq!(track.estimated_pcm_size(), None);

        track.sample_rate = Some(48_000);
        track.duration_secs = Some(10.0);
        assert_eq!(track.estimated_pcm_size(), Some(48_000 * 10 * 6 * 2));
    }
}
