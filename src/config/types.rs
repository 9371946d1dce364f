use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest channel index the sequencer accepts
pub const MAX_CHANNELS: u32 = 128;

/// ffprobe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Executable name or path
    pub ffprobe_path: String,
    /// Seconds before a hung ffprobe is killed
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Import and timeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub ffmpeg_path: String,
    /// Frame every imported strip starts at
    pub start_frame: i64,
    /// Also place the video itself as a movie strip
    pub include_video: bool,
    pub max_channels: u32,
    pub extract_timeout_secs: u64,
    /// Where extracted audio lands; defaults to the user cache directory
    pub work_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            start_frame: 1,
            include_video: true,
            max_channels: MAX_CHANNELS,
            extract_timeout_secs: 600,
            work_dir: None,
        }
    }
}

impl ImportConfig {
    pub fn resolved_work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("multi-audio-importer")
                .join("extracted")
        })
    }
}

/// Track list presentation and language preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPresetConfig {
    /// Languages selected by `--auto-select`
    pub preferred_languages: Vec<String>,
    /// Shown in place of a missing language tag
    pub language_placeholder: String,
}

impl Default for TrackPresetConfig {
    fn default() -> Self {
        Self {
            preferred_languages: Vec::new(),
            language_placeholder: "unknown".to_string(),
        }
    }
}
