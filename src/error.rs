use crate::importer::{PlacedTrack, PlacedVideo};
use crate::tracks::AudioTrackDescriptor;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while probing a file for audio streams
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("'{program}' was not found on the search path")]
    ExecutableNotFound { program: String },

    #[error("ffprobe failed{}: {stderr}", code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    ProcessFailure { code: Option<i32>, stderr: String },

    #[error("Failed to parse ffprobe output: {0}")]
    ParseFailure(String),

    /// The file was read but holds no audio stream. Not a failure of the
    /// tool, but distinct from "nothing scanned yet".
    #[error("No audio tracks found")]
    NoAudioStreams,

    #[error("Invalid video file path: {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("ffprobe did not finish within {seconds}s")]
    Timeout { seconds: u64 },
}

/// Errors raised by the track registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No audio track with stream index {0}")]
    UnknownIndex(u32),
}

/// Rejections reported by an editing surface
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Channel {channel} is outside 1..={max}")]
    InvalidChannel { channel: u32, max: u32 },

    #[error("Channel {0} is already in use")]
    ChannelInUse(u32),

    #[error("All {0} channels are in use")]
    ChannelsExhausted(u32),

    #[error("Failed to extract audio stream {stream_index}: {message}")]
    Extraction { stream_index: u32, message: String },

    #[error("Not enough disk space in {}: need about {required} bytes", dir.display())]
    InsufficientSpace { dir: PathBuf, required: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by an import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No audio tracks selected")]
    NoSelection,

    #[error("Video file is no longer available: {}", path.display())]
    SourceUnavailable { path: PathBuf },

    #[error("Failed to add video strip: {0}")]
    VideoPlacement(#[source] HostError),

    /// Placement stopped at `failed_at`; the video (if placed) and everything
    /// in `succeeded` stay on the timeline.
    #[error(
        "Failed to import audio track {} after {} succeeded: {cause}",
        failed_at.stream_index,
        succeeded.len()
    )]
    Partial {
        video: Option<PlacedVideo>,
        succeeded: Vec<PlacedTrack>,
        failed_at: AudioTrackDescriptor,
        #[source]
        cause: HostError,
    },
}

/// Application level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Import(#[from] ImportError),
}
