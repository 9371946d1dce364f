//! In-process editing surface.
//!
//! Audio streams are extracted to WAV files in a work directory and recorded
//! as sound strips; the whole timeline can be written out as a JSON manifest
//! for a host to pick up.

pub mod extract;

pub use extract::{FfmpegExtractor, StreamExtractor};

use crate::config::{ImportConfig, MAX_CHANNELS};
use crate::error::HostError;
use crate::importer::{Channel, EditingSurface, Frame, MovieStripRequest, SoundStripRequest, StripId};
use crate::utils::disk_space;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StripKind {
    Sound,
    Movie,
}

/// A strip placed on the timeline
#[derive(Debug, Clone, Serialize)]
pub struct Strip {
    pub id: StripId,
    pub name: String,
    pub kind: StripKind,
    pub channel: Channel,
    pub frame_start: Frame,
    /// Stream of the source this strip was cut from (sound strips only)
    pub stream_index: Option<u32>,
    /// File the strip plays
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct TimelineManifest<'a> {
    pub created_at: String,
    /// Video every strip was taken from; absent while the timeline is empty
    pub source: Option<&'a Path>,
    pub strips: &'a [Strip],
}

pub struct Timeline<E> {
    strips: Vec<Strip>,
    extractor: E,
    work_dir: PathBuf,
    max_channels: Channel,
    source: Option<PathBuf>,
}

impl Timeline<FfmpegExtractor> {
    /// Timeline extracting with ffmpeg as configured
    pub fn from_config(config: &ImportConfig) -> Self {
        let extractor = FfmpegExtractor::new(
            config.ffmpeg_path.clone(),
            Duration::from_secs(config.extract_timeout_secs),
        );
        Timeline::new(extractor, config.resolved_work_dir(), config.max_channels)
    }
}

impl<E: StreamExtractor> Timeline<E> {
    pub fn new(extractor: E, work_dir: PathBuf, max_channels: Channel) -> Self {
        Self {
            strips: Vec::new(),
            extractor,
            work_dir,
            max_channels: max_channels.clamp(1, MAX_CHANNELS),
            source: None,
        }
    }

    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Source of the first strip placed
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn record(&mut self, source: &Path, strip: Strip) -> StripId {
        if self.source.is_none() {
            self.source = Some(source.to_path_buf());
        }
        let id = strip.id.clone();
        self.strips.push(strip);
        id
    }

    fn is_occupied(&self, channel: Channel) -> bool {
        self.strips.iter().any(|s| s.channel == channel)
    }

    fn check_channel(&self, channel: Channel) -> Result<(), HostError> {
        if channel == 0 || channel > self.max_channels {
            return Err(HostError::InvalidChannel {
                channel,
                max: self.max_channels,
            });
        }
        if self.is_occupied(channel) {
            return Err(HostError::ChannelInUse(channel));
        }
        Ok(())
    }

    fn extracted_path(&self, source: &Path, stream_index: u32) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let tag = Uuid::new_v4().simple().to_string();
        self.work_dir
            .join(format!("{}_stream{}_{}.wav", stem, stream_index, &tag[..8]))
    }

    pub fn manifest(&self) -> TimelineManifest<'_> {
        TimelineManifest {
            created_at: chrono::Utc::now().to_rfc3339(),
            source: self.source(),
            strips: &self.strips,
        }
    }

    /// Write the manifest as pretty JSON
    pub fn save_manifest(&self, path: &Path) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(&self.manifest())
            .map_err(|e| HostError::Io(std::io::Error::other(e)))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        info!("Saved timeline manifest to {}", path.display());
        Ok(())
    }
}

impl<E: StreamExtractor> EditingSurface for Timeline<E> {
    fn allocate_channel(&mut self) -> Result<Channel, HostError> {
        (1..=self.max_channels)
            .find(|&c| !self.is_occupied(c))
            .ok_or(HostError::ChannelsExhausted(self.max_channels))
    }

    fn add_sound_strip(&mut self, request: &SoundStripRequest<'_>) -> Result<StripId, HostError> {
        self.check_channel(request.channel)?;

        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(required) = request.estimated_size
            && !disk_space::has_room_for_wav(&self.work_dir, required)
        {
            return Err(HostError::InsufficientSpace {
                dir: self.work_dir.clone(),
                required,
            });
        }

        let output = self.extracted_path(request.source, request.stream_index);
        self.extractor
            .extract(request.source, request.stream_index, &output)?;

        debug!(
            "Sound strip {} on channel {} at frame {}",
            request.name, request.channel, request.frame_start
        );
        let strip = Strip {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            kind: StripKind::Sound,
            channel: request.channel,
            frame_start: request.frame_start,
            stream_index: Some(request.stream_index),
            path: output,
        };
        Ok(self.record(request.source, strip))
    }

    fn add_movie_strip(&mut self, request: &MovieStripRequest<'_>) -> Result<StripId, HostError> {
        self.check_channel(request.channel)?;

        let strip = Strip {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            kind: StripKind::Movie,
            channel: request.channel,
            frame_start: request.frame_start,
            stream_index: None,
            path: request.source.to_path_buf(),
        };
        Ok(self.record(request.source, strip))
    }
}
