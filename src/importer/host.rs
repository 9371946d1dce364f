//! The editing surface an import places strips on.
//!
//! This is the seam to the host application's sequencer: the importer only
//! ever talks to a `dyn EditingSurface`, so any host (or the bundled
//! [`Timeline`](crate::timeline::Timeline)) can sit behind it.

use crate::error::HostError;
use std::path::Path;

/// Sequencer channel, 1-based
pub type Channel = u32;

/// Timeline frame
pub type Frame = i64;

/// Identifier the surface assigns to a placed strip
pub type StripId = String;

/// Place a sound strip sourced from one stream of a file
#[derive(Debug, Clone)]
pub struct SoundStripRequest<'a> {
    pub source: &'a Path,
    pub stream_index: u32,
    pub channel: Channel,
    pub frame_start: Frame,
    pub name: String,
    /// Decoded size estimate, when the probe reported enough to compute it
    pub estimated_size: Option<u64>,
}

/// Place the video itself as a movie strip
#[derive(Debug, Clone)]
pub struct MovieStripRequest<'a> {
    pub source: &'a Path,
    pub channel: Channel,
    pub frame_start: Frame,
    pub name: String,
}

pub trait EditingSurface {
    /// Pick a channel that holds no strip yet
    fn allocate_channel(&mut self) -> Result<Channel, HostError>;

    fn add_sound_strip(&mut self, request: &SoundStripRequest<'_>) -> Result<StripId, HostError>;

    fn add_movie_strip(&mut self, request: &MovieStripRequest<'_>) -> Result<StripId, HostError>;
}
