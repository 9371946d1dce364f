pub mod host;

pub use host::{Channel, EditingSurface, Frame, MovieStripRequest, SoundStripRequest, StripId};

use crate::config::ImportConfig;
use crate::error::{HostError, ImportError};
use crate::tracks::AudioTrackDescriptor;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Placement options for one import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Every strip starts here
    pub start_frame: Frame,
    /// Place the video as a movie strip before any audio
    pub include_video: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            start_frame: 1,
            include_video: false,
        }
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            start_frame: config.start_frame,
            include_video: config.include_video,
        }
    }
}

/// A track that made it onto the timeline
#[derive(Debug, Clone, Serialize)]
pub struct PlacedTrack {
    pub stream_index: u32,
    pub channel: Channel,
    pub frame_start: Frame,
    pub strip: StripId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedVideo {
    pub channel: Channel,
    pub frame_start: Frame,
    pub strip: StripId,
}

/// Outcome of a fully successful import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub video: Option<PlacedVideo>,
    pub tracks: Vec<PlacedTrack>,
}

impl ImportSummary {
    /// Number of audio tracks imported
    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    /// (stream index, channel) for each imported track
    pub fn channel_assignments(&self) -> Vec<(u32, Channel)> {
        self.tracks
            .iter()
            .map(|t| (t.stream_index, t.channel))
            .collect()
    }
}

/// Place each selected track from `source` on its own channel.
///
/// Tracks go in ascending stream index order. The first surface error stops
/// the import; strips already placed stay where they are and are listed in
/// the error.
pub fn import_tracks(
    source: &Path,
    selected: &[AudioTrackDescriptor],
    surface: &mut dyn EditingSurface,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    if selected.is_empty() {
        return Err(ImportError::NoSelection);
    }

    if !source.is_file() || File::open(source).is_err() {
        return Err(ImportError::SourceUnavailable {
            path: source.to_path_buf(),
        });
    }

    let mut ordered = selected.to_vec();
    ordered.sort_by_key(|t| t.stream_index);

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());

    let mut used_channels = BTreeSet::new();
    let mut summary = ImportSummary::default();

    if options.include_video {
        let channel = allocate_unused(surface, &mut used_channels)
            .map_err(ImportError::VideoPlacement)?;
        let strip = surface
            .add_movie_strip(&MovieStripRequest {
                source,
                channel,
                frame_start: options.start_frame,
                name: stem.clone(),
            })
            .map_err(ImportError::VideoPlacement)?;
        info!("Placed video on channel {}", channel);
        summary.video = Some(PlacedVideo {
            channel,
            frame_start: options.start_frame,
            strip,
        });
    }

    for track in ordered {
        match place_track(source, &stem, &track, surface, options, &mut used_channels) {
            Ok(placed) => {
                info!(
                    "Placed audio track {} on channel {}",
                    placed.stream_index, placed.channel
                );
                summary.tracks.push(placed);
            }
            Err(cause) => {
                warn!("Import stopped at track {}: {}", track.stream_index, cause);
                return Err(ImportError::Partial {
                    video: summary.video,
                    succeeded: summary.tracks,
                    failed_at: track,
                    cause,
                });
            }
        }
    }

    Ok(summary)
}

fn place_track(
    source: &Path,
    stem: &str,
    track: &AudioTrackDescriptor,
    surface: &mut dyn EditingSurface,
    options: &ImportOptions,
    used_channels: &mut BTreeSet<Channel>,
) -> Result<PlacedTrack, HostError> {
    let channel = allocate_unused(surface, used_channels)?;
    let strip = surface.add_sound_strip(&SoundStripRequest {
        source,
        stream_index: track.stream_index,
        channel,
        frame_start: options.start_frame,
        name: format!("{}.audio{}", stem, track.stream_index),
        estimated_size: track.estimated_pcm_size(),
    })?;

    Ok(PlacedTrack {
        stream_index: track.stream_index,
        channel,
        frame_start: options.start_frame,
        strip,
    })
}

/// Ask the surface for a channel, refusing one already handed out in this import
fn allocate_unused(
    surface: &mut dyn EditingSurface,
    used_channels: &mut BTreeSet<Channel>,
) -> Result<Channel, HostError> {
    let channel = surface.allocate_channel()?;
    if !used_channels.insert(channel) {
        return Err(HostError::ChannelInUse(channel));
    }
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Debug, PartialEq)]
    enum Call {
        Allocate,
        Sound { stream_index: u32, channel: Channel },
        Movie { channel: Channel },
    }

    /// Surface that records every call and can reject the nth sound strip
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
        next_channel: Channel,
        fail_sound_at: Option<usize>,
        sound_count: usize,
        fixed_channel: bool,
    }

    impl EditingSurface for RecordingSurface {
        fn allocate_channel(&mut self) -> Result<Channel, HostError> {
            self.calls.push(Call::Allocate);
            if !self.fixed_channel {
                self.next_channel += 1;
            }
            Ok(self.next_channel.max(1))
        }

        fn add_sound_strip(&mut self, request: &SoundStripRequest<'_>) -> Result<StripId, HostError> {
            self.calls.push(Call::Sound {
                stream_index: request.stream_index,
                channel: request.channel,
            });
            self.sound_count += 1;
            if self.fail_sound_at == Some(self.sound_count) {
                return Err(HostError::InvalidChannel {
                    channel: request.channel,
                    max: 1,
                });
            }
            Ok(format!("sound-{}", request.stream_index))
        }

        fn add_movie_strip(&mut self, request: &MovieStripRequest<'_>) -> Result<StripId, HostError> {
            self.calls.push(Call::Movie {
                channel: request.channel,
            });
            Ok("movie".to_string())
        }
    }

    impl RecordingSurface {
        fn sound_calls(&self) -> Vec<(u32, Channel)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Sound {
                        stream_index,
                        channel,
                    } => Some((*stream_index, *channel)),
                    _ => None,
                })
                .collect()
        }
    }

    fn tracks(indices: &[u32]) -> Vec<AudioTrackDescriptor> {
        indices
            .iter()
            .map(|&i| {
                let mut t = AudioTrackDescriptor::new(i, "aac", 2);
                t.selected = true;
                t
            })
            .collect()
    }

    fn source_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.mkv");
        std::fs::write(&path, b"video").unwrap();
        (dir, path)
    }

    #[test]
    fn test_empty_selection_makes_no_host_calls() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface::default();
        let result = import_tracks(&path, &[], &mut surface, &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::NoSelection)));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_places_in_ascending_index_order_on_distinct_channels() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface::default();
        let summary = import_tracks(
            &path,
            &tracks(&[2, 0, 1]),
            &mut surface,
            &ImportOptions::default(),
        )
        .unwrap();

        let calls = surface.sound_calls();
        let order: Vec<u32> = calls.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2]);

        let channels: BTreeSet<Channel> = calls.iter().map(|(_, c)| *c).collect();
        assert_eq!(channels.len(), 3);

        assert_eq!(summary.count(), 3);
        assert_eq!(summary.channel_assignments(), calls);
        assert!(summary.tracks.iter().all(|t| t.frame_start == 1));
        assert!(summary.video.is_none());
    }

    #[test]
    fn test_failure_on_second_track_stops_import() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface {
            fail_sound_at: Some(2),
            ..RecordingSurface::default()
        };
        let result = import_tracks(
            &path,
            &tracks(&[5, 3, 7]),
            &mut surface,
            &ImportOptions::default(),
        );

        match result {
            Err(ImportError::Partial {
                video,
                succeeded,
                failed_at,
                cause,
            }) => {
                assert!(video.is_none());
                assert_eq!(succeeded.len(), 1);
                assert_eq!(succeeded[0].stream_index, 3);
                assert_eq!(failed_at.stream_index, 5);
                assert!(matches!(cause, HostError::InvalidChannel { .. }));
            }
            other => panic!("expected partial import error, got {:?}", other),
        }

        let attempted: Vec<u32> = surface.sound_calls().iter().map(|(i, _)| *i).collect();
        assert_eq!(attempted, vec![3, 5]);
    }

    #[test]
    fn test_repeated_channel_is_rejected() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface {
            fixed_channel: true,
            next_channel: 4,
            ..RecordingSurface::default()
        };
        let result = import_tracks(
            &path,
            &tracks(&[0, 1]),
            &mut surface,
            &ImportOptions::default(),
        );

        match result {
            Err(ImportError::Partial {
                succeeded,
                failed_at,
                cause,
                ..
            }) => {
                assert_eq!(succeeded.len(), 1);
                assert_eq!(failed_at.stream_index, 1);
                assert!(matches!(cause, HostError::ChannelInUse(4)));
            }
            other => panic!("expected partial import error, got {:?}", other),
        }
        assert_eq!(surface.sound_calls().len(), 1);
    }

    #[test]
    fn test_missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = RecordingSurface::default();
        let result = import_tracks(
            &dir.path().join("gone.mkv"),
            &tracks(&[1]),
            &mut surface,
            &ImportOptions::default(),
        );
        assert!(matches!(result, Err(ImportError::SourceUnavailable { .. })));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_video_is_placed_before_audio() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface::default();
        let options = ImportOptions {
            start_frame: 10,
            include_video: true,
        };
        let summary = import_tracks(&path, &tracks(&[1]), &mut surface, &options).unwrap();

        assert_eq!(
            surface.calls,
            vec![
                Call::Allocate,
                Call::Movie { channel: 1 },
                Call::Allocate,
                Call::Sound {
                    stream_index: 1,
                    channel: 2
                },
            ]
        );
        let video = summary.video.unwrap();
        assert_eq!(video.channel, 1);
        assert_eq!(video.frame_start, 10);
        assert_eq!(summary.tracks[0].frame_start, 10);
    }

    #[test]
    fn test_audio_failure_after_video_reports_placed_video() {
        let (_dir, path) = source_file();
        let mut surface = RecordingSurface {
            fail_sound_at: Some(1),
            ..RecordingSurface::default()
        };
        let options = ImportOptions {
            start_frame: 1,
            include_video: true,
        };
        let result = import_tracks(&path, &tracks(&[1, 2]), &mut surface, &options);

        match result {
            Err(ImportError::Partial {
                video,
                succeeded,
                failed_at,
                ..
            }) => {
                let video = video.expect("placed video should be reported");
                assert_eq!(video.channel, 1);
                assert_eq!(video.strip, "movie");
                assert!(succeeded.is_empty());
                assert_eq!(failed_at.stream_index, 1);
            }
            other => panic!("expected partial import error, got {:?}", other),
        }
        assert!(surface.calls.contains(&Call::Movie { channel: 1 }));
        assert_eq!(surface.sound_calls(), vec![(1, 2)]);
    }
}
