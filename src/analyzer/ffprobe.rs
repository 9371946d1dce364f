use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::tracks::AudioTrackDescriptor;
use crate::utils::process::{ToolError, run_tool};
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const AUDIO_ENTRIES: &str =
    "stream=index,codec_type,codec_name,channels,sample_rate,duration:stream_tags=language,title";

/// Enumerate the audio streams of a media file with ffprobe.
///
/// Blocks until ffprobe exits or the configured timeout passes.
pub fn scan(input_path: &Path, config: &ProbeConfig) -> Result<Vec<AudioTrackDescriptor>, ProbeError> {
    if !input_path.is_file() {
        return Err(ProbeError::InvalidPath {
            path: input_path.to_path_buf(),
        });
    }

    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-select_streams",
        "a",
        "-show_entries",
        AUDIO_ENTRIES,
        "-of",
        "json",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(input_path.as_os_str().to_owned());

    let output = run_ffprobe(&args, config)?;
    let tracks = parse_audio_streams(&output)?;

    info!(
        "Found {} audio track(s) in {}",
        tracks.len(),
        input_path.display()
    );
    Ok(tracks)
}

/// Build descriptors from ffprobe JSON.
///
/// Only audio streams are kept, in output order. Each keeps ffprobe's own
/// stream index.
pub fn parse_audio_streams(json: &str) -> Result<Vec<AudioTrackDescriptor>, ProbeError> {
    let data: ProbeOutput =
        serde_json::from_str(json).map_err(|e| ProbeError::ParseFailure(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut tracks = Vec::new();

    for (position, stream) in data.streams.into_iter().enumerate() {
        if let Some(kind) = stream.codec_type.as_deref()
            && kind != "audio"
        {
            debug!("Skipping {} stream at position {}", kind, position);
            continue;
        }

        let stream_index = stream.index.ok_or_else(|| {
            ProbeError::ParseFailure(format!("stream at position {} has no index", position))
        })?;
        if !seen.insert(stream_index) {
            return Err(ProbeError::ParseFailure(format!(
                "stream index {} reported twice",
                stream_index
            )));
        }

        let tags = stream.tags.unwrap_or_default();
        tracks.push(AudioTrackDescriptor {
            stream_index,
            codec_name: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
            language: tags
                .language
                .filter(|l| !l.trim().is_empty() && !l.eq_ignore_ascii_case("und")),
            channels: stream.channels.unwrap_or(0),
            selected: false,
            title: tags.title.filter(|t| !t.trim().is_empty()),
            sample_rate: stream.sample_rate.and_then(|s| s.parse::<u32>().ok()),
            duration_secs: stream.duration.and_then(|d| d.parse::<f64>().ok()),
        });
    }

    if tracks.is_empty() {
        return Err(ProbeError::NoAudioStreams);
    }
    Ok(tracks)
}

/// Run ffprobe with arguments
fn run_ffprobe(args: &[OsString], config: &ProbeConfig) -> Result<String, ProbeError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let output = run_tool(&config.ffprobe_path, args, Some(timeout)).map_err(|e| match e {
        ToolError::NotFound { program } => ProbeError::ExecutableNotFound { program },
        ToolError::TimedOut { timeout, .. } => ProbeError::Timeout {
            seconds: timeout.as_secs(),
        },
        other => ProbeError::ProcessFailure {
            code: None,
            stderr: other.to_string(),
        },
    })?;

    if !output.success() {
        let stderr = output.stderr_tail(5);
        warn!("ffprobe failed: {}", stderr);
        return Err(ProbeError::ProcessFailure {
            code: output.status.code(),
            stderr,
        });
    }

    Ok(output.stdout)
}

// JSON deserialization structures

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<RawStream>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    index: Option<u32>,
    codec_type: Option<String>,
    codec_name: Option<String>,
    channels: Option<u16>,
    sample_rate: Option<String>,
    duration: Option<String>,
    tags: Option<StreamTags>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamTags {
    language: Option<String>,
    title: Option<String>,
}
