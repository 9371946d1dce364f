use crate::error::HostError;
use crate::utils::process::{ToolError, run_tool};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Pulls a single stream out of a container into a standalone audio file
pub trait StreamExtractor {
    fn extract(&self, source: &Path, stream_index: u32, output: &Path) -> Result<(), HostError>;
}

/// Extracts with ffmpeg to 16-bit PCM WAV
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegExtractor {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

/// Build ffmpeg arguments for extracting one stream
///
/// The map uses the absolute stream index (`0:<index>`), the same numbering
/// ffprobe reports.
pub fn build_extract_args(source: &Path, stream_index: u32, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-nostdin", "-y", "-v", "error", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(source.as_os_str().to_owned());
    args.extend(
        [
            "-map".to_string(),
            format!("0:{}", stream_index),
            "-vn".to_string(),
            "-c:a".to_string(),
            "pcm_s16le".to_string(),
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

impl StreamExtractor for FfmpegExtractor {
    fn extract(&self, source: &Path, stream_index: u32, output: &Path) -> Result<(), HostError> {
        let args = build_extract_args(source, stream_index, output);
        info!(
            "Extracting stream {} of {} -> {}",
            stream_index,
            source.display(),
            output.display()
        );

        // A killed or failed ffmpeg can leave a truncated WAV behind
        let result = match run_tool(&self.ffmpeg_path, &args, Some(self.timeout)) {
            Ok(result) => result,
            Err(e) => {
                let _ = std::fs::remove_file(output);
                return Err(HostError::Extraction {
                    stream_index,
                    message: match e {
                        ToolError::NotFound { program } => {
                            format!("'{}' was not found on the search path", program)
                        }
                        other => other.to_string(),
                    },
                });
            }
        };

        if !result.success() {
            let _ = std::fs::remove_file(output);
            let stderr = result.stderr_tail(5);
            return Err(HostError::Extraction {
                stream_index,
                message: if stderr.is_empty() {
                    format!("ffmpeg failed with status: {}", result.status)
                } else {
                    stderr
                },
            });
        }
        Ok(())
    }
}
