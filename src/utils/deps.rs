use crate::config::AppConfig;
use std::process::{Command, Stdio};

/// Availability of the external tools the importer shells out to
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub ffprobe: bool,
    pub ffmpeg: bool,
}

impl DependencyStatus {
    /// Check all dependencies
    pub fn check(config: &AppConfig) -> Self {
        Self {
            ffprobe: check_command(&config.probe.ffprobe_path, &["-version"]),
            ffmpeg: check_command(&config.import.ffmpeg_path, &["-version"]),
        }
    }

    pub fn all_present(&self) -> bool {
        self.ffprobe && self.ffmpeg
    }

    /// Names of the tools that could not be run
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.ffprobe {
            missing.push("ffprobe");
        }
        if !self.ffmpeg {
            missing.push("ffmpeg");
        }
        missing
    }
}

/// Check if a command is available
fn check_command(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tools_are_listed() {
        let mut config = AppConfig::default();
        config.probe.ffprobe_path = "multi-audio-importer-missing-ffprobe".to_string();
        config.import.ffmpeg_path = "multi-audio-importer-missing-ffmpeg".to_string();

        let status = DependencyStatus::check(&config);
        assert!(!status.all_present());
        assert_eq!(status.missing(), vec!["ffprobe", "ffmpeg"]);
    }
}
