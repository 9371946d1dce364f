use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use multi_audio_importer::config::AppConfig;
use multi_audio_importer::error::{ImportError, ProbeError};
use multi_audio_importer::timeline::{FfmpegExtractor, Timeline};
use multi_audio_importer::utils::{DependencyStatus, format_file_size, init_logging};
use multi_audio_importer::{ImportSummary, Session};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser)]
#[command(name = "multi-audio-importer", version, about = "Import selected audio tracks of a video onto a timeline")]
struct Cli {
    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the audio tracks of a video file
    Scan { file: PathBuf },

    /// Extract selected audio tracks and place them on the timeline
    Import {
        file: PathBuf,

        /// Stream index to import (repeatable)
        #[arg(short, long = "track")]
        tracks: Vec<u32>,

        /// Import tracks in this language (repeatable)
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Also select the configured preferred languages
        #[arg(long)]
        auto_select: bool,

        /// Import every audio track
        #[arg(long)]
        all: bool,

        /// Skip the video strip
        #[arg(long)]
        no_video: bool,

        /// Frame all strips start at
        #[arg(long)]
        start_frame: Option<i64>,

        /// Directory for extracted audio
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Write the resulting timeline as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Check that ffprobe and ffmpeg can be run
    Check,

    /// Show the config file location and effective settings
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load(),
    };

    match cli.command {
        Command::Scan { file } => scan(config, &file),
        Command::Import {
            file,
            tracks,
            languages,
            auto_select,
            all,
            no_video,
            start_frame,
            work_dir,
            manifest,
        } => {
            let mut config = config;
            if no_video {
                config.import.include_video = false;
            }
            if let Some(frame) = start_frame {
                config.import.start_frame = frame;
            }
            if work_dir.is_some() {
                config.import.work_dir = work_dir;
            }
            let selection = Selection {
                tracks,
                languages,
                auto_select,
                all,
            };
            import(config, &file, &selection, manifest.as_deref())
        }
        Command::Check => check(&config),
        Command::Config => {
            println!("# {}", AppConfig::config_path().display());
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render config")?
            );
            Ok(())
        }
    }
}

struct Selection {
    tracks: Vec<u32>,
    languages: Vec<String>,
    auto_select: bool,
    all: bool,
}

fn scan_session(config: AppConfig, file: &Path) -> Result<Session> {
    let mut session = Session::new(config);
    match session.scan(file) {
        Ok(_) => Ok(session),
        Err(ProbeError::NoAudioStreams) => bail!("No audio tracks found in {}", file.display()),
        Err(ProbeError::ExecutableNotFound { program }) => bail!(
            "'{}' was not found. Install FFmpeg or set probe.ffprobe_path in {}",
            program,
            AppConfig::config_path().display()
        ),
        Err(e) => Err(e.into()),
    }
}

fn scan(config: AppConfig, file: &Path) -> Result<()> {
    let session = scan_session(config, file)?;
    let placeholder = &session.config().tracks.language_placeholder;

    println!("Found {} audio track(s):", session.tracks().len());
    for track in session.tracks() {
        println!("  {}", track.display_name(placeholder));
    }
    Ok(())
}

fn import(
    config: AppConfig,
    file: &Path,
    selection: &Selection,
    manifest: Option<&Path>,
) -> Result<()> {
    let mut session = scan_session(config, file)?;

    if selection.all {
        session.select_all(true);
    }
    for &index in &selection.tracks {
        session
            .select(index)
            .with_context(|| format!("Cannot select track {}", index))?;
    }
    session.select_languages(&selection.languages);
    if selection.auto_select {
        session.select_preferred_languages();
    }

    let mut timeline = Timeline::from_config(&session.config().import);
    let result = session.import(&mut timeline);

    // Written even after a partial import; a failed write only warns
    if let Some(path) = manifest
        && let Err(e) = timeline.save_manifest(path)
    {
        warn!("Failed to write manifest {}: {}", path.display(), e);
        eprintln!("Warning: could not write manifest {}: {}", path.display(), e);
    }

    match result {
        Ok(summary) => {
            print_summary(&timeline, &summary);
            Ok(())
        }
        Err(ImportError::NoSelection) => {
            bail!("No audio tracks selected. Use --track, --language, --auto-select or --all")
        }
        Err(ImportError::Partial {
            video,
            succeeded,
            failed_at,
            cause,
        }) => {
            if let Some(video) = &video {
                println!(
                    "Imported video on channel {} at frame {}",
                    video.channel, video.frame_start
                );
            }
            for placed in &succeeded {
                println!(
                    "Imported track {} on channel {}",
                    placed.stream_index, placed.channel
                );
            }
            bail!(
                "Import stopped at track {}: {}. Retry just the remaining tracks with --track.",
                failed_at.stream_index,
                cause
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(timeline: &Timeline<FfmpegExtractor>, summary: &ImportSummary) {
    if let Some(video) = &summary.video {
        println!("Video on channel {} at frame {}", video.channel, video.frame_start);
    }
    for placed in &summary.tracks {
        let size = timeline
            .strips()
            .iter()
            .find(|s| s.id == placed.strip)
            .and_then(|s| std::fs::metadata(&s.path).ok())
            .map(|m| format!(" ({})", format_file_size(m.len())))
            .unwrap_or_default();
        println!(
            "Audio track {} on channel {} at frame {}{}",
            placed.stream_index, placed.channel, placed.frame_start, size
        );
    }
    println!("Imported {} audio track(s).", summary.count());
}

fn check(config: &AppConfig) -> Result<()> {
    let status = DependencyStatus::check(config);
    println!("ffprobe: {}", if status.ffprobe { "ok" } else { "missing" });
    println!("ffmpeg:  {}", if status.ffmpeg { "ok" } else { "missing" });
    if !status.all_present() {
        bail!("Missing tools: {}", status.missing().join(", "));
    }
    Ok(())
}
