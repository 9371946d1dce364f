use crate::analyzer;
use crate::config::AppConfig;
use crate::error::{ImportError, ProbeError, RegistryError};
use crate::importer::{self, EditingSurface, ImportOptions, ImportSummary};
use crate::tracks::{AudioTrackDescriptor, TrackRegistry, presets};
use std::path::{Path, PathBuf};
use tracing::info;

/// State of one user session: the scanned file and its track list.
///
/// Handlers for scan, toggle and import all go through this object instead
/// of shared globals.
#[derive(Debug, Default)]
pub struct Session {
    config: AppConfig,
    source: Option<PathBuf>,
    registry: TrackRegistry,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            source: None,
            registry: TrackRegistry::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// File the current track list was scanned from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn tracks(&self) -> &[AudioTrackDescriptor] {
        self.registry.tracks()
    }

    /// Scan `path` and make its audio tracks the current list.
    ///
    /// On any error the previous list and source stay as they were.
    pub fn scan(&mut self, path: &Path) -> Result<usize, ProbeError> {
        let absolute = path.canonicalize().map_err(|_| ProbeError::InvalidPath {
            path: path.to_path_buf(),
        })?;

        let tracks = analyzer::scan(&absolute, &self.config.probe)?;
        let count = tracks.len();
        self.registry.replace(tracks);
        self.source = Some(absolute);
        Ok(count)
    }

    pub fn toggle(&mut self, stream_index: u32) -> Result<bool, RegistryError> {
        self.registry.toggle(stream_index)
    }

    pub fn select(&mut self, stream_index: u32) -> Result<(), RegistryError> {
        self.registry.set_selected(stream_index, true)
    }

    pub fn select_all(&mut self, selected: bool) {
        self.registry.set_all(selected);
    }

    /// Select tracks in the configured preferred languages
    pub fn select_preferred_languages(&mut self) -> usize {
        presets::select_by_language(&mut self.registry, &self.config.tracks.preferred_languages)
    }

    pub fn select_languages(&mut self, languages: &[String]) -> usize {
        presets::select_by_language(&mut self.registry, languages)
    }

    pub fn selected(&self) -> Vec<AudioTrackDescriptor> {
        self.registry.selected()
    }

    /// Import the selected tracks of the scanned file onto `surface`
    pub fn import(&self, surface: &mut dyn EditingSurface) -> Result<ImportSummary, ImportError> {
        let selected = self.registry.selected();
        let Some(source) = self.source.as_deref() else {
            return Err(ImportError::NoSelection);
        };

        let options = ImportOptions::from(&self.config.import);
        let summary = importer::import_tracks(source, &selected, surface, &options)?;
        info!(
            "Imported {} audio track(s) from {}",
            summary.count(),
            source.display()
        );
        Ok(summary)
    }

    /// Forget the scanned file and its tracks
    pub fn reset(&mut self) {
        self.registry.clear();
        self.source = None;
    }
}
