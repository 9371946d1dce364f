//! Pick audio tracks out of a video container and place them on a timeline.
//!
//! `ffprobe` lists the audio streams of a file ([`analyzer::scan`]), the
//! user toggles entries in a [`TrackRegistry`], and [`importer::import_tracks`]
//! puts each selected stream on its own channel of an [`EditingSurface`].
//! [`Session`] ties the three together for one user.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod importer;
pub mod session;
pub mod timeline;
pub mod tracks;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, HostError, ImportError, ProbeError, RegistryError};
pub use importer::{EditingSurface, ImportOptions, ImportSummary, import_tracks};
pub use session::Session;
pub use timeline::Timeline;
pub use tracks::{AudioTrackDescriptor, TrackRegistry};
