//! Free space checks for the extraction work directory.

use std::path::Path;
use tracing::debug;

/// Kept free on top of a WAV's estimated size. The PCM estimate leaves out
/// the RIFF header and any rounding in the reported duration.
pub const WAV_HEADROOM: u64 = 1024 * 1024;

/// Bytes an unprivileged writer can still use on the filesystem holding `dir`
#[cfg(unix)]
pub fn free_bytes(dir: &Path) -> Option<u64> {
    use nix::sys::statvfs::statvfs;
    let stat = statvfs(dir).ok()?;
    (stat.blocks_available() as u64).checked_mul(stat.fragment_size() as u64)
}

#[cfg(not(unix))]
pub fn free_bytes(_dir: &Path) -> Option<u64> {
    None
}

/// Whether `work_dir` can take an extracted WAV of about `wav_bytes`.
///
/// A filesystem that cannot be queried never blocks an extraction.
pub fn has_room_for_wav(work_dir: &Path, wav_bytes: u64) -> bool {
    match free_bytes(work_dir) {
        Some(free) => free >= wav_bytes.saturating_add(WAV_HEADROOM),
        None => {
            debug!("Free space of {} unknown, extracting anyway", work_dir.display());
            true
        }
    }
}
