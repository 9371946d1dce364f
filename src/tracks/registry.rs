use super::AudioTrackDescriptor;
use crate::error::RegistryError;

/// Descriptors from the last successful scan, backing the selection list
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: Vec<AudioTrackDescriptor>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every previous descriptor and take `tracks` as the new set.
    ///
    /// Selections are never carried over: stream indices from another file
    /// mean nothing here.
    pub fn replace(&mut self, tracks: Vec<AudioTrackDescriptor>) {
        self.tracks = tracks;
    }

    /// Flip the selection of a track, returning its new state
    pub fn toggle(&mut self, stream_index: u32) -> Result<bool, RegistryError> {
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.stream_index == stream_index)
            .ok_or(RegistryError::UnknownIndex(stream_index))?;
        track.selected = !track.selected;
        Ok(track.selected)
    }

    pub fn set_selected(&mut self, stream_index: u32, selected: bool) -> Result<(), RegistryError> {
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.stream_index == stream_index)
            .ok_or(RegistryError::UnknownIndex(stream_index))?;
        track.selected = selected;
        Ok(())
    }

    pub fn set_all(&mut self, selected: bool) {
        for track in &mut self.tracks {
            track.selected = selected;
        }
    }

    /// Selected tracks, in registry order
    pub fn selected(&self) -> Vec<AudioTrackDescriptor> {
        self.tracks.iter().filter(|t| t.selected).cloned().collect()
    }

    pub fn get(&self, stream_index: u32) -> Option<&AudioTrackDescriptor> {
        self.tracks.iter().find(|t| t.stream_index == stream_index)
    }

    pub fn tracks(&self) -> &[AudioTrackDescriptor] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [AudioTrackDescriptor] {
        &mut self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(indices: &[u32]) -> TrackRegistry {
        let mut registry = TrackRegistry::new();
        registry.replace(
            indices
                .iter()
                .map(|&i| AudioTrackDescriptor::new(i, "aac", 2))
                .collect(),
        );
        registry
    }

    #[test]
    fn test_toggle_twice_restores_flag() {
        let mut registry = registry_with(&[1, 2]);
        assert!(registry.toggle(2).unwrap());
        assert!(!registry.toggle(2).unwrap());
        assert!(registry.get(2).is_some_and(|t| !t.selected));
        assert!(registry.selected().is_empty());
    }

    #[test]
    fn test_toggle_unknown_index() {
        let mut registry = registry_with(&[1, 2]);
        assert_eq!(registry.toggle(0), Err(RegistryError::UnknownIndex(0)));
        assert!(registry.selected().is_empty());
    }

    #[test]
    fn test_replace_supersedes_previous_tracks() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry.set_all(true);

        let mut fresh = AudioTrackDescriptor::new(2, "opus", 6);
        fresh.language = Some("ger".to_string());
        registry.replace(vec![fresh.clone(), AudioTrackDescriptor::new(5, "flac", 2)]);

        assert_eq!(registry.len(), 2);
        assert!(registry.selected().is_empty());
        assert!(registry.get(1).is_none());

        registry.toggle(2).unwrap();
        let selected = registry.selected();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].codec_name, "opus");
        assert_eq!(selected[0].language.as_deref(), Some("ger"));
    }

    #[test]
    fn test_selected_keeps_registry_order() {
        let mut registry = registry_with(&[4, 1, 3]);
        registry.toggle(3).unwrap();
        registry.toggle(4).unwrap();
        let indices: Vec<u32> = registry.selected().iter().map(|t| t.stream_index).collect();
        assert_eq!(indices, vec![4, 3]);
    }

    #[test]
    fn test_clear_empties_registry() {
        let mut registry = registry_with(&[1]);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.toggle(1), Err(RegistryError::UnknownIndex(1)));
    }
}
