use super::TrackRegistry;

/// Select every track whose language matches one of `preferred`.
///
/// Matching ignores ASCII case. Other selections are left as they are.
/// Returns how many tracks ended up newly selected.
pub fn select_by_language(registry: &mut TrackRegistry, preferred: &[String]) -> usize {
    if preferred.is_empty() {
        return 0;
    }

    let mut newly_selected = 0;
    for track in registry.tracks_mut() {
        if let Some(lang) = track.language.as_deref()
            && preferred.iter().any(|p| lang.eq_ignore_ascii_case(p))
            && !track.selected
        {
            track.selected = true;
            newly_selected += 1;
        }
    }
    newly_selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::AudioTrackDescriptor;

    fn track(index: u32, lang: Option<&str>) -> AudioTrackDescriptor {
        let mut t = AudioTrackDescriptor::new(index, "aac", 2);
        t.language = lang.map(str::to_string);
        t
    }

    #[test]
    fn test_selects_matching_languages_case_insensitive() {
        let mut registry = TrackRegistry::new();
        registry.replace(vec![
            track(1, Some("eng")),
            track(2, Some("ITA")),
            track(3, None),
            track(4, Some("jpn")),
        ]);

        let count = select_by_language(&mut registry, &["ita".to_string(), "ENG".to_string()]);
        assert_eq!(count, 2);

        let indices: Vec<u32> = registry.selected().iter().map(|t| t.stream_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_empty_preferences_select_nothing() {
        let mut registry = TrackRegistry::new();
        registry.replace(vec![track(1, Some("eng"))]);
        assert_eq!(select_by_language(&mut registry, &[]), 0);
        assert!(registry.selected().is_empty());
    }

    #[test]
    fn test_already_selected_not_counted() {
        let mut registry = TrackRegistry::new();
        registry.replace(vec![track(1, Some("eng")), track(2, Some("eng"))]);
        registry.toggle(1).unwrap();
        assert_eq!(select_by_language(&mut registry, &["eng".to_string()]), 1);
        assert_eq!(registry.selected().len(), 2);
    }
}
