use std::collections::BTreeMap;

use crate::show::host::MediaKind;

/// Media elements alive for the slide on screen.
///
/// Entries survive build changes within a slide and are released together when the show crosses
/// a slide boundary or rewinds.
#[derive(Clone, Debug, Default)]
pub struct MediaCache {
    movies: BTreeMap<String, String>, // id -> source
    audio: BTreeMap<String, String>,
    resets: u64,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: MediaKind, id: impl Into<String>, source: impl Into<String>) {
        self.map_mut(kind).insert(id.into(), source.into());
    }

    pub fn contains(&self, kind: MediaKind, id: &str) -> bool {
        self.map(kind).contains_key(id)
    }

    pub fn len(&self, kind: MediaKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.audio.is_empty()
    }

    /// Number of resets so far, including resets of an already empty cache.
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Drop every entry, returning released ids per kind (movies first).
    pub fn reset(&mut self) -> [(MediaKind, Vec<String>); 2] {
        self.resets += 1;
        let movies = std::mem::take(&mut self.movies).into_keys().collect();
        let audio = std::mem::take(&mut self.audio).into_keys().collect();
        [(MediaKind::Movie, movies), (MediaKind::Audio, audio)]
    }

    fn map(&self, kind: MediaKind) -> &BTreeMap<String, String> {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Audio => &self.audio,
        }
    }

    fn map_mut(&mut self, kind: MediaKind) -> &mut BTreeMap<String, String> {
        match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Audio => &mut self.audio,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/media.rs"]
mod tests;
