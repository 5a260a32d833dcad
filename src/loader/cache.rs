use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Texture assets of one slide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlideTextures {
    pub textures: BTreeMap<String, String>, // texture id -> source
    pub requested: bool,
    pub loaded: bool,
}

/// Evictable texture cache keyed by slide index.
#[derive(Clone, Debug, Default)]
pub struct TextureCache {
    slides: BTreeMap<usize, SlideTextures>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, slide_index: usize) -> Option<&SlideTextures> {
        self.slides.get(&slide_index)
    }

    pub fn entry(&mut self, slide_index: usize) -> &mut SlideTextures {
        self.slides.entry(slide_index).or_default()
    }

    pub fn is_loaded(&self, slide_index: usize) -> bool {
        self.slides.get(&slide_index).is_some_and(|s| s.loaded)
    }

    pub fn slide_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slides.keys().copied()
    }

    /// Evict every slide outside `keep`, returning the evicted slide indices.
    pub fn retain(&mut self, keep: RangeInclusive<usize>) -> Vec<usize> {
        let evicted: Vec<usize> = self
            .slides
            .keys()
            .copied()
            .filter(|i| !keep.contains(i))
            .collect();
        for i in &evicted {
            self.slides.remove(i);
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.slides.clear();
    }
}

/// Slides kept resident around `slide_index`: the previous, current and next slide.
pub fn resident_window(slide_index: usize) -> RangeInclusive<usize> {
    slide_index.saturating_sub(1)..=slide_index.saturating_add(1)
}

#[cfg(test)]
#[path = "../../tests/unit/loader/cache.rs"]
mod tests;
