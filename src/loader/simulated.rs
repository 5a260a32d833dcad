use std::collections::BTreeSet;

use crate::{
    foundation::core::Millis,
    loader::{LoadReply, SceneLoader, cache::TextureCache},
    script::model::Script,
};

/// In-memory loader that "downloads" whole slides after a fixed latency.
///
/// A slide requested with a reply becomes resident when the session reports the reply back
/// through [`SceneLoader::scene_loaded`]. Preloads carry no reply, so they are resident at once.
/// Slides marked unreachable never complete.
#[derive(Clone, Debug, Default)]
pub struct SimulatedLoader {
    slide_of_scene: Vec<usize>,
    cache: TextureCache,
    latency: Millis,
    unreachable: BTreeSet<usize>,
    requests: Vec<usize>,
}

impl SimulatedLoader {
    pub fn for_script(script: &Script, latency: Millis) -> Self {
        let slide_of_scene = (0..script.num_scenes())
            .map(|scene| script.slide_index_from_scene_index(scene).unwrap_or(0))
            .collect();
        Self {
            slide_of_scene,
            latency,
            ..Self::default()
        }
    }

    pub fn with_unreachable_slide(mut self, slide_index: usize) -> Self {
        self.unreachable.insert(slide_index);
        self
    }

    /// Mark a slide resident without a request, as if loaded earlier.
    pub fn with_resident_slide(mut self, slide_index: usize) -> Self {
        self.cache.entry(slide_index).loaded = true;
        self
    }

    pub fn latency(&self) -> Millis {
        self.latency
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    fn make_resident(cache: &mut TextureCache, slide: usize) {
        let entry = cache.entry(slide);
        entry.loaded = true;
        entry
            .textures
            .entry(format!("slide-{slide}"))
            .or_insert_with(|| format!("assets/slide-{slide}.png"));
    }

    /// Every scene passed to `load_scene`, in call order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }
}

impl SceneLoader for SimulatedLoader {
    /// True once the slide is resident; a request still waiting on its latency does not count.
    fn is_scene_preloaded(&self, scene_index: usize) -> bool {
        self.slide_of_scene
            .get(scene_index)
            .is_some_and(|&slide| self.cache.is_loaded(slide))
    }

    fn load_scene(&mut self, scene_index: usize, reply: Option<LoadReply<'_>>) {
        self.requests.push(scene_index);
        let Some(&slide) = self.slide_of_scene.get(scene_index) else {
            tracing::debug!(scene_index, "load requested for unknown scene");
            return;
        };

        let entry = self.cache.entry(slide);
        entry.requested = true;
        if self.unreachable.contains(&slide) {
            tracing::debug!(scene_index, slide, "slide unreachable, load never completes");
            return;
        }

        let resident = entry.loaded;
        match reply {
            Some(reply) if resident => reply.complete_now(),
            Some(reply) => reply.complete_after(self.latency),
            None => Self::make_resident(&mut self.cache, slide),
        }
    }

    fn scene_loaded(&mut self, scene_index: usize) {
        if let Some(&slide) = self.slide_of_scene.get(scene_index) {
            Self::make_resident(&mut self.cache, slide);
        }
    }

    fn evict_slides_except(&mut self, keep: std::ops::RangeInclusive<usize>) {
        let evicted = self.cache.retain(keep);
        if !evicted.is_empty() {
            tracing::trace!(?evicted, "evicted slide textures");
        }
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/simulated.rs"]
mod tests;
