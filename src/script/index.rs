//! Slide/scene index arithmetic.
//!
//! Scenes are a show-wide build counter; every slide owns one or more consecutive scenes. All
//! functions here are pure so they can be checked exhaustively without a session.

use crate::{
    foundation::error::{PlayerError, PlayerResult},
    script::model::Script,
};

/// Wrap `index` into `[0, last_index]` when looping, or reject it.
///
/// Indices already in range pass through. Out-of-range indices wrap by one period
/// (`index ± (last_index + 1)`) when `is_looping`, otherwise there is no such index.
pub fn truncated_index(index: i64, last_index: usize, is_looping: bool) -> Option<usize> {
    let last = last_index as i64;
    let wrapped = if index < 0 {
        if !is_looping {
            return None;
        }
        index + last + 1
    } else if index > last {
        if !is_looping {
            return None;
        }
        index - last - 1
    } else {
        index
    };
    // Indices more than one period out stay invalid.
    usize::try_from(wrapped).ok().filter(|&i| i <= last_index)
}

/// Scene after `scene_index`, `0` at the end of a looping show, `None` when the show is over.
pub fn next_scene_index(scene_index: usize, last_scene_index: usize, is_looping: bool) -> Option<usize> {
    if scene_index < last_scene_index {
        Some(scene_index + 1)
    } else if is_looping {
        Some(0)
    } else {
        None
    }
}

/// Precomputed scene→slide and slide→first-scene lookup tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SceneTable {
    slide_of_scene: Vec<usize>,
    first_scene_of_slide: Vec<usize>,
}

impl SceneTable {
    /// Build tables from the owning slide of every scene.
    ///
    /// The mapping must start at slide 0, never decrease, never skip a slide, and cover every
    /// slide in the show.
    pub(crate) fn new(slide_of_scene: Vec<usize>, slide_count: usize) -> PlayerResult<Self> {
        let mut first_scene_of_slide = Vec::with_capacity(slide_count);
        for (scene, &slide) in slide_of_scene.iter().enumerate() {
            let expected_new = first_scene_of_slide.len();
            if slide == expected_new {
                first_scene_of_slide.push(scene);
            } else if expected_new == 0 || slide != expected_new - 1 {
                return Err(PlayerError::script(format!(
                    "scene {scene} belongs to slide {slide}, but slides must own consecutive scenes in order"
                )));
            }
        }
        if first_scene_of_slide.len() != slide_count {
            return Err(PlayerError::script(format!(
                "{} of {slide_count} slides have scenes",
                first_scene_of_slide.len()
            )));
        }
        Ok(Self {
            slide_of_scene,
            first_scene_of_slide,
        })
    }

    pub(crate) fn slide_of_scene(&self, scene_index: usize) -> Option<usize> {
        self.slide_of_scene.get(scene_index).copied()
    }

    pub(crate) fn first_scene_of_slide(&self, slide_index: usize) -> Option<usize> {
        self.first_scene_of_slide.get(slide_index).copied()
    }

    pub(crate) fn scenes_in_slide(&self, slide_index: usize) -> usize {
        let Some(&first) = self.first_scene_of_slide.get(slide_index) else {
            return 0;
        };
        let end = self
            .first_scene_of_slide
            .get(slide_index + 1)
            .copied()
            .unwrap_or(self.slide_of_scene.len());
        end - first
    }
}

impl Script {
    /// Owning slide of a scene; `None` for indices outside the show.
    pub fn slide_index_from_scene_index(&self, scene_index: usize) -> Option<usize> {
        self.table().slide_of_scene(scene_index)
    }

    /// First scene (build) of a slide.
    pub fn scene_index_from_slide_index(&self, slide_index: usize) -> Option<usize> {
        self.table().first_scene_of_slide(slide_index)
    }

    pub fn builds_in_slide(&self, slide_index: usize) -> usize {
        self.table().scenes_in_slide(slide_index)
    }

    pub fn truncated_scene_index(&self, scene_index: i64) -> Option<usize> {
        truncated_index(scene_index, self.last_scene_index(), self.loop_slideshow)
    }

    pub fn truncated_slide_index(&self, slide_index: i64) -> Option<usize> {
        truncated_index(slide_index, self.last_slide_index(), self.loop_slideshow)
    }

    pub fn calculate_next_scene_index(&self, scene_index: usize) -> Option<usize> {
        next_scene_index(scene_index, self.last_scene_index(), self.loop_slideshow)
    }

    pub fn is_last_scene(&self, scene_index: usize) -> bool {
        scene_index == self.last_scene_index()
    }

    pub fn is_last_slide(&self, slide_index: usize) -> bool {
        slide_index == self.last_slide_index()
    }

    /// Scene reached by following a recorded navigation event (slide id + build offset).
    pub fn scene_index_for_slide_event(&self, slide_id: &str, event_index: usize) -> Option<usize> {
        let slide = self.slide_index_for_id(slide_id)?;
        let first = self.scene_index_from_slide_index(slide)?;
        Some(first + event_index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/index.rs"]
mod tests;
