pub(crate) mod effects;
pub(crate) mod timeline;

use crate::{
    animation::scheduler::{EffectClip, FrameReport},
    foundation::core::{Millis, Rect},
    script::model::EventTimeline,
};

/// A scene timeline bound to the slide it is shown on.
///
/// Hyperlink transitions reuse the slide/scene of the link's own scene with the link's override
/// timeline, so `timeline` is not always `script.events[scene_index]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEvent {
    pub slide_id: String,
    pub slide_index: usize,
    pub scene_index: usize,
    pub timeline: EventTimeline,
    pub animation_supported: bool,
}

/// Effects prepared for a scene but not yet animating.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedEffects {
    pub scene_index: usize,
    pub clips: Vec<EffectClip>,
}

/// Visual side of playback, driven by the show session.
pub trait EffectRenderer {
    /// Set up the static initial state of a scene. Nothing animates.
    fn render_event(&mut self, event: &SceneEvent);

    /// Prepare the current scene's effects without starting them.
    fn render_effects(&mut self) -> RenderedEffects;

    /// Start the time-driven animation of prepared effects at clock time `now`.
    fn animate_effects(&mut self, effects: RenderedEffects, now: Millis);

    /// Seconds the current scene needs before its animation counts as complete.
    fn event_overall_end_time(&self) -> f64;

    /// Drop every running or prepared animation.
    fn delete_all_animations(&mut self) {}

    /// Sample the running animation at clock time `now`.
    fn render_frame(&mut self, _now: Millis) -> Option<FrameReport> {
        None
    }

    fn clear_hyperlinks(&mut self) {}

    fn add_hyperlink(&mut self, _rect: Rect) {}
}

impl<R: EffectRenderer + ?Sized> EffectRenderer for Box<R> {
    fn render_event(&mut self, event: &SceneEvent) {
        (**self).render_event(event)
    }

    fn render_effects(&mut self) -> RenderedEffects {
        (**self).render_effects()
    }

    fn animate_effects(&mut self, effects: RenderedEffects, now: Millis) {
        (**self).animate_effects(effects, now)
    }

    fn event_overall_end_time(&self) -> f64 {
        (**self).event_overall_end_time()
    }

    fn delete_all_animations(&mut self) {
        (**self).delete_all_animations()
    }

    fn render_frame(&mut self, now: Millis) -> Option<FrameReport> {
        (**self).render_frame(now)
    }

    fn clear_hyperlinks(&mut self) {
        (**self).clear_hyperlinks()
    }

    fn add_hyperlink(&mut self, rect: Rect) {
        (**self).add_hyperlink(rect)
    }
}
