use crate::{
    animation::scheduler::{AnimationScheduler, FrameReport},
    foundation::core::{Millis, Rect},
    render::{EffectRenderer, RenderedEffects, SceneEvent, effects::effect_clip},
};

/// Headless renderer that tracks scene timelines and animates them on the player clock.
///
/// It draws nothing; it keeps exactly the state a drawing renderer would need (current scene,
/// prepared effects, per-effect progress, hit regions) so sessions can run without a display.
#[derive(Debug, Default)]
pub struct TimelineRenderer {
    current: Option<SceneEvent>,
    animation: Option<AnimationScheduler>,
    hyperlinks: Vec<Rect>,
    rendered_events: usize,
}

impl TimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_event(&self) -> Option<&SceneEvent> {
        self.current.as_ref()
    }

    pub fn hyperlink_regions(&self) -> &[Rect] {
        &self.hyperlinks
    }

    pub fn rendered_event_count(&self) -> usize {
        self.rendered_events
    }

    pub fn is_animating(&self) -> bool {
        self.animation.as_ref().is_some_and(|a| a.is_running())
    }
}

impl EffectRenderer for TimelineRenderer {
    fn render_event(&mut self, event: &SceneEvent) {
        tracing::trace!(scene = event.scene_index, slide = event.slide_index, "render event");
        self.animation = None;
        self.current = Some(event.clone());
        self.rendered_events += 1;
    }

    fn render_effects(&mut self) -> RenderedEffects {
        let Some(event) = &self.current else {
            return RenderedEffects::default();
        };
        RenderedEffects {
            scene_index: event.scene_index,
            clips: event.timeline.effects.iter().map(effect_clip).collect(),
        }
    }

    fn animate_effects(&mut self, effects: RenderedEffects, now: Millis) {
        let mut scheduler = AnimationScheduler::new(effects.clips);
        scheduler.start(now);
        self.animation = Some(scheduler);
    }

    fn event_overall_end_time(&self) -> f64 {
        self.current
            .as_ref()
            .map_or(0.0, |e| e.timeline.overall_end_time())
    }

    fn delete_all_animations(&mut self) {
        self.animation = None;
    }

    fn render_frame(&mut self, now: Millis) -> Option<FrameReport> {
        let animation = self.animation.as_mut()?;
        let report = animation.frame(now);
        for index in &report.newly_completed {
            if let Some(clip) = animation.clips().get(*index) {
                tracing::trace!(effect = %clip.name, elapsed = report.elapsed, "effect complete");
            }
        }
        Some(report)
    }

    fn clear_hyperlinks(&mut self) {
        self.hyperlinks.clear();
    }

    fn add_hyperlink(&mut self, rect: Rect) {
        self.hyperlinks.push(rect);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/timeline.rs"]
mod tests;
