//! Playing a displayed scene and reacting to its completion.

use crate::{
    foundation::core::secs_to_millis,
    loader::SceneLoader,
    render::{
        EffectRenderer, RenderedEffects,
        effects::{Prerender, effect_profile},
    },
    script::model::{EffectType, ShowMode},
    show::{host::ShowHost, session::ShowSession, state::ShowState, task::Task},
};

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    /// Animate the displayed scene. `hyperlink_target` is the scene a hyperlink transition
    /// lands on; otherwise the show moves on to the next scene.
    pub(crate) fn play_current_scene(&mut self, hyperlink_target: Option<usize>) {
        let mut duration = self.renderer.event_overall_end_time();
        self.change_state(ShowState::Playing);
        self.clear_all_hyperlinks();
        self.hide_help();
        self.hide_slide_number();

        let mut delay = 0.0;
        let scene_to_jump = match hyperlink_target {
            Some(target) => {
                self.reset_media_cache();
                Some(target)
            }
            None => {
                let next = self.cursor.next_scene;
                let slide_of = |scene: Option<usize>| {
                    scene.and_then(|s| self.script.as_ref()?.slide_index_from_scene_index(s))
                };
                let (current_slide, next_slide) = (slide_of(self.cursor.current_scene), slide_of(next));
                if next_slide.is_none() || current_slide != next_slide {
                    self.reset_media_cache();
                }

                if let Some(timeline) = self.displayed.as_ref().map(|e| &e.timeline)
                    && timeline.automatic_play
                    && let Some(first) = timeline.first_effect()
                    && first.kind == EffectType::Transition
                {
                    delay = first.begin_time;
                    duration = first.duration;
                }
                next
            }
        };

        if self.opts.animation_supported {
            self.timers.animate.clear(&mut self.queue);
            let eager = self
                .displayed
                .as_ref()
                .and_then(|e| e.timeline.first_effect())
                .is_some_and(|first| {
                    first.kind == EffectType::Transition
                        && effect_profile(first).prerender == Prerender::Eager
                });
            let prepared = eager.then(|| self.renderer.render_effects());
            let task = Task::StartAnimation {
                prepared,
                scene_to_jump,
                duration_ms: secs_to_millis(duration),
            };
            self.timers
                .animate
                .arm(&mut self.queue, secs_to_millis(delay), task);
            return;
        }

        let automatic = self.displayed.as_ref().is_some_and(|e| e.timeline.automatic_play);
        let fallback = self.opts.no_animation_auto_delay_ms;
        match scene_to_jump {
            None => {
                self.update_navigation_buttons();
                if self.opts.host_controls_lifecycle {
                    if automatic {
                        self.queue.schedule(fallback, Task::ExitShow);
                    } else {
                        self.exit_show(false);
                    }
                } else {
                    self.change_state(ShowState::IdleAtInitialState);
                }
            }
            Some(scene_index) if automatic => {
                let task = Task::JumpWithoutAnimation {
                    scene_index,
                    settle_first: true,
                };
                self.queue.schedule(fallback, task);
            }
            Some(scene_index) => {
                self.change_state(ShowState::IdleAtInitialState);
                let task = Task::JumpWithoutAnimation {
                    scene_index,
                    settle_first: false,
                };
                self.queue.schedule(self.opts.next_turn_delay_ms, task);
            }
        }
    }

    pub(crate) fn jump_without_animation(&mut self, scene_index: usize, settle_first: bool) {
        if settle_first {
            self.change_state(ShowState::IdleAtInitialState);
        }
        let automatic = self.script.as_ref().is_some_and(|s| s.is_automatic(scene_index));
        self.jump_to_scene(scene_index, automatic);
    }

    pub(crate) fn start_animation(
        &mut self,
        prepared: Option<RenderedEffects>,
        scene_to_jump: Option<usize>,
        duration_ms: u64,
    ) {
        if self.state != ShowState::Playing {
            tracing::debug!(state = %self.state, "animation start skipped");
            return;
        }
        let has_effects = self
            .displayed
            .as_ref()
            .is_some_and(|e| !e.timeline.effects.is_empty());
        if has_effects {
            let effects = match prepared {
                Some(effects) => effects,
                None => self.renderer.render_effects(),
            };
            let now = self.now();
            self.renderer.animate_effects(effects, now);
            let interval = self.opts.frame_interval_ms;
            self.timers
                .frame
                .arm(&mut self.queue, interval, Task::AnimationFrame);
        }

        let wait = duration_ms.saturating_add(self.opts.completion_epsilon_ms);
        self.timers
            .complete
            .arm(&mut self.queue, wait, Task::SceneDidComplete { scene_to_jump });
    }

    pub(crate) fn animation_frame(&mut self) {
        let now = self.now();
        let Some(report) = self.renderer.render_frame(now) else {
            return;
        };
        if !report.finished && self.state == ShowState::Playing {
            let interval = self.opts.frame_interval_ms;
            self.timers
                .frame
                .arm(&mut self.queue, interval, Task::AnimationFrame);
        }
    }

    pub(crate) fn current_scene_did_complete(&mut self, scene_to_jump: Option<usize>) {
        if self.state != ShowState::Playing {
            tracing::debug!(state = %self.state, "stale scene completion ignored");
            return;
        }
        self.hide_slide_number();
        self.change_state(ShowState::IdleAtFinalState);

        let Some(script) = self.script.as_ref() else {
            return;
        };
        let hyperlinks_only = script.is_hyperlinks_only();
        let autoplay = script.show_mode == ShowMode::Autoplay;
        let next = self.cursor.next_scene;

        if let Some(target) = scene_to_jump
            && (hyperlinks_only || Some(target) != next)
        {
            let automatic = script.is_automatic(target);
            self.jump_to_scene(target, automatic);
            return;
        }

        match next {
            None => {
                self.update_navigation_buttons();
                self.stop_soundtrack();
                if self.opts.host_controls_lifecycle {
                    self.exit_show(false);
                }
            }
            Some(next) if autoplay || script.is_automatic(next) => {
                self.next_turn(Task::AdvanceAfterCompletion);
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/playback.rs"]
mod tests;
