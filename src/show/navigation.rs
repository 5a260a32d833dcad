//! Build and slide navigation requested by the viewer.

use crate::{
    loader::SceneLoader,
    render::EffectRenderer,
    show::{
        host::ShowHost,
        session::ShowSession,
        state::ShowState,
        task::{AdvanceOrigin, UserAction},
    },
};

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    /// Play the next build, or queue the request while the session is busy.
    pub fn advance_to_next_build(&mut self) -> bool {
        self.advance_to_next_build_from(AdvanceOrigin::User)
    }

    pub(crate) fn advance_to_next_build_from(&mut self, origin: AdvanceOrigin) -> bool {
        let Some(script) = self.script.as_ref() else {
            return false;
        };
        if script.is_hyperlinks_only() && origin != AdvanceOrigin::SceneCompletion {
            return false;
        }
        let num_scenes = script.num_scenes();
        let looping = script.loop_slideshow;

        match self.state {
            ShowState::IdleAtFinalState => match self.cursor.next_scene {
                None => {
                    self.stop_soundtrack();
                    if self.opts.host_controls_lifecycle {
                        self.exit_show(false);
                        true
                    } else {
                        false
                    }
                }
                Some(next) => {
                    let automatic = self.script.as_ref().is_some_and(|s| s.is_automatic(next));
                    tracing::debug!(next, automatic, "advance to next build");
                    self.jump_to_scene(next, true);
                    true
                }
            },
            ShowState::IdleAtInitialState => {
                let past_end = self.cursor.current_scene.is_none_or(|scene| scene >= num_scenes);
                if past_end {
                    if looping {
                        self.jump_to_scene(0, false);
                        true
                    } else {
                        self.stop_soundtrack();
                        if self.opts.host_controls_lifecycle {
                            self.exit_show(false);
                        }
                        false
                    }
                } else {
                    self.play_current_scene(None);
                    true
                }
            }
            _ => self.queue_action(UserAction::AdvanceToNextBuild(origin)),
        }
    }

    /// Jump to the first build of the next slide, or queue the request while busy.
    pub fn advance_to_next_slide(&mut self) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        if script.is_hyperlinks_only() {
            return;
        }
        if !self.state.is_idle() {
            self.queue_action(UserAction::AdvanceToNextSlide);
            return;
        }
        let Some(scene) = self.adjusted_scene_index() else {
            return;
        };
        let slide = script.slide_index_from_scene_index(scene);
        let base = if slide.is_some_and(|s| script.is_last_slide(s)) {
            slide
        } else {
            self.cursor.current_slide.or(slide)
        };
        let Some(next_slide) = base.map_or(Some(0), |s| script.truncated_slide_index(s as i64 + 1))
        else {
            return;
        };

        let automatic = script
            .scene_index_from_slide_index(next_slide)
            .is_some_and(|first| script.is_automatic(first));
        self.go_to_slide(next_slide, automatic);
    }

    /// Step back one build, showing the previous scene at its initial state.
    pub fn go_back_to_previous_build(&mut self) {
        self.reset_media_cache();
        let Some(script) = self.script.as_ref() else {
            return;
        };
        if script.is_hyperlinks_only() {
            return;
        }
        match self.state {
            ShowState::IdleAtFinalState | ShowState::Playing | ShowState::IdleAtInitialState => {
                let Some(previous) = self
                    .adjusted_scene_index()
                    .and_then(|scene| script.truncated_scene_index(scene as i64 - 1))
                else {
                    return;
                };
                self.jump_to_scene(previous, false);
            }
            _ => {
                self.queue_action(UserAction::GoBackToPreviousBuild);
            }
        }
    }

    /// Show the next scene at its initial state without playing the current one.
    pub fn advance_and_skip_build(&mut self) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        if script.is_hyperlinks_only() {
            return;
        }
        if !self.state.is_idle() {
            self.queue_action(UserAction::AdvanceAndSkipBuild);
            return;
        }
        // Past the last scene counts as the last scene.
        let Some(next) = self.adjusted_scene_index().and_then(|scene| {
            let scene = scene.min(script.last_scene_index());
            script.truncated_scene_index(scene as i64 + 1)
        }) else {
            return;
        };
        self.jump_to_scene(next, false);
    }

    /// Go to the first build of the current slide, or of the previous slide when already there.
    pub fn go_back_to_previous_slide(&mut self) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        if script.is_hyperlinks_only() {
            return;
        }
        if !matches!(
            self.state,
            ShowState::IdleAtFinalState | ShowState::Playing | ShowState::IdleAtInitialState
        ) {
            self.queue_action(UserAction::GoBackToPreviousSlide);
            return;
        }
        let Some(scene) = self.adjusted_scene_index() else {
            return;
        };
        let slide = script.slide_index_from_scene_index(scene);
        let first_of_slide = slide.and_then(|s| script.scene_index_from_slide_index(s));

        let previous = match slide {
            Some(0) if scene > 0 => Some(0),
            Some(0) => Some(script.truncated_slide_index(-1).unwrap_or(0)),
            // Past the end of the show: back to the last slide.
            None if scene > 0 => Some(script.last_slide_index()),
            _ => {
                let current = self.cursor.current_slide;
                if first_of_slide.is_some_and(|first| scene > first) {
                    current
                } else {
                    current.and_then(|s| s.checked_sub(1))
                }
            }
        };

        if let Some(previous) = previous {
            self.go_to_slide(previous, false);
        }
    }

    /// Jump to a slide by its 1-based number, as typed by the viewer.
    pub fn jump_to_slide(&mut self, slide_number: usize, automatic: bool) {
        if self.script.as_ref().is_none_or(|s| s.is_hyperlinks_only()) {
            return;
        }
        match slide_number.checked_sub(1) {
            Some(index) => self.go_to_slide(index, automatic),
            None => tracing::debug!(slide_number, "slide numbers start at 1"),
        }
    }

    pub(crate) fn go_to_slide(&mut self, slide_index: usize, automatic: bool) {
        let Some(scene) = self
            .script
            .as_ref()
            .and_then(|s| s.scene_index_from_slide_index(slide_index))
        else {
            tracing::debug!(slide_index, "no such slide");
            return;
        };
        self.reset_media_cache();
        self.jump_to_scene(scene, automatic);
    }

    /// Keep `action` for the next idle turn. Only one action waits; later ones are dropped.
    fn queue_action(&mut self, action: UserAction) -> bool {
        if self.queued_action.is_some() {
            tracing::debug!(?action, "busy, action dropped");
            return false;
        }
        tracing::debug!(?action, state = %self.state, "busy, action queued");
        self.queued_action = Some(action);
        true
    }

    pub(crate) fn run_user_action(&mut self, action: UserAction) {
        match action {
            UserAction::AdvanceToNextBuild(origin) => {
                self.advance_to_next_build_from(origin);
            }
            UserAction::AdvanceToNextSlide => self.advance_to_next_slide(),
            UserAction::GoBackToPreviousBuild => self.go_back_to_previous_build(),
            UserAction::AdvanceAndSkipBuild => self.advance_and_skip_build(),
            UserAction::GoBackToPreviousSlide => self.go_back_to_previous_slide(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/navigation.rs"]
mod tests;
