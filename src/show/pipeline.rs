//! Scene display pipeline: load, set up, display, then play or settle.

use crate::{
    foundation::core::secs_to_millis,
    loader::{LoadReply, LoadTicket, SceneLoader},
    render::{EffectRenderer, SceneEvent},
    script::model::{EffectType, ShowMode},
    show::{
        host::{HudCommand, NavigationButtons, Notification, RetryPrompt, ShowHost},
        session::{PendingLoad, ShowSession},
        state::ShowState,
        task::Task,
    },
};

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    /// Show `scene_index`, loading its assets first when needed, then play it or settle at its
    /// initial state.
    ///
    /// Ignored unless the session is starting, idle, or ready to jump.
    pub(crate) fn jump_to_scene(&mut self, scene_index: usize, play: bool) {
        self.cursor.last_slide_viewed = self
            .cursor
            .current_scene
            .and_then(|scene| self.script.as_ref()?.slide_index_from_scene_index(scene));

        if !self.state.accepts_jump() {
            tracing::debug!(scene_index, state = %self.state, "jump rejected in this state");
            return;
        }
        if self.script.as_ref().and_then(|s| s.event(scene_index)).is_none() {
            tracing::debug!(scene_index, "jump to unknown scene");
            return;
        }

        if !self.loader.is_scene_preloaded(scene_index) {
            self.change_state(ShowState::WaitingToJump);

            self.next_ticket += 1;
            let ticket = LoadTicket {
                id: self.next_ticket,
                scene_index,
            };
            self.pending_load = Some(PendingLoad { ticket, play });

            let wait = self.opts.max_scene_download_wait_ms;
            self.timers
                .scene_load
                .arm(&mut self.queue, wait, Task::SceneLoadTimedOut(ticket));
            self.loader
                .load_scene(scene_index, Some(LoadReply::new(ticket, &mut self.queue)));
            return;
        }

        self.change_state(ShowState::SettingUpScene);
        self.next_turn(Task::DisplayScene { scene_index, play });
    }

    /// Completion of a load request. Tickets of superseded requests are ignored.
    pub fn scene_did_load(&mut self, ticket: LoadTicket) {
        self.loader.scene_loaded(ticket.scene_index);
        if self.pending_load.map(|p| p.ticket) != Some(ticket) {
            tracing::debug!(?ticket, "stale scene load ignored");
            return;
        }
        self.timers.scene_load.clear(&mut self.queue);
        let Some(pending) = self.pending_load.take() else {
            return;
        };

        if self.state == ShowState::WaitingToJump {
            self.change_state(ShowState::ReadyToJump);
            self.change_state(ShowState::SettingUpScene);
            self.next_turn(Task::DisplayScene {
                scene_index: ticket.scene_index,
                play: pending.play,
            });
        }
    }

    pub(crate) fn scene_did_not_load(&mut self, ticket: LoadTicket) {
        if self.pending_load.map(|p| p.ticket) != Some(ticket) {
            return;
        }
        self.pending_load = None;
        self.timers.scene_load.clear(&mut self.queue);
        self.queued_action = None;
        tracing::warn!(scene = ticket.scene_index, "scene did not load in time");

        if self.host.confirm_retry(RetryPrompt::SceneLoad) {
            let url = self.location.restart_url(ticket.scene_index);
            self.host.reload(&url);
            self.change_state(ShowState::Stopped);
        } else {
            self.change_state(ShowState::IdleAtFinalState);
        }
    }

    pub(crate) fn finish_jump(&mut self, scene_index: usize, play: bool) {
        if self.state != ShowState::SettingUpScene {
            tracing::debug!(scene_index, state = %self.state, "stale scene setup ignored");
            return;
        }
        self.display_scene(scene_index, None);

        self.hide_help();
        self.hide_slide_number();
        if self.hud.entry_visible {
            let delay = self.opts.slide_number_confirm_hide_ms;
            self.schedule_slide_number_entry_hide(delay);
        }

        if !play {
            self.change_state(ShowState::IdleAtInitialState);
            if self.narration.is_some() && !self.recording_started {
                self.recording_started = true;
                self.start_narration();
            }
            return;
        }

        let autoplay_delay = self.script.as_ref().and_then(|script| {
            if script.show_mode != ShowMode::Autoplay {
                return None;
            }
            let first = script.event(scene_index)?.first_effect()?;
            Some(if first.kind == EffectType::Transition {
                script.autoplay_transition_delay
            } else {
                script.autoplay_build_delay
            })
        });
        match autoplay_delay {
            Some(delay) => {
                let delay = secs_to_millis(delay);
                self.timers
                    .autoplay
                    .arm(&mut self.queue, delay, Task::PlayCurrentScene);
            }
            None => self.play_current_scene(None),
        }
    }

    pub(crate) fn play_after_autoplay_delay(&mut self) {
        if self.state != ShowState::SettingUpScene {
            tracing::debug!(state = %self.state, "stale autoplay start ignored");
            return;
        }
        self.play_current_scene(None);
    }

    /// Hand a scene to the renderer. `override_event` replaces the scene's own timeline (used
    /// for hyperlink transitions).
    pub(crate) fn display_scene(&mut self, scene_index: usize, override_event: Option<SceneEvent>) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        let event = match override_event {
            Some(event) => event,
            None => {
                let (Some(slide_index), Some(timeline)) = (
                    script.slide_index_from_scene_index(scene_index),
                    script.event(scene_index),
                ) else {
                    return;
                };
                SceneEvent {
                    slide_id: script.slide_id(slide_index).unwrap_or_default().to_string(),
                    slide_index,
                    scene_index,
                    timeline: timeline.clone(),
                    animation_supported: self.opts.animation_supported,
                }
            }
        };

        self.renderer.delete_all_animations();
        self.timers.clear_animation(&mut self.queue);

        let outgoing = self
            .cursor
            .current_scene
            .and_then(|scene| script.slide_index_from_scene_index(scene));
        if outgoing != Some(event.slide_index) {
            self.reset_media_cache();
        }

        self.set_current_scene_index(scene_index);
        self.renderer.render_event(&event);
        self.displayed = Some(event);
        self.update_navigation_buttons();
    }

    fn set_current_scene_index(&mut self, scene_index: usize) {
        self.cursor.current_scene = Some(scene_index);
        self.cursor.next_scene = self
            .script
            .as_ref()
            .and_then(|s| s.calculate_next_scene_index(scene_index));
        self.update_slide_number();
        self.update_navigation_buttons();
    }

    /// Recompute the slide on screen and publish a change. In the final state the slide is the
    /// one the next scene belongs to.
    pub(crate) fn update_slide_number(&mut self) {
        let adjusted = match self.state {
            ShowState::IdleAtFinalState => self.cursor.next_scene,
            _ => self.cursor.current_scene,
        };
        let new_slide = adjusted.and_then(|scene| self.script.as_ref()?.slide_index_from_scene_index(scene));

        if self.first_slide {
            self.first_slide = false;
            self.host.set_waiting_indicator(false);
            self.next_turn(Task::FirstSlideShown);
        }

        if let Some(slide_index) = new_slide
            && self.cursor.current_slide != Some(slide_index)
        {
            self.cursor.previous_slide = self.cursor.current_slide;
            self.cursor.current_slide = Some(slide_index);
            self.host.notify(Notification::SlideIndexChanged { slide_index });
        }
    }

    /// Record the position in the window history and refresh the navigation buttons.
    pub(crate) fn update_navigation_buttons(&mut self) {
        let (Some(script), Some(current)) = (self.script.as_ref(), self.cursor.current_scene) else {
            return;
        };
        let final_state = self.state == ShowState::IdleAtFinalState;
        let scene_to_use = current + usize::from(final_state);
        let last = script.last_scene_index();

        let buttons = if script.loop_slideshow {
            NavigationButtons {
                backward: true,
                forward: true,
            }
        } else {
            let forward = if scene_to_use == 0 && last == 0 {
                true
            } else if current < last {
                true
            } else if current == last {
                self.state == ShowState::IdleAtInitialState
            } else {
                false
            };
            NavigationButtons {
                backward: scene_to_use > 0,
                forward,
            }
        };

        if !self.location.is_file() {
            let url = self.location.history_url(scene_to_use);
            self.host.replace_history(&url);
        }

        if self.buttons != Some(buttons) {
            self.buttons = Some(buttons);
            self.host.navigation_buttons_changed(buttons);
        }
    }

    pub(crate) fn show_slide_number_entry(&mut self, value: u32) {
        self.host.hud(HudCommand::ShowSlideNumberEntry(value));
        self.hud.entry_visible = true;
    }
}
