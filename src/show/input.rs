//! Host input: keyboard, pointer, touch, window and download events.

use crate::{
    foundation::core::{Point, TargetRect},
    loader::SceneLoader,
    narration::player::{NarrationAction, NarrationPlayer},
    render::EffectRenderer,
    script::model::{Script, ShowMode},
    show::{
        host::{AudioChannel, AudioRequest, HudCommand, RetryPrompt, ShowHost},
        hud::DigitRemoval,
        keys::{Key, KeyCommand, KeyRoute, Modifiers, key_command, route_key},
        session::ShowSession,
        state::ShowState,
        task::{AdvanceOrigin, Task},
    },
};

/// Width of the strip along the left edge where swipes open or close the slide navigator.
pub const NAVIGATOR_SWIPE_ZONE: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseButton {
    Left,
    Right,
}

/// Everything the host can tell a running show.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InputEvent {
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Swipe {
        direction: SwipeDirection,
        #[serde(default = "one_finger")]
        fingers: u8,
        #[serde(default)]
        start_x: Option<f64>,
    },
    /// Tap in show coordinates; `slide_number` is set when a navigator thumbnail was tapped.
    Tap {
        #[serde(default)]
        point: Option<Point>,
        #[serde(default = "one_finger")]
        fingers: u8,
        #[serde(default)]
        slide_number: Option<usize>,
    },
    /// Click in show coordinates. `None` is outside the show area.
    Click {
        #[serde(default)]
        point: Option<Point>,
        #[serde(default)]
        on_video: bool,
    },
    MouseDown { button: MouseButton },
    WindowResize {
        #[serde(default)]
        scale_factor: Option<f64>,
    },
    FullscreenChange { fullscreen: bool },
    OrientationChange,
    ScriptDownloaded { script: Box<Script> },
    ScriptNotDownloaded,
    StageSizeChanged { area: TargetRect },
    SoundtrackItemEnded,
    NarrationSegmentEnded { segment: usize },
}

fn one_finger() -> u8 {
    1
}

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    /// Apply one host input.
    pub fn handle(&mut self, event: InputEvent) {
        tracing::trace!(?event, state = %self.state, "input");
        match event {
            InputEvent::KeyDown { key, modifiers } => self.handle_key(key, modifiers),
            InputEvent::Swipe {
                direction,
                fingers,
                start_x,
            } => self.handle_swipe(direction, fingers, start_x),
            InputEvent::Tap {
                point,
                slide_number,
                ..
            } => match slide_number {
                Some(number) => self.jump_to_slide(number, false),
                None => self.process_click_or_tap(point),
            },
            InputEvent::Click { point, on_video } => {
                if self.is_recording() || on_video {
                    return;
                }
                self.process_click_or_tap(point);
            }
            InputEvent::MouseDown { button } => match button {
                MouseButton::Left => {
                    self.advance_to_next_build_from(AdvanceOrigin::User);
                }
                MouseButton::Right => self.go_back_to_previous_build(),
            },
            InputEvent::WindowResize { scale_factor } => {
                if scale_factor.is_some() {
                    self.pending_scale = scale_factor;
                }
                let delay = self.opts.resize_debounce_ms;
                self.timers
                    .resize
                    .arm(&mut self.queue, delay, Task::ChangeWindowSize);
            }
            InputEvent::FullscreenChange { fullscreen } => {
                self.fullscreen = fullscreen;
                self.queue.schedule(0, Task::LayoutDisplay);
            }
            InputEvent::OrientationChange => {
                self.queue.schedule(0, Task::LayoutDisplay);
            }
            InputEvent::ScriptDownloaded { script } => match (*script).prepare() {
                Ok(script) => self.script_did_download(script),
                Err(err) => {
                    tracing::warn!(%err, "downloaded script is unusable");
                    self.script_did_not_download();
                }
            },
            InputEvent::ScriptNotDownloaded => self.script_did_not_download(),
            InputEvent::StageSizeChanged { area } => self.track_area = Some(area),
            InputEvent::SoundtrackItemEnded => self.soundtrack_item_ended(),
            InputEvent::NarrationSegmentEnded { segment } => self.narration_segment_ended(segment),
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers) {
        match route_key(key, modifiers) {
            KeyRoute::PassThrough => return,
            KeyRoute::ExitNow => {
                self.exit_show(true);
                return;
            }
            KeyRoute::Handle => {}
        }
        if self.is_recording() {
            return;
        }
        let hyperlinks_only = self.script.as_ref().is_some_and(|s| s.is_hyperlinks_only());

        match key_command(key, modifiers) {
            KeyCommand::Exit => self.exit_show(true),
            KeyCommand::ToggleHelp => {
                if self.hud.help_visible {
                    self.hide_help();
                } else {
                    self.show_help();
                }
            }
            KeyCommand::ToggleSlideNumber => {
                if self.hud.entry_visible {
                    self.schedule_slide_number_entry_hide(0);
                }
                if self.hud.slide_number_visible {
                    self.hide_slide_number();
                } else {
                    self.show_slide_number();
                }
            }
            KeyCommand::Confirm if self.hud.digits.is_active() => {
                if hyperlinks_only {
                    self.hide_and_reset_slide_number_entry();
                    tracing::debug!("slide entry ignored in hyperlinks-only mode");
                    return;
                }
                let count = self.script.as_ref().map_or(1, |s| s.slide_count());
                if let Some(number) = self.hud.digits.confirm(count) {
                    self.host
                        .hud(HudCommand::ShowSlideNumberEntry(u32::try_from(number).unwrap_or(u32::MAX)));
                    self.jump_to_slide(number, false);
                }
            }
            KeyCommand::Confirm | KeyCommand::AdvanceBuild => {
                self.advance_to_next_build_from(AdvanceOrigin::User);
            }
            KeyCommand::AdvanceAndSkipBuild => self.advance_and_skip_build(),
            KeyCommand::AdvanceSlide => self.advance_to_next_slide(),
            KeyCommand::BackBuild => self.go_back_to_previous_build(),
            KeyCommand::BackSlide => self.go_back_to_previous_slide(),
            KeyCommand::DeleteDigit => match self.hud.digits.remove_last() {
                DigitRemoval::Inactive => {}
                DigitRemoval::Emptied => self.schedule_slide_number_entry_hide(0),
                DigitRemoval::Remaining(value) => {
                    let delay = self.opts.slide_number_hide_ms;
                    self.schedule_slide_number_entry_hide(delay);
                    self.host.hud(HudCommand::ShowSlideNumberEntry(value));
                }
            },
            KeyCommand::FirstSlide => self.jump_to_slide(1, false),
            KeyCommand::LastSlide => {
                let count = self.script.as_ref().map_or(0, |s| s.slide_count());
                self.jump_to_slide(count, false);
            }
            KeyCommand::Digit(digit) => {
                let delay = self.opts.slide_number_hide_ms;
                self.schedule_slide_number_entry_hide(delay);
                self.hide_slide_number();
                if let Some(value) = self.hud.digits.push(digit) {
                    self.show_slide_number_entry(value);
                }
            }
            KeyCommand::Other => {
                let delay = self.opts.slide_number_hide_ms;
                self.schedule_slide_number_entry_hide(delay);
            }
        }
    }

    fn handle_swipe(&mut self, direction: SwipeDirection, fingers: u8, start_x: Option<f64>) {
        if let Some(x) = start_x
            && x != 0.0
            && x < NAVIGATOR_SWIPE_ZONE
        {
            match direction {
                SwipeDirection::Right => self.host.set_navigator_visible(true),
                SwipeDirection::Left => self.host.set_navigator_visible(false),
                _ => {}
            }
            return;
        }

        match (direction, fingers) {
            (SwipeDirection::Left, 1) => {
                self.advance_to_next_build_from(AdvanceOrigin::User);
            }
            (SwipeDirection::Left, 2) => self.advance_to_next_slide(),
            (SwipeDirection::Right, 1) => self.go_back_to_previous_slide(),
            (SwipeDirection::Right, 2) => self.go_back_to_previous_build(),
            _ => {}
        }
    }

    fn script_did_download(&mut self, script: Script) {
        if self.state != ShowState::DownloadingScript {
            tracing::debug!(state = %self.state, "script arrived in an unexpected state");
            return;
        }
        if script.is_hyperlinks_only() {
            self.host.enter_hyperlinks_only_mode();
        }
        let narration = script.recording.as_ref().and_then(NarrationPlayer::new);
        let recorded_scene = narration.as_ref().and_then(|n| n.first_scene(&script));
        self.script = Some(script);
        self.change_state(ShowState::Starting);

        if let Some(player) = narration {
            self.narration = Some(player);
            match recorded_scene {
                Some(scene) => self.jump_to_scene(scene, false),
                None => tracing::warn!("recording opens on an unknown slide"),
            }
            return;
        }

        let Some(script) = self.script.as_ref() else {
            return;
        };
        let scene = match self.location.resume_scene() {
            Some(scene) => Some(scene),
            None => {
                let slide = self
                    .location
                    .starting_slide()
                    .and_then(|n| usize::try_from(n.saturating_sub(1)).ok())
                    .filter(|&s| s < script.slide_count())
                    .unwrap_or(0);
                script.scene_index_from_slide_index(slide)
            }
        };
        let Some(scene) = scene.filter(|&s| s <= script.last_scene_index()) else {
            tracing::debug!(?scene, "starting scene is past the end of the show");
            return;
        };
        let play = script.show_mode == ShowMode::Autoplay || script.is_automatic(scene);
        self.jump_to_scene(scene, play);
    }

    fn script_did_not_download(&mut self) {
        if self.host.confirm_retry(RetryPrompt::ScriptDownload) {
            self.host.request_script();
        } else {
            self.host.clear_launch_mode();
            self.host.set_waiting_indicator(false);
        }
    }

    // ---- narration ----

    pub(crate) fn start_narration(&mut self) {
        let Some(url) = self
            .narration
            .as_ref()
            .and_then(|n| n.segment_url(0))
            .map(str::to_string)
        else {
            return;
        };
        self.host.play_audio(AudioRequest {
            channel: AudioChannel::Narration,
            url,
            volume: 1.0,
        });
        self.next_turn(Task::Narrate { startup: true });
    }

    fn narration_segment_ended(&mut self, segment: usize) {
        let next = self
            .narration
            .as_ref()
            .and_then(|n| n.segment_url(segment + 1))
            .map(str::to_string);
        match next {
            Some(url) => self.host.play_audio(AudioRequest {
                channel: AudioChannel::Narration,
                url,
                volume: 1.0,
            }),
            None => self.host.stop_audio(AudioChannel::Narration),
        }
    }

    pub(crate) fn narrate(&mut self, startup: bool) {
        let state = self.state;
        let (Some(player), Some(script)) = (self.narration.as_mut(), self.script.as_ref()) else {
            return;
        };
        let Some(cue) = player.navigate(script, state, startup) else {
            return;
        };
        tracing::debug!(action = ?cue.action, next_in = ?cue.next_in, "narration cue");

        match cue.action {
            NarrationAction::Play => self.play_current_scene(None),
            NarrationAction::JumpAndPlay(scene) => self.jump_to_scene(scene, true),
            NarrationAction::Jump(scene) => self.jump_to_scene(scene, false),
            NarrationAction::HyperlinkJump { slide_index, link } => {
                self.jump_to_hyperlink_slide(slide_index, &link)
            }
            NarrationAction::Nothing => {}
        }
        if let Some(delay) = cue.next_in {
            self.queue.schedule(delay, Task::Narrate { startup: false });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/input.rs"]
mod tests;
