use crate::{
    foundation::core::{Millis, TargetRect},
    loader::{LoadTicket, SceneLoader, cache::resident_window},
    narration::player::NarrationPlayer,
    render::{EffectRenderer, SceneEvent},
    runtime::event_loop::EventQueue,
    script::model::{Hyperlink, Script},
    show::{
        host::{AudioChannel, HudCommand, MediaKind, NavigationButtons, Notification, ShowHost},
        hud::HudState,
        location::ShowLocation,
        media::MediaCache,
        opts::SessionOpts,
        soundtrack::SoundtrackPlayer,
        state::ShowState,
        task::{AdvanceOrigin, Task, Timers, UserAction},
    },
};

/// Where the show is, in scene and slide terms.
///
/// `next_scene` is recomputed every time `current_scene` changes. `None` stands for "no such
/// index": nothing displayed yet, or the end of a non-looping show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneCursor {
    pub current_scene: Option<usize>,
    pub next_scene: Option<usize>,
    pub current_slide: Option<usize>,
    pub previous_slide: Option<usize>,
    /// Slide shown before the most recent jump; target of `?action=retreat`.
    pub last_slide_viewed: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingLoad {
    pub(crate) ticket: LoadTicket,
    pub(crate) play: bool,
}

/// One running show: playback state machine, cursor and the caches tied to it.
///
/// All work happens on the session's own virtual clock. Inputs are applied with
/// [`ShowSession::handle`]; deferred steps (pipeline continuations, timers, load completions)
/// run when the clock is driven with [`ShowSession::run_until`] or [`ShowSession::advance_by`].
pub struct ShowSession<H, L, R> {
    pub(crate) opts: SessionOpts,
    pub(crate) location: ShowLocation,
    pub(crate) host: H,
    pub(crate) loader: L,
    pub(crate) renderer: R,
    pub(crate) queue: EventQueue<Task>,
    pub(crate) timers: Timers,
    pub(crate) script: Option<Script>,
    pub(crate) state: ShowState,
    pub(crate) cursor: SceneCursor,
    pub(crate) queued_action: Option<UserAction>,
    pub(crate) displayed: Option<SceneEvent>,
    pub(crate) hyperlinks: Vec<Hyperlink>,
    pub(crate) movie_hyperlinks: Vec<Hyperlink>,
    pub(crate) media: MediaCache,
    pub(crate) soundtrack: SoundtrackPlayer,
    pub(crate) hud: HudState,
    pub(crate) narration: Option<NarrationPlayer>,
    pub(crate) recording_started: bool,
    pub(crate) first_slide: bool,
    pub(crate) pending_load: Option<PendingLoad>,
    pub(crate) next_ticket: u64,
    pub(crate) buttons: Option<NavigationButtons>,
    pub(crate) pending_scale: Option<f64>,
    pub(crate) fullscreen: bool,
    pub(crate) track_area: Option<TargetRect>,
}

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    pub fn new(opts: SessionOpts, host: H, loader: L, renderer: R) -> Self {
        let location = ShowLocation::new(opts.url.clone());
        Self {
            opts,
            location,
            host,
            loader,
            renderer,
            queue: EventQueue::new(),
            timers: Timers::default(),
            script: None,
            state: ShowState::Stopped,
            cursor: SceneCursor::default(),
            queued_action: None,
            displayed: None,
            hyperlinks: Vec::new(),
            movie_hyperlinks: Vec::new(),
            media: MediaCache::new(),
            soundtrack: SoundtrackPlayer::default(),
            hud: HudState::default(),
            narration: None,
            recording_started: false,
            first_slide: true,
            pending_load: None,
            next_ticket: 0,
            buttons: None,
            pending_scale: None,
            fullscreen: false,
            track_area: None,
        }
    }

    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    pub fn location(&self) -> &ShowLocation {
        &self.location
    }

    pub fn state(&self) -> ShowState {
        self.state
    }

    pub fn cursor(&self) -> SceneCursor {
        self.cursor
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub fn queued_action(&self) -> Option<UserAction> {
        self.queued_action
    }

    /// Scene event last handed to the renderer.
    pub fn displayed_event(&self) -> Option<&SceneEvent> {
        self.displayed.as_ref()
    }

    /// Active hit regions. Later entries win where regions overlap.
    pub fn active_hyperlinks(&self) -> &[Hyperlink] {
        &self.hyperlinks
    }

    pub fn media(&self) -> &MediaCache {
        &self.media
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn soundtrack(&self) -> &SoundtrackPlayer {
        &self.soundtrack
    }

    pub fn is_recording(&self) -> bool {
        self.narration.is_some()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Stage rectangle last reported by the host, used for touch tracking.
    pub fn track_area(&self) -> Option<TargetRect> {
        self.track_area
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_parts(self) -> (H, L, R) {
        (self.host, self.loader, self.renderer)
    }

    /// Register a media element started by the current slide.
    pub fn register_media(
        &mut self,
        kind: MediaKind,
        id: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.media.insert(kind, id, source);
    }

    /// Add a hit region for a playing movie. It joins the scene's hyperlinks on the next refresh.
    pub fn add_movie_hyperlink(&mut self, target_rectangle: TargetRect, url: impl Into<String>) {
        self.movie_hyperlinks.push(Hyperlink {
            target_rectangle,
            url: url.into(),
            events: Default::default(),
        });
    }

    pub fn clear_movie_hyperlinks(&mut self) {
        self.movie_hyperlinks.clear();
    }

    // ---- clock ----

    pub fn now(&self) -> Millis {
        self.queue.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Clock time of the earliest pending task.
    pub fn next_due(&mut self) -> Option<Millis> {
        self.queue.next_due()
    }

    /// Run every task due up to `deadline`, then move the clock there.
    pub fn run_until(&mut self, deadline: Millis) {
        while let Some((id, task)) = self.queue.pop_due(deadline) {
            self.timers.fired(id);
            self.run_task(task);
        }
        self.queue.advance_to(deadline);
    }

    pub fn advance_by(&mut self, ms: Millis) {
        self.run_until(self.now().saturating_add(ms));
    }

    /// Run tasks until the queue is empty or `limit` milliseconds have passed.
    ///
    /// Returns `true` when the queue drained. The clock stops at the last task run.
    pub fn run_until_idle(&mut self, limit: Millis) -> bool {
        let deadline = self.now().saturating_add(limit);
        while let Some(due) = self.queue.next_due() {
            if due > deadline {
                break;
            }
            let Some((id, task)) = self.queue.pop_due(due) else {
                break;
            };
            self.timers.fired(id);
            self.run_task(task);
        }
        self.queue.is_empty()
    }

    pub(crate) fn next_turn(&mut self, task: Task) {
        self.queue.schedule(self.opts.next_turn_delay_ms, task);
    }

    fn run_task(&mut self, task: Task) {
        tracing::trace!(?task, now = self.now(), "run task");
        match task {
            Task::IdleProcessing => self.do_idle_processing(),
            Task::DisplayScene { scene_index, play } => self.finish_jump(scene_index, play),
            Task::SceneDidLoad(ticket) => self.scene_did_load(ticket),
            Task::SceneLoadTimedOut(ticket) => self.scene_did_not_load(ticket),
            Task::PlayCurrentScene => self.play_after_autoplay_delay(),
            Task::StartAnimation {
                prepared,
                scene_to_jump,
                duration_ms,
            } => self.start_animation(prepared, scene_to_jump, duration_ms),
            Task::AnimationFrame => self.animation_frame(),
            Task::SceneDidComplete { scene_to_jump } => self.current_scene_did_complete(scene_to_jump),
            Task::AdvanceAfterCompletion => {
                self.advance_to_next_build_from(AdvanceOrigin::SceneCompletion);
            }
            Task::JumpWithoutAnimation {
                scene_index,
                settle_first,
            } => self.jump_without_animation(scene_index, settle_first),
            Task::CreateHyperlinks => self.create_hyperlinks_for_current_state(),
            Task::HideSlideNumberEntry => self.hide_and_reset_slide_number_entry(),
            Task::FirstSlideShown => {
                self.start_soundtrack();
                self.host.clear_launch_mode();
            }
            Task::ExitShow => self.exit_show(false),
            Task::ShowExited => self.host.show_exited(),
            Task::ChangeWindowSize => self.change_window_size(),
            Task::LayoutDisplay => self.host.layout_display(),
            Task::Narrate { startup } => self.narrate(startup),
        }
    }

    // ---- state machine ----

    /// Move to `new`, running the leave hook of the old state and the enter hook of the new one.
    pub(crate) fn change_state(&mut self, new: ShowState) {
        let old = self.state;
        if new == old {
            return;
        }
        tracing::debug!(from = %old, to = %new, "state change");

        if old == ShowState::WaitingToPlay {
            self.host.set_waiting_indicator(false);
        }

        self.state = new;
        self.host.state_changed(old, new);

        if new.shows_waiting_indicator() {
            self.host.set_waiting_indicator(true);
        }
        match new {
            ShowState::IdleAtFinalState => {
                self.unload_textures();
                self.enter_idle();
            }
            ShowState::IdleAtInitialState => self.enter_idle(),
            _ => {}
        }
    }

    fn enter_idle(&mut self) {
        self.update_slide_number();
        self.next_turn(Task::IdleProcessing);
    }

    fn do_idle_processing(&mut self) {
        self.preload_textures();

        if let Some(action) = self.queued_action.take() {
            tracing::debug!(?action, "running queued action");
            self.run_user_action(action);
        } else if self.displayed.is_some() {
            self.update_navigation_buttons();
        }

        let delay = self.opts.hyperlink_refresh_delay_ms;
        self.timers
            .hyperlinks
            .arm(&mut self.queue, delay, Task::CreateHyperlinks);
    }

    /// Scene the show settles on: the current scene, or in the final state the scene that will
    /// be shown next (wrapping to 0 in a looping show, staying put at the end otherwise).
    pub(crate) fn settled_scene_index(&self) -> Option<usize> {
        let current = self.cursor.current_scene?;
        if self.state != ShowState::IdleAtFinalState {
            return Some(current);
        }
        let script = self.script.as_ref()?;
        if current + 1 < script.num_scenes() {
            Some(current + 1)
        } else if script.loop_slideshow {
            Some(0)
        } else {
            Some(current)
        }
    }

    /// Current scene, plus one in the final state. May point one past the last scene.
    pub(crate) fn adjusted_scene_index(&self) -> Option<usize> {
        let current = self.cursor.current_scene?;
        Some(match self.state {
            ShowState::IdleAtFinalState => current + 1,
            _ => current,
        })
    }

    fn preload_textures(&mut self) {
        if let Some(scene) = self.settled_scene_index() {
            self.loader.load_scene(scene, None);
        }
    }

    fn unload_textures(&mut self) {
        let slide = self
            .settled_scene_index()
            .and_then(|scene| self.script.as_ref()?.slide_index_from_scene_index(scene));
        if let Some(slide) = slide {
            self.loader.evict_slides_except(resident_window(slide));
        }
    }

    // ---- media and soundtrack ----

    pub(crate) fn reset_media_cache(&mut self) {
        for (kind, ids) in self.media.reset() {
            if !ids.is_empty() {
                self.host.release_media(kind, &ids);
            }
        }
    }

    pub(crate) fn start_soundtrack(&mut self) {
        let soundtrack = self.script.as_ref().and_then(|s| s.soundtrack.as_ref());
        if let Some(request) = self.soundtrack.start(soundtrack) {
            self.host.play_audio(request);
        }
    }

    pub(crate) fn stop_soundtrack(&mut self) {
        if self.soundtrack.stop() {
            self.host.stop_audio(AudioChannel::Soundtrack);
        }
    }

    pub(crate) fn soundtrack_item_ended(&mut self) {
        let soundtrack = self.script.as_ref().and_then(|s| s.soundtrack.as_ref());
        if let Some(request) = self.soundtrack.item_ended(soundtrack) {
            self.host.play_audio(request);
        }
    }

    // ---- lifecycle ----

    /// Begin downloading the script.
    pub fn start_show(&mut self) {
        self.change_state(ShowState::DownloadingScript);
        self.host.request_script();
    }

    /// End the show now, or after the exit delay.
    pub fn exit_show(&mut self, end_now: bool) {
        self.timers.exit.clear(&mut self.queue);
        if end_now {
            self.host.show_exited();
        } else {
            let delay = self.opts.exit_delay_ms;
            self.timers.exit.arm(&mut self.queue, delay, Task::ShowExited);
        }
    }

    // ---- heads-up display ----

    pub(crate) fn show_help(&mut self) {
        self.hud.help_visible = true;
        self.host.hud(HudCommand::ShowHelp);
    }

    pub(crate) fn hide_help(&mut self) {
        if self.hud.help_visible {
            self.hud.help_visible = false;
            self.host.hud(HudCommand::HideHelp);
        }
    }

    pub(crate) fn show_slide_number(&mut self) {
        let number = self.cursor.current_slide.map_or(0, |s| s + 1);
        self.hud.slide_number_visible = true;
        self.host.hud(HudCommand::ShowSlideNumber(number));
    }

    pub(crate) fn hide_slide_number(&mut self) {
        if self.hud.slide_number_visible {
            self.hud.slide_number_visible = false;
            self.host.hud(HudCommand::HideSlideNumber);
        }
    }

    pub(crate) fn schedule_slide_number_entry_hide(&mut self, delay: Millis) {
        self.timers
            .slide_number
            .arm(&mut self.queue, delay, Task::HideSlideNumberEntry);
    }

    pub(crate) fn hide_and_reset_slide_number_entry(&mut self) {
        self.timers.slide_number.clear(&mut self.queue);
        self.hud.digits.reset();
        if self.hud.entry_visible {
            self.hud.entry_visible = false;
            self.host.hud(HudCommand::HideSlideNumberEntry);
        }
    }

    // ---- display ----

    fn change_window_size(&mut self) {
        let Some(script) = self.script.as_mut() else {
            return;
        };
        if self.opts.can_set_view_scale {
            if let Some(scale) = self.pending_scale.take() {
                script.reapply_scale_factor(scale);
            }
            self.loader.clear_cache();
            if let Some(scene) = self.settled_scene_index() {
                self.jump_to_scene(scene, false);
            }
        }
        if let Some(script) = &self.script {
            let (width, height) = (script.slide_width, script.slide_height);
            self.host.notify(Notification::ShowSizeChanged { width, height });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/session.rs"]
mod tests;
