use crate::{
    loader::LoadTicket,
    render::RenderedEffects,
    runtime::event_loop::{EventQueue, TimerId, TimerSlot},
};

/// Who asked for a build advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOrigin {
    /// Keyboard, pointer, touch or a queued user action.
    User,
    /// The previous scene finished and the next one plays on its own.
    SceneCompletion,
}

/// Navigation deferred until the session is idle again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserAction {
    AdvanceToNextBuild(AdvanceOrigin),
    AdvanceToNextSlide,
    GoBackToPreviousBuild,
    AdvanceAndSkipBuild,
    GoBackToPreviousSlide,
}

/// Deferred work on the session's event queue.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Task {
    IdleProcessing,
    /// Second half of a scene jump: display and then play or settle.
    DisplayScene { scene_index: usize, play: bool },
    SceneDidLoad(LoadTicket),
    SceneLoadTimedOut(LoadTicket),
    PlayCurrentScene,
    StartAnimation {
        prepared: Option<RenderedEffects>,
        scene_to_jump: Option<usize>,
        duration_ms: u64,
    },
    AnimationFrame,
    SceneDidComplete { scene_to_jump: Option<usize> },
    AdvanceAfterCompletion,
    /// Fallback advance used when animation is unavailable.
    JumpWithoutAnimation { scene_index: usize, settle_first: bool },
    CreateHyperlinks,
    HideSlideNumberEntry,
    FirstSlideShown,
    ExitShow,
    ShowExited,
    ChangeWindowSize,
    LayoutDisplay,
    Narrate { startup: bool },
}

/// Timers that are cleared before being armed again.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Timers {
    pub(crate) scene_load: TimerSlot,
    pub(crate) animate: TimerSlot,
    pub(crate) complete: TimerSlot,
    pub(crate) frame: TimerSlot,
    pub(crate) autoplay: TimerSlot,
    pub(crate) hyperlinks: TimerSlot,
    pub(crate) slide_number: TimerSlot,
    pub(crate) resize: TimerSlot,
    pub(crate) exit: TimerSlot,
}

impl Timers {
    pub(crate) fn fired(&mut self, id: TimerId) {
        for slot in [
            &mut self.scene_load,
            &mut self.animate,
            &mut self.complete,
            &mut self.frame,
            &mut self.autoplay,
            &mut self.hyperlinks,
            &mut self.slide_number,
            &mut self.resize,
            &mut self.exit,
        ] {
            slot.fired(id);
        }
    }

    pub(crate) fn clear_animation(&mut self, queue: &mut EventQueue<Task>) {
        self.animate.clear(queue);
        self.frame.clear(queue);
    }
}
