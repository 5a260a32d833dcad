pub(crate) mod cache;
pub(crate) mod simulated;

use std::ops::RangeInclusive;

use crate::{foundation::core::Millis, runtime::event_loop::EventQueue, show::task::Task};

/// Identifies one scene-load request made by the session.
///
/// A ticket is only honoured while the session is still waiting on that exact request; tickets
/// from superseded jumps are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub(crate) id: u64,
    pub scene_index: usize,
}

/// Completion channel for a scene load.
///
/// Dropping the reply without completing it is how a loader reports failure; the session's load
/// timeout then takes over.
pub struct LoadReply<'a> {
    ticket: LoadTicket,
    queue: &'a mut EventQueue<Task>,
}

impl<'a> LoadReply<'a> {
    pub(crate) fn new(ticket: LoadTicket, queue: &'a mut EventQueue<Task>) -> Self {
        Self { ticket, queue }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn now(&self) -> Millis {
        self.queue.now()
    }

    /// Report success without delay; it runs the next time the clock is driven.
    pub fn complete_now(self) {
        self.complete_after(0);
    }

    /// Report success after `delay` milliseconds of player clock.
    pub fn complete_after(self, delay: Millis) {
        self.queue.schedule(delay, Task::SceneDidLoad(self.ticket));
    }

    /// Keep the ticket and report later through `ShowSession::scene_did_load`.
    pub fn into_ticket(self) -> LoadTicket {
        self.ticket
    }
}

/// Asset side of playback: preloads the textures a scene needs.
pub trait SceneLoader {
    fn is_scene_preloaded(&self, scene_index: usize) -> bool;

    /// Start loading a scene. `reply`, when present, must be completed at most once and only on
    /// success.
    fn load_scene(&mut self, scene_index: usize, reply: Option<LoadReply<'_>>);

    /// A reply handed out by `load_scene` has been delivered to the session.
    fn scene_loaded(&mut self, _scene_index: usize) {}

    /// Drop cached slides outside `keep`.
    fn evict_slides_except(&mut self, _keep: RangeInclusive<usize>) {}

    /// Drop every cached slide.
    fn clear_cache(&mut self) {}
}

impl<L: SceneLoader + ?Sized> SceneLoader for Box<L> {
    fn is_scene_preloaded(&self, scene_index: usize) -> bool {
        (**self).is_scene_preloaded(scene_index)
    }

    fn load_scene(&mut self, scene_index: usize, reply: Option<LoadReply<'_>>) {
        (**self).load_scene(scene_index, reply)
    }

    fn scene_loaded(&mut self, scene_index: usize) {
        (**self).scene_loaded(scene_index)
    }

    fn evict_slides_except(&mut self, keep: RangeInclusive<usize>) {
        (**self).evict_slides_except(keep)
    }

    fn clear_cache(&mut self) {
        (**self).clear_cache()
    }
}
