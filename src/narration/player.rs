use crate::{
    foundation::core::{Millis, secs_to_millis},
    script::model::{AnimationPhase, Hyperlink, MovieSegment, NavigationEvent, Recording, Script},
    show::state::ShowState,
};

/// What the session should do for one recorded navigation event.
#[derive(Clone, Debug, PartialEq)]
pub enum NarrationAction {
    /// Play the scene already displayed.
    Play,
    /// Jump to a scene and play it.
    JumpAndPlay(usize),
    /// Jump to a scene and settle at its initial state.
    Jump(usize),
    /// Follow a hyperlink of the previous scene, playing its transition.
    HyperlinkJump { slide_index: usize, link: Hyperlink },
    Nothing,
}

/// Action for the current event plus the wait before the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrationCue {
    pub action: NarrationAction,
    pub next_in: Option<Millis>,
}

/// Walks the navigation track of a recording in step with its audio.
#[derive(Clone, Debug)]
pub struct NarrationPlayer {
    events: Vec<NavigationEvent>,
    movie_segments: Vec<MovieSegment>,
    current: usize,
    last_scene: usize,
}

impl NarrationPlayer {
    /// `None` unless the recording's first track is a navigation track with events.
    pub fn new(recording: &Recording) -> Option<Self> {
        let events = recording.leading_navigation()?;
        if events.is_empty() {
            return None;
        }
        Some(Self {
            events: events.to_vec(),
            movie_segments: recording.movie_segments.clone(),
            current: 0,
            last_scene: 0,
        })
    }

    pub fn current_event(&self) -> Option<&NavigationEvent> {
        self.events.get(self.current)
    }

    pub fn last_scene(&self) -> usize {
        self.last_scene
    }

    /// Scene the recording opens on.
    pub fn first_scene(&self, script: &Script) -> Option<usize> {
        let first = self.events.first()?;
        script.scene_index_for_slide_event(&first.slide, first.event_index)
    }

    /// URL of an audio segment, if the recording has it.
    pub fn segment_url(&self, segment: usize) -> Option<&str> {
        self.movie_segments.get(segment).map(|s| s.url.as_str())
    }

    /// Resolve the current event against the session state, then step to the next one.
    ///
    /// `startup` marks the event played when the audio first starts. Its scene is already on
    /// screen, so it plays in place or does nothing.
    pub fn navigate(&mut self, script: &Script, state: ShowState, startup: bool) -> Option<NarrationCue> {
        let event = self.events.get(self.current)?;
        let Some(scene) = script
            .scene_index_for_slide_event(&event.slide, event.event_index)
            .filter(|&s| s < script.num_scenes())
        else {
            tracing::warn!(slide = %event.slide, index = event.event_index, "narration event names no scene");
            return self.step(self.last_scene);
        };

        let action = match event.animation_phase {
            AnimationPhase::Start => {
                let is_next =
                    startup || script.calculate_next_scene_index(self.last_scene) == Some(scene);
                if is_next {
                    match state {
                        ShowState::IdleAtInitialState => NarrationAction::Play,
                        ShowState::IdleAtFinalState => NarrationAction::JumpAndPlay(scene),
                        _ => NarrationAction::Nothing,
                    }
                } else {
                    let link = script
                        .event(self.last_scene)
                        .and_then(|e| e.hyperlinks.iter().find(|l| l.events.contains_key(&event.slide)));
                    match (link, script.slide_index_from_scene_index(scene)) {
                        (Some(link), Some(slide_index)) => NarrationAction::HyperlinkJump {
                            slide_index,
                            link: link.clone(),
                        },
                        _ => NarrationAction::Jump(scene),
                    }
                }
            }
            AnimationPhase::None if !startup => NarrationAction::Jump(scene),
            AnimationPhase::None => NarrationAction::Nothing,
        };

        let mut cue = self.step(scene)?;
        cue.action = action;
        Some(cue)
    }

    fn step(&mut self, scene: usize) -> Option<NarrationCue> {
        let this = self.events.get(self.current)?.start_time;
        let next_in = self
            .events
            .get(self.current + 1)
            .map(|next| secs_to_millis(next.start_time - this));
        self.last_scene = scene;
        self.current += 1;
        Some(NarrationCue {
            action: NarrationAction::Nothing,
            next_in,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/player.rs"]
mod tests;
