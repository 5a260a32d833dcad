use std::collections::BTreeMap;

use crate::{
    foundation::core::TargetRect,
    foundation::error::{PlayerError, PlayerResult},
    script::index::SceneTable,
};

/// How the show advances between scenes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowMode {
    /// Viewer drives builds and slides.
    #[default]
    Normal,
    /// Every scene plays and advances on its own.
    Autoplay,
    /// Only hyperlinks (or a recording) may move the show.
    HyperlinksOnly,
}

/// Kind of a visual effect in a scene timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectType {
    Transition,
    BuildIn,
    BuildOut,
    ActionBuild,
    SmartBuild,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectType,
    pub name: String,
    #[serde(default)]
    pub begin_time: f64, // seconds
    #[serde(default)]
    pub duration: f64, // seconds
}

impl Effect {
    pub fn end_time(&self) -> f64 {
        self.begin_time.max(0.0) + self.duration.max(0.0)
    }
}

/// One scene (build step): its effects, hyperlinks and automatic-play flag.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTimeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_id: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub automatic_play: bool,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub hyperlinks: Vec<Hyperlink>,
}

impl EventTimeline {
    pub fn first_effect(&self) -> Option<&Effect> {
        self.effects.first()
    }

    pub fn starts_with_transition(&self) -> bool {
        self.first_effect()
            .is_some_and(|e| e.kind == EffectType::Transition)
    }

    /// Latest end time over all effects, in seconds.
    pub fn overall_end_time(&self) -> f64 {
        self.effects
            .iter()
            .map(Effect::end_time)
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub target_rectangle: TargetRect,
    pub url: String,
    /// Per-destination-slide transition overrides, keyed by slide id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, EventTimeline>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundtrackMode {
    #[default]
    Off,
    PlayOnce,
    Loop,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Soundtrack {
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub mode: SoundtrackMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationPhase {
    #[default]
    None,
    Start,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub start_time: f64, // seconds from recording start
    pub slide: String,
    #[serde(default)]
    pub event_index: usize,
    #[serde(default)]
    pub animation_phase: AnimationPhase,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    pub start_time: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventTrack {
    Navigation { events: Vec<NavigationEvent> },
    Movie { events: Vec<TimedEvent> },
    Pause { events: Vec<TimedEvent> },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSegment {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub movie_segments: Vec<MovieSegment>,
    pub event_tracks: Vec<EventTrack>,
}

impl Recording {
    /// Navigation events, when the first track drives navigation.
    pub fn leading_navigation(&self) -> Option<&[NavigationEvent]> {
        match self.event_tracks.first() {
            Some(EventTrack::Navigation { events }) => Some(events),
            _ => None,
        }
    }
}

/// Parsed show definition.
///
/// Build one with [`Script::from_json_str`] or deserialize and call [`Script::prepare`]; a
/// prepared script carries the slide/scene lookup tables every index query relies on.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub slide_list: Vec<String>,
    pub events: Vec<EventTimeline>,
    #[serde(default)]
    pub show_mode: ShowMode,
    #[serde(default)]
    pub loop_slideshow: bool,
    #[serde(default = "default_slide_width")]
    pub slide_width: f64,
    #[serde(default = "default_slide_height")]
    pub slide_height: f64,
    #[serde(default)]
    pub autoplay_transition_delay: f64, // seconds
    #[serde(default)]
    pub autoplay_build_delay: f64, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundtrack: Option<Soundtrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<Recording>,

    #[serde(skip)]
    table: SceneTable,
    #[serde(skip)]
    scale_factor: Option<ScaleBase>,
}

#[derive(Clone, Debug)]
struct ScaleBase {
    factor: f64,
    slide_width: f64,
    slide_height: f64,
    rects: Vec<Vec<TargetRect>>,
}

impl Script {
    pub fn from_json_str(s: &str) -> PlayerResult<Self> {
        let script: Script = serde_json::from_str(s)?;
        script.prepare()
    }

    /// Validate the definition and build the slide/scene lookup tables.
    #[tracing::instrument(skip(self), fields(slides = self.slide_list.len(), scenes = self.events.len()))]
    pub fn prepare(mut self) -> PlayerResult<Self> {
        if self.slide_list.is_empty() {
            return Err(PlayerError::validation("script must list at least one slide"));
        }
        if self.events.is_empty() {
            return Err(PlayerError::validation("script must have at least one event"));
        }
        if !(self.slide_width > 0.0 && self.slide_height > 0.0) {
            return Err(PlayerError::validation("slide width/height must be > 0"));
        }
        for (i, id) in self.slide_list.iter().enumerate() {
            if id.trim().is_empty() {
                return Err(PlayerError::validation(format!("slide {i} has an empty id")));
            }
            if self.slide_list[..i].contains(id) {
                return Err(PlayerError::validation(format!("duplicate slide id '{id}'")));
            }
        }

        let mut slide_of_scene = Vec::with_capacity(self.events.len());
        for (scene, event) in self.events.iter().enumerate() {
            let id = event.slide_id.as_deref().ok_or_else(|| {
                PlayerError::script(format!("event {scene} does not name its slide"))
            })?;
            let slide = self.slide_index_for_id(id).ok_or_else(|| {
                PlayerError::script(format!("event {scene} references unknown slide '{id}'"))
            })?;
            for effect in &event.effects {
                if !(effect.begin_time.is_finite() && effect.duration.is_finite()) {
                    return Err(PlayerError::validation(format!(
                        "effect '{}' in event {scene} has non-finite timing",
                        effect.name
                    )));
                }
            }
            slide_of_scene.push(slide);
        }
        self.table = SceneTable::new(slide_of_scene, self.slide_list.len())?;

        if let Some(recording) = &self.recording {
            for track in &recording.event_tracks {
                if let EventTrack::Navigation { events } = track {
                    if events.is_empty() {
                        return Err(PlayerError::validation(
                            "navigation track must have at least one event",
                        ));
                    }
                    for ev in events {
                        if self.slide_index_for_id(&ev.slide).is_none() {
                            return Err(PlayerError::script(format!(
                                "recording references unknown slide '{}'",
                                ev.slide
                            )));
                        }
                    }
                }
            }
        }

        Ok(self)
    }

    pub fn num_scenes(&self) -> usize {
        self.events.len()
    }

    pub fn slide_count(&self) -> usize {
        self.slide_list.len()
    }

    pub fn last_scene_index(&self) -> usize {
        self.events.len().saturating_sub(1)
    }

    pub fn last_slide_index(&self) -> usize {
        self.slide_list.len().saturating_sub(1)
    }

    pub fn is_hyperlinks_only(&self) -> bool {
        self.show_mode == ShowMode::HyperlinksOnly
    }

    pub fn event(&self, scene_index: usize) -> Option<&EventTimeline> {
        self.events.get(scene_index)
    }

    /// Automatic-play flag of a scene; unknown scenes are not automatic.
    pub fn is_automatic(&self, scene_index: usize) -> bool {
        self.event(scene_index).is_some_and(|e| e.automatic_play)
    }

    pub fn slide_index_for_id(&self, slide_id: &str) -> Option<usize> {
        self.slide_list.iter().position(|s| s == slide_id)
    }

    pub fn slide_id(&self, slide_index: usize) -> Option<&str> {
        self.slide_list.get(slide_index).map(String::as_str)
    }

    pub(crate) fn table(&self) -> &SceneTable {
        &self.table
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor.as_ref().map_or(1.0, |s| s.factor)
    }

    /// Rescale slide size and hyperlink rectangles from their authored values.
    pub fn reapply_scale_factor(&mut self, factor: f64) {
        let factor = if factor == 0.0 { 0.000_001 } else { factor };
        let base = self.scale_factor.get_or_insert_with(|| ScaleBase {
            factor: 1.0,
            slide_width: self.slide_width,
            slide_height: self.slide_height,
            rects: self
                .events
                .iter()
                .map(|e| e.hyperlinks.iter().map(|h| h.target_rectangle).collect())
                .collect(),
        });
        base.factor = factor;
        self.slide_width = base.slide_width * factor;
        self.slide_height = base.slide_height * factor;
        for (event, rects) in self.events.iter_mut().zip(&base.rects) {
            for (link, rect) in event.hyperlinks.iter_mut().zip(rects) {
                link.target_rectangle = rect.scaled(factor);
            }
        }
    }
}

fn de_flag<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Num(f64),
    }

    Ok(match <Flag as serde::Deserialize>::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Num(n) => n == 1.0,
    })
}

fn default_volume() -> f64 {
    1.0
}

fn default_slide_width() -> f64 {
    1024.0
}

fn default_slide_height() -> f64 {
    768.0
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
