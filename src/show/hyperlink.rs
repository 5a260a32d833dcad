//! Hyperlink hit regions and the navigation they trigger.

use crate::{
    foundation::core::Point,
    loader::SceneLoader,
    render::{EffectRenderer, SceneEvent},
    script::model::Hyperlink,
    show::{host::ShowHost, session::ShowSession, state::ShowState, task::AdvanceOrigin},
};

/// Relative slide named by a `?slide=` link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideLink {
    First,
    Last,
    Next,
    Previous,
}

/// What following a hyperlink URL does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HyperlinkAction {
    Slide(SlideLink),
    SlideId(String),
    /// Back to the slide viewed before the last jump.
    Retreat,
    ExitPresentation,
    Web(String),
    Mail(String),
    Unknown,
}

impl HyperlinkAction {
    pub fn parse(url: &str) -> Self {
        if let Some(key) = url.strip_prefix("?slide=") {
            return match key {
                "first" => Self::Slide(SlideLink::First),
                "last" => Self::Slide(SlideLink::Last),
                "next" => Self::Slide(SlideLink::Next),
                "previous" => Self::Slide(SlideLink::Previous),
                _ => Self::Unknown,
            };
        }
        if let Some(id) = url.strip_prefix("?slideid=") {
            return Self::SlideId(id.to_string());
        }
        if url.starts_with("?action=retreat") {
            return Self::Retreat;
        }
        if url.starts_with("?action=exitpresentation") {
            return Self::ExitPresentation;
        }
        if url.starts_with("http:") || url.starts_with("https:") {
            return Self::Web(url.to_string());
        }
        if url.starts_with("mailto:") {
            return Self::Mail(url.to_string());
        }
        Self::Unknown
    }
}

/// Topmost hyperlink under `point`. Later entries are on top.
pub fn find_hyperlink_at(hyperlinks: &[Hyperlink], point: Point) -> Option<&Hyperlink> {
    hyperlinks
        .iter()
        .rev()
        .find(|link| link.target_rectangle.contains_snapped(point))
}

impl<H, L, R> ShowSession<H, L, R>
where
    H: ShowHost,
    L: SceneLoader,
    R: EffectRenderer,
{
    /// A click or tap at `point` in show coordinates. `None` means outside the show area.
    ///
    /// Dismisses an open slide-number entry or help overlay first; otherwise follows the
    /// hyperlink under the point or advances one build.
    pub fn process_click_or_tap(&mut self, point: Option<Point>) {
        if self.hud.entry_visible {
            self.schedule_slide_number_entry_hide(0);
            return;
        }
        if self.hud.help_visible {
            self.hide_help();
            return;
        }

        let hit = point.and_then(|p| find_hyperlink_at(&self.hyperlinks, p).cloned());
        match hit {
            Some(link) => self.process_hyperlink(&link),
            None => {
                self.advance_to_next_build_from(AdvanceOrigin::User);
            }
        }
    }

    pub fn process_hyperlink(&mut self, link: &Hyperlink) {
        let action = HyperlinkAction::parse(&link.url);
        tracing::debug!(?action, "follow hyperlink");
        let Some(script) = self.script.as_ref() else {
            return;
        };

        match action {
            HyperlinkAction::Slide(SlideLink::First) => self.jump_to_hyperlink_slide(0, link),
            HyperlinkAction::Slide(SlideLink::Last) => {
                let last = script.last_slide_index();
                self.jump_to_hyperlink_slide(last, link);
            }
            HyperlinkAction::Slide(relative) => {
                if !self.state.is_idle() {
                    return;
                }
                let Some(slide) = self
                    .adjusted_scene_index()
                    .and_then(|scene| script.slide_index_from_scene_index(scene))
                else {
                    return;
                };
                let last = script.last_slide_index();
                let looping = script.loop_slideshow;
                let target = match relative {
                    SlideLink::Next if slide == last => {
                        if looping {
                            Some(0)
                        } else {
                            if self.opts.host_controls_lifecycle {
                                self.exit_show(false);
                            }
                            None
                        }
                    }
                    SlideLink::Next => Some(slide + 1),
                    _ if slide == 0 => Some(if looping { last } else { 0 }),
                    _ => Some(slide - 1),
                };
                if let Some(target) = target {
                    self.jump_to_hyperlink_slide(target, link);
                }
            }
            HyperlinkAction::SlideId(id) => {
                if let Some(slide) = script.slide_index_for_id(&id) {
                    self.jump_to_hyperlink_slide(slide, link);
                }
            }
            HyperlinkAction::Retreat => {
                if let Some(slide) = self.cursor.last_slide_viewed {
                    self.jump_to_hyperlink_slide(slide, link);
                }
            }
            HyperlinkAction::ExitPresentation => self.exit_show(false),
            HyperlinkAction::Web(url) => self.host.open_url(&url),
            HyperlinkAction::Mail(url) => self.host.navigate_to(&url),
            HyperlinkAction::Unknown => tracing::debug!(url = %link.url, "unsupported hyperlink"),
        }
    }

    /// Jump to `slide_index`, playing the link's own transition when it has one for that slide.
    pub(crate) fn jump_to_hyperlink_slide(&mut self, slide_index: usize, link: &Hyperlink) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        let Some(target_scene) = script.scene_index_from_slide_index(slide_index) else {
            return;
        };
        let override_timeline = script
            .slide_id(slide_index)
            .and_then(|id| link.events.get(id));

        let Some(timeline) = override_timeline else {
            let automatic = script.is_automatic(target_scene);
            self.go_to_slide(slide_index, automatic);
            return;
        };

        let link_scene = match self.state {
            ShowState::IdleAtFinalState => self.settled_scene_index(),
            ShowState::IdleAtInitialState => self.cursor.current_scene,
            _ => return,
        };
        let Some(link_scene) = link_scene else {
            return;
        };
        let Some(link_slide) = script.slide_index_from_scene_index(link_scene) else {
            return;
        };

        let event = SceneEvent {
            slide_id: script.slide_id(link_slide).unwrap_or_default().to_string(),
            slide_index: link_slide,
            scene_index: link_scene,
            timeline: timeline.clone(),
            animation_supported: self.opts.animation_supported,
        };
        self.display_scene(link_scene, Some(event));
        self.play_current_scene(Some(target_scene));
    }

    pub(crate) fn clear_all_hyperlinks(&mut self) {
        self.renderer.clear_hyperlinks();
        self.hyperlinks.clear();
    }

    /// Refresh the hit regions for the scene the viewer is looking at.
    pub(crate) fn create_hyperlinks_for_current_state(&mut self) {
        let (Some(script), Some(current)) = (self.script.as_ref(), self.cursor.current_scene) else {
            return;
        };
        let scene = match self.state {
            ShowState::IdleAtInitialState => Some(current),
            ShowState::IdleAtFinalState if !script.is_last_scene(current) => Some(current + 1),
            ShowState::IdleAtFinalState if script.is_hyperlinks_only() => Some(current),
            ShowState::IdleAtFinalState if script.loop_slideshow => Some(0),
            _ => None,
        };
        let Some(scene) = scene else {
            return;
        };

        let links: Vec<Hyperlink> = script
            .event(scene)
            .map(|e| e.hyperlinks.clone())
            .unwrap_or_default();
        self.clear_all_hyperlinks();
        for link in links.into_iter().chain(self.movie_hyperlinks.iter().cloned()) {
            self.renderer.add_hyperlink(link.target_rectangle.to_rect());
            self.hyperlinks.push(link);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/hyperlink.rs"]
mod tests;
