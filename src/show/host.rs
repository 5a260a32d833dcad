use std::collections::VecDeque;

use crate::show::state::ShowState;

/// Notifications a session publishes to its surroundings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "notification", rename_all = "camelCase")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    SlideIndexChanged { slide_index: usize },
    ShowSizeChanged { width: f64, height: f64 },
}

/// Enablement of the backward/forward navigation buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NavigationButtons {
    pub backward: bool,
    pub forward: bool,
}

/// Heads-up display requests: slide-number entry, slide-number display and the help placard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "hud", content = "value", rename_all = "camelCase")]
pub enum HudCommand {
    /// Show (or update) the slide number being typed.
    ShowSlideNumberEntry(u32),
    HideSlideNumberEntry,
    /// Show the current slide number (1-based).
    ShowSlideNumber(usize),
    HideSlideNumber,
    ShowHelp,
    HideHelp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetryPrompt {
    ScriptDownload,
    SceneLoad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioChannel {
    Soundtrack,
    Narration,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRequest {
    pub channel: AudioChannel,
    pub url: String,
    pub volume: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Movie,
    Audio,
}

/// Embedding environment of a show session.
///
/// The session calls these synchronously from its own turn; nothing here may call back into the
/// session. Only [`ShowHost::notify`] is mandatory.
pub trait ShowHost {
    fn notify(&mut self, notification: Notification);

    fn state_changed(&mut self, _from: ShowState, _to: ShowState) {}

    /// Ask the viewer whether to retry a failed download.
    fn confirm_retry(&mut self, _prompt: RetryPrompt) -> bool {
        false
    }

    /// Start (or restart) the script download.
    fn request_script(&mut self) {}

    /// Reload the player from `url`.
    fn reload(&mut self, _url: &str) {}

    fn replace_history(&mut self, _url: &str) {}

    /// Open a web page in a new window.
    fn open_url(&mut self, _url: &str) {}

    /// Navigate the current window (mail links).
    fn navigate_to(&mut self, _url: &str) {}

    fn show_exited(&mut self) {}

    fn set_waiting_indicator(&mut self, _visible: bool) {}

    fn clear_launch_mode(&mut self) {}

    fn enter_hyperlinks_only_mode(&mut self) {}

    fn layout_display(&mut self) {}

    fn navigation_buttons_changed(&mut self, _buttons: NavigationButtons) {}

    fn hud(&mut self, _command: HudCommand) {}

    fn set_navigator_visible(&mut self, _visible: bool) {}

    fn play_audio(&mut self, _request: AudioRequest) {}

    fn stop_audio(&mut self, _channel: AudioChannel) {}

    /// Release media elements dropped from the session's caches.
    fn release_media(&mut self, _kind: MediaKind, _ids: &[String]) {}
}

impl<H: ShowHost + ?Sized> ShowHost for &mut H {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification)
    }

    fn state_changed(&mut self, from: ShowState, to: ShowState) {
        (**self).state_changed(from, to)
    }

    fn confirm_retry(&mut self, prompt: RetryPrompt) -> bool {
        (**self).confirm_retry(prompt)
    }

    fn request_script(&mut self) {
        (**self).request_script()
    }

    fn reload(&mut self, url: &str) {
        (**self).reload(url)
    }

    fn replace_history(&mut self, url: &str) {
        (**self).replace_history(url)
    }

    fn open_url(&mut self, url: &str) {
        (**self).open_url(url)
    }

    fn navigate_to(&mut self, url: &str) {
        (**self).navigate_to(url)
    }

    fn show_exited(&mut self) {
        (**self).show_exited()
    }

    fn set_waiting_indicator(&mut self, visible: bool) {
        (**self).set_waiting_indicator(visible)
    }

    fn clear_launch_mode(&mut self) {
        (**self).clear_launch_mode()
    }

    fn enter_hyperlinks_only_mode(&mut self) {
        (**self).enter_hyperlinks_only_mode()
    }

    fn layout_display(&mut self) {
        (**self).layout_display()
    }

    fn navigation_buttons_changed(&mut self, buttons: NavigationButtons) {
        (**self).navigation_buttons_changed(buttons)
    }

    fn hud(&mut self, command: HudCommand) {
        (**self).hud(command)
    }

    fn set_navigator_visible(&mut self, visible: bool) {
        (**self).set_navigator_visible(visible)
    }

    fn play_audio(&mut self, request: AudioRequest) {
        (**self).play_audio(request)
    }

    fn stop_audio(&mut self, channel: AudioChannel) {
        (**self).stop_audio(channel)
    }

    fn release_media(&mut self, kind: MediaKind, ids: &[String]) {
        (**self).release_media(kind, ids)
    }
}

/// One observable host call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostEvent {
    Notification(Notification),
    StateChanged { from: ShowState, to: ShowState },
    RetryPrompted { prompt: RetryPrompt, accepted: bool },
    ScriptRequested,
    Reload { url: String },
    HistoryReplaced { url: String },
    UrlOpened { url: String },
    NavigatedTo { url: String },
    ShowExited,
    WaitingIndicator { visible: bool },
    LaunchModeCleared,
    HyperlinksOnlyMode,
    LayoutDisplay,
    NavigationButtons(NavigationButtons),
    Hud { command: HudCommand },
    Navigator { visible: bool },
    AudioStarted(AudioRequest),
    AudioStopped { channel: AudioChannel },
    MediaReleased { media: MediaKind, ids: Vec<String> },
}

/// Headless host that records every call and answers retry prompts from a script.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
    retry_answers: VecDeque<bool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for upcoming retry prompts; unanswered prompts are declined.
    pub fn with_retry_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.retry_answers.extend(answers);
        self
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.events.iter().filter_map(|e| match e {
            HostEvent::Notification(n) => Some(n),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }
}

impl ShowHost for RecordingHost {
    fn notify(&mut self, notification: Notification) {
        self.push(HostEvent::Notification(notification));
    }

    fn state_changed(&mut self, from: ShowState, to: ShowState) {
        self.push(HostEvent::StateChanged { from, to });
    }

    fn confirm_retry(&mut self, prompt: RetryPrompt) -> bool {
        let accepted = self.retry_answers.pop_front().unwrap_or(false);
        self.push(HostEvent::RetryPrompted { prompt, accepted });
        accepted
    }

    fn request_script(&mut self) {
        self.push(HostEvent::ScriptRequested);
    }

    fn reload(&mut self, url: &str) {
        self.push(HostEvent::Reload {
            url: url.to_string(),
        });
    }

    fn replace_history(&mut self, url: &str) {
        self.push(HostEvent::HistoryReplaced {
            url: url.to_string(),
        });
    }

    fn open_url(&mut self, url: &str) {
        self.push(HostEvent::UrlOpened {
            url: url.to_string(),
        });
    }

    fn navigate_to(&mut self, url: &str) {
        self.push(HostEvent::NavigatedTo {
            url: url.to_string(),
        });
    }

    fn show_exited(&mut self) {
        self.push(HostEvent::ShowExited);
    }

    fn set_waiting_indicator(&mut self, visible: bool) {
        self.push(HostEvent::WaitingIndicator { visible });
    }

    fn clear_launch_mode(&mut self) {
        self.push(HostEvent::LaunchModeCleared);
    }

    fn enter_hyperlinks_only_mode(&mut self) {
        self.push(HostEvent::HyperlinksOnlyMode);
    }

    fn layout_display(&mut self) {
        self.push(HostEvent::LayoutDisplay);
    }

    fn navigation_buttons_changed(&mut self, buttons: NavigationButtons) {
        self.push(HostEvent::NavigationButtons(buttons));
    }

    fn hud(&mut self, command: HudCommand) {
        self.push(HostEvent::Hud { command });
    }

    fn set_navigator_visible(&mut self, visible: bool) {
        self.push(HostEvent::Navigator { visible });
    }

    fn play_audio(&mut self, request: AudioRequest) {
        self.push(HostEvent::AudioStarted(request));
    }

    fn stop_audio(&mut self, channel: AudioChannel) {
        self.push(HostEvent::AudioStopped { channel });
    }

    fn release_media(&mut self, kind: MediaKind, ids: &[String]) {
        self.push(HostEvent::MediaReleased {
            media: kind,
            ids: ids.to_vec(),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/host.rs"]
mod tests;
