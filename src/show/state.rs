/// Playback state of a show session.
///
/// Only the two idle states accept navigation immediately; input arriving in any other state is
/// queued (at most one action) and replayed on the next idle entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowState {
    #[default]
    Stopped,
    Starting,
    DownloadingScript,
    SettingUpScene,
    IdleAtInitialState,
    IdleAtFinalState,
    WaitingToJump,
    ReadyToJump,
    WaitingToDisplay,
    ReadyToDisplay,
    WaitingToPlay,
    ReadyToPlay,
    Playing,
}

impl ShowState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::IdleAtInitialState | Self::IdleAtFinalState)
    }

    /// States from which a scene jump may start.
    pub fn accepts_jump(self) -> bool {
        matches!(
            self,
            Self::Starting | Self::IdleAtInitialState | Self::IdleAtFinalState | Self::ReadyToJump
        )
    }

    /// States that show the waiting indicator while active.
    pub fn shows_waiting_indicator(self) -> bool {
        matches!(self, Self::Starting | Self::WaitingToPlay)
    }
}

impl std::fmt::Display for ShowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/state.rs"]
mod tests;
