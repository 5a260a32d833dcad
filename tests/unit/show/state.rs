use super::*;

const ALL: [ShowState; 13] = [
    ShowState::Stopped,
    ShowState::Starting,
    ShowState::DownloadingScript,
    ShowState::SettingUpScene,
    ShowState::IdleAtInitialState,
    ShowState::IdleAtFinalState,
    ShowState::WaitingToJump,
    ShowState::ReadyToJump,
    ShowState::WaitingToDisplay,
    ShowState::ReadyToDisplay,
    ShowState::WaitingToPlay,
    ShowState::ReadyToPlay,
    ShowState::Playing,
];

#[test]
fn exactly_two_idle_states() {
    let idle: Vec<_> = ALL.iter().filter(|s| s.is_idle()).collect();
    assert_eq!(
        idle,
        vec![&ShowState::IdleAtInitialState, &ShowState::IdleAtFinalState]
    );
}

#[test]
fn jumps_allowed_from_starting_idle_and_ready() {
    let allowed: Vec<_> = ALL.iter().copied().filter(|s| s.accepts_jump()).collect();
    assert_eq!(
        allowed,
        vec![
            ShowState::Starting,
            ShowState::IdleAtInitialState,
            ShowState::IdleAtFinalState,
            ShowState::ReadyToJump,
        ]
    );
    assert!(!ShowState::Playing.accepts_jump());
}

#[test]
fn serializes_camel_case() {
    let s = serde_json::to_string(&ShowState::IdleAtFinalState).unwrap();
    assert_eq!(s, "\"idleAtFinalState\"");
    assert_eq!(ShowState::default(), ShowState::Stopped);
}

#[test]
fn waiting_indicator_states() {
    let waiting: Vec<_> = ALL.iter().copied().filter(|s| s.shows_waiting_indicator()).collect();
    assert_eq!(waiting, vec![ShowState::Starting, ShowState::WaitingToPlay]);
}
