use super::*;
use crate::{
    loader::simulated::SimulatedLoader,
    render::timeline::TimelineRenderer,
    show::{host::HostEvent, host::RecordingHost, input::InputEvent},
};

type Session = ShowSession<RecordingHost, SimulatedLoader, TimelineRenderer>;

fn script(builds: &[usize], looping: bool) -> Script {
    let slide_list: Vec<String> = (0..builds.len()).map(|i| format!("s{i}")).collect();
    let mut events = Vec::new();
    for (slide, &n) in builds.iter().enumerate() {
        for _ in 0..n {
            events.push(serde_json::json!({
                "slideId": format!("s{slide}"),
                "effects": [{ "type": "transition", "name": "apple:dissolve", "duration": 1.0 }],
            }));
        }
    }
    let json = serde_json::json!({
        "slideList": slide_list,
        "events": events,
        "loopSlideshow": looping,
    });
    Script::from_json_str(&json.to_string()).unwrap()
}

fn started(script: Script, opts: SessionOpts) -> Session {
    let loader = SimulatedLoader::for_script(&script, 50);
    let mut s = ShowSession::new(opts, RecordingHost::new(), loader, TimelineRenderer::new());
    s.start_show();
    s.handle(InputEvent::ScriptDownloaded {
        script: Box::new(script),
    });
    s.advance_by(1_000);
    s
}

#[test]
fn start_show_requests_the_script() {
    let mut s: Session = ShowSession::new(
        SessionOpts::default(),
        RecordingHost::new(),
        SimulatedLoader::default(),
        TimelineRenderer::new(),
    );
    s.start_show();
    assert_eq!(s.state(), ShowState::DownloadingScript);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ScriptRequested)), 1);
}

#[test]
fn startup_settles_on_the_first_scene() {
    let s = started(script(&[1, 2, 1], false), SessionOpts::default());
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    let cursor = s.cursor();
    assert_eq!(cursor.current_scene, Some(0));
    assert_eq!(cursor.next_scene, Some(1));
    assert_eq!(cursor.current_slide, Some(0));

    let slides: Vec<_> = s.host().notifications().cloned().collect();
    assert_eq!(slides, vec![Notification::SlideIndexChanged { slide_index: 0 }]);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::LaunchModeCleared)), 1);
    assert_eq!(
        s.host().events().iter().rev().find_map(|e| match e {
            HostEvent::WaitingIndicator { visible } => Some(*visible),
            _ => None,
        }),
        Some(false)
    );
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn startup_walks_the_load_pipeline_in_order() {
    let s = started(script(&[1, 1], false), SessionOpts::default());
    let states: Vec<_> = s
        .host()
        .events()
        .iter()
        .filter_map(|e| match e {
            HostEvent::StateChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            ShowState::DownloadingScript,
            ShowState::Starting,
            ShowState::WaitingToJump,
            ShowState::ReadyToJump,
            ShowState::SettingUpScene,
            ShowState::IdleAtInitialState,
        ]
    );
}

#[test]
fn final_state_indices_at_the_end_of_the_show() {
    let mut s = started(script(&[1, 1, 1], false), SessionOpts::default());
    s.state = ShowState::IdleAtFinalState;
    s.cursor.current_scene = Some(2);
    assert_eq!(s.adjusted_scene_index(), Some(3));
    assert_eq!(s.settled_scene_index(), Some(2));

    s.cursor.current_scene = Some(1);
    assert_eq!(s.adjusted_scene_index(), Some(2));
    assert_eq!(s.settled_scene_index(), Some(2));
}

#[test]
fn final_state_indices_wrap_in_a_looping_show() {
    let mut s = started(script(&[1, 1, 1], true), SessionOpts::default());
    s.state = ShowState::IdleAtFinalState;
    s.cursor.current_scene = Some(2);
    assert_eq!(s.adjusted_scene_index(), Some(3));
    assert_eq!(s.settled_scene_index(), Some(0));

    s.state = ShowState::IdleAtInitialState;
    assert_eq!(s.adjusted_scene_index(), Some(2));
    assert_eq!(s.settled_scene_index(), Some(2));
}

#[test]
fn delayed_exit_fires_once_after_the_exit_delay() {
    let mut s = started(script(&[1], false), SessionOpts::default());
    s.exit_show(false);
    s.exit_show(false);
    s.advance_by(749);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ShowExited)), 0);
    s.advance_by(1);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ShowExited)), 1);

    s.exit_show(true);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ShowExited)), 2);
}

#[test]
fn waiting_to_play_toggles_the_waiting_indicator() {
    let mut s = started(script(&[1], false), SessionOpts::default());
    s.host_mut().take_events();
    s.change_state(ShowState::WaitingToPlay);
    s.change_state(ShowState::ReadyToPlay);
    let indicator: Vec<_> = s
        .host()
        .events()
        .iter()
        .filter_map(|e| match e {
            HostEvent::WaitingIndicator { visible } => Some(*visible),
            _ => None,
        })
        .collect();
    assert_eq!(indicator, vec![true, false]);
}

#[test]
fn change_state_to_the_same_state_is_silent() {
    let mut s = started(script(&[1], false), SessionOpts::default());
    s.host_mut().take_events();
    s.change_state(ShowState::IdleAtInitialState);
    assert!(s.host().events().is_empty());
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn window_resizes_are_debounced() {
    let mut s = started(script(&[1, 1], false), SessionOpts::default());
    s.handle(InputEvent::WindowResize { scale_factor: None });
    s.advance_by(500);
    s.handle(InputEvent::WindowResize { scale_factor: None });
    s.advance_by(999);
    let resized = |s: &Session| {
        s.host()
            .count(|e| matches!(e, HostEvent::Notification(Notification::ShowSizeChanged { .. })))
    };
    assert_eq!(resized(&s), 0);
    s.advance_by(1);
    assert_eq!(resized(&s), 1);
}

#[test]
fn resize_with_view_scale_redisplays_the_settled_scene() {
    let opts = SessionOpts {
        can_set_view_scale: true,
        ..SessionOpts::default()
    };
    let mut s = started(script(&[1, 1], false), opts);
    s.handle(InputEvent::WindowResize {
        scale_factor: Some(0.5),
    });
    s.advance_by(3_000);
    assert_eq!(s.script().unwrap().scale_factor(), 0.5);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    assert_eq!(s.cursor().current_scene, Some(0));
    assert_eq!(s.renderer().rendered_event_count(), 2);
}

#[test]
fn media_reset_releases_registered_elements() {
    let mut s = started(script(&[1, 1], false), SessionOpts::default());
    s.register_media(MediaKind::Movie, "m1", "movie.mp4");
    s.register_media(MediaKind::Audio, "a1", "clip.m4a");
    s.host_mut().take_events();
    s.reset_media_cache();
    let released: Vec<_> = s
        .host()
        .events()
        .iter()
        .filter_map(|e| match e {
            HostEvent::MediaReleased { media, ids } => Some((*media, ids.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        released,
        vec![
            (MediaKind::Movie, vec!["m1".to_string()]),
            (MediaKind::Audio, vec!["a1".to_string()]),
        ]
    );
    assert!(s.media().is_empty());
}
