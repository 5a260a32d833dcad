use super::*;
use crate::{
    loader::simulated::SimulatedLoader,
    render::timeline::TimelineRenderer,
    show::{
        host::{HostEvent, RecordingHost},
        keys::Key,
        opts::SessionOpts,
    },
};

type Session = ShowSession<RecordingHost, SimulatedLoader, TimelineRenderer>;

fn script_json(extra: serde_json::Value) -> serde_json::Value {
    let dissolve = serde_json::json!([{ "type": "transition", "name": "apple:dissolve", "duration": 1.0 }]);
    let mut json = serde_json::json!({
        "slideList": ["s0", "s1", "s2"],
        "events": [
            { "slideId": "s0", "effects": dissolve },
            { "slideId": "s1", "effects": dissolve },
            { "slideId": "s2", "effects": dissolve },
        ],
    });
    if let (Some(obj), Some(extra)) = (json.as_object_mut(), extra.as_object()) {
        obj.extend(extra.clone());
    }
    json
}

fn session_with(extra: serde_json::Value, opts: SessionOpts, host: RecordingHost) -> Session {
    let script = Script::from_json_str(&script_json(extra).to_string()).unwrap();
    let loader = SimulatedLoader::for_script(&script, 50);
    let mut s = ShowSession::new(opts, host, loader, TimelineRenderer::new());
    s.start_show();
    s.handle(InputEvent::ScriptDownloaded {
        script: Box::new(script),
    });
    s
}

fn started() -> Session {
    let mut s = session_with(serde_json::json!({}), SessionOpts::default(), RecordingHost::new());
    s.advance_by(1_000);
    s
}

fn opened_at(url: &str) -> Session {
    let opts = SessionOpts {
        url: url.to_string(),
        ..SessionOpts::default()
    };
    let mut s = session_with(serde_json::json!({}), opts, RecordingHost::new());
    s.advance_by(1_000);
    s
}

fn key(s: &mut Session, key: Key) {
    s.handle(InputEvent::KeyDown {
        key,
        modifiers: Modifiers::NONE,
    });
}

fn entry_values(s: &Session) -> Vec<u32> {
    s.host()
        .events()
        .iter()
        .filter_map(|e| match e {
            HostEvent::Hud {
                command: HudCommand::ShowSlideNumberEntry(v),
            } => Some(*v),
            _ => None,
        })
        .collect()
}

#[test]
fn typed_slide_number_jumps_on_enter() {
    let mut s = started();
    key(&mut s, Key::Digit(3));
    assert!(s.hud().entry_visible);
    key(&mut s, Key::Enter);
    s.advance_by(3_000);
    assert_eq!(s.cursor().current_scene, Some(2));
    assert_eq!(entry_values(&s), vec![3, 3]);
    assert!(!s.hud().entry_visible);
    assert!(!s.hud().digits.is_active());
}

#[test]
fn typed_slide_number_is_clamped_to_the_show() {
    let mut s = started();
    key(&mut s, Key::Digit(9));
    key(&mut s, Key::Digit(9));
    key(&mut s, Key::Enter);
    s.advance_by(3_000);
    assert_eq!(s.cursor().current_scene, Some(2));
    assert_eq!(entry_values(&s), vec![9, 99, 3]);
}

#[test]
fn delete_removes_digits_then_dismisses_the_entry() {
    let mut s = started();
    key(&mut s, Key::Digit(1));
    key(&mut s, Key::Digit(2));
    key(&mut s, Key::Delete);
    assert_eq!(entry_values(&s), vec![1, 12, 1]);
    key(&mut s, Key::Delete);
    s.advance_by(1);
    assert!(!s.hud().entry_visible);
    assert!(!s.hud().digits.is_active());
    assert_eq!(
        s.host().count(|e| matches!(
            e,
            HostEvent::Hud {
                command: HudCommand::HideSlideNumberEntry
            }
        )),
        1
    );
}

#[test]
fn typed_entry_hides_itself_after_a_while() {
    let mut s = started();
    key(&mut s, Key::Digit(2));
    s.advance_by(6_999);
    assert!(s.hud().entry_visible);
    s.advance_by(1);
    assert!(!s.hud().entry_visible);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn hyperlinks_only_show_ignores_typed_slide_numbers() {
    let mut s = session_with(
        serde_json::json!({ "showMode": "hyperlinksOnly" }),
        SessionOpts::default(),
        RecordingHost::new(),
    );
    s.advance_by(1_000);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::HyperlinksOnlyMode)), 1);
    key(&mut s, Key::Digit(2));
    assert!(s.hud().entry_visible);
    key(&mut s, Key::Enter);
    assert!(!s.hud().entry_visible);
    assert!(!s.hud().digits.is_active());
    assert_eq!(
        s.host().count(|e| matches!(
            e,
            HostEvent::Hud {
                command: HudCommand::HideSlideNumberEntry
            }
        )),
        1
    );
    s.advance_by(3_000);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn escape_and_meta_period_exit_immediately() {
    let mut s = started();
    key(&mut s, Key::Escape);
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ShowExited)), 1);
    s.handle(InputEvent::KeyDown {
        key: Key::Char('.'),
        modifiers: Modifiers {
            meta: true,
            ..Modifiers::NONE
        },
    });
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ShowExited)), 2);
}

#[test]
fn host_shortcuts_pass_through() {
    let mut s = started();
    s.host_mut().take_events();
    key(&mut s, Key::F11);
    s.handle(InputEvent::KeyDown {
        key: Key::Char('r'),
        modifiers: Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
    });
    s.advance_by(1_000);
    assert!(s.host().events().is_empty());
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
}

#[test]
fn arrow_keys_drive_builds() {
    let mut s = started();
    key(&mut s, Key::ArrowRight);
    assert_eq!(s.state(), ShowState::Playing);
    s.advance_by(3_000);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    key(&mut s, Key::ArrowLeft);
    s.advance_by(3_000);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn help_key_toggles_the_overlay() {
    let mut s = started();
    key(&mut s, Key::Char('?'));
    assert!(s.hud().help_visible);
    key(&mut s, Key::Char('?'));
    assert!(!s.hud().help_visible);
}

#[test]
fn swipe_near_the_left_edge_toggles_the_navigator() {
    let mut s = started();
    s.handle(InputEvent::Swipe {
        direction: SwipeDirection::Right,
        fingers: 1,
        start_x: Some(20.0),
    });
    s.handle(InputEvent::Swipe {
        direction: SwipeDirection::Left,
        fingers: 1,
        start_x: Some(NAVIGATOR_SWIPE_ZONE - 1.0),
    });
    let navigator: Vec<_> = s
        .host()
        .events()
        .iter()
        .filter_map(|e| match e {
            HostEvent::Navigator { visible } => Some(*visible),
            _ => None,
        })
        .collect();
    assert_eq!(navigator, vec![true, false]);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);

    s.handle(InputEvent::Swipe {
        direction: SwipeDirection::Left,
        fingers: 1,
        start_x: Some(500.0),
    });
    assert_eq!(s.state(), ShowState::Playing);
}

#[test]
fn two_finger_swipe_moves_by_slide() {
    let mut s = started();
    s.handle(InputEvent::Swipe {
        direction: SwipeDirection::Left,
        fingers: 2,
        start_x: None,
    });
    s.advance_by(3_000);
    assert_eq!(s.cursor().current_scene, Some(1));
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
}

#[test]
fn navigator_tap_jumps_to_its_slide() {
    let mut s = started();
    s.handle(InputEvent::Tap {
        point: None,
        fingers: 1,
        slide_number: Some(3),
    });
    s.advance_by(3_000);
    assert_eq!(s.cursor().current_scene, Some(2));
}

#[test]
fn clicks_on_video_are_left_to_the_video() {
    let mut s = started();
    s.handle(InputEvent::Click {
        point: None,
        on_video: true,
    });
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    s.handle(InputEvent::MouseDown {
        button: MouseButton::Left,
    });
    assert_eq!(s.state(), ShowState::Playing);
}

#[test]
fn fullscreen_change_relayouts_the_display() {
    let mut s = started();
    s.handle(InputEvent::FullscreenChange { fullscreen: true });
    s.advance_by(1);
    assert!(s.is_fullscreen());
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::LayoutDisplay)), 1);
}

#[test]
fn stage_size_is_tracked() {
    let mut s = started();
    let area = TargetRect::new(0.0, 0.0, 800.0, 600.0);
    s.handle(InputEvent::StageSizeChanged { area });
    assert_eq!(s.track_area(), Some(area));
}

#[test]
fn show_resumes_at_the_scene_in_the_fragment() {
    let s = opened_at("https://example.com/show/#2");
    assert_eq!(s.cursor().current_scene, Some(2));
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
}

#[test]
fn show_opens_at_the_requested_slide() {
    let s = opened_at("https://example.com/show/?currentSlide=2");
    assert_eq!(s.cursor().current_scene, Some(1));

    let s = opened_at("https://example.com/show/?currentSlide=9");
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn resume_point_past_the_end_leaves_the_show_starting() {
    let s = opened_at("https://example.com/show/#7");
    assert_eq!(s.state(), ShowState::Starting);
    assert_eq!(s.cursor().current_scene, None);
}

#[test]
fn unusable_script_offers_a_retry() {
    let broken: Script = serde_json::from_value(serde_json::json!({
        "slideList": ["s0"],
        "events": [{ "slideId": "missing" }],
    }))
    .unwrap();

    let host = RecordingHost::new().with_retry_answers([true]);
    let mut s: Session = ShowSession::new(
        SessionOpts::default(),
        host,
        SimulatedLoader::default(),
        TimelineRenderer::new(),
    );
    s.start_show();
    s.handle(InputEvent::ScriptDownloaded {
        script: Box::new(broken.clone()),
    });
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::ScriptRequested)), 2);
    assert_eq!(s.state(), ShowState::DownloadingScript);

    s.handle(InputEvent::ScriptNotDownloaded);
    assert_eq!(
        s.host()
            .count(|e| matches!(e, HostEvent::RetryPrompted { accepted: false, .. })),
        1
    );
    assert_eq!(s.host().count(|e| matches!(e, HostEvent::LaunchModeCleared)), 1);
}

fn narrated() -> Session {
    let extra = serde_json::json!({
        "recording": {
            "movieSegments": [{ "url": "part0.m4a" }, { "url": "part1.m4a" }],
            "eventTracks": [{
                "type": "navigation",
                "events": [
                    { "startTime": 0.0, "slide": "s0", "animationPhase": "start" },
                    { "startTime": 2.0, "slide": "s1", "animationPhase": "start" },
                ],
            }],
        },
    });
    session_with(extra, SessionOpts::default(), RecordingHost::new())
}

#[test]
fn recording_plays_itself() {
    let mut s = narrated();
    s.advance_by(150);
    assert!(s.is_recording());
    let narration_started = |s: &Session| {
        s.host().count(
            |e| matches!(e, HostEvent::AudioStarted(r) if r.channel == AudioChannel::Narration),
        )
    };
    assert_eq!(narration_started(&s), 1);

    s.advance_by(100);
    assert_eq!(s.state(), ShowState::Playing);
    assert_eq!(s.cursor().current_scene, Some(0));

    s.advance_by(5_000);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    assert_eq!(s.cursor().current_scene, Some(1));
    assert_eq!(narration_started(&s), 1);
}

#[test]
fn recording_ignores_viewer_navigation() {
    let mut s = narrated();
    s.advance_by(1_000);
    key(&mut s, Key::Space);
    s.handle(InputEvent::Click {
        point: None,
        on_video: false,
    });
    assert_eq!(s.queued_action(), None);
    assert_eq!(s.state(), ShowState::Playing);
}

#[test]
fn narration_segments_play_back_to_back() {
    let mut s = narrated();
    s.advance_by(200);
    s.handle(InputEvent::NarrationSegmentEnded { segment: 0 });
    assert!(s.host().events().iter().any(
        |e| matches!(e, HostEvent::AudioStarted(r) if r.url == "part1.m4a")
    ));
    s.handle(InputEvent::NarrationSegmentEnded { segment: 1 });
    assert_eq!(
        s.host().count(|e| matches!(
            e,
            HostEvent::AudioStopped {
                channel: AudioChannel::Narration
            }
        )),
        1
    );
}
