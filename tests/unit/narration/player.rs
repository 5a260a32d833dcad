use super::*;

// slides s0 | s1 s1 | s2  ->  scenes 0 | 1 2 | 3; scene 0 links to s2 with its own transition
fn script(nav: serde_json::Value) -> Script {
    let json = serde_json::json!({
        "slideList": ["s0", "s1", "s2"],
        "events": [
            {
                "slideId": "s0",
                "hyperlinks": [
                    {
                        "targetRectangle": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 },
                        "url": "?slide=next",
                    },
                    {
                        "targetRectangle": { "x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0 },
                        "url": "?slideid=s2",
                        "events": { "s2": { "effects": [{ "type": "transition", "name": "apple:cube", "duration": 1.0 }] } },
                    },
                ],
            },
            { "slideId": "s1" },
            { "slideId": "s1" },
            { "slideId": "s2" },
        ],
        "recording": {
            "movieSegments": [{ "url": "part0.m4a" }, { "url": "part1.m4a" }],
            "eventTracks": [{ "type": "navigation", "events": nav }],
        },
    });
    Script::from_json_str(&json.to_string()).unwrap()
}

fn nav(start: f64, slide: &str, index: usize, phase: &str) -> serde_json::Value {
    serde_json::json!({ "startTime": start, "slide": slide, "eventIndex": index, "animationPhase": phase })
}

fn player(script: &Script) -> NarrationPlayer {
    script
        .recording
        .as_ref()
        .and_then(NarrationPlayer::new)
        .unwrap()
}

#[test]
fn only_a_leading_navigation_track_drives_narration() {
    let recording: Recording = serde_json::from_value(serde_json::json!({
        "eventTracks": [
            { "type": "movie", "events": [{ "startTime": 0.0 }] },
            { "type": "navigation", "events": [{ "startTime": 0.0, "slide": "s0" }] },
        ],
    }))
    .unwrap();
    assert!(NarrationPlayer::new(&recording).is_none());

    let empty: Recording = serde_json::from_value(serde_json::json!({ "eventTracks": [] })).unwrap();
    assert!(NarrationPlayer::new(&empty).is_none());
}

#[test]
fn walks_a_recording_in_order() {
    let script = script(serde_json::json!([
        nav(0.0, "s0", 0, "start"),
        nav(2.0, "s1", 0, "start"),
        nav(5.0, "s2", 0, "start"),
        nav(6.5, "s0", 0, "none"),
    ]));
    let mut p = player(&script);
    assert_eq!(p.first_scene(&script), Some(0));
    assert_eq!(p.segment_url(1), Some("part1.m4a"));
    assert_eq!(p.segment_url(2), None);

    let cue = p.navigate(&script, ShowState::IdleAtInitialState, true).unwrap();
    assert_eq!(cue.action, NarrationAction::Play);
    assert_eq!(cue.next_in, Some(2_000));

    let cue = p.navigate(&script, ShowState::IdleAtFinalState, false).unwrap();
    assert_eq!(cue.action, NarrationAction::JumpAndPlay(1));
    assert_eq!(cue.next_in, Some(3_000));
    assert_eq!(p.last_scene(), 1);

    // scene 3 does not follow scene 1 and scene 1 has no link to s2
    let cue = p.navigate(&script, ShowState::IdleAtInitialState, false).unwrap();
    assert_eq!(cue.action, NarrationAction::Jump(3));
    assert_eq!(cue.next_in, Some(1_500));

    let cue = p.navigate(&script, ShowState::IdleAtInitialState, false).unwrap();
    assert_eq!(cue.action, NarrationAction::Jump(0));
    assert_eq!(cue.next_in, None);

    assert!(p.navigate(&script, ShowState::IdleAtInitialState, false).is_none());
    assert!(p.current_event().is_none());
}

#[test]
fn start_event_while_busy_does_nothing_but_still_steps() {
    let script = script(serde_json::json!([
        nav(0.0, "s0", 0, "start"),
        nav(1.0, "s1", 0, "start"),
    ]));
    let mut p = player(&script);
    let cue = p.navigate(&script, ShowState::Playing, true).unwrap();
    assert_eq!(cue.action, NarrationAction::Nothing);
    assert_eq!(cue.next_in, Some(1_000));
    assert_eq!(p.current_event().map(|e| e.slide.as_str()), Some("s1"));
}

#[test]
fn jump_through_a_link_with_a_transition_override() {
    let script = script(serde_json::json!([
        nav(0.0, "s0", 0, "none"),
        nav(1.0, "s2", 0, "start"),
    ]));
    let mut p = player(&script);
    let cue = p.navigate(&script, ShowState::IdleAtInitialState, true).unwrap();
    assert_eq!(cue.action, NarrationAction::Nothing);

    let cue = p.navigate(&script, ShowState::IdleAtInitialState, false).unwrap();
    match cue.action {
        NarrationAction::HyperlinkJump { slide_index, link } => {
            assert_eq!(slide_index, 2);
            assert_eq!(link.url, "?slideid=s2");
        }
        other => panic!("expected a hyperlink jump, got {other:?}"),
    }
}

#[test]
fn event_naming_no_scene_is_skipped() {
    let script = script(serde_json::json!([
        nav(0.0, "s0", 0, "start"),
        nav(1.0, "s2", 7, "start"),
        nav(4.0, "s1", 1, "none"),
    ]));
    let mut p = player(&script);
    p.navigate(&script, ShowState::IdleAtInitialState, true);
    let cue = p.navigate(&script, ShowState::IdleAtFinalState, false).unwrap();
    assert_eq!(cue.action, NarrationAction::Nothing);
    assert_eq!(cue.next_in, Some(3_000));
    assert_eq!(p.last_scene(), 0);

    let cue = p.navigate(&script, ShowState::IdleAtInitialState, false).unwrap();
    assert_eq!(cue.action, NarrationAction::Jump(2));
}
