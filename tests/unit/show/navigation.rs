use super::*;
use crate::{
    loader::simulated::SimulatedLoader,
    render::timeline::TimelineRenderer,
    script::model::Script,
    show::{host::RecordingHost, input::InputEvent, opts::SessionOpts},
};

type Session = ShowSession<RecordingHost, SimulatedLoader, TimelineRenderer>;

// slides s0 | s1 s1 | s2  ->  scenes 0 | 1 2 | 3
fn started(looping: bool) -> Session {
    let json = serde_json::json!({
        "slideList": ["s0", "s1", "s2"],
        "events": [
            { "slideId": "s0", "effects": [{ "type": "transition", "name": "apple:dissolve", "duration": 1.0 }] },
            { "slideId": "s1", "effects": [{ "type": "transition", "name": "apple:dissolve", "duration": 1.0 }] },
            { "slideId": "s1", "effects": [{ "type": "buildIn", "name": "apple:wipe", "duration": 1.0 }] },
            { "slideId": "s2", "effects": [{ "type": "transition", "name": "apple:dissolve", "duration": 1.0 }] },
        ],
        "loopSlideshow": looping,
    });
    let script = Script::from_json_str(&json.to_string()).unwrap();
    let loader = SimulatedLoader::for_script(&script, 50);
    let mut s = ShowSession::new(
        SessionOpts::default(),
        RecordingHost::new(),
        loader,
        TimelineRenderer::new(),
    );
    s.start_show();
    s.handle(InputEvent::ScriptDownloaded {
        script: Box::new(script),
    });
    s.advance_by(1_000);
    s
}

fn settle(s: &mut Session) {
    s.advance_by(3_000);
}

#[test]
fn busy_session_keeps_one_action_and_drops_the_rest() {
    let mut s = started(false);
    assert!(s.advance_to_next_build());
    assert_eq!(s.state(), ShowState::Playing);

    assert!(s.advance_to_next_build());
    assert_eq!(
        s.queued_action(),
        Some(UserAction::AdvanceToNextBuild(AdvanceOrigin::User))
    );
    assert!(!s.advance_to_next_build());

    settle(&mut s);
    assert_eq!(s.queued_action(), None);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    assert_eq!(s.cursor().current_scene, Some(1));
    assert_eq!(s.cursor().next_scene, Some(2));
}

#[test]
fn back_build_while_playing_is_not_queued() {
    let mut s = started(false);
    s.advance_to_next_build();
    s.go_back_to_previous_build();
    assert_eq!(s.queued_action(), None);
    assert_eq!(s.state(), ShowState::Playing);
}

#[test]
fn skip_build_walks_scenes_and_stops_at_the_end() {
    let mut s = started(false);
    for expected in 1..=3 {
        s.advance_and_skip_build();
        settle(&mut s);
        assert_eq!(s.cursor().current_scene, Some(expected));
        assert_eq!(s.state(), ShowState::IdleAtInitialState);
    }
    let rendered = s.renderer().rendered_event_count();
    s.advance_and_skip_build();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(3));
    assert_eq!(s.renderer().rendered_event_count(), rendered);
}

#[test]
fn skip_build_wraps_in_a_looping_show() {
    let mut s = started(true);
    s.jump_to_slide(3, false);
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(3));
    s.advance_and_skip_build();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn next_slide_skips_remaining_builds() {
    let mut s = started(false);
    s.advance_to_next_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(1));
    assert_eq!(s.cursor().current_slide, Some(1));

    s.advance_to_next_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(3));

    s.advance_to_next_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(3));
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
}

#[test]
fn back_slide_returns_to_first_build_then_previous_slide() {
    let mut s = started(false);
    s.jump_to_slide(2, false);
    settle(&mut s);
    s.advance_and_skip_build();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(2));

    s.go_back_to_previous_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(1));

    s.go_back_to_previous_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));

    s.go_back_to_previous_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn back_slide_past_the_end_lands_on_the_last_slide() {
    let mut s = started(false);
    s.jump_to_slide(3, false);
    settle(&mut s);
    s.advance_to_next_build();
    settle(&mut s);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    assert_eq!(s.cursor().current_scene, Some(3));
    assert_eq!(s.cursor().next_scene, None);

    s.go_back_to_previous_slide();
    settle(&mut s);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    assert_eq!(s.cursor().current_scene, Some(3));
}

#[test]
fn back_build_at_the_start_only_resets_media() {
    let mut s = started(false);
    let resets = s.media().reset_count();
    let rendered = s.renderer().rendered_event_count();
    s.go_back_to_previous_build();
    settle(&mut s);
    assert_eq!(s.media().reset_count(), resets + 1);
    assert_eq!(s.renderer().rendered_event_count(), rendered);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn back_build_from_final_state_shows_the_played_scene_again() {
    let mut s = started(false);
    s.advance_to_next_build();
    settle(&mut s);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    s.go_back_to_previous_build();
    settle(&mut s);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn slide_numbers_outside_the_show_are_ignored() {
    let mut s = started(false);
    let rendered = s.renderer().rendered_event_count();
    s.jump_to_slide(0, false);
    s.jump_to_slide(4, false);
    settle(&mut s);
    assert_eq!(s.renderer().rendered_event_count(), rendered);
    assert_eq!(s.state(), ShowState::IdleAtInitialState);
}

#[test]
fn queued_actions_replay_through_the_same_entry_points() {
    let mut s = started(false);
    s.run_user_action(UserAction::AdvanceAndSkipBuild);
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(1));
    s.run_user_action(UserAction::GoBackToPreviousSlide);
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn slide_and_skip_requests_wait_for_the_next_idle_turn() {
    let requests: [(fn(&mut Session), UserAction, usize); 3] = [
        (Session::advance_to_next_slide, UserAction::AdvanceToNextSlide, 3),
        (Session::advance_and_skip_build, UserAction::AdvanceAndSkipBuild, 2),
        (Session::go_back_to_previous_slide, UserAction::GoBackToPreviousSlide, 0),
    ];
    for (request, action, landed) in requests {
        let mut s = started(false);
        s.jump_to_slide(2, false);
        assert!(!s.state().is_idle());
        request(&mut s);
        assert_eq!(s.queued_action(), Some(action));
        settle(&mut s);
        assert_eq!(s.queued_action(), None);
        assert_eq!(s.state(), ShowState::IdleAtInitialState);
        assert_eq!(s.cursor().current_scene, Some(landed), "{action:?}");
    }
}

#[test]
fn only_the_first_busy_request_is_kept() {
    let mut s = started(false);
    s.jump_to_slide(2, false);
    s.advance_and_skip_build();
    s.advance_to_next_slide();
    s.go_back_to_previous_slide();
    assert_eq!(s.queued_action(), Some(UserAction::AdvanceAndSkipBuild));
}

#[test]
fn skip_build_from_the_final_state_of_the_last_scene() {
    let mut s = started(true);
    s.jump_to_slide(3, false);
    settle(&mut s);
    s.advance_to_next_build();
    settle(&mut s);
    assert_eq!(s.state(), ShowState::IdleAtFinalState);
    assert_eq!(s.cursor().current_scene, Some(3));
    s.advance_and_skip_build();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));
}

#[test]
fn next_slide_wraps_in_a_looping_show() {
    let mut s = started(true);
    s.jump_to_slide(3, false);
    settle(&mut s);
    s.advance_to_next_slide();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(0));
    assert_eq!(s.cursor().current_slide, Some(0));
}

#[test]
fn back_build_wraps_to_the_last_scene_in_a_looping_show() {
    let mut s = started(true);
    s.go_back_to_previous_build();
    settle(&mut s);
    assert_eq!(s.cursor().current_scene, Some(3));
}
