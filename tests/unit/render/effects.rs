use super::*;

fn effect(kind: EffectType, name: &str) -> Effect {
    Effect {
        kind,
        name: name.to_string(),
        begin_time: 0.25,
        duration: 1.5,
    }
}

#[test]
fn transitions_prerender_eagerly_except_blinds() {
    let dissolve = effect(EffectType::Transition, "apple:dissolve");
    assert_eq!(effect_profile(&dissolve).prerender, Prerender::Eager);

    let blinds = effect(EffectType::Transition, BLINDS_TRANSITION);
    assert_eq!(effect_profile(&blinds).prerender, Prerender::Deferred);

    let build = effect(EffectType::BuildIn, "apple:dissolve");
    assert_eq!(effect_profile(&build).prerender, Prerender::Deferred);
}

#[test]
fn named_actions_override_kind_default() {
    let pop = effect(EffectType::ActionBuild, "apple:action-pop");
    assert_eq!(effect_profile(&pop).acceleration, Acceleration::EaseOut);
    let out = effect(EffectType::BuildOut, "apple:fade");
    assert_eq!(effect_profile(&out).acceleration, Acceleration::EaseIn);
    assert!(is_action_effect("apple:action-scale"));
    assert!(!is_action_effect("apple:action-pop"));
}

#[test]
fn clip_timing_is_in_millis() {
    let c = effect_clip(&effect(EffectType::BuildIn, "apple:wipe"));
    assert_eq!(c.begin, 250);
    assert_eq!(c.duration, 1500);
    assert_eq!(c.end(), 1750);
}
