use crate::{
    animation::{ease::Acceleration, scheduler::EffectClip},
    foundation::core::secs_to_millis,
    script::model::{Effect, EffectType},
};

/// Effect whose particles must not be drawn before its start delay has elapsed.
pub const BLINDS_TRANSITION: &str = "com.apple.iWork.Keynote.BLTBlinds";

/// When an effect's first frame may be prepared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prerender {
    /// As soon as playback of the scene begins.
    Eager,
    /// Only once the start delay has elapsed.
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectProfile {
    pub prerender: Prerender,
    pub acceleration: Acceleration,
}

/// Look up the playback profile for an effect by kind and name.
pub fn effect_profile(effect: &Effect) -> EffectProfile {
    let acceleration = match effect.name.as_str() {
        name if is_action_effect(name) => Acceleration::EaseBoth,
        "apple:action-pop" | "apple:action-bounce" | "apple:action-jiggle" => Acceleration::EaseOut,
        "apple:action-pulse" | "apple:action-blink" | "apple:action-flip" => Acceleration::None,
        _ => match effect.kind {
            EffectType::Transition | EffectType::SmartBuild => Acceleration::EaseBoth,
            EffectType::BuildIn => Acceleration::EaseOut,
            EffectType::BuildOut => Acceleration::EaseIn,
            EffectType::ActionBuild => Acceleration::EaseBoth,
        },
    };

    let prerender = match (effect.kind, effect.name.as_str()) {
        (EffectType::Transition, BLINDS_TRANSITION) => Prerender::Deferred,
        (EffectType::Transition, _) => Prerender::Eager,
        _ => Prerender::Deferred,
    };

    EffectProfile {
        prerender,
        acceleration,
    }
}

pub fn is_action_effect(name: &str) -> bool {
    matches!(
        name,
        "apple:action-opacity"
            | "apple:action-motion-path"
            | "apple:action-rotation"
            | "apple:action-scale"
    )
}

/// Place an effect on the animation timeline.
pub fn effect_clip(effect: &Effect) -> EffectClip {
    EffectClip {
        name: effect.name.clone(),
        kind: effect.kind,
        begin: secs_to_millis(effect.begin_time),
        duration: secs_to_millis(effect.duration),
        acceleration: effect_profile(effect).acceleration,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/effects.rs"]
mod tests;
