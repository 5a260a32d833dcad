//! Showplayer drives playback of exported slide shows.
//!
//! A show is a script of slides, each split into scenes (build steps) with timed visual effects.
//! The public API is session-oriented:
//!
//! - Parse a [`Script`] and pick [`SessionOpts`]
//! - Create a [`ShowSession`] around a [`ShowHost`], a [`SceneLoader`] and an [`EffectRenderer`]
//! - Feed it [`InputEvent`]s and drive its virtual clock with [`ShowSession::run_until`]
//!
//! Everything runs on the session's own clock, so a whole show can be replayed headlessly and
//! deterministically with [`RecordingHost`], [`SimulatedLoader`] and [`TimelineRenderer`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod loader;
pub(crate) mod narration;
pub(crate) mod render;
pub(crate) mod runtime;
pub(crate) mod script;
pub(crate) mod show;

pub use crate::foundation::core::{Millis, Point, Rect, Size, TargetRect, secs_to_millis};
pub use crate::foundation::error::{PlayerError, PlayerResult};

pub use crate::animation::ease::Acceleration;
pub use crate::animation::scheduler::{AnimationScheduler, EffectClip, EffectProgress, FrameReport};
pub use crate::loader::cache::{SlideTextures, TextureCache, resident_window};
pub use crate::loader::simulated::SimulatedLoader;
pub use crate::loader::{LoadReply, LoadTicket, SceneLoader};
pub use crate::narration::player::{NarrationAction, NarrationCue, NarrationPlayer};
pub use crate::render::effects::{
    BLINDS_TRANSITION, EffectProfile, Prerender, effect_clip, effect_profile, is_action_effect,
};
pub use crate::render::timeline::TimelineRenderer;
pub use crate::render::{EffectRenderer, RenderedEffects, SceneEvent};
pub use crate::runtime::event_loop::{EventQueue, TimerId, TimerSlot};
pub use crate::script::index::{next_scene_index, truncated_index};
pub use crate::script::model::{
    AnimationPhase, Effect, EffectType, EventTimeline, EventTrack, Hyperlink, MovieSegment,
    NavigationEvent, Recording, Script, ShowMode, Soundtrack, SoundtrackMode, TimedEvent,
};
pub use crate::show::host::{
    AudioChannel, AudioRequest, HostEvent, HudCommand, MediaKind, NavigationButtons,
    Notification, RecordingHost, RetryPrompt, ShowHost,
};
pub use crate::show::hud::{DigitEntry, DigitRemoval, HudState};
pub use crate::show::hyperlink::{HyperlinkAction, SlideLink, find_hyperlink_at};
pub use crate::show::input::{InputEvent, MouseButton, NAVIGATOR_SWIPE_ZONE, SwipeDirection};
pub use crate::show::keys::{Key, KeyCommand, KeyRoute, Modifiers, key_command, route_key};
pub use crate::show::location::ShowLocation;
pub use crate::show::media::MediaCache;
pub use crate::show::opts::SessionOpts;
pub use crate::show::session::{SceneCursor, ShowSession};
pub use crate::show::soundtrack::SoundtrackPlayer;
pub use crate::show::state::ShowState;
pub use crate::show::task::{AdvanceOrigin, UserAction};
