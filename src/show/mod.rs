//! The show session: playback state machine, navigation and host integration.

pub(crate) mod host;
pub(crate) mod hud;
pub(crate) mod hyperlink;
pub(crate) mod input;
pub(crate) mod keys;
pub(crate) mod location;
pub(crate) mod media;
pub(crate) mod navigation;
pub(crate) mod opts;
pub(crate) mod pipeline;
pub(crate) mod playback;
pub(crate) mod session;
pub(crate) mod soundtrack;
pub(crate) mod state;
pub(crate) mod task;
