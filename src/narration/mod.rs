//! Playback of a recorded narration: audio segments plus timed navigation.

pub(crate) mod player;
