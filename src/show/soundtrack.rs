use crate::{
    script::model::{Soundtrack, SoundtrackMode},
    show::host::{AudioChannel, AudioRequest},
};

/// Position in the show's background track list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoundtrackPlayer {
    index: usize,
    playing: bool,
}

impl SoundtrackPlayer {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn track_index(&self) -> usize {
        self.index
    }

    /// Start from the first track. `None` when the show has nothing to play.
    pub fn start(&mut self, soundtrack: Option<&Soundtrack>) -> Option<AudioRequest> {
        let soundtrack = soundtrack?;
        if soundtrack.mode == SoundtrackMode::Off || soundtrack.tracks.is_empty() {
            return None;
        }
        self.index = 0;
        self.cue(soundtrack)
    }

    /// The current track ended: move on, wrap around in loop mode, or finish.
    pub fn item_ended(&mut self, soundtrack: Option<&Soundtrack>) -> Option<AudioRequest> {
        let soundtrack = soundtrack?;
        if !self.playing {
            return None;
        }
        self.index += 1;
        if self.index < soundtrack.tracks.len() {
            return self.cue(soundtrack);
        }
        match soundtrack.mode {
            SoundtrackMode::Loop => self.start(Some(soundtrack)),
            SoundtrackMode::PlayOnce | SoundtrackMode::Off => {
                self.playing = false;
                None
            }
        }
    }

    /// Returns whether anything was playing.
    pub fn stop(&mut self) -> bool {
        std::mem::take(&mut self.playing)
    }

    fn cue(&mut self, soundtrack: &Soundtrack) -> Option<AudioRequest> {
        let url = soundtrack.tracks.get(self.index)?.clone();
        self.playing = true;
        Some(AudioRequest {
            channel: AudioChannel::Soundtrack,
            url,
            volume: soundtrack.volume,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/soundtrack.rs"]
mod tests;
