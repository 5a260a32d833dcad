use crate::foundation::{
    core::Millis,
    error::{PlayerError, PlayerResult},
};

/// Tunables of a show session.
///
/// Every delay is in player-clock milliseconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOpts {
    /// Address the show was opened from; drives resume parameters and history updates.
    pub url: String,
    /// Wait for a scene's assets before offering a retry.
    pub max_scene_download_wait_ms: Millis,
    /// Slack added after an animation's duration before the scene counts as complete.
    pub completion_epsilon_ms: Millis,
    /// Delay of a deferred pipeline step ("next event-loop turn").
    pub next_turn_delay_ms: Millis,
    pub hyperlink_refresh_delay_ms: Millis,
    pub exit_delay_ms: Millis,
    pub resize_debounce_ms: Millis,
    pub slide_number_hide_ms: Millis,
    pub slide_number_confirm_hide_ms: Millis,
    /// Hold time of automatic scenes when animation is unavailable.
    pub no_animation_auto_delay_ms: Millis,
    /// The host can end the show (exit requests are honoured).
    pub host_controls_lifecycle: bool,
    pub animation_supported: bool,
    /// The host can rescale the stage on window resize.
    pub can_set_view_scale: bool,
    pub frame_interval_ms: Millis,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_scene_download_wait_ms: 15_000,
            completion_epsilon_ms: 100,
            next_turn_delay_ms: 100,
            hyperlink_refresh_delay_ms: 100,
            exit_delay_ms: 750,
            resize_debounce_ms: 1_000,
            slide_number_hide_ms: 7_000,
            slide_number_confirm_hide_ms: 500,
            no_animation_auto_delay_ms: 2_000,
            host_controls_lifecycle: false,
            animation_supported: true,
            can_set_view_scale: false,
            frame_interval_ms: 16,
        }
    }
}

impl SessionOpts {
    pub fn from_json_str(s: &str) -> PlayerResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> PlayerResult<()> {
        if self.frame_interval_ms == 0 {
            return Err(PlayerError::validation("frameIntervalMs must be > 0"));
        }
        if self.max_scene_download_wait_ms == 0 {
            return Err(PlayerError::validation("maxSceneDownloadWaitMs must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/opts.rs"]
mod tests;
