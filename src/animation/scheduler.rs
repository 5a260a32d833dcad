use crate::{animation::ease::Acceleration, foundation::core::Millis, script::model::EffectType};

/// One effect placed on a scene's animation timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectClip {
    pub name: String,
    pub kind: EffectType,
    pub begin: Millis,
    pub duration: Millis,
    pub acceleration: Acceleration,
}

impl EffectClip {
    pub fn end(&self) -> Millis {
        self.begin.saturating_add(self.duration)
    }

    fn progress_at(&self, elapsed: Millis) -> f64 {
        if elapsed < self.begin {
            return 0.0;
        }
        if self.duration == 0 {
            return 1.0;
        }
        ((elapsed - self.begin) as f64 / self.duration as f64).min(1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectProgress {
    pub index: usize,
    /// Linear progress in `[0, 1]`.
    pub linear: f64,
    /// Progress after the effect's acceleration curve.
    pub eased: f64,
    pub complete: bool,
}

/// What one animation frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub elapsed: Millis,
    pub effects: Vec<EffectProgress>,
    /// Effects that crossed their end on this frame. Each effect appears here once.
    pub newly_completed: Vec<usize>,
    pub finished: bool,
}

/// Frame-driven effect timeline.
///
/// Elapsed time accumulates from the deltas between frame timestamps, starting at the timestamp
/// passed to [`AnimationScheduler::start`].
#[derive(Clone, Debug, Default)]
pub struct AnimationScheduler {
    clips: Vec<EffectClip>,
    last_frame: Option<Millis>,
    elapsed: Millis,
    completed: Vec<bool>,
}

impl AnimationScheduler {
    pub fn new(clips: Vec<EffectClip>) -> Self {
        let completed = vec![false; clips.len()];
        Self {
            clips,
            last_frame: None,
            elapsed: 0,
            completed,
        }
    }

    pub fn clips(&self) -> &[EffectClip] {
        &self.clips
    }

    pub fn is_running(&self) -> bool {
        self.last_frame.is_some() && !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.completed.iter().all(|&c| c)
    }

    pub fn elapsed(&self) -> Millis {
        self.elapsed
    }

    /// End of the latest effect relative to the animation start.
    pub fn overall_end(&self) -> Millis {
        self.clips.iter().map(EffectClip::end).max().unwrap_or(0)
    }

    pub fn start(&mut self, now: Millis) {
        self.last_frame = Some(now);
        self.elapsed = 0;
        self.completed.iter_mut().for_each(|c| *c = false);
    }

    /// Advance to the frame timestamp `now` and sample every effect.
    pub fn frame(&mut self, now: Millis) -> FrameReport {
        let Some(last) = self.last_frame else {
            return FrameReport::default();
        };
        self.elapsed = self.elapsed.saturating_add(now.saturating_sub(last));
        self.last_frame = Some(now.max(last));

        let mut report = FrameReport {
            elapsed: self.elapsed,
            ..FrameReport::default()
        };
        for (index, clip) in self.clips.iter().enumerate() {
            let linear = clip.progress_at(self.elapsed);
            let complete = self.elapsed >= clip.end();
            if complete && !self.completed[index] {
                self.completed[index] = true;
                report.newly_completed.push(index);
            }
            report.effects.push(EffectProgress {
                index,
                linear,
                eased: clip.acceleration.apply(linear),
                complete,
            });
        }
        report.finished = self.is_finished();
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
