pub use kurbo::{Point, Rect, Size};

/// Milliseconds on the player clock.
pub type Millis = u64;

/// Convert script seconds into clock milliseconds, rounding to the nearest tick.
///
/// Negative and non-finite inputs collapse to zero.
pub fn secs_to_millis(secs: f64) -> Millis {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * 1000.0).round() as Millis
}

/// Axis-aligned rectangle in show coordinates, as stored in scripts.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Hit test with the edges snapped down to whole show pixels, both edges inclusive.
    pub fn contains_snapped(self, p: Point) -> bool {
        let left = self.x.floor();
        let top = self.y.floor();
        let right = left + self.width.floor();
        let bottom = top + self.height.floor();
        p.x >= left && p.x <= right && p.y >= top && p.y <= bottom
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
