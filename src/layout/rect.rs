//! Occupied area of a laid-out expression.

use glam::{DVec2, dvec2};

/// Running extent of everything emitted at one nesting level.
///
/// Coordinates are in pixels with y growing downward, relative to the
/// baseline origin of the level. The rectangle only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Upper edge of the most recent extension, used to place superscripts
    pub last_y1: f64,
}

impl BoundingRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        BoundingRect {
            x1,
            y1,
            x2,
            y2,
            last_y1: y1,
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn min(&self) -> DVec2 {
        dvec2(self.x1, self.y1)
    }

    pub fn max(&self) -> DVec2 {
        dvec2(self.x2, self.y2)
    }

    /// Merge another extent into this one.
    pub fn extend(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.x1 = self.x1.min(x1);
        self.y1 = self.y1.min(y1);
        self.x2 = self.x2.max(x2);
        self.y2 = self.y2.max(y2);
        self.last_y1 = y1;
    }

    pub fn shift(&mut self, by: DVec2) {
        self.x1 += by.x;
        self.x2 += by.x;
        self.y1 += by.y;
        self.y2 += by.y;
    }
}

/// Extend an optional rectangle, creating it on first use.
pub(crate) fn extend_or_init(rect: &mut Option<BoundingRect>, x1: f64, y1: f64, x2: f64, y2: f64) {
    match rect {
        Some(r) => r.extend(x1, y1, x2, y2),
        None => *rect = Some(BoundingRect::new(x1, y1, x2, y2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_only_grows() {
        let mut r = BoundingRect::new(0.0, -10.0, 5.0, 2.0);
        r.extend(1.0, -4.0, 3.0, 1.0);
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (0.0, -10.0, 5.0, 2.0));
        assert_eq!(r.last_y1, -4.0);

        r.extend(-2.0, -12.0, 9.0, 3.0);
        assert_eq!(r.width(), 11.0);
        assert_eq!(r.height(), 15.0);
    }

    #[test]
    fn shift_moves_both_corners() {
        let mut r = BoundingRect::new(0.0, 0.0, 2.0, 3.0);
        r.shift(dvec2(1.0, -1.0));
        assert_eq!(r.min(), dvec2(1.0, -1.0));
        assert_eq!(r.max(), dvec2(3.0, 2.0));
        assert_eq!(r.last_y1, 0.0);
    }

    #[test]
    fn first_extension_creates_rect() {
        let mut rect = None;
        extend_or_init(&mut rect, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect, Some(BoundingRect::new(1.0, 2.0, 3.0, 4.0)));
    }
}
