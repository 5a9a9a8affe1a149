use glam::Vec2;

/// Immutable screen-space coordinate pair.
/// Produced by surfaces when a node reports where it is, consumed by movements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// A new position shifted by (dx, dy). The receiver is left untouched.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vec2 {
    fn from(p: Position) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Linear interpolation between two positions, each axis independently.
/// `progress` is clamped to [0, 1] so the result never leaves the segment.
#[inline]
pub fn interpolate(start: Position, end: Position, progress: f32) -> Position {
    let t = progress.clamp(0.0, 1.0);
    let (a, b) = (Vec2::from(start), Vec2::from(end));
    (a + (b - a) * t).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let a = Position::new(10.0, -4.0);
        let b = Position::new(110.0, 96.0);
        assert_eq!(interpolate(a, b, 0.0), a);
        assert_eq!(interpolate(a, b, 1.0), b);
    }

    #[test]
    fn halfway_is_midpoint() {
        let p = interpolate(Position::new(0.0, 100.0), Position::new(100.0, 0.0), 0.5);
        assert!((p.x() - 50.0).abs() < 0.001);
        assert!((p.y() - 50.0).abs() < 0.001);
    }

    #[test]
    fn monotonic_per_axis() {
        let a = Position::new(0.0, 300.0);
        let b = Position::new(200.0, 20.0);
        let mut prev = a;
        for step in 1..=20 {
            let p = interpolate(a, b, step as f32 / 20.0);
            assert!(p.x() >= prev.x(), "x went backwards at step {}", step);
            assert!(p.y() <= prev.y(), "y went backwards at step {}", step);
            prev = p;
        }
    }

    #[test]
    fn progress_is_clamped() {
        let a = Position::new(1.0, 1.0);
        let b = Position::new(2.0, 2.0);
        assert_eq!(interpolate(a, b, -3.0), a);
        assert_eq!(interpolate(a, b, 7.5), b);
    }

    #[test]
    fn offset_does_not_mutate() {
        let p = Position::new(5.0, 50.0);
        let above = p.offset(0.0, -20.0);
        assert_eq!(above, Position::new(5.0, 30.0));
        assert_eq!(p, Position::new(5.0, 50.0));
    }
}
