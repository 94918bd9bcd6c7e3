use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Directed line segment, used for bullet travel paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + (self.end - self.start) * t
    }
}

/// Rectangle with an optional rotation about its own center.
///
/// Layout rectangles (field, barriers, zones) are axis-aligned; robot chassis
/// and armor rectangles carry the chassis heading. All tests are done in the
/// rectangle's local frame, so an unrotated rectangle never picks up
/// trigonometric rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    /// Full extent along the local x and y axes.
    pub size: Vec2,
    /// Counter-clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
}

impl Rect {
    /// Axis-aligned rectangle of `width` x `height` centered at (`x`, `y`).
    pub fn new(width: f32, height: f32, x: f32, y: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
            rotation: 0.0,
        }
    }

    pub fn rotated(self, degrees: f32) -> Self {
        Self {
            rotation: degrees,
            ..self
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Half-diagonal: no point of the rectangle is farther from its center.
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents().length()
    }

    fn axes(&self) -> (Vec2, Vec2) {
        if self.rotation == 0.0 {
            return (Vec2::X, Vec2::Y);
        }
        let ux = Vec2::from_angle(self.rotation.to_radians());
        (ux, ux.perp())
    }

    /// World point expressed in this rectangle's frame.
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        let (ux, uy) = self.axes();
        let d = point - self.center;
        Vec2::new(d.dot(ux), d.dot(uy))
    }

    /// Local point expressed in world coordinates.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        let (ux, uy) = self.axes();
        self.center + ux * local.x + uy * local.y
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extents();
        [
            self.to_world(Vec2::new(-h.x, -h.y)),
            self.to_world(Vec2::new(h.x, -h.y)),
            self.to_world(Vec2::new(h.x, h.y)),
            self.to_world(Vec2::new(-h.x, h.y)),
        ]
    }

    /// Point containment. `strict` excludes the boundary.
    pub fn contains(&self, point: Vec2, strict: bool) -> bool {
        let local = self.to_local(point).abs();
        let h = self.half_extents();
        if strict {
            local.x < h.x && local.y < h.y
        } else {
            local.x <= h.x && local.y <= h.y
        }
    }

    /// True when every corner of `other` lies inside (or on) this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.corners().iter().all(|&c| self.contains(c, false))
    }

    /// Parameter in `[0, 1]` at which `segment` first touches this rectangle,
    /// or `None` if it never does. A segment starting inside returns 0.
    pub fn entry_param(&self, segment: &Segment) -> Option<f32> {
        let p = self.to_local(segment.start);
        let d = self.to_local(segment.end) - p;
        let h = self.half_extents();

        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;
        for (p, d, h) in [(p.x, d.x, h.x), (p.y, d.y, h.y)] {
            if d == 0.0 {
                if p.abs() > h {
                    return None;
                }
                continue;
            }
            let ta = (-h - p) / d;
            let tb = (h - p) / d;
            t_enter = t_enter.max(ta.min(tb));
            t_exit = t_exit.min(ta.max(tb));
            if t_enter > t_exit {
                return None;
            }
        }
        Some(t_enter)
    }

    /// True if any point of `segment` lies on or inside this rectangle.
    pub fn intersects(&self, segment: &Segment) -> bool {
        self.entry_param(segment).is_some()
    }

    /// Separating-axis overlap test between two (possibly rotated) rectangles.
    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (ax, ay) = self.axes();
        let (bx, by) = other.axes();
        let a = self.corners();
        let b = other.corners();
        for axis in [ax, ay, bx, by] {
            let (a_min, a_max) = project(&a, axis);
            let (b_min, b_max) = project(&b, axis);
            if a_max < b_min || b_max < a_min {
                return false;
            }
        }
        true
    }

    /// Reflection used to author team-symmetric layouts from one half.
    ///
    /// `flip_x = true` reflects through the arena center (both axes);
    /// `flip_x = false` reflects across the x axis only.
    pub fn mirror(&self, flip_x: bool) -> Rect {
        let x = if flip_x { -self.center.x } else { self.center.x };
        let rotation = if flip_x { self.rotation } else { -self.rotation };
        Rect {
            center: Vec2::new(x, -self.center.y),
            size: self.size,
            rotation: wrap_degrees(rotation),
        }
    }
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    corners.iter().fold((f32::MAX, f32::MIN), |(lo, hi), c| {
        let v = c.dot(axis);
        (lo.min(v), hi.max(v))
    })
}

/// Point reflected through the arena center.
pub fn mirror_point(point: Vec2) -> Vec2 {
    -point
}

/// Wrap an angle in degrees to `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
