//! Plain 2D geometry helpers shared by the collision code

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Segments shorter than this (squared) are treated as a single point
pub const DEGENERATE_SEGMENT_SQ: f32 = 1e-8;

/// A closed line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `point`, with its parameter in [0, 1]
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> (Vec2, f32) {
        closest_point_on_segment(self.start, self.end, point)
    }

    /// Distance from `point` to the segment
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let (closest, _) = self.closest_point(point);
        point.distance(closest)
    }

    /// Unit direction from start to end (zero for a degenerate segment)
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// Rotate `point` about `pivot` by `angle` radians
#[inline]
pub fn rotate_point(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}

/// Project `point` onto the segment `start..end`
///
/// Returns the closest point and the clamped projection parameter `t`.
/// A degenerate segment yields `(start, 0.0)`.
pub fn closest_point_on_segment(start: Vec2, end: Vec2, point: Vec2) -> (Vec2, f32) {
    let dir = end - start;
    let len_sq = dir.length_squared();

    let t = if len_sq > DEGENERATE_SEGMENT_SQ {
        ((point - start).dot(dir) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (start + dir * t, t)
}

/// True if a circle touches or overlaps the segment
pub fn circle_segment_collision(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let (closest, _) = closest_point_on_segment(start, end, center);
    center.distance_squared(closest) <= radius * radius
}
