//! Collision detection and response
//!
//! The ball is a circle. Everything it can touch is a circle (planets,
//! flipper caps), a segment (guides, flipper shafts) or an axis-aligned wall.
//! Every resolver leaves the ball non-penetrating; near-zero distances fall
//! back to a fixed normal instead of dividing by zero.

use glam::Vec2;

use super::flipper::Flipper;
use super::geometry::{Segment, circle_segment_collision, closest_point_on_segment};
use super::state::{Ball, FlipperPart, Planet};
use crate::tuning::PhysicsTuning;

/// Distances below this are too small to derive a normal from
pub const MIN_NORMAL_DISTANCE: f32 = 1e-5;

/// Screen-up, used when no better normal is available
const UP: Vec2 = Vec2::NEG_Y;

/// Unit vector along `delta`, or `fallback` when `delta` is (nearly) zero
#[inline]
pub fn unit_normal(delta: Vec2, fallback: Vec2) -> Vec2 {
    let dist = delta.length();
    if dist < MIN_NORMAL_DISTANCE {
        fallback
    } else {
        delta / dist
    }
}

/// Perpendicular of a segment, preferring the side that faces screen-up
fn segment_normal(segment: &Segment) -> Vec2 {
    let perp = segment.direction().perp();
    if perp == Vec2::ZERO {
        UP
    } else if perp.dot(UP) < 0.0 {
        -perp
    } else {
        perp
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect the ball's velocity about a unit normal and damp it by `bounce`
pub fn reflect_velocity(ball: &mut Ball, normal: Vec2, bounce: f32) {
    ball.vel = reflect(ball.vel, normal) * bounce;
}

/// Push the ball out of a segment without touching its velocity
///
/// Returns true if the ball was moved.
pub fn separate_circle_from_segment(ball: &mut Ball, segment: &Segment) -> bool {
    let (closest, _) = segment.closest_point(ball.pos);
    let delta = ball.pos - closest;
    if delta.length() >= ball.radius {
        return false;
    }
    let normal = unit_normal(delta, segment_normal(segment));
    ball.pos = closest + normal * ball.radius;
    true
}

/// Keep the ball inside the left, right and top edges of the table
///
/// There is no floor; falling out the bottom is a drain.
pub fn resolve_walls(ball: &mut Ball, width: f32, bounce: f32) {
    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x *= -bounce;
    }
    if ball.pos.x + ball.radius > width {
        ball.pos.x = width - ball.radius;
        ball.vel.x *= -bounce;
    }
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y *= -bounce;
    }
}

/// Bounce the ball off a planet. Returns true on contact.
///
/// A ball centered exactly on the planet has no usable normal and is left alone.
pub fn resolve_planet(ball: &mut Ball, planet: &Planet, bounce: f32) -> bool {
    let delta = ball.pos - planet.center;
    let dist = delta.length();
    let min_dist = ball.radius + planet.radius;
    if dist >= min_dist || dist <= MIN_NORMAL_DISTANCE {
        return false;
    }
    let normal = delta / dist;
    reflect_velocity(ball, normal, bounce);
    ball.pos = planet.center + normal * min_dist;
    true
}

/// A ball/flipper overlap, ready to be resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipperContact {
    pub part: FlipperPart,
    /// Point on the arm's center line the ball is pushed away from
    pub point: Vec2,
    /// Unit normal from `point` toward the ball
    pub normal: Vec2,
    /// Distance from `point` to the ball center once resolved
    pub reach: f32,
    /// Position along the shaft (0 at the pivot, 1 at the tip)
    pub t: f32,
}

fn cap_contact(
    part: FlipperPart,
    center: Vec2,
    ball: &Ball,
    cap_radius: f32,
    fallback: Vec2,
) -> Option<FlipperContact> {
    let delta = ball.pos - center;
    let reach = ball.radius + cap_radius;
    if delta.length() >= reach {
        return None;
    }
    Some(FlipperContact {
        part,
        point: center,
        normal: unit_normal(delta, fallback),
        reach,
        t: if part == FlipperPart::Tip { 1.0 } else { 0.0 },
    })
}

fn tip_contact(flipper: &Flipper, ball: &Ball) -> Option<FlipperContact> {
    let tip = flipper.tip();
    let along_arm = unit_normal(tip - flipper.pivot, UP);
    cap_contact(FlipperPart::Tip, tip, ball, flipper.cap_radius(), along_arm)
}

fn shaft_contact(flipper: &Flipper, ball: &Ball) -> Option<FlipperContact> {
    let shaft = Segment::new(flipper.pivot, flipper.tip());
    if !circle_segment_collision(shaft.start, shaft.end, ball.pos, ball.radius) {
        return None;
    }
    let (closest, t) = closest_point_on_segment(shaft.start, shaft.end, ball.pos);
    Some(FlipperContact {
        part: FlipperPart::Shaft,
        point: closest,
        normal: unit_normal(ball.pos - closest, segment_normal(&shaft)),
        reach: ball.radius,
        t,
    })
}

fn pivot_contact(flipper: &Flipper, ball: &Ball) -> Option<FlipperContact> {
    let away_from_arm = unit_normal(flipper.pivot - flipper.tip(), UP);
    cap_contact(
        FlipperPart::Pivot,
        flipper.pivot,
        ball,
        flipper.cap_radius(),
        away_from_arm,
    )
}

/// First contact between the ball and a flipper: tip cap, then shaft, then pivot cap
pub fn find_flipper_contact(flipper: &Flipper, ball: &Ball) -> Option<FlipperContact> {
    tip_contact(flipper, ball)
        .or_else(|| shaft_contact(flipper, ball))
        .or_else(|| pivot_contact(flipper, ball))
}

/// Points a contact is worth on a flipper with the given base score
pub fn flipper_contact_points(contact: &FlipperContact, base_score: u64) -> u64 {
    match contact.part {
        FlipperPart::Tip => base_score,
        // Truncated: half value at the pivot end, full at the tip
        FlipperPart::Shaft => (base_score as f32 * (0.5 + contact.t * 0.5)) as u64,
        FlipperPart::Pivot => base_score / 2,
    }
}

/// Apply a flipper contact to the ball and return the points earned
///
/// A held flipper kicks the ball along the normal and hands over part of its
/// surface velocity at the contact point; a released flipper just bounces it.
/// Either way the ball ends up exactly `reach` away from the contact point.
pub fn resolve_flipper_contact(
    ball: &mut Ball,
    flipper: &Flipper,
    contact: &FlipperContact,
    held: bool,
    physics: &PhysicsTuning,
    dt: f32,
) -> u64 {
    if held {
        ball.vel += contact.normal * physics.flipper_impulse * dt;
        ball.vel += flipper.point_velocity(contact.point) * physics.flipper_velocity_transfer;
    } else {
        reflect_velocity(ball, contact.normal, physics.flipper_bounce);
    }
    ball.pos = contact.point + contact.normal * contact.reach;
    flipper_contact_points(contact, flipper.base_score)
}
