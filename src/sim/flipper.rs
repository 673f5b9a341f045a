//! Flipper arm kinematics
//!
//! Each flipper swings between a resting and an active angle at a fixed
//! angular speed. The angle is eased once per frame; within a frame's
//! substeps the arm is treated as frozen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::FlipperSide;
use crate::tuning::FlipperTuning;

/// One actuated flipper arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    pub side: FlipperSide,
    /// Fixed hinge point
    pub pivot: Vec2,
    pub length: f32,
    /// Arm thickness (end caps have radius `width / 2`)
    pub width: f32,
    /// Current angle (radians)
    pub current_angle: f32,
    /// Angle when released (radians)
    pub resting_angle: f32,
    /// Angle when held (radians)
    pub active_angle: f32,
    pub rotation_speed_deg: f32,
    /// Points for a tip hit
    pub base_score: u64,
    /// RGBA, render layer only
    pub color: u32,
}

impl Flipper {
    /// Create a flipper at rest
    pub fn new(side: FlipperSide, tuning: &FlipperTuning) -> Self {
        let resting_angle = tuning.resting_angle_deg.to_radians();
        Self {
            side,
            pivot: tuning.pivot,
            length: tuning.length,
            width: tuning.width,
            current_angle: resting_angle,
            resting_angle,
            active_angle: tuning.active_angle_deg.to_radians(),
            rotation_speed_deg: tuning.rotation_speed_deg,
            base_score: tuning.base_score,
            color: tuning.color,
        }
    }

    /// Radius of the rounded end caps
    #[inline]
    pub fn cap_radius(&self) -> f32 {
        self.width * 0.5
    }

    /// Angle the arm is heading for
    #[inline]
    pub fn target_angle(&self, held: bool) -> f32 {
        if held {
            self.active_angle
        } else {
            self.resting_angle
        }
    }

    /// Swing toward `target` by at most `speed * dt`, never past it
    pub fn move_toward(&mut self, target: f32, dt: f32) {
        let max_delta = (self.rotation_speed_deg.to_radians() * dt).max(0.0);
        let delta = target - self.current_angle;
        if delta.abs() <= max_delta {
            self.current_angle = target;
            return;
        }
        let next = self.current_angle + max_delta.copysign(delta);
        self.current_angle = if delta > 0.0 { next.min(target) } else { next.max(target) };
    }

    /// Ease toward the active or resting angle depending on input
    #[inline]
    pub fn update(&mut self, held: bool, dt: f32) {
        self.move_toward(self.target_angle(held), dt);
    }

    /// Position of the moving end
    #[inline]
    pub fn tip(&self) -> Vec2 {
        self.pivot + Vec2::from_angle(self.current_angle) * self.length
    }

    /// Signed angular speed (rad/s) used for velocity transfer
    ///
    /// Positive once the arm has swung to a larger angle than its rest, else
    /// negative; magnitude is always the full rotation speed.
    pub fn angular_velocity(&self) -> f32 {
        let direction = if self.current_angle - self.resting_angle > 0.0 {
            1.0
        } else {
            -1.0
        };
        direction * self.rotation_speed_deg.to_radians()
    }

    /// Linear velocity of a point rigidly attached to the arm (ω × r)
    #[inline]
    pub fn point_velocity(&self, point: Vec2) -> Vec2 {
        (point - self.pivot).perp() * self.angular_velocity()
    }
}
