//! Demo autopilot
//!
//! Plays the table without a human: flips when the ball is dropping onto an
//! arm, plus the occasional stray flip. Seeded, so a given seed always plays
//! the same game.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{FlipperSide, GameState};
use super::tick::FrameInput;

/// Frames a flipper stays up once triggered
pub const HOLD_FRAMES: u32 = 10;
/// How close (to the arm's midpoint) the ball must be to trigger a flip
pub const TRIGGER_RADIUS: f32 = 70.0;
/// Per-frame chance of a flip for no reason
pub const STRAY_FLIP_CHANCE: f64 = 0.01;

pub struct Autopilot {
    rng: Pcg32,
    /// Remaining hold frames, indexed by [`FlipperSide::index`]
    hold: [u32; 2],
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            hold: [0; 2],
        }
    }

    /// Decide this frame's buttons from the current table
    pub fn next_input(&mut self, state: &GameState) -> FrameInput {
        let ball = &state.ball;
        let falling = ball.vel.y > 0.0;
        let mut input = FrameInput::default();

        for side in FlipperSide::BOTH {
            let flipper = state.flipper(side);
            let mid = (flipper.pivot + flipper.tip()) * 0.5;
            let incoming = falling
                && ball.pos.y < flipper.pivot.y + flipper.width
                && ball.pos.distance(mid) < TRIGGER_RADIUS;

            let hold = &mut self.hold[side.index()];
            if incoming || self.rng.random_bool(STRAY_FLIP_CHANCE) {
                *hold = HOLD_FRAMES;
            }
            let held = *hold > 0;
            *hold = hold.saturating_sub(1);

            match side {
                FlipperSide::Left => input.left = held,
                FlipperSide::Right => input.right = held,
            }
        }

        input
    }
}
