//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; the driver
//! passes it by `&mut` into [`super::step`] once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flipper::Flipper;
use super::geometry::Segment;
use crate::consts::PLANET_SCORE;
use crate::tuning::TableTuning;

/// Which flipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

impl FlipperSide {
    pub const BOTH: [FlipperSide; 2] = [FlipperSide::Left, FlipperSide::Right];

    /// Index into [`GameState::flippers`]
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FlipperSide::Left => 0,
            FlipperSide::Right => 1,
        }
    }
}

/// Part of a flipper arm the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipperPart {
    /// Rounded cap at the moving end
    Tip,
    /// Straight body between pivot and tip
    Shaft,
    /// Rounded cap at the fixed pivot
    Pivot,
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Put the ball back at `spawn`, at rest
    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
    }
}

fn default_planet_score() -> u64 {
    PLANET_SCORE
}

/// A round static obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub center: Vec2,
    pub radius: f32,
    /// Points per contact
    #[serde(default = "default_planet_score")]
    pub score: u64,
}

impl Planet {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            score: PLANET_SCORE,
        }
    }
}

/// Something that happened during a frame, for the audio/effects layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FlipperHit {
        side: FlipperSide,
        part: FlipperPart,
        points: u64,
    },
    PlanetHit {
        index: usize,
        points: u64,
    },
    /// Ball fell out of the table; carries the score that was lost
    BallDrained { score: u64 },
}

impl GameEvent {
    /// Whether this event should trigger the collision sound
    pub fn plays_sound(&self) -> bool {
        matches!(self, GameEvent::FlipperHit { .. } | GameEvent::PlanetHit { .. })
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Fixed table description
    pub tuning: TableTuning,
    pub ball: Ball,
    /// Indexed by [`FlipperSide::index`]
    pub flippers: [Flipper; 2],
    pub planets: Vec<Planet>,
    pub score: u64,
    /// Frames stepped so far
    pub frame: u64,
    /// Number of times the ball has drained
    pub drains: u32,
}

impl GameState {
    /// Build a table from tuning. Tuning is assumed valid; loaders validate.
    pub fn new(tuning: TableTuning) -> Self {
        let ball = Ball::new(tuning.ball_start, tuning.ball_radius);
        let flippers = FlipperSide::BOTH.map(|side| Flipper::new(side, tuning.flipper(side)));
        let planets = tuning.planets.clone();
        Self {
            tuning,
            ball,
            flippers,
            planets,
            score: 0,
            frame: 0,
            drains: 0,
        }
    }

    pub fn flipper(&self, side: FlipperSide) -> &Flipper {
        &self.flippers[side.index()]
    }

    pub fn flipper_mut(&mut self, side: FlipperSide) -> &mut Flipper {
        &mut self.flippers[side.index()]
    }

    /// Out-lane guides, derived from the current flipper pivots
    pub fn guides(&self) -> [Segment; 2] {
        let left = self.flipper(FlipperSide::Left).pivot;
        let right = self.flipper(FlipperSide::Right).pivot;
        let guides = &self.tuning.guides;
        let center_y = left.y - guides.pivot_offset;
        let outer_y = center_y - guides.slope;
        let inner_y = center_y + guides.slope;
        [
            Segment::new(Vec2::new(0.0, outer_y), Vec2::new(left.x, inner_y)),
            Segment::new(Vec2::new(right.x, inner_y), Vec2::new(self.tuning.width, outer_y)),
        ]
    }

    /// True once the ball has fallen past the drain line
    pub fn ball_drained(&self) -> bool {
        self.ball.pos.y > self.tuning.height + self.tuning.physics.drain_margin
    }

    /// Respawn the ball and clear the score. Returns the score that was lost.
    pub fn drain(&mut self) -> u64 {
        let lost = self.score;
        self.ball.respawn(self.tuning.ball_spawn);
        self.score = 0;
        self.drains += 1;
        log::info!("Ball drained (drain #{}), score {} lost", self.drains, lost);
        lost
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(TableTuning::default())
    }
}
