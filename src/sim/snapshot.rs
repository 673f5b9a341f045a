//! Read-only views of the table for the rendering layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use super::state::{FlipperSide, GameState, Planet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Enough to draw a flipper as a capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperSnapshot {
    pub side: FlipperSide,
    pub pivot: Vec2,
    pub tip: Vec2,
    pub width: f32,
    pub color: u32,
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball: BallSnapshot,
    pub flippers: [FlipperSnapshot; 2],
    pub planets: Vec<Planet>,
    pub guides: [Segment; 2],
    pub score: u64,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball: BallSnapshot {
                pos: self.ball.pos,
                vel: self.ball.vel,
                radius: self.ball.radius,
            },
            flippers: self.flippers.each_ref().map(|f| FlipperSnapshot {
                side: f.side,
                pivot: f.pivot,
                tip: f.tip(),
                width: f.width,
                color: f.color,
            }),
            planets: self.planets.clone(),
            guides: self.guides(),
            score: self.score,
        }
    }
}
