//! Space Pinball - physics and collision core for a pinball table
//!
//! Core modules:
//! - `sim`: Simulation (ball dynamics, flipper kinematics, collisions, scoring)
//! - `tuning`: Data-driven table layout and physics constants
//!
//! Rendering, audio and input polling live outside this crate. They drive
//! [`sim::step`] once per frame and read back the returned snapshot.

pub mod sim;
pub mod tuning;

pub use sim::{FrameInput, FrameOutput, GameState, Snapshot, step};
pub use tuning::{PhysicsTuning, TableTuning, TuningError};

/// Game configuration constants (reference table)
pub mod consts {
    /// Playfield dimensions in pixels
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 900.0;

    /// Physics substeps per rendered frame
    pub const PHYSICS_SUBSTEPS: u32 = 6;
    /// Longest frame the driver will integrate in one go (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY_ACCELERATION: f32 = 1200.0;
    pub const WALL_BOUNCE_FACTOR: f32 = 0.7;
    pub const PLANET_BOUNCE_FACTOR: f32 = 0.85;
    pub const FLIPPER_BOUNCE_FACTOR: f32 = 0.90;
    /// Push along the contact normal while a flipper is held (pixels/s per second of contact)
    pub const FLIPPER_IMPULSE_STRENGTH: f32 = 280.0;
    /// Fraction of the flipper's contact-point velocity handed to the ball
    pub const FLIPPER_VELOCITY_TRANSFER: f32 = 0.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 14.0;
    pub const BALL_START: (f32, f32) = (460.0, 450.0);
    pub const BALL_SPAWN: (f32, f32) = (300.0, 450.0);
    /// How far below the bottom edge the ball may fall before it drains
    pub const DRAIN_MARGIN: f32 = 100.0;

    /// Flipper defaults
    pub const FLIPPER_LENGTH: f32 = 80.0;
    pub const FLIPPER_WIDTH: f32 = 15.0;
    pub const FLIPPER_PIVOT_INSET: f32 = 100.0; // from screen center
    pub const FLIPPER_PIVOT_RISE: f32 = 150.0; // from screen bottom
    pub const FLIPPER_SPEED_DEG: f32 = 480.0;
    pub const FLIPPER_COLOR: u32 = 0xC8C8C8FF; // light gray

    /// Guide lanes sit this far above the flipper pivots
    pub const GUIDE_PIVOT_OFFSET: f32 = 35.0;
    pub const GUIDE_SLOPE: f32 = 20.0;

    /// Points per planet contact
    pub const PLANET_SCORE: u64 = 5;
}
