//! Pinball simulation module
//!
//! All gameplay logic lives here. This module has no rendering, audio or
//! platform dependencies:
//! - Caller-supplied frame time, split into fixed substeps
//! - Stable iteration order (left flipper, right flipper, planets in list order)
//! - Numerical degeneracies guarded, never reported as errors

pub mod autoplay;
pub mod collision;
pub mod flipper;
pub mod geometry;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autoplay::Autopilot;
pub use collision::{
    FlipperContact, find_flipper_contact, reflect, reflect_velocity, resolve_flipper_contact,
    resolve_planet, resolve_walls, separate_circle_from_segment,
};
pub use flipper::Flipper;
pub use geometry::{Segment, circle_segment_collision, closest_point_on_segment, rotate_point};
pub use snapshot::{BallSnapshot, FlipperSnapshot, Snapshot};
pub use state::{Ball, FlipperPart, FlipperSide, GameEvent, GameState, Planet};
pub use tick::{FrameInput, FrameOutput, step, substep};
