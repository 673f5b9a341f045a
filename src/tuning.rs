//! Data-driven table layout and physics constants
//!
//! Everything the simulation treats as fixed lives here: gravity, bounce
//! factors, substep count, flipper geometry and the planet layout. Tuning is
//! read once at startup and never changes while a table is running.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::state::{FlipperSide, Planet};

/// Environment variable naming a tuning JSON file
pub const TUNING_ENV_VAR: &str = "SPACE_PINBALL_TUNING";
/// Fallback tuning path, relative to the working directory
pub const DEFAULT_TUNING_PATH: &str = "config/table.json";

/// Errors raised while loading or checking tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Numeric tuning for the integrator and the collision response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    pub wall_bounce: f32,
    pub planet_bounce: f32,
    pub flipper_bounce: f32,
    /// Push along the contact normal while a flipper is held
    pub flipper_impulse: f32,
    /// Fraction of the flipper surface velocity handed to the ball
    pub flipper_velocity_transfer: f32,
    /// Equal slices each frame is divided into
    pub substeps: u32,
    /// Upper bound on a single frame's integrated time (seconds)
    pub max_frame_time: f32,
    /// Distance below the playfield at which the ball drains
    pub drain_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_ACCELERATION,
            wall_bounce: WALL_BOUNCE_FACTOR,
            planet_bounce: PLANET_BOUNCE_FACTOR,
            flipper_bounce: FLIPPER_BOUNCE_FACTOR,
            flipper_impulse: FLIPPER_IMPULSE_STRENGTH,
            flipper_velocity_transfer: FLIPPER_VELOCITY_TRANSFER,
            substeps: PHYSICS_SUBSTEPS,
            max_frame_time: MAX_FRAME_TIME,
            drain_margin: DRAIN_MARGIN,
        }
    }
}

/// Geometry and scoring of one flipper arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperTuning {
    pub pivot: Vec2,
    pub length: f32,
    /// Arm thickness; the end caps have radius `width / 2`
    pub width: f32,
    pub resting_angle_deg: f32,
    pub active_angle_deg: f32,
    pub rotation_speed_deg: f32,
    /// Points for a tip hit (shaft hits scale down toward the pivot)
    pub base_score: u64,
    /// RGBA, for the renderer only
    pub color: u32,
}

impl FlipperTuning {
    /// Reference flipper for a side of a `width` x `height` table
    pub fn reference(side: FlipperSide, width: f32, height: f32) -> Self {
        let (pivot_x, resting, active, base_score) = match side {
            FlipperSide::Left => (width / 2.0 - FLIPPER_PIVOT_INSET, 15.0, -45.0, 10),
            FlipperSide::Right => (width / 2.0 + FLIPPER_PIVOT_INSET, 165.0, 225.0, 15),
        };
        Self {
            pivot: Vec2::new(pivot_x, height - FLIPPER_PIVOT_RISE),
            length: FLIPPER_LENGTH,
            width: FLIPPER_WIDTH,
            resting_angle_deg: resting,
            active_angle_deg: active,
            rotation_speed_deg: FLIPPER_SPEED_DEG,
            base_score,
            color: FLIPPER_COLOR,
        }
    }
}

/// Placement of the two out-lane guides relative to the flipper pivots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideTuning {
    /// Guide center line sits this far above the left pivot
    pub pivot_offset: f32,
    /// Vertical rise from the inner to the outer end of each guide, halved
    pub slope: f32,
}

impl Default for GuideTuning {
    fn default() -> Self {
        Self {
            pivot_offset: GUIDE_PIVOT_OFFSET,
            slope: GUIDE_SLOPE,
        }
    }
}

/// Complete table description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableTuning {
    pub width: f32,
    pub height: f32,
    pub ball_radius: f32,
    /// Where the ball sits when the table is first created
    pub ball_start: Vec2,
    /// Where the ball reappears after draining
    pub ball_spawn: Vec2,
    pub physics: PhysicsTuning,
    pub guides: GuideTuning,
    pub left_flipper: FlipperTuning,
    pub right_flipper: FlipperTuning,
    pub planets: Vec<Planet>,
}

impl Default for TableTuning {
    fn default() -> Self {
        let planet = |x: f32, y: f32, radius: f32| Planet::new(Vec2::new(x, y), radius);
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            ball_radius: BALL_RADIUS,
            ball_start: Vec2::new(BALL_START.0, BALL_START.1),
            ball_spawn: Vec2::new(BALL_SPAWN.0, BALL_SPAWN.1),
            physics: PhysicsTuning::default(),
            guides: GuideTuning::default(),
            left_flipper: FlipperTuning::reference(FlipperSide::Left, SCREEN_WIDTH, SCREEN_HEIGHT),
            right_flipper: FlipperTuning::reference(
                FlipperSide::Right,
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
            ),
            planets: vec![
                planet(270.0, 320.0, 85.0), // earth
                planet(480.0, 120.0, 55.0), // mars
                planet(90.0, 120.0, 75.0),  // jupiter
                planet(480.0, 320.0, 48.0), // neptune
                planet(65.0, 470.0, 52.0),  // uranus
                planet(500.0, 500.0, 50.0), // venus
            ],
        }
    }
}

impl TableTuning {
    /// Flipper tuning for a side
    pub fn flipper(&self, side: FlipperSide) -> &FlipperTuning {
        match side {
            FlipperSide::Left => &self.left_flipper,
            FlipperSide::Right => &self.right_flipper,
        }
    }

    /// Parse and validate tuning from JSON. Missing fields take reference values.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load tuning from `SPACE_PINBALL_TUNING` or `config/table.json`,
    /// falling back to the reference table if neither yields valid tuning.
    pub fn load() -> Self {
        let path = std::env::var(TUNING_ENV_VAR).unwrap_or_else(|_| DEFAULT_TUNING_PATH.to_string());
        if !Path::new(&path).exists() {
            log::info!("No tuning file at {path}, using reference table");
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path} ({} planets)", tuning.planets.len());
                tuning
            }
            Err(e) => {
                log::warn!("{e}, using reference table");
                Self::default()
            }
        }
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(name: &str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }
        fn bounce(name: &str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!("{name} must be in (0, 1], got {value}")))
            }
        }
        fn finite(name: &str, v: Vec2) -> Result<(), TuningError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!("{name} must be finite, got {v}")))
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("ball_radius", self.ball_radius)?;
        finite("ball_start", self.ball_start)?;
        finite("ball_spawn", self.ball_spawn)?;

        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(TuningError::Invalid("gravity must be finite".into()));
        }
        bounce("wall_bounce", physics.wall_bounce)?;
        bounce("planet_bounce", physics.planet_bounce)?;
        bounce("flipper_bounce", physics.flipper_bounce)?;
        if !(physics.flipper_impulse.is_finite() && physics.flipper_velocity_transfer.is_finite())
        {
            return Err(TuningError::Invalid("flipper impulse and transfer must be finite".into()));
        }
        if physics.substeps == 0 {
            return Err(TuningError::Invalid("substeps must be at least 1".into()));
        }
        positive("max_frame_time", physics.max_frame_time)?;
        positive("drain_margin", physics.drain_margin)?;

        for side in [FlipperSide::Left, FlipperSide::Right] {
            let flipper = self.flipper(side);
            finite("flipper pivot", flipper.pivot)?;
            positive("flipper length", flipper.length)?;
            positive("flipper width", flipper.width)?;
            positive("flipper rotation_speed_deg", flipper.rotation_speed_deg)?;
            if !(flipper.resting_angle_deg.is_finite() && flipper.active_angle_deg.is_finite()) {
                return Err(TuningError::Invalid(format!("{side:?} flipper angles must be finite")));
            }
        }

        for (i, planet) in self.planets.iter().enumerate() {
            finite("planet center", planet.center)?;
            positive(&format!("planet {i} radius"), planet.radius)?;
        }

        Ok(())
    }
}
