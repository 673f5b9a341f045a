//! Per-frame simulation driver
//!
//! A frame eases the flippers once, then splits its elapsed time into a
//! fixed number of equal substeps. Each substep integrates gravity and runs
//! every collision resolver against the ball.

use serde::{Deserialize, Serialize};

use super::collision::{
    find_flipper_contact, resolve_flipper_contact, resolve_planet, resolve_walls,
    separate_circle_from_segment,
};
use super::snapshot::Snapshot;
use super::state::{FlipperSide, GameEvent, GameState};

/// Input for a single frame (sampled once by the frontend)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Left flipper button held
    pub left: bool,
    /// Right flipper button held
    pub right: bool,
}

impl FrameInput {
    pub fn held(&self, side: FlipperSide) -> bool {
        match side {
            FlipperSide::Left => self.left,
            FlipperSide::Right => self.right,
        }
    }
}

/// What a frame produced
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub snapshot: Snapshot,
    /// At most one collision cue per frame, however many contacts happened
    pub play_sound: bool,
    /// Contacts and drains, in the order they were resolved
    pub events: Vec<GameEvent>,
}

/// Usable frame time: non-finite or negative becomes 0, long stalls are capped
fn sanitize_frame_time(frame_time: f32, max_frame_time: f32) -> f32 {
    if frame_time.is_finite() && frame_time > 0.0 {
        frame_time.min(max_frame_time)
    } else {
        0.0
    }
}

/// Advance the table by one rendered frame
pub fn step(state: &mut GameState, input: &FrameInput, frame_time: f32) -> FrameOutput {
    let frame_time = sanitize_frame_time(frame_time, state.tuning.physics.max_frame_time);

    // Flippers move once per frame; substeps see them frozen
    for side in FlipperSide::BOTH {
        state.flipper_mut(side).update(input.held(side), frame_time);
    }

    let substeps = state.tuning.physics.substeps.max(1);
    let dt = frame_time / substeps as f32;
    let mut events = Vec::new();
    for _ in 0..substeps {
        substep(state, input, dt, &mut events);
    }

    state.frame += 1;
    let play_sound = events.iter().any(GameEvent::plays_sound);
    FrameOutput {
        snapshot: state.snapshot(),
        play_sound,
        events,
    }
}

/// One fixed slice of a frame: integrate, then resolve every contact
pub fn substep(state: &mut GameState, input: &FrameInput, dt: f32, events: &mut Vec<GameEvent>) {
    let physics = &state.tuning.physics;

    // Explicit Euler
    let ball = &mut state.ball;
    ball.vel.y += physics.gravity * dt;
    ball.pos += ball.vel * dt;

    resolve_walls(ball, state.tuning.width, physics.wall_bounce);

    if state.ball_drained() {
        let score = state.drain();
        events.push(GameEvent::BallDrained { score });
    }

    // Guides only separate; the ball slides along them
    for guide in state.guides() {
        separate_circle_from_segment(&mut state.ball, &guide);
    }

    for side in FlipperSide::BOTH {
        let flipper = &state.flippers[side.index()];
        let Some(contact) = find_flipper_contact(flipper, &state.ball) else {
            continue;
        };
        let points = resolve_flipper_contact(
            &mut state.ball,
            flipper,
            &contact,
            input.held(side),
            &state.tuning.physics,
            dt,
        );
        state.score += points;
        events.push(GameEvent::FlipperHit {
            side,
            part: contact.part,
            points,
        });
    }

    // Every planet is checked; overlapping contacts resolve in list order
    let bounce = state.tuning.physics.planet_bounce;
    for (index, planet) in state.planets.iter().enumerate() {
        if resolve_planet(&mut state.ball, planet, bounce) {
            state.score += planet.score;
            events.push(GameEvent::PlanetHit {
                index,
                points: planet.score,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FlipperPart, Planet};
    use crate::tuning::TableTuning;
    use glam::Vec2;

    const FRAME: f32 = 1.0 / 60.0;

    fn substep_dt(state: &GameState) -> f32 {
        FRAME / state.tuning.physics.substeps as f32
    }

    fn run_substep(state: &mut GameState, input: FrameInput) -> Vec<GameEvent> {
        let dt = substep_dt(state);
        let mut events = Vec::new();
        substep(state, &input, dt, &mut events);
        events
    }

    #[test]
    fn test_idle_frame_has_no_sound() {
        let mut state = GameState::default();
        state.ball.pos = Vec2::new(300.0, 600.0);
        let out = step(&mut state, &FrameInput::default(), FRAME);
        assert!(!out.play_sound);
        assert!(out.events.is_empty());
        assert_eq!(state.frame, 1);
        // Gravity pulled the ball down
        assert!(out.snapshot.ball.vel.y > 0.0);
        assert!(out.snapshot.ball.pos.y > 600.0);
    }

    #[test]
    fn test_ball_falls_onto_planet_and_rebounds() {
        let tuning = TableTuning {
            ball_start: Vec2::new(300.0, 100.0),
            planets: vec![Planet::new(Vec2::new(300.0, 300.0), 50.0)],
            ..Default::default()
        };
        let gravity = tuning.physics.gravity;
        let mut state = GameState::new(tuning);

        let mut hit = None;
        for _ in 0..120 {
            let speed_before = state.ball.vel.length();
            let out = step(&mut state, &FrameInput::default(), FRAME);
            if state.score > 0 {
                hit = Some((speed_before, out));
                break;
            }
        }
        let (speed_before, out) = hit.expect("ball never reached the planet");

        assert_eq!(state.score, 5);
        assert!(out.play_sound);
        assert_eq!(out.events, vec![GameEvent::PlanetHit { index: 0, points: 5 }]);

        // Straight back up, slower than it arrived
        let ball = &state.ball;
        assert!(ball.vel.y < 0.0);
        assert!(ball.vel.x.abs() < 1e-3);
        let incoming_max = speed_before + gravity * FRAME;
        assert!(ball.vel.length() <= 0.85 * incoming_max + 1e-2);
        assert!(ball.pos.distance(Vec2::new(300.0, 300.0)) >= 64.0 - 1e-3);
    }

    #[test]
    fn test_drain_respawns_and_clears_score() {
        let mut state = GameState::default();
        state.score = 42;
        state.ball.pos = Vec2::new(120.0, 1050.0);
        state.ball.vel = Vec2::new(30.0, 500.0);

        let events = run_substep(&mut state, FrameInput::default());
        assert_eq!(events, vec![GameEvent::BallDrained { score: 42 }]);
        assert_eq!(state.ball.pos, Vec2::new(300.0, 450.0));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.score, 0);
        assert_eq!(state.drains, 1);
    }

    #[test]
    fn test_drain_within_a_frame() {
        let mut state = GameState::default();
        state.score = 900;
        state.ball.pos = Vec2::new(300.0, 1050.0);

        let out = step(&mut state, &FrameInput::default(), FRAME);
        assert_eq!(out.snapshot.score, 0);
        assert!(!out.play_sound);
        assert_eq!(out.events, vec![GameEvent::BallDrained { score: 900 }]);
        // Remaining substeps of the frame keep integrating from the spawn point
        assert!(out.snapshot.ball.pos.distance(Vec2::new(300.0, 450.0)) < 1.0);
    }

    #[test]
    fn test_ball_above_drain_line_stays() {
        let mut state = GameState::default();
        state.score = 7;
        state.ball.pos = Vec2::new(300.0, 990.0);
        run_substep(&mut state, FrameInput::default());
        assert_eq!(state.score, 7);
        assert!(state.ball.pos.y > 990.0);
    }

    fn ball_on_tip(state: &mut GameState, side: FlipperSide) -> Vec2 {
        let flipper = state.flipper_mut(side);
        flipper.current_angle = flipper.active_angle;
        let tip = flipper.tip();
        state.ball.pos = tip + Vec2::new(0.0, -20.0);
        state.ball.vel = Vec2::ZERO;
        tip
    }

    fn check_tip_kick(side: FlipperSide, input: FrameInput, base_score: u64) {
        let mut state = GameState::default();
        let tip = ball_on_tip(&mut state, side);
        let dt = substep_dt(&state);
        let physics = state.tuning.physics.clone();
        let flipper = state.flipper(side).clone();

        let events = run_substep(&mut state, input);

        assert_eq!(state.score, base_score);
        assert_eq!(
            events,
            vec![GameEvent::FlipperHit {
                side,
                part: FlipperPart::Tip,
                points: base_score
            }]
        );

        // Gravity, then a kick along the outward normal, then the arm's surface velocity
        let normal = Vec2::NEG_Y;
        let transfer = flipper.point_velocity(tip) * physics.flipper_velocity_transfer;
        let expected = Vec2::new(0.0, physics.gravity * dt) + normal * physics.flipper_impulse * dt + transfer;
        assert!((state.ball.vel - expected).length() < 1e-3);
        assert!(transfer.length() > 100.0);
        assert!(state.ball.vel.y < 0.0);

        // Parked exactly on the cap surface
        let reach = state.ball.radius + flipper.cap_radius();
        assert!((state.ball.pos.distance(tip) - reach).abs() < 1e-3);
    }

    #[test]
    fn test_held_right_flipper_kicks_from_tip() {
        check_tip_kick(FlipperSide::Right, FrameInput { left: false, right: true }, 15);
    }

    #[test]
    fn test_held_left_flipper_kicks_from_tip() {
        check_tip_kick(FlipperSide::Left, FrameInput { left: true, right: false }, 10);
    }

    #[test]
    fn test_transfer_points_away_from_table_center() {
        let mut state = GameState::default();
        ball_on_tip(&mut state, FlipperSide::Right);
        run_substep(&mut state, FrameInput { left: false, right: true });
        // Right flipper swings counter-clockwise on screen: ball goes up and right
        assert!(state.ball.vel.x > 0.0);

        let mut state = GameState::default();
        ball_on_tip(&mut state, FlipperSide::Left);
        run_substep(&mut state, FrameInput { left: true, right: false });
        assert!(state.ball.vel.x < 0.0);
    }

    #[test]
    fn test_released_flipper_only_bounces() {
        let mut state = GameState::default();
        let tip = state.flipper(FlipperSide::Left).tip();
        state.ball.pos = tip + Vec2::new(0.0, -20.0);
        state.ball.vel = Vec2::new(0.0, 200.0);

        let events = run_substep(&mut state, FrameInput::default());
        assert_eq!(state.score, 10);
        assert_eq!(events.len(), 1);
        // Bounced back up with 90% of its speed, no energy added
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.vel.length() <= 0.9 * 204.0);
    }

    #[test]
    fn test_wall_reflects_and_damps() {
        let mut state = GameState::default();
        state.ball.pos = Vec2::new(10.0, 600.0);
        state.ball.vel = Vec2::new(-100.0, 0.0);

        let events = run_substep(&mut state, FrameInput::default());
        assert!(events.is_empty());
        assert_eq!(state.ball.pos.x, 14.0);
        assert!((state.ball.vel.x - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_guide_separates_without_bounce() {
        let mut state = GameState::default();
        state.ball.pos = Vec2::new(100.0, 702.0);
        state.ball.vel = Vec2::new(0.0, 100.0);
        let dt = substep_dt(&state);

        let events = run_substep(&mut state, FrameInput::default());
        assert!(events.is_empty());
        let [left_guide, _] = state.guides();
        assert!(left_guide.distance_to(state.ball.pos) >= 14.0 - 1e-3);
        // Velocity only saw gravity
        assert!((state.ball.vel - Vec2::new(0.0, 100.0 + 1200.0 * dt)).length() < 1e-4);
    }

    #[test]
    fn test_each_flipper_resolves_at_most_once_per_substep() {
        let mut state = GameState::default();
        // Touching both the tip cap and the shaft of the left flipper
        let flipper = state.flipper(FlipperSide::Left).clone();
        let near_tip = flipper.pivot + (flipper.tip() - flipper.pivot) * 0.9;
        state.ball.pos = near_tip + Vec2::new(0.0, -12.0);

        let events = run_substep(&mut state, FrameInput::default());
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::FlipperHit { side: FlipperSide::Left, .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_flippers_move_once_per_frame() {
        let mut state = GameState::default();
        state.ball.pos = Vec2::new(300.0, 600.0);
        let resting = state.flipper(FlipperSide::Left).resting_angle;
        step(&mut state, &FrameInput { left: true, right: false }, FRAME);
        let moved = resting - state.flipper(FlipperSide::Left).current_angle;
        assert!((moved - 8.0_f32.to_radians()).abs() < 1e-5);
        // Right stays put
        let right = state.flipper(FlipperSide::Right);
        assert_eq!(right.current_angle, right.resting_angle);
    }

    #[test]
    fn test_bad_frame_times_are_sanitized() {
        let mut state = GameState::default();
        state.ball.pos = Vec2::new(300.0, 600.0);
        let before = state.ball.clone();
        step(&mut state, &FrameInput { left: true, right: true }, f32::NAN);
        step(&mut state, &FrameInput::default(), -1.0);
        assert_eq!(state.ball, before);

        // A long stall only integrates up to max_frame_time
        step(&mut state, &FrameInput { left: true, right: false }, 10.0);
        let left = state.flipper(FlipperSide::Left);
        let moved = left.resting_angle - left.current_angle;
        assert!((moved - 48.0_f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_overlapping_planets_all_resolve_in_order() {
        let tuning = TableTuning {
            planets: vec![
                Planet::new(Vec2::new(280.0, 300.0), 30.0),
                Planet::new(Vec2::new(320.0, 300.0), 30.0),
            ],
            ..Default::default()
        };
        let mut state = GameState::new(tuning);
        state.ball.pos = Vec2::new(300.0, 270.0);

        let events = run_substep(&mut state, FrameInput::default());
        assert_eq!(
            events,
            vec![
                GameEvent::PlanetHit { index: 0, points: 5 },
                GameEvent::PlanetHit { index: 1, points: 5 },
            ]
        );
        assert_eq!(state.score, 10);
        // Last planet wins the final position
        assert!((state.ball.pos.distance(Vec2::new(320.0, 300.0)) - 44.0).abs() < 1e-3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ball_stays_finite_and_flippers_in_range(
                start_x in 20.0f32..580.0,
                start_y in 20.0f32..700.0,
                frames in proptest::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..0.2), 1..200)
            ) {
                let mut state = GameState::default();
                state.ball.pos = Vec2::new(start_x, start_y);
                for (left, right, dt) in frames {
                    step(&mut state, &FrameInput { left, right }, dt);
                    prop_assert!(state.ball.pos.is_finite() && state.ball.vel.is_finite());
                    for flipper in &state.flippers {
                        let lo = flipper.resting_angle.min(flipper.active_angle);
                        let hi = flipper.resting_angle.max(flipper.active_angle);
                        prop_assert!(flipper.current_angle >= lo && flipper.current_angle <= hi);
                    }
                }
            }
        }
    }
}
