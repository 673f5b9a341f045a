//! Space Pinball headless driver
//!
//! Runs the table under the autopilot at a fixed 60 Hz and logs what
//! happened. A rendering/audio frontend drives `sim::step` the same way.
//!
//! Usage: `space-pinball [frames] [seed]`. Tuning comes from
//! `SPACE_PINBALL_TUNING` or `config/table.json` when present.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_pinball::sim::{Autopilot, GameEvent, GameState, step};
    use space_pinball::tuning::TableTuning;

    const FRAME_TIME: f32 = 1.0 / 60.0;
    const DEFAULT_FRAMES: u64 = 60 * 60;
    const DEFAULT_SEED: u64 = 12345;

    env_logger::init();
    log::info!("Space Pinball (headless) starting...");

    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let seed = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut state = GameState::new(TableTuning::load());
    let mut autopilot = Autopilot::new(seed);
    log::info!("Running {frames} frames with autopilot seed {seed}");

    let mut sound_cues = 0u64;
    let mut best_score = 0u64;
    for _ in 0..frames {
        let input = autopilot.next_input(&state);
        let output = step(&mut state, &input, FRAME_TIME);
        if output.play_sound {
            sound_cues += 1;
        }
        for event in &output.events {
            if let GameEvent::BallDrained { score } = event {
                best_score = best_score.max(*score);
            }
        }
        best_score = best_score.max(output.snapshot.score);
    }

    log::info!(
        "Done: {} frames, {} sound cues, {} drains, best score {}, current score {}",
        state.frame,
        sound_cues,
        state.drains,
        best_score,
        state.score
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Frontends embed the library directly; nothing to run here
}
