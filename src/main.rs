//! Drone Sim entry point
//!
//! The browser build is driven through `drone_sim::web`. Natively this runs a
//! short headless flight and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Drone Sim (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the 3D view");

    demo::tutorial_autopilot();
    demo::mission_with_replay();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is drone_sim::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use drone_sim::Settings;
    use drone_sim::platform::{MemoryStore, now_ms};
    use drone_sim::recorder::FlightRecorder;
    use drone_sim::sim::{GameEvent, GameMode, Session, StickInput, TutorialStep, tick};

    const DT: f32 = 1.0 / 60.0;

    fn log_events(session: &Session, events: &[GameEvent]) {
        for event in events {
            log::info!(
                "[frame {}] {:?} (score {}, health {})",
                session.frame,
                event,
                session.game.score,
                session.game.health
            );
        }
    }

    /// Fly the tutorial with canned stick inputs per step
    pub fn tutorial_autopilot() {
        let settings = Settings {
            mode: GameMode::Tutorial,
            ..Default::default()
        };
        let mut session = Session::new(1, &settings);

        // 60 simulated seconds is plenty
        for _ in 0..3600 {
            let (left, right) = match session.tutorial.step {
                TutorialStep::Hover => (StickInput::CENTER, StickInput::CENTER),
                TutorialStep::Forward => (StickInput::CENTER, StickInput::new(0.0, 1.0)),
                TutorialStep::Turn => (StickInput::CENTER, StickInput::new(0.6, 0.0)),
                TutorialStep::Complete => break,
            };
            session.controls.left_stick = left;
            session.controls.right_stick = right;

            let events = tick(&mut session, DT, now_ms());
            log_events(&session, &events);
        }

        log::info!(
            "Tutorial {} after {:.1}s, score {}",
            if session.tutorial.is_finished() { "finished" } else { "unfinished" },
            session.time,
            session.game.score
        );
    }

    /// Climb out over the course while recording, then save and replay it
    pub fn mission_with_replay() {
        let settings = Settings {
            mode: GameMode::Mission,
            ..Default::default()
        };
        let mut session = Session::new(7, &settings);
        let mut store = MemoryStore::new();

        session.recorder.start_recording();
        for frame in 0..600 {
            // Climb for a second, then push forward and hold altitude loosely
            session.controls.left_stick = if frame < 60 {
                StickInput::new(0.0, 0.6)
            } else {
                StickInput::new(0.0, 0.1)
            };
            session.controls.right_stick = StickInput::new(0.0, 0.5);

            let events = tick(&mut session, DT, now_ms());
            log_events(&session, &events);

            if frame % 120 == 0 {
                let d = &session.drone;
                log::info!(
                    "alt {:.1} m, speed {:.1} m/s, heading {:.0}°, rings {}/{}",
                    d.altitude,
                    d.speed,
                    d.heading,
                    session.game.rings_collected,
                    session.game.total_rings
                );
            }
        }
        session.recorder.stop_recording();

        if let Err(e) = session.recorder.save(&mut store, "demo") {
            log::error!("Saving the demo flight failed: {}", e);
            return;
        }
        log::info!("Saved recordings: {:?}", FlightRecorder::saved_recordings(&store));

        let mut replay = FlightRecorder::new();
        if !replay.load(&store, "demo") {
            return;
        }
        session.recorder = replay;
        session.recorder.start_replay();

        let mut shown = 0;
        loop {
            let events = tick(&mut session, DT, now_ms());
            if events.contains(&GameEvent::ReplayFinished) {
                break;
            }
            shown += 1;
        }
        let end = session.display_pose().position;
        log::info!(
            "Replayed {} frames, drone held at ({:.1}, {:.1}, {:.1})",
            shown,
            end.x,
            end.y,
            end.z
        );
    }
}
