//! Coinrush - headless demo
//!
//! Runs a short scripted session against the in-process world and logs what
//! a host would render, play or show. Set `RUST_LOG=debug` for per-event detail.

use coinrush::PhysicsConfig;
use coinrush::sim::{InteractionEvent, SimEvent, Simulation};
use glam::Vec3;

const FRAME_DT: f32 = 1.0 / 60.0;

fn run_frames(sim: &mut Simulation, seconds: f32) {
    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        sim.tick(FRAME_DT);
    }
}

fn report(sim: &mut Simulation) {
    for event in sim.drain_events() {
        match event {
            SimEvent::MessageShown(text) => log::info!("Overlay: {}", text),
            SimEvent::QuoteShown(quote) => {
                log::info!("\"{}\" - {}, {}", quote.quote, quote.character, quote.series)
            }
            other => log::debug!("{:?}", other),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Coinrush (headless) starting...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut sim = match Simulation::new(PhysicsConfig::default(), seed) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    report(&mut sim);

    let script = [
        InteractionEvent::Tilt {
            pitch: 0.3,
            roll: -0.2,
        },
        InteractionEvent::Drag {
            from: Vec3::new(-0.05, 0.0, 0.0),
            to: Vec3::new(0.0, 0.0, 0.0),
        },
        InteractionEvent::Flick {
            origin: Vec3::new(0.0, -0.1, 0.0),
            speed: 1.2,
        },
        InteractionEvent::Burst {
            center: Vec3::ZERO,
            magnitude: 0.2,
            radius: 0.3,
        },
        InteractionEvent::Shake,
    ];
    for event in script {
        let hits = sim.apply(event);
        log::info!("{:?} moved {} coins", event, hits);
        run_frames(&mut sim, 0.1);
        report(&mut sim);
    }

    if let Some(special) = sim.selector.current() {
        sim.tap(special);
        report(&mut sim);
        let reveal_delay = sim.config().special_coin_animation_duration;
        run_frames(&mut sim, reveal_delay + 0.1);
        report(&mut sim);
        sim.dismiss_quote();
        report(&mut sim);
    }

    sim.reset_scene();
    run_frames(&mut sim, 1.1);
    report(&mut sim);

    log::info!(
        "Session {} done after {} frames ({:.2}s)",
        sim.seed(),
        sim.time_ticks,
        sim.now()
    );
}
