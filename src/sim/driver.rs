//! Simulation driver
//!
//! The host calls `tick(dt)` once per frame and `apply(event)` for each decoded
//! input. The driver routes events through the force model, keeps the special
//! coin alive and records what the host should show or play.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyMode, PhysicsEngine, World};
use super::force::{ForceModel, ForceSample, InteractionEvent};
use super::schedule::Scheduler;
use super::selector::{ReselectPolicy, SpecialCoinSelector};
use crate::config::{ConfigError, PhysicsConfig};
use crate::consts::*;
use crate::quotes::{self, Quote};

/// Haptic hint for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Success,
}

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Haptic(HapticKind),
    MessageShown(String),
    MessageHidden,
    QuoteShown(Quote),
    QuoteHidden,
    SpecialSelected(BodyId),
    SpecialFound(BodyId),
    SceneReset,
}

/// Work deferred on the simulation clock.
///
/// Each task names the scene or overlay message it was scheduled for and does
/// nothing once that has been replaced.
#[derive(Debug, Clone)]
enum Deferred {
    HideMessage { message: u64 },
    /// Put the found coin back and reveal the quote
    FinishReveal {
        scene: u64,
        message: u64,
        body: BodyId,
        origin: Vec3,
    },
}

/// Apply one sample to a body through the physics seam
pub fn apply_sample<E: PhysicsEngine + ?Sized>(engine: &mut E, id: BodyId, sample: &ForceSample) {
    engine.apply_impulse(id, sample.impulse);
    if let Some(angular) = sample.angular {
        engine.apply_angular_velocity(id, angular);
    }
}

/// Coins, special-coin state, overlays and the clock
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    pub selector: SpecialCoinSelector,
    model: ForceModel,
    seed: u64,
    /// Bumped on every reset
    scene: u64,
    /// Bumped on every shown message
    message_seq: u64,
    rng: Pcg32,
    scheduler: Scheduler<Deferred>,
    /// Clock time of the last applied tilt
    last_tilt: Option<f64>,
    /// Special coin pulse phase (seconds)
    pulse_time: f32,
    /// Found coin is zoomed, waiting for its reveal
    revealing: bool,
    message: Option<String>,
    quote: Option<Quote>,
    events: Vec<SimEvent>,
    /// Frame counter
    pub time_ticks: u64,
}

impl Simulation {
    /// Populate a scene with the given seed
    pub fn new(config: PhysicsConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_policy(config, seed, ReselectPolicy::default())
    }

    pub fn with_policy(
        config: PhysicsConfig,
        seed: u64,
        policy: ReselectPolicy,
    ) -> Result<Self, ConfigError> {
        let mut sim = Self {
            world: World::new(),
            selector: SpecialCoinSelector::new(policy),
            model: ForceModel::new(config)?,
            seed,
            scene: 0,
            message_seq: 0,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            last_tilt: None,
            pulse_time: 0.0,
            revealing: false,
            message: None,
            quote: None,
            events: Vec::new(),
            time_ticks: 0,
        };
        sim.populate();
        log::info!(
            "Scene populated with {} coins (seed {})",
            sim.world.len(),
            seed
        );
        Ok(sim)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulation clock in seconds
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn config(&self) -> &PhysicsConfig {
        self.model.config()
    }

    /// Spawn, register and pick the first special coin
    fn populate(&mut self) {
        let ids = self.world.spawn_coins(self.model.config(), &mut self.rng);
        self.selector.register_bodies(&mut self.world, ids);
        self.select_special();
    }

    /// Pick a new special coin and bring it to the front plane
    fn select_special(&mut self) -> Option<BodyId> {
        let id = self.selector.select_new(&mut self.world, &mut self.rng)?;
        if let Some(mut pos) = self.world.position(id) {
            pos.z = SPECIAL_COIN_FRONT_Z;
            self.world.set_position(id, pos);
        }
        self.pulse_time = 0.0;
        self.events.push(SimEvent::SpecialSelected(id));
        Some(id)
    }

    /// Advance by one frame
    pub fn tick(&mut self, dt: f32) {
        self.time_ticks += 1;

        for task in self.scheduler.advance(dt) {
            self.run_deferred(task);
        }

        if self.selector.current().is_some() && !self.revealing {
            if dt.is_finite() && dt > 0.0 {
                self.pulse_time += dt;
            }
        } else {
            self.pulse_time = 0.0;
        }
    }

    fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::HideMessage { message } => self.hide_message(message),
            Deferred::FinishReveal {
                scene,
                message,
                body,
                origin,
            } => {
                if scene != self.scene {
                    log::debug!("Reveal of {:?} belongs to a destroyed scene", body);
                    return;
                }
                self.revealing = false;
                self.hide_message(message);
                if !self.world.set_position(body, origin) {
                    log::debug!("Reveal target {:?} no longer exists", body);
                    return;
                }
                self.world.set_mode(body, BodyMode::Dynamic);

                let quote = quotes::random_quote(&mut self.rng);
                log::info!("Quote revealed: {} ({})", quote.character, quote.series);
                self.events.push(SimEvent::QuoteShown(quote.clone()));
                self.quote = Some(quote);
            }
        }
    }

    /// Route an input event to every body it reaches.
    ///
    /// Returns the number of bodies that received a force.
    pub fn apply(&mut self, event: InteractionEvent) -> usize {
        if !event.is_finite() {
            log::warn!("Dropping non-finite event: {:?}", event);
            return 0;
        }

        if let InteractionEvent::Tilt { .. } = event {
            let now = self.scheduler.now();
            if let Some(last) = self.last_tilt
                && now - last <= TILT_UPDATE_INTERVAL as f64
            {
                log::debug!("Tilt throttled");
                return 0;
            }
            self.last_tilt = Some(now);
        }

        let mut hits = 0;
        for i in 0..self.world.bodies.len() {
            let body = &self.world.bodies[i];
            let (id, pos) = (body.id, body.position);
            if let Some(sample) = self.model.evaluate(&event, pos, &mut self.rng) {
                apply_sample(&mut self.world, id, &sample);
                hits += 1;
            }
        }

        match event {
            InteractionEvent::Shake => self.events.push(SimEvent::Haptic(HapticKind::Heavy)),
            InteractionEvent::Flick { .. } | InteractionEvent::Burst { .. } if hits > 0 => {
                self.events.push(SimEvent::Haptic(HapticKind::Medium))
            }
            _ => {}
        }

        log::debug!("{:?} reached {} bodies", event, hits);
        hits
    }

    /// Tap on a body. Only the special coin reacts.
    ///
    /// The coin freezes, zooms forward and shows a catchphrase; after the
    /// animation delay it returns, resumes and the quote appears.
    pub fn tap(&mut self, id: BodyId) -> bool {
        let Some(origin) = self.world.position(id) else {
            log::warn!("Tap on unknown body {:?}", id);
            return false;
        };
        if !self.selector.is_special(id) || self.revealing || self.quote.is_some() {
            self.events.push(SimEvent::Haptic(HapticKind::Light));
            return false;
        }

        self.world.set_mode(id, BodyMode::Frozen);
        let zoomed = origin + Vec3::Z * self.model.config().special_coin_zoom_distance;
        self.world.set_position(id, zoomed);
        self.revealing = true;

        let phrase = quotes::random_catchphrase(&mut self.rng).to_string();
        let message = self.show_message(phrase);
        self.events.push(SimEvent::Haptic(HapticKind::Success));

        self.scheduler.schedule(
            Deferred::FinishReveal {
                scene: self.scene,
                message,
                body: id,
                origin,
            },
            self.model.config().special_coin_animation_duration,
        );
        true
    }

    /// Close the quote, retire the found coin and pick the next one
    pub fn dismiss_quote(&mut self) {
        if self.quote.take().is_some() {
            self.events.push(SimEvent::QuoteHidden);
        }
        if let Some(found) = self.selector.mark_found(&mut self.world) {
            self.events.push(SimEvent::SpecialFound(found));
        }
        self.select_special();
    }

    /// Destroy every coin and start over
    pub fn reset_scene(&mut self) {
        self.world.clear();
        self.scene += 1;
        self.revealing = false;
        if self.quote.take().is_some() {
            self.events.push(SimEvent::QuoteHidden);
        }
        self.populate();
        self.events.push(SimEvent::SceneReset);
        self.events.push(SimEvent::Haptic(HapticKind::Heavy));

        let message = self.show_message("RELOADED! 🪙".to_string());
        self.scheduler
            .schedule(Deferred::HideMessage { message }, RELOAD_MESSAGE_DURATION);
        log::info!("Scene reset with {} coins", self.world.len());
    }

    /// Returns the token a later hide must present
    fn show_message(&mut self, text: String) -> u64 {
        self.message_seq += 1;
        self.events.push(SimEvent::MessageShown(text.clone()));
        self.message = Some(text);
        self.message_seq
    }

    /// Hide the message only if it is still the one shown as `token`
    fn hide_message(&mut self, token: u64) {
        if token == self.message_seq && self.message.take().is_some() {
            self.events.push(SimEvent::MessageHidden);
        }
    }

    /// Overlay message currently visible
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Quote currently visible
    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    /// Scale for the special coin's attention pulse
    pub fn special_pulse_scale(&self) -> f32 {
        if self.selector.current().is_some() && !self.revealing {
            1.0 + SPECIAL_PULSE_AMPLITUDE * (self.pulse_time * SPECIAL_PULSE_SPEED).sin()
        } else {
            1.0
        }
    }

    /// Take everything recorded since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn small_config() -> PhysicsConfig {
        PhysicsConfig {
            coin_count: 8,
            ..Default::default()
        }
    }

    fn run(sim: &mut Simulation, seconds: f32) {
        let frames = (seconds / DT).ceil() as u32 + 1;
        for _ in 0..frames {
            sim.tick(DT);
        }
    }

    #[test]
    fn test_new_scene_has_one_special_in_front() {
        let mut sim = Simulation::new(small_config(), 12345).unwrap();
        assert_eq!(sim.world.len(), 8);
        let special = sim.world.special_ids();
        assert_eq!(special.len(), 1);
        assert_eq!(Some(special[0]), sim.selector.current());
        assert_eq!(sim.world.position(special[0]).unwrap().z, SPECIAL_COIN_FRONT_Z);
        assert!(sim
            .drain_events()
            .contains(&SimEvent::SpecialSelected(special[0])));
    }

    #[test]
    fn test_determinism() {
        let mut a = Simulation::new(small_config(), 99).unwrap();
        let mut b = Simulation::new(small_config(), 99).unwrap();
        let script = [
            InteractionEvent::Shake,
            InteractionEvent::Flick {
                origin: Vec3::ZERO,
                speed: 1.0,
            },
        ];
        for event in script {
            a.apply(event);
            b.apply(event);
        }
        assert_eq!(a.selector.current(), b.selector.current());
        for (x, y) in a.world.physics.iter().zip(&b.world.physics) {
            assert_eq!(x.velocity, y.velocity);
            assert_eq!(x.angular_velocity, y.angular_velocity);
        }
    }

    #[test]
    fn test_shake_reaches_every_body() {
        let mut sim = Simulation::new(small_config(), 1).unwrap();
        sim.drain_events();
        assert_eq!(sim.apply(InteractionEvent::Shake), 8);
        assert!(sim.world.physics.iter().all(|s| s.velocity.y < 0.0));
        assert_eq!(sim.drain_events(), vec![SimEvent::Haptic(HapticKind::Heavy)]);
    }

    #[test]
    fn test_drag_only_near_touch() {
        let mut sim = Simulation::new(PhysicsConfig::default(), 2).unwrap();
        let far = Vec3::new(10.0, 10.0, 0.0);
        let hits = sim.apply(InteractionEvent::Drag {
            from: far,
            to: far + Vec3::X * 0.01,
        });
        assert_eq!(hits, 0);
        assert!(sim.world.physics.iter().all(|s| s.velocity == Vec3::ZERO));
    }

    #[test]
    fn test_tilt_throttled() {
        let mut sim = Simulation::new(small_config(), 3).unwrap();
        let tilt = InteractionEvent::Tilt {
            pitch: 0.1,
            roll: 0.2,
        };
        assert_eq!(sim.apply(tilt), 8);
        assert_eq!(sim.apply(tilt), 0);
        sim.tick(TILT_UPDATE_INTERVAL * 2.0);
        assert_eq!(sim.apply(tilt), 8);
    }

    #[test]
    fn test_non_finite_event_dropped() {
        let mut sim = Simulation::new(small_config(), 3).unwrap();
        let hits = sim.apply(InteractionEvent::Flick {
            origin: Vec3::new(f32::NAN, 0.0, 0.0),
            speed: 1.0,
        });
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_tap_non_special_ignored() {
        let mut sim = Simulation::new(small_config(), 4).unwrap();
        let special = sim.selector.current().unwrap();
        let other = sim.world.ids().into_iter().find(|&id| id != special).unwrap();
        sim.drain_events();
        assert!(!sim.tap(other));
        assert_eq!(sim.world.state(other).unwrap().mode, BodyMode::Dynamic);
        assert!(sim.message().is_none());
        assert_eq!(sim.drain_events(), vec![SimEvent::Haptic(HapticKind::Light)]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PhysicsConfig {
            flick_angular_velocity: -1.0,
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(config, 1),
            Err(ConfigError::Invalid {
                field: "flick_angular_velocity",
                ..
            })
        ));

        let config = PhysicsConfig {
            spawn_depth_variance: f32::NAN,
            ..small_config()
        };
        assert!(Simulation::new(config, 1).is_err());
    }

    #[test]
    fn test_stale_reveal_leaves_new_scene_alone() {
        let mut sim = Simulation::new(small_config(), 10).unwrap();
        let first = sim.selector.current().unwrap();
        assert!(sim.tap(first));
        sim.reset_scene();

        sim.tick(0.1);
        let second = sim.selector.current().unwrap();
        let origin = sim.world.position(second).unwrap();
        assert!(sim.tap(second));
        let phrase = sim.message().map(str::to_string);

        // The first coin's reveal comes due here
        sim.tick(0.55);
        assert_eq!(sim.world.state(second).unwrap().mode, BodyMode::Frozen);
        assert_eq!(sim.message().map(str::to_string), phrase);
        assert!(sim.quote().is_none());
        assert!(!sim.tap(second));

        sim.drain_events();
        sim.tick(0.1);
        assert_eq!(sim.world.position(second), Some(origin));
        assert_eq!(origin.z, SPECIAL_COIN_FRONT_Z);
        assert_eq!(sim.world.state(second).unwrap().mode, BodyMode::Dynamic);
        let quotes_shown = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::QuoteShown(_)))
            .count();
        assert_eq!(quotes_shown, 1);
    }

    #[test]
    fn test_reload_hide_spares_later_message() {
        let mut sim = Simulation::new(small_config(), 11).unwrap();
        sim.reset_scene();
        sim.tick(0.5);
        let special = sim.selector.current().unwrap();
        assert!(sim.tap(special));
        assert_ne!(sim.message(), Some("RELOADED! 🪙"));

        // Past the reload hide, before the reveal
        sim.tick(0.55);
        assert!(sim.message().is_some());
        assert_ne!(sim.message(), Some("RELOADED! 🪙"));
    }

    #[test]
    fn test_found_sequence() {
        let mut sim = Simulation::new(small_config(), 5).unwrap();
        let special = sim.selector.current().unwrap();
        let origin = sim.world.position(special).unwrap();
        sim.drain_events();

        assert!(sim.tap(special));
        assert_eq!(sim.world.state(special).unwrap().mode, BodyMode::Frozen);
        let zoomed = sim.world.position(special).unwrap();
        assert!((zoomed.z - origin.z - SPECIAL_COIN_ZOOM_DISTANCE).abs() < 1e-6);
        assert!(sim.message().is_some());
        // Second tap during the zoom does nothing
        assert!(!sim.tap(special));

        run(&mut sim, SPECIAL_COIN_ANIMATION_DURATION);
        assert_eq!(sim.world.position(special), Some(origin));
        assert_eq!(sim.world.state(special).unwrap().mode, BodyMode::Dynamic);
        assert!(sim.message().is_none());
        assert!(sim.quote().is_some());
        // Still special until the quote is dismissed
        assert!(sim.selector.is_special(special));

        sim.dismiss_quote();
        assert!(sim.quote().is_none());
        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::SpecialFound(special)));
        assert!(events.contains(&SimEvent::QuoteHidden));
        assert!(events.contains(&SimEvent::Haptic(HapticKind::Success)));

        let next = sim.selector.current().expect("a new special coin");
        assert_eq!(sim.world.special_ids(), vec![next]);
    }

    #[test]
    fn test_reset_during_reveal_is_harmless() {
        let mut sim = Simulation::new(small_config(), 6).unwrap();
        let special = sim.selector.current().unwrap();
        assert!(sim.tap(special));
        sim.reset_scene();
        assert_eq!(sim.message(), Some("RELOADED! 🪙"));

        run(&mut sim, SPECIAL_COIN_ANIMATION_DURATION);
        assert!(sim.quote().is_none());
        assert_eq!(sim.world.position(special), None);
        assert_eq!(sim.world.len(), 8);
        assert_eq!(sim.world.special_ids().len(), 1);
        assert!(sim.drain_events().contains(&SimEvent::SceneReset));
    }

    #[test]
    fn test_reload_message_hides() {
        let mut sim = Simulation::new(small_config(), 7).unwrap();
        sim.reset_scene();
        assert!(sim.message().is_some());
        run(&mut sim, RELOAD_MESSAGE_DURATION);
        assert!(sim.message().is_none());
    }

    #[test]
    fn test_pulse_only_while_special() {
        let mut sim = Simulation::new(small_config(), 8).unwrap();
        sim.tick(0.25);
        assert!(sim.special_pulse_scale() > 1.0);
        assert!(sim.special_pulse_scale() <= 1.0 + SPECIAL_PULSE_AMPLITUDE);

        let mut empty = Simulation::new(
            PhysicsConfig {
                coin_count: 0,
                ..Default::default()
            },
            8,
        )
        .unwrap();
        empty.tick(0.25);
        assert_eq!(empty.special_pulse_scale(), 1.0);
        assert_eq!(empty.selector.current(), None);
    }
}
