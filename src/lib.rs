//! Coinrush - a jar of coins you shake, tilt, drag and flick
//!
//! Core modules:
//! - `sim`: Interaction force model, bodies, special-coin selection, driver
//! - `config`: Tunable physics values (serde, JSON overrides)
//! - `quotes`: Discovery catchphrases and motivational quotes
//!
//! Rendering, rigid-body integration, sensor decoding and haptic playback
//! belong to the host engine. This crate only computes what to apply.

pub mod config;
pub mod quotes;
pub mod sim;

pub use config::{ConfigError, PhysicsConfig};
pub use quotes::Quote;

use rand::Rng;

/// Physics tuning constants
pub mod consts {
    /// Coin body
    pub const COIN_MASS: f32 = 0.3;

    /// Coin spawning
    pub const COIN_COUNT: usize = 45;
    pub const SPAWN_AREA_WIDTH: f32 = 0.4;
    pub const SPAWN_AREA_HEIGHT: f32 = 0.6;
    pub const SPAWN_DEPTH_VARIANCE: f32 = 0.05;

    /// Tilt response (scaled by TILT_FORCE_SCALE before use)
    pub const TILT_MULTIPLIER: f32 = 0.5;
    pub const TILT_FORCE_SCALE: f32 = 0.1;
    /// Minimum simulated time between applied tilt events (30 Hz)
    pub const TILT_UPDATE_INTERVAL: f32 = 1.0 / 30.0;

    /// Interaction forces
    pub const SHAKE_IMPULSE: f32 = 0.15;
    pub const FLICK_IMPULSE_UP: f32 = 0.15;
    pub const FLICK_ANGULAR_VELOCITY: f32 = 8.0;
    pub const DRAG_FORCE_MULTIPLIER: f32 = 0.1;
    pub const DRAG_RADIUS: f32 = 0.18;
    /// Flick reaches further than drag
    pub const FLICK_RADIUS_FACTOR: f32 = 1.5;
    /// Lateral jitter bounds on a flick impulse
    pub const FLICK_JITTER_X: f32 = 0.02;
    pub const FLICK_JITTER_Z: f32 = 0.01;
    /// World-space drag delta -> velocity
    pub const DRAG_VELOCITY_SCALE: f32 = 50.0;
    /// Below this distance a burst has no usable direction
    pub const EXPLOSION_EPSILON: f32 = 0.001;

    /// Special coin presentation
    pub const SPECIAL_COIN_FRONT_Z: f32 = 0.05;
    pub const SPECIAL_COIN_ZOOM_DISTANCE: f32 = 0.1;
    pub const SPECIAL_COIN_ANIMATION_DURATION: f32 = 0.6;
    pub const SPECIAL_PULSE_SPEED: f32 = 3.0;
    pub const SPECIAL_PULSE_AMPLITUDE: f32 = 0.05;

    /// Overlay timing
    pub const RELOAD_MESSAGE_DURATION: f32 = 1.0;
}

/// Linear falloff `1 - distance / radius`, or `None` outside the radius.
///
/// The boundary itself is excluded: `distance == radius` has no effect.
#[inline]
pub fn falloff(distance: f32, radius: f32) -> Option<f32> {
    if distance < radius {
        Some(1.0 - distance / radius)
    } else {
        None
    }
}

/// Uniform sample in `[-bound, bound]`; zero for a non-positive or NaN bound
#[inline]
pub fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> f32 {
    if bound.is_finite() && bound > 0.0 {
        rng.random_range(-bound..=bound)
    } else {
        0.0
    }
}
