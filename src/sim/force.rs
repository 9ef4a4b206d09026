//! Interaction force model
//!
//! Pure functions from an input event and a body position to the impulse the
//! caller should apply. Nothing here touches a body. Every spatial interaction
//! uses the same linear falloff with the radius as a hard cutoff.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PhysicsConfig};
use crate::consts::*;
use crate::{falloff, sample_symmetric};

/// An input, already decoded into world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionEvent {
    Shake,
    /// Device attitude in radians
    Tilt { pitch: f32, roll: f32 },
    /// Touch moved between two world points
    Drag { from: Vec3, to: Vec3 },
    /// Release with upward speed (pixels per second)
    Flick { origin: Vec3, speed: f32 },
    /// Radial burst
    Burst { center: Vec3, magnitude: f32, radius: f32 },
}

impl InteractionEvent {
    /// Drag velocity implied by a from/to pair
    pub fn drag_velocity(from: Vec3, to: Vec3) -> Vec3 {
        (to - from) * DRAG_VELOCITY_SCALE
    }

    /// NaN or infinite inputs are dropped by the driver
    pub fn is_finite(&self) -> bool {
        match *self {
            InteractionEvent::Shake => true,
            InteractionEvent::Tilt { pitch, roll } => pitch.is_finite() && roll.is_finite(),
            InteractionEvent::Drag { from, to } => from.is_finite() && to.is_finite(),
            InteractionEvent::Flick { origin, speed } => origin.is_finite() && speed.is_finite(),
            InteractionEvent::Burst {
                center,
                magnitude,
                radius,
            } => center.is_finite() && magnitude.is_finite() && radius.is_finite(),
        }
    }
}

/// Output of one evaluation against one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSample {
    /// Linear impulse
    pub impulse: Vec3,
    /// Angular-velocity delta, if the event spins the body
    pub angular: Option<Vec3>,
}

impl ForceSample {
    pub fn linear(impulse: Vec3) -> Self {
        Self {
            impulse,
            angular: None,
        }
    }
}

/// Stateless force model over a validated configuration
#[derive(Debug, Clone, Default)]
pub struct ForceModel {
    config: PhysicsConfig,
}

impl ForceModel {
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Random downward-then-outward kick
    pub fn shake_impulse<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let k = self.config.shake_impulse;
        Vec3::new(
            rng.random_range(-0.5f32..=0.5) * k,
            rng.random_range(-1.0f32..=-0.5) * k,
            rng.random_range(-0.3f32..=0.3) * k,
        )
    }

    /// Linear in both angles: `(roll * m, 0, pitch * m)`
    pub fn tilt_force(&self, pitch: f32, roll: f32) -> Vec3 {
        let m = self.config.tilt_force_multiplier();
        Vec3::new(roll * m, 0.0, pitch * m)
    }

    /// Scatter bodies near the touch along the drag direction
    pub fn drag_impulse(&self, body_pos: Vec3, drag_pos: Vec3, drag_velocity: Vec3) -> Option<Vec3> {
        let distance = body_pos.distance(drag_pos);
        let f = falloff(distance, self.config.drag_radius)?;
        Some(drag_velocity * self.config.drag_force_multiplier * f)
    }

    /// Upward pop with lateral jitter plus a random tumble
    pub fn flick_impulse<R: Rng + ?Sized>(
        &self,
        body_pos: Vec3,
        flick_pos: Vec3,
        flick_speed: f32,
        rng: &mut R,
    ) -> Option<(Vec3, Vec3)> {
        let distance = body_pos.distance(flick_pos);
        let f = falloff(distance, self.config.flick_radius())?;

        let up = self.config.flick_impulse_up * flick_speed * f;
        let impulse = Vec3::new(
            sample_symmetric(rng, FLICK_JITTER_X),
            up,
            sample_symmetric(rng, FLICK_JITTER_Z),
        );

        let a = self.config.flick_angular_velocity;
        let angular = Vec3::new(
            sample_symmetric(rng, a),
            sample_symmetric(rng, a),
            sample_symmetric(rng, a),
        );

        Some((impulse, angular))
    }

    /// Push away from `center`; no effect at the center itself
    pub fn explosion_impulse(&self, body_pos: Vec3, center: Vec3, magnitude: f32, radius: f32) -> Option<Vec3> {
        let distance = body_pos.distance(center);
        if distance <= EXPLOSION_EPSILON {
            return None;
        }
        let f = falloff(distance, radius)?;
        let direction = (body_pos - center) / distance;
        Some(direction * magnitude * f)
    }

    /// Evaluate any event against one body
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        event: &InteractionEvent,
        body_pos: Vec3,
        rng: &mut R,
    ) -> Option<ForceSample> {
        match *event {
            InteractionEvent::Shake => Some(ForceSample::linear(self.shake_impulse(rng))),
            InteractionEvent::Tilt { pitch, roll } => {
                Some(ForceSample::linear(self.tilt_force(pitch, roll)))
            }
            InteractionEvent::Drag { from, to } => self
                .drag_impulse(body_pos, to, InteractionEvent::drag_velocity(from, to))
                .map(ForceSample::linear),
            InteractionEvent::Flick { origin, speed } => self
                .flick_impulse(body_pos, origin, speed, rng)
                .map(|(impulse, angular)| ForceSample {
                    impulse,
                    angular: Some(angular),
                }),
            InteractionEvent::Burst {
                center,
                magnitude,
                radius,
            } => self
                .explosion_impulse(body_pos, center, magnitude, radius)
                .map(ForceSample::linear),
        }
    }
}
