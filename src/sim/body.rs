//! Bodies and the physics-state table
//!
//! A `Body` holds identity, transform and the special flag. Motion state lives
//! in a separate table indexed by `Body::physics`, so a body is composed of
//! plain records instead of engine capabilities.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::consts::COIN_MASS;
use crate::sample_symmetric;

/// Stable body identity (never reused within a `World`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Whether the physics engine moves the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyMode {
    #[default]
    Dynamic,
    /// Kinematic: ignores impulses until resumed
    Frozen,
}

/// Motion state owned by the physics side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsState {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mode: BodyMode,
}

/// A coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec3,
    pub is_special: bool,
    /// Index into `World::physics`
    pub physics: usize,
}

/// What the force model needs from a physics engine
pub trait PhysicsEngine {
    /// Current position, `None` if the body no longer exists
    fn position(&self, id: BodyId) -> Option<Vec3>;
    fn set_position(&mut self, id: BodyId, position: Vec3) -> bool;
    /// Instantaneous linear impulse
    fn apply_impulse(&mut self, id: BodyId, impulse: Vec3);
    /// Added to the current angular velocity
    fn apply_angular_velocity(&mut self, id: BodyId, delta: Vec3);
    fn set_mode(&mut self, id: BodyId, mode: BodyMode);
}

/// Toggling the special flag on a body
pub trait SpecialFlags {
    /// Returns false if the body does not exist
    fn set_special(&mut self, id: BodyId, special: bool) -> bool;
}

/// In-process body registry; the reference `PhysicsEngine`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Sorted by id
    pub bodies: Vec<Body>,
    pub physics: Vec<PhysicsState>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new body id
    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a dynamic body at rest
    pub fn spawn(&mut self, position: Vec3) -> BodyId {
        let id = self.next_body_id();
        let physics = self.physics.len();
        self.physics.push(PhysicsState::default());
        self.bodies.push(Body {
            id,
            position,
            is_special: false,
            physics,
        });
        id
    }

    /// Spawn coins uniformly inside the configured spawn box
    pub fn spawn_coins<R: Rng + ?Sized>(&mut self, config: &PhysicsConfig, rng: &mut R) -> Vec<BodyId> {
        let half_w = config.spawn_area_width / 2.0;
        let half_h = config.spawn_area_height / 2.0;
        let depth = config.spawn_depth_variance;

        (0..config.coin_count)
            .map(|_| {
                let pos = Vec3::new(
                    sample_symmetric(rng, half_w),
                    sample_symmetric(rng, half_h),
                    sample_symmetric(rng, depth),
                );
                self.spawn(pos)
            })
            .collect()
    }

    /// Destroy every body. Ids are not reused.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.physics.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(|b| b.id).collect()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &mut self.bodies[i])
    }

    pub fn state(&self, id: BodyId) -> Option<&PhysicsState> {
        self.body(id).and_then(|b| self.physics.get(b.physics))
    }

    fn state_mut(&mut self, id: BodyId) -> Option<&mut PhysicsState> {
        let idx = self.body(id)?.physics;
        self.physics.get_mut(idx)
    }

    /// Ids of bodies currently flagged special
    pub fn special_ids(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.is_special)
            .map(|b| b.id)
            .collect()
    }
}

impl PhysicsEngine for World {
    fn position(&self, id: BodyId) -> Option<Vec3> {
        self.body(id).map(|b| b.position)
    }

    fn set_position(&mut self, id: BodyId, position: Vec3) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.position = position;
                true
            }
            None => false,
        }
    }

    fn apply_impulse(&mut self, id: BodyId, impulse: Vec3) {
        if let Some(state) = self.state_mut(id)
            && state.mode == BodyMode::Dynamic
        {
            state.velocity += impulse / COIN_MASS;
        }
    }

    fn apply_angular_velocity(&mut self, id: BodyId, delta: Vec3) {
        if let Some(state) = self.state_mut(id)
            && state.mode == BodyMode::Dynamic
        {
            state.angular_velocity += delta;
        }
    }

    fn set_mode(&mut self, id: BodyId, mode: BodyMode) {
        if let Some(state) = self.state_mut(id) {
            state.mode = mode;
        }
    }
}

impl SpecialFlags for World {
    fn set_special(&mut self, id: BodyId, special: bool) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.is_special = special;
                true
            }
            None => false,
        }
    }
}
