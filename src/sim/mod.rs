//! Coin simulation
//!
//! Everything here is synchronous and single-threaded:
//! - Force evaluation is pure; callers apply the result
//! - Randomness comes from a seeded RNG
//! - Bodies iterate in id order
//! - No rendering or platform dependencies

pub mod body;
pub mod driver;
pub mod force;
pub mod schedule;
pub mod selector;

pub use body::{Body, BodyId, BodyMode, PhysicsEngine, PhysicsState, SpecialFlags, World};
pub use driver::{HapticKind, SimEvent, Simulation, apply_sample};
pub use force::{ForceModel, ForceSample, InteractionEvent};
pub use schedule::Scheduler;
pub use selector::{ReselectPolicy, SpecialCoinSelector, SpecialCoinState};
