//! Special-coin selection
//!
//! At most one registered body carries the special flag, and it is always the
//! one the selector tracks.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, SpecialFlags};

/// Whether the previous special coin may be drawn again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReselectPolicy {
    /// Uniform over every registered body
    #[default]
    AllowRepeat,
    /// Skip the previous special coin when another body exists
    ExcludePrevious,
}

/// Which body is special and whether it was found this session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialCoinState {
    pub current: Option<BodyId>,
    pub found_this_session: bool,
}

/// Tracks the registered coins and the special one among them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialCoinSelector {
    bodies: Vec<BodyId>,
    state: SpecialCoinState,
    /// Last body selected, kept across `mark_found` for `ExcludePrevious`
    previous: Option<BodyId>,
    pub policy: ReselectPolicy,
}

impl SpecialCoinSelector {
    pub fn new(policy: ReselectPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Replace the tracked bodies. Does not pick a special one.
    ///
    /// The tracked special body is dropped if it is not in the new set.
    pub fn register_bodies<F: SpecialFlags + ?Sized>(&mut self, flags: &mut F, bodies: Vec<BodyId>) {
        if let Some(current) = self.state.current
            && !bodies.contains(&current)
        {
            flags.set_special(current, false);
            self.state.current = None;
        }
        log::debug!("Registered {} bodies", bodies.len());
        self.bodies = bodies;
        self.state.found_this_session = false;
    }

    /// Clear the old special flag and draw a new special body
    pub fn select_new<F, R>(&mut self, flags: &mut F, rng: &mut R) -> Option<BodyId>
    where
        F: SpecialFlags + ?Sized,
        R: Rng + ?Sized,
    {
        self.state.found_this_session = false;

        if let Some(old) = self.state.current.take() {
            flags.set_special(old, false);
            self.previous = Some(old);
        }

        let chosen = match (self.policy, self.previous) {
            (ReselectPolicy::ExcludePrevious, Some(prev)) if self.bodies.len() > 1 => {
                let candidates: Vec<BodyId> =
                    self.bodies.iter().copied().filter(|&id| id != prev).collect();
                // Only duplicates of `prev` registered: fall back to the full set
                candidates
                    .choose(rng)
                    .copied()
                    .or_else(|| self.bodies.choose(rng).copied())
            }
            _ => self.bodies.choose(rng).copied(),
        }?;

        flags.set_special(chosen, true);
        self.state.current = Some(chosen);
        self.previous = Some(chosen);
        log::info!("Special coin selected: {:?}", chosen);
        Some(chosen)
    }

    /// Clear the special flag without choosing a replacement
    pub fn mark_found<F: SpecialFlags + ?Sized>(&mut self, flags: &mut F) -> Option<BodyId> {
        self.state.found_this_session = true;
        let found = self.state.current.take()?;
        flags.set_special(found, false);
        log::info!("Special coin found: {:?}", found);
        Some(found)
    }

    pub fn is_special(&self, id: BodyId) -> bool {
        self.state.current == Some(id)
    }

    pub fn current(&self) -> Option<BodyId> {
        self.state.current
    }

    pub fn found_this_session(&self) -> bool {
        self.state.found_this_session
    }

    pub fn state(&self) -> &SpecialCoinState {
        &self.state
    }

    pub fn registered(&self) -> &[BodyId] {
        &self.bodies
    }
}
