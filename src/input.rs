//! Click-to-burst controller.
//!
//! An accepted click queues `click_burst_particles` spawns, each due
//! `click_burst_stagger_ms` after the previous one, so a burst reads as a
//! short eruption.  The frame driver drains due entries every frame; clicks
//! inside the cooldown window are dropped, never queued.

use crate::config::EngineConfig;
use bevy::prelude::*;
use std::collections::VecDeque;

/// A burst spawn waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawn {
    pub due_ms: f64,
    pub position: Vec2,
}

/// Cooldown gate plus the queue of staggered burst spawns.
#[derive(Debug, Default)]
pub struct BurstController {
    last_accepted_ms: Option<f64>,
    pending: VecDeque<PendingSpawn>,
}

impl BurstController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click at `position` (surface coordinates).
    ///
    /// Returns `true` when the click was accepted and a burst queued.
    pub fn on_click(
        &mut self,
        position: Vec2,
        now_ms: f64,
        motion_allowed: bool,
        config: &EngineConfig,
    ) -> bool {
        if !motion_allowed {
            return false;
        }
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < f64::from(config.click_burst_cooldown_ms) {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);

        let stagger = f64::from(config.click_burst_stagger_ms);
        self.pending
            .extend((0..config.click_burst_particles).map(|i| PendingSpawn {
                due_ms: now_ms + i as f64 * stagger,
                position,
            }));
        true
    }

    /// Pop the next spawn whose due time has been reached.
    ///
    /// Drains in click order: spawns of a later click wait behind the
    /// earlier click's remaining spawns.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Vec2> {
        if self.pending.front()?.due_ms <= now_ms {
            self.pending.pop_front().map(|spawn| spawn.position)
        } else {
            None
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Forget queued spawns and the cooldown.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.last_accepted_ms = None;
    }
}
