//! Thrust input flag fed by pointer, touch, and keyboard edges.
use std::collections::HashSet;

use bevy::prelude::*;

/// Physical source of a pointer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch(u64),
    Keyboard,
}

/// Edge-triggered pointer transition from one input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(PointerSource),
    Up(PointerSource),
}

/// Whether thrust is currently held. True while any source is down.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ThrustInput {
    held: HashSet<PointerSource>,
}

impl ThrustInput {
    pub fn is_thrusting(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Applies one edge; returns true when the flag changed.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        let before = self.is_thrusting();
        match event {
            PointerEvent::Down(source) => {
                self.held.insert(source);
            }
            PointerEvent::Up(source) => {
                self.held.remove(&source);
            }
        }
        before != self.is_thrusting()
    }

    /// Applies edges in arrival order.
    pub fn apply_all(&mut self, events: impl IntoIterator<Item = PointerEvent>) -> bool {
        let before = self.is_thrusting();
        for event in events {
            self.apply(event);
        }
        before != self.is_thrusting()
    }
}
