//! Discrete-event queue driving the solver.
//!
//! Events are ordered by `(time, priority, sequence)`. At equal times
//! completions are applied before decisions: mission rewards land first, then
//! building effects, research, training, and finally the state-changed
//! sentinel that re-evaluates every idle queue. The sequence is a per-queue
//! insertion counter, so ordering never depends on anything outside the run.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::actions::BuildingUpgrade;
use crate::units::UnitKind;

/// What happens when an event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A running mission returns its units and rewards.
    MissionComplete {
        /// Id of the running mission.
        mission_id: u64,
    },
    /// A building upgrade finishes.
    BuildingComplete(BuildingUpgrade),
    /// A research finishes.
    ResearchComplete {
        /// Technology name.
        technology: String,
    },
    /// A unit finishes training.
    TrainingComplete {
        /// Trained unit kind.
        unit: UnitKind,
    },
    /// Re-evaluate decisions for every idle queue.
    StateChanged,
}

impl EventKind {
    /// Processing priority at equal times; lower fires first.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            EventKind::MissionComplete { .. } => 0,
            EventKind::BuildingComplete(_) => 1,
            EventKind::ResearchComplete { .. } => 2,
            EventKind::TrainingComplete { .. } => 3,
            EventKind::StateChanged => 10,
        }
    }

    /// Whether this is the state-changed sentinel.
    #[must_use]
    pub const fn is_state_changed(&self) -> bool {
        matches!(self, EventKind::StateChanged)
    }
}

/// An event scheduled at a simulated time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Seconds since the start of the run.
    pub time: u64,
    /// Insertion order within the queue.
    pub sequence: u64,
    /// What should happen.
    pub kind: EventKind,
}

impl Event {
    fn key(&self) -> (u64, u8, u64) {
        (self.time, self.kind.priority(), self.sequence)
    }
}

// BinaryHeap is a max-heap; reverse the key so the smallest fires first.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Min-heap of events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    next_sequence: u64,
}

impl EventQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event.
    pub fn push(&mut self, time: u64, kind: EventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Event {
            time,
            sequence,
            kind,
        });
    }

    /// Schedule an event unless it is a state-changed sentinel that is
    /// already pending at the same time. Other kinds are always pushed.
    ///
    /// Returns whether an event was added.
    pub fn push_if_absent(&mut self, time: u64, kind: EventKind) -> bool {
        if kind.is_state_changed()
            && self
                .heap
                .iter()
                .any(|e| e.time == time && e.kind.is_state_changed())
        {
            return false;
        }
        self.push(time, kind);
        true
    }

    /// Remove the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    /// The earliest event without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
