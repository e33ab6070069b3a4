//! Pointer and touch input normalisation.
//!
//! Raw press/move/release samples from any device are folded into abstract
//! drag gestures. Mouse and pen drags activate after travelling a minimum
//! distance. Touch drags activate after the press is held still for a delay;
//! moving past the tolerance first is treated as a scroll and aborts the
//! gesture. A press released before activation is a tap.

use super::{DealId, Point};
use chrono::{DateTime, TimeDelta, Utc};

/// Input device that produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse pointer.
    Mouse,
    /// Stylus.
    Pen,
    /// Finger on a touch screen.
    Touch,
}

/// One raw input sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    /// Device kind.
    pub kind: PointerKind,
    /// Position in board pixels.
    pub position: Point,
    /// When the sample was taken.
    pub at: DateTime<Utc>,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(kind: PointerKind, position: Point, at: DateTime<Utc>) -> Self {
        Self { kind, position, at }
    }
}

/// Device-independent drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    /// A drag of the deal activated.
    Start {
        /// Dragged deal.
        deal_id: DealId,
        /// Pointer position at activation.
        position: Point,
    },
    /// The pointer moved while dragging.
    Move {
        /// Pointer position.
        position: Point,
    },
    /// The pointer was released while dragging.
    End {
        /// Release position.
        position: Point,
    },
    /// The drag was cancelled by the device or the user.
    Cancel,
    /// The card was tapped without dragging.
    Tap {
        /// Tapped deal.
        deal_id: DealId,
    },
}

/// Thresholds separating drags from taps and scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationConstraints {
    /// Pixels a mouse or pen must travel before a drag starts.
    pub pointer_distance: u32,
    /// How long a touch must be held before a drag starts.
    pub touch_delay: TimeDelta,
    /// Pixels a held touch may wander before the gesture is abandoned.
    pub touch_tolerance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Idle,
    Pressed {
        deal_id: DealId,
        kind: PointerKind,
        origin: Point,
        pressed_at: DateTime<Utc>,
    },
    Dragging,
    Abandoned,
}

/// Folds raw samples for one pointer into [`DragGesture`]s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    constraints: ActivationConstraints,
    state: TrackerState,
}

impl PointerTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub const fn new(constraints: ActivationConstraints) -> Self {
        Self {
            constraints,
            state: TrackerState::Idle,
        }
    }

    /// Returns whether a drag is active.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, TrackerState::Dragging)
    }

    /// Records a press on a card. Never activates a drag by itself.
    pub const fn press(&mut self, deal_id: DealId, sample: PointerSample) {
        self.state = TrackerState::Pressed {
            deal_id,
            kind: sample.kind,
            origin: sample.position,
            pressed_at: sample.at,
        };
    }

    /// Processes pointer movement.
    pub fn motion(&mut self, sample: PointerSample) -> Option<DragGesture> {
        match self.state {
            TrackerState::Dragging => Some(DragGesture::Move {
                position: sample.position,
            }),
            TrackerState::Pressed {
                deal_id,
                kind,
                origin,
                pressed_at,
            } => {
                let travelled = origin.distance_squared(sample.position);
                match kind {
                    PointerKind::Mouse | PointerKind::Pen => {
                        (travelled >= squared(self.constraints.pointer_distance))
                            .then(|| self.activate(deal_id, sample.position))
                    }
                    PointerKind::Touch => {
                        if travelled > squared(self.constraints.touch_tolerance) {
                            self.state = TrackerState::Abandoned;
                            return None;
                        }
                        self.touch_held(pressed_at, sample.at)
                            .then(|| self.activate(deal_id, sample.position))
                    }
                }
            }
            TrackerState::Idle | TrackerState::Abandoned => None,
        }
    }

    /// Re-evaluates a held touch without movement.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<DragGesture> {
        let TrackerState::Pressed {
            deal_id,
            kind: PointerKind::Touch,
            origin,
            pressed_at,
        } = self.state
        else {
            return None;
        };
        self.touch_held(pressed_at, now)
            .then(|| self.activate(deal_id, origin))
    }

    /// Processes the pointer being lifted.
    pub const fn release(&mut self, sample: PointerSample) -> Option<DragGesture> {
        let gesture = match self.state {
            TrackerState::Dragging => Some(DragGesture::End {
                position: sample.position,
            }),
            TrackerState::Pressed { deal_id, .. } => Some(DragGesture::Tap { deal_id }),
            TrackerState::Idle | TrackerState::Abandoned => None,
        };
        self.state = TrackerState::Idle;
        gesture
    }

    /// Processes a device or keyboard cancellation.
    pub const fn cancel(&mut self) -> Option<DragGesture> {
        let was_dragging = self.is_dragging();
        self.state = TrackerState::Idle;
        if was_dragging {
            Some(DragGesture::Cancel)
        } else {
            None
        }
    }

    fn touch_held(&self, pressed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(pressed_at) >= self.constraints.touch_delay
    }

    const fn activate(&mut self, deal_id: DealId, position: Point) -> DragGesture {
        self.state = TrackerState::Dragging;
        DragGesture::Start { deal_id, position }
    }
}

fn squared(value: u32) -> i64 {
    let wide = i64::from(value);
    wide * wide
}
