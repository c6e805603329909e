//! Gesture-to-transform engine.
//!
//! Every recompute is a pure function of the gesture-start snapshot and the
//! live contact positions, so per-event rounding never accumulates. The
//! snapshot is retaken whenever the number of contacts changes, which keeps
//! the emitted transform continuous across one/two-finger hand-offs.

use log::{debug, trace};

use super::contacts::{ContactChange, ContactTracker};
use super::geometry::{Point, angle_deg, clamp, distance, midpoint};
use super::transform::TransformState;
use crate::config::GestureLimits;

/// Receives every new transform, synchronously.
pub trait TransformSink {
    fn on_transform_changed(&mut self, state: &TransformState);

    /// The transform stopped changing: last contact lifted, or it was
    /// replaced outright by reset/fit.
    fn on_transform_settled(&mut self, _state: &TransformState) {}
}

impl<F: FnMut(&TransformState)> TransformSink for F {
    fn on_transform_changed(&mut self, state: &TransformState) {
        self(state)
    }
}

/// Transform and contact positions captured when a gesture phase starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSnapshot {
    pub start: TransformState,
    pub p0: Point,
    pub p1: Point,
}

impl GestureSnapshot {
    pub fn capture(start: TransformState, contacts: &ContactTracker) -> Self {
        Self {
            start,
            p0: contacts.first().map(|c| c.pos).unwrap_or(Point::ZERO),
            p1: contacts.second().map(|c| c.pos).unwrap_or(Point::ZERO),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Panning,
    Pinching,
}

impl GesturePhase {
    pub fn for_count(n: usize) -> Self {
        match n {
            0 => GesturePhase::Idle,
            1 => GesturePhase::Panning,
            _ => GesturePhase::Pinching,
        }
    }
}

/// One-finger pan: translation follows the first contact.
pub fn pan(snap: &GestureSnapshot, now: Point) -> TransformState {
    TransformState {
        tx: snap.start.tx + (now.x - snap.p0.x),
        ty: snap.start.ty + (now.y - snap.p0.y),
        ..snap.start
    }
}

/// Two-finger pinch/rotate/pan from the first two contacts.
pub fn pinch(snap: &GestureSnapshot, c1: Point, c2: Point) -> TransformState {
    let d0 = distance(snap.p0, snap.p1);
    let d0 = if d0 == 0.0 { 1.0 } else { d0 };
    let scale_change = distance(c1, c2) / d0;
    let scale = clamp(
        snap.start.scale * scale_change,
        GestureLimits::MIN_SCALE,
        GestureLimits::MAX_SCALE,
    );
    let rotation_deg = snap.start.rotation_deg + (angle_deg(c1, c2) - angle_deg(snap.p0, snap.p1));
    let mid0 = midpoint(snap.p0, snap.p1);
    let mid = midpoint(c1, c2);
    TransformState {
        tx: snap.start.tx + (mid.x - mid0.x),
        ty: snap.start.ty + (mid.y - mid0.y),
        scale,
        rotation_deg,
    }
}

pub struct TransformEngine<S> {
    state: TransformState,
    snapshot: GestureSnapshot,
    sink: S,
}

impl<S: TransformSink> TransformEngine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: TransformState::IDENTITY,
            snapshot: GestureSnapshot::default(),
            sink,
        }
    }

    pub fn current_transform(&self) -> TransformState {
        self.state
    }

    pub fn snapshot(&self) -> &GestureSnapshot {
        &self.snapshot
    }

    /// Routes a tracker mutation: membership changes retake the snapshot,
    /// position changes recompute and emit.
    pub fn on_contacts_changed(&mut self, change: ContactChange, contacts: &ContactTracker) {
        if change.is_membership() {
            self.begin_phase(contacts);
        } else if change == ContactChange::Moved {
            self.recompute(contacts);
        }
    }

    pub fn begin_phase(&mut self, contacts: &ContactTracker) {
        self.snapshot = GestureSnapshot::capture(self.state, contacts);
        debug!(
            "gesture phase {:?}: {} contact(s), snapshot {:?}",
            GesturePhase::for_count(contacts.count()),
            contacts.count(),
            self.snapshot
        );
        if contacts.count() == 0 {
            self.sink.on_transform_settled(&self.state);
        }
    }

    pub fn recompute(&mut self, contacts: &ContactTracker) {
        let next = match (contacts.first(), contacts.second()) {
            (None, _) => return,
            (Some(c), None) => pan(&self.snapshot, c.pos),
            (Some(a), Some(b)) => pinch(&self.snapshot, a.pos, b.pos),
        };
        trace!("recompute -> {next:?}");
        self.state = next;
        self.sink.on_transform_changed(&self.state);
    }

    pub fn reset(&mut self, contacts: &ContactTracker) {
        self.set_transform(TransformState::IDENTITY, contacts);
    }

    /// Replaces the transform outright (reset, initial fit). Any gesture in
    /// progress continues from the new value.
    pub fn set_transform(&mut self, state: TransformState, contacts: &ContactTracker) {
        self.state = state.with_scale_clamped();
        self.snapshot = GestureSnapshot::capture(self.state, contacts);
        self.sink.on_transform_changed(&self.state);
        self.sink.on_transform_settled(&self.state);
    }
}
