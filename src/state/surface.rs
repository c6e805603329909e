// One gesture surface: contact tracker feeding a transform engine

use log::debug;

use super::contacts::{ContactChange, ContactId, ContactTracker};
use super::engine::{GesturePhase, TransformEngine, TransformSink};
use super::transform::{TransformState, fit_to_frame};

/// Input-adapter facing entry point. Adapters translate their native events
/// into `down`/`move_to`/`up`; cancel and leave are reported as `up`.
pub struct GestureSurface<S> {
    contacts: ContactTracker,
    engine: TransformEngine<S>,
}

impl<S: TransformSink> GestureSurface<S> {
    pub fn new(sink: S) -> Self {
        Self {
            contacts: ContactTracker::new(),
            engine: TransformEngine::new(sink),
        }
    }

    pub fn down(&mut self, id: ContactId, x: f64, y: f64) {
        let change = self.contacts.add_or_update(id, x, y);
        if change == ContactChange::Added {
            debug!("contact {:?} down at ({x:.1}, {y:.1})", id);
        }
        self.engine.on_contacts_changed(change, &self.contacts);
    }

    pub fn move_to(&mut self, id: ContactId, x: f64, y: f64) {
        let change = self.contacts.update(id, x, y);
        self.engine.on_contacts_changed(change, &self.contacts);
    }

    pub fn up(&mut self, id: ContactId) {
        let change = self.contacts.remove(id);
        if change == ContactChange::Removed {
            debug!("contact {:?} up, now {:?}", id, self.phase());
        }
        self.engine.on_contacts_changed(change, &self.contacts);
    }

    /// Lifts every contact at once (window blur, adapter teardown).
    pub fn cancel_all(&mut self) {
        let change = self.contacts.clear();
        self.engine.on_contacts_changed(change, &self.contacts);
    }

    pub fn reset(&mut self) {
        self.engine.reset(&self.contacts);
    }

    pub fn set_transform(&mut self, state: TransformState) {
        self.engine.set_transform(state, &self.contacts);
    }

    /// Centres and scales a `w`x`h` image to fit a `fw`x`fh` frame.
    pub fn fit(&mut self, w: f64, h: f64, fw: f64, fh: f64) -> crate::error::Result<TransformState> {
        let t = fit_to_frame(w, h, fw, fh)?;
        self.set_transform(t);
        Ok(self.current_transform())
    }

    pub fn current_transform(&self) -> TransformState {
        self.engine.current_transform()
    }

    pub fn phase(&self) -> GesturePhase {
        GesturePhase::for_count(self.contacts.count())
    }

    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureLimits;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<TransformState>>>;

    fn surface() -> (GestureSurface<impl FnMut(&TransformState)>, Log) {
        let seen: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            move |s: &TransformState| seen.borrow_mut().push(*s)
        };
        (GestureSurface::new(sink), seen)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    const A: ContactId = ContactId(1);
    const B: ContactId = ContactId(2);
    const C: ContactId = ContactId(3);

    #[test]
    fn single_contact_pans() {
        let (mut s, seen) = surface();
        s.down(A, 100.0, 100.0);
        s.move_to(A, 150.0, 130.0);
        assert_eq!(
            s.current_transform(),
            TransformState { tx: 50.0, ty: 30.0, scale: 1.0, rotation_deg: 0.0 }
        );
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(s.phase(), GesturePhase::Panning);
    }

    #[test]
    fn two_contacts_pinch_and_follow_midpoint() {
        let (mut s, _) = surface();
        s.down(A, 0.0, 0.0);
        s.down(B, 100.0, 0.0);
        s.move_to(A, 0.0, 0.0);
        s.move_to(B, 200.0, 0.0);
        let t = s.current_transform();
        assert!(close(t.scale, 2.0));
        assert!(close(t.rotation_deg, 0.0));
        assert!(close(t.tx, 50.0));
        assert!(close(t.ty, 0.0));
        assert_eq!(s.phase(), GesturePhase::Pinching);
    }

    #[test]
    fn one_to_two_and_back_is_continuous() {
        let (mut s, seen) = surface();
        s.down(A, 10.0, 10.0);
        s.move_to(A, 40.0, 25.0);
        let before = s.current_transform();

        s.down(B, 90.0, 60.0);
        s.move_to(B, 90.0, 60.0);
        assert_eq!(s.current_transform(), before);

        s.move_to(B, 140.0, 60.0);
        let pinched = s.current_transform();
        assert_ne!(pinched, before);

        s.up(B);
        s.move_to(A, 40.0, 25.0);
        assert_eq!(s.current_transform(), pinched);
        assert_eq!(seen.borrow().last().copied(), Some(pinched));
    }

    #[test]
    fn third_contact_joining_and_first_lifting_is_continuous() {
        let (mut s, _) = surface();
        s.down(A, 0.0, 0.0);
        s.down(B, 100.0, 0.0);
        s.move_to(B, 150.0, 50.0);
        let before = s.current_transform();

        s.down(C, 300.0, 300.0);
        s.move_to(C, 310.0, 300.0);
        assert_eq!(s.current_transform(), before);

        // B and C become the pair
        s.up(A);
        s.move_to(B, 150.0, 50.0);
        assert_eq!(s.current_transform(), before);
        assert_eq!(s.contacts().first().map(|c| c.id), Some(B));
        assert_eq!(s.contacts().second().map(|c| c.id), Some(C));
    }

    #[test]
    fn rotation_accumulates_across_gestures() {
        let (mut s, _) = surface();
        for _ in 0..2 {
            s.down(A, 0.0, 0.0);
            s.down(B, 100.0, 0.0);
            s.move_to(B, 0.0, 100.0);
            s.up(B);
            s.up(A);
        }
        assert!(close(s.current_transform().rotation_deg, 180.0));

        for _ in 0..2 {
            s.down(A, 0.0, 0.0);
            s.down(B, 100.0, 0.0);
            s.move_to(B, 0.0, 100.0);
            s.up(B);
            s.up(A);
        }
        // not wrapped back to 0
        assert!(close(s.current_transform().rotation_deg, 360.0));
    }

    #[test]
    fn unknown_moves_and_ups_are_silent() {
        let (mut s, seen) = surface();
        s.move_to(C, 5.0, 5.0);
        s.up(C);
        assert!(seen.borrow().is_empty());
        assert_eq!(s.current_transform(), TransformState::IDENTITY);
    }

    #[test]
    fn reset_mid_gesture_continues_from_identity() {
        let (mut s, seen) = surface();
        s.down(A, 0.0, 0.0);
        s.move_to(A, 30.0, 30.0);
        s.reset();
        assert_eq!(s.current_transform(), TransformState::IDENTITY);
        s.move_to(A, 35.0, 30.0);
        assert_eq!(s.current_transform().tx, 5.0);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn fit_replaces_transform_and_emits() {
        let (mut s, seen) = surface();
        s.down(A, 0.0, 0.0);
        s.move_to(A, 40.0, 0.0);
        let t = s.fit(2000.0, 1000.0, 800.0, 800.0).unwrap();
        assert!((t.scale - 0.36).abs() < 1e-12);
        assert_eq!((t.tx, t.ty, t.rotation_deg), (0.0, 0.0, 0.0));
        assert_eq!(seen.borrow().last().copied(), Some(t));
        assert!(s.fit(0.0, 1000.0, 800.0, 800.0).is_err());
        assert_eq!(s.current_transform(), t);
    }

    #[test]
    fn cancel_all_returns_to_idle() {
        let (mut s, _) = surface();
        s.down(A, 0.0, 0.0);
        s.down(B, 10.0, 0.0);
        s.cancel_all();
        assert_eq!(s.phase(), GesturePhase::Idle);
        let frozen = s.current_transform();
        s.move_to(A, 99.0, 99.0);
        assert_eq!(s.current_transform(), frozen);
    }

    #[derive(Clone, Debug)]
    enum Ev {
        Down(i32, f64, f64),
        Move(i32, f64, f64),
        Up(i32),
    }

    fn ev() -> impl Strategy<Value = Ev> {
        let coord = -2000.0f64..2000.0;
        prop_oneof![
            (0..4i32, coord.clone(), coord.clone()).prop_map(|(i, x, y)| Ev::Down(i, x, y)),
            (0..4i32, coord.clone(), coord.clone()).prop_map(|(i, x, y)| Ev::Move(i, x, y)),
            (0..4i32).prop_map(Ev::Up),
        ]
    }

    fn replay(events: &[Ev]) -> Vec<TransformState> {
        let (mut s, seen) = surface();
        for e in events {
            match *e {
                Ev::Down(i, x, y) => s.down(ContactId(i), x, y),
                Ev::Move(i, x, y) => s.move_to(ContactId(i), x, y),
                Ev::Up(i) => s.up(ContactId(i)),
            }
        }
        let out = seen.borrow().clone();
        out
    }

    proptest! {
        #[test]
        fn scale_always_within_bounds(events in prop::collection::vec(ev(), 0..64)) {
            for t in replay(&events) {
                prop_assert!(t.scale >= GestureLimits::MIN_SCALE);
                prop_assert!(t.scale <= GestureLimits::MAX_SCALE);
            }
        }

        #[test]
        fn replay_is_deterministic(events in prop::collection::vec(ev(), 0..64)) {
            prop_assert_eq!(replay(&events), replay(&events));
        }

        #[test]
        fn single_contact_moves_only_translate(
            x0 in -500.0f64..500.0, y0 in -500.0f64..500.0,
            dx in -500.0f64..500.0, dy in -500.0f64..500.0,
        ) {
            let (mut s, _) = surface();
            s.set_transform(TransformState { tx: 3.0, ty: 4.0, scale: 1.5, rotation_deg: 45.0 });
            s.down(A, x0, y0);
            s.move_to(A, x0 + dx, y0 + dy);
            let t = s.current_transform();
            prop_assert!((t.tx - (3.0 + dx)).abs() < 1e-6);
            prop_assert!((t.ty - (4.0 + dy)).abs() < 1e-6);
            prop_assert_eq!(t.scale, 1.5);
            prop_assert_eq!(t.rotation_deg, 45.0);
        }

        #[test]
        fn reset_is_idempotent(events in prop::collection::vec(ev(), 0..32), times in 1usize..4) {
            let (mut s, _) = surface();
            for e in &events {
                match *e {
                    Ev::Down(i, x, y) => s.down(ContactId(i), x, y),
                    Ev::Move(i, x, y) => s.move_to(ContactId(i), x, y),
                    Ev::Up(i) => s.up(ContactId(i)),
                }
            }
            for _ in 0..times {
                s.reset();
                prop_assert_eq!(s.current_transform(), TransformState::IDENTITY);
            }
        }
    }
}
