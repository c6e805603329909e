// Active touch/pointer contacts for one gesture surface

use super::geometry::Point;

/// Opaque contact identifier (a pointer id or a touch identifier).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub pos: Point,
}

/// What a tracker mutation did to the active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactChange {
    Added,
    Moved,
    Removed,
    /// Unknown id on move/up, nothing changed.
    Ignored,
}

impl ContactChange {
    pub fn is_membership(self) -> bool {
        matches!(self, ContactChange::Added | ContactChange::Removed)
    }
}

/// Contacts kept in the order they went down. `first()`/`second()` are the
/// two longest-held contacts; position updates never reorder the set.
#[derive(Default, Debug, Clone)]
pub struct ContactTracker {
    contacts: Vec<Contact>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_or_update(&mut self, id: ContactId, x: f64, y: f64) -> ContactChange {
        let pos = Point::new(x, y);
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.pos = pos;
                ContactChange::Moved
            }
            None => {
                self.contacts.push(Contact { id, pos });
                ContactChange::Added
            }
        }
    }

    /// Position update for a contact that is already down.
    pub fn update(&mut self, id: ContactId, x: f64, y: f64) -> ContactChange {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.pos = Point::new(x, y);
                ContactChange::Moved
            }
            None => ContactChange::Ignored,
        }
    }

    pub fn remove(&mut self, id: ContactId) -> ContactChange {
        match self.contacts.iter().position(|c| c.id == id) {
            Some(idx) => {
                self.contacts.remove(idx);
                ContactChange::Removed
            }
            None => ContactChange::Ignored,
        }
    }

    /// Drops every contact, e.g. when the surface loses focus mid-gesture.
    pub fn clear(&mut self) -> ContactChange {
        if self.contacts.is_empty() {
            ContactChange::Ignored
        } else {
            self.contacts.clear();
            ContactChange::Removed
        }
    }

    pub fn count(&self) -> usize {
        self.contacts.len()
    }

    pub fn first(&self) -> Option<&Contact> {
        self.contacts.first()
    }

    pub fn second(&self) -> Option<&Contact> {
        self.contacts.get(1)
    }
}
