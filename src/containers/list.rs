//! Singly-linked list with a sentinel root.
//!
//! ```text
//! root ──> a ──> b ──> c ──> NIL
//!  ^                   ^
//!  before_begin        tail
//! ```
//!
//! Every structural edit is relative to a node's successor (`insert_after`,
//! `remove_after`) and only rewires local links. Cursors reference nodes, so
//! they survive edits elsewhere in the list and only go stale when their own
//! node is removed. The version counter is never bumped.

use std::fmt;
use std::rc::Rc;

use super::arena::{Arena, NIL, ROOT, Slot};
use crate::check::require;
use crate::concept::{surface_of, Member, Surface, Tier};
use crate::container::{Container, Sequence, Shared};
use crate::cursor::{Cursor, ForwardCursor, InputCursor, OutputCursor};
use crate::error::{Error, Result};

pub(crate) struct ListStore<T> {
    arena: Arena<T>,
    tail: u32,
}

impl<T> ListStore<T> {
    fn new() -> ListStore<T> {
        let mut arena = Arena::new();
        arena.node_mut(ROOT).next = NIL;
        return ListStore { arena, tail: ROOT };
    }

    fn link_after(&mut self, anchor: u32, value: T) -> u32 {
        let index = self.arena.alloc(value);
        let next = self.arena.node(anchor).next;
        self.arena.node_mut(index).next = next;
        self.arena.node_mut(anchor).next = index;
        if self.tail == anchor {
            self.tail = index;
        }
        return index;
    }

    fn unlink_after(&mut self, anchor: u32) -> Option<T> {
        let target = self.arena.node(anchor).next;
        if target == NIL {
            return None;
        }
        let next = self.arena.node(target).next;
        self.arena.node_mut(anchor).next = next;
        if self.tail == target {
            self.tail = anchor;
        }
        return self.arena.release(target);
    }

    fn first(&self) -> u32 {
        return self.arena.node(ROOT).next;
    }
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        return Self::new();
    }
}

/// Forward-only linked list.
pub struct List<T> {
    shared: Rc<Shared<ListStore<T>>>,
}

/// Cursor into a [`List`].
pub struct ListCursor<T> {
    shared: Rc<Shared<ListStore<T>>>,
    slot: Slot,
}

impl<T: Clone> List<T> {
    /// Create an empty list.
    pub fn new() -> List<T> {
        return List { shared: Shared::new(ListStore::new()) };
    }

    fn cursor(&self, slot: Slot) -> ListCursor<T> {
        return ListCursor { shared: Rc::clone(&self.shared), slot };
    }

    /// Cursor at the sentinel root, one before the first element.
    ///
    /// Only useful as an anchor for `insert_after` and `remove_after`; it
    /// holds no value.
    pub fn before_begin(&self) -> Result<ListCursor<T>> {
        self.shared.live()?;
        let slot = self.shared.read().arena.slot(ROOT);
        return Ok(self.cursor(slot));
    }

    /// Check that `at` belongs to this list, is live, and is not the end.
    fn anchor(&self, at: &ListCursor<T>) -> Result<u32> {
        self.shared.live()?;
        require!(Rc::ptr_eq(&self.shared, &at.shared), Error::NotEquatable);
        require!(self.shared.read().arena.is_live(at.slot), Error::Stale);
        require!(at.slot.index != NIL, Error::UpdateOutOfBounds);
        return Ok(at.slot.index);
    }

    /// Insert `value` after `at` and return a cursor to it.
    pub fn insert_after(&mut self, at: &ListCursor<T>, value: T) -> Result<ListCursor<T>> {
        let anchor = self.anchor(at)?;
        let mut store = self.shared.write();
        let index = store.link_after(anchor, value);
        let slot = store.arena.slot(index);
        drop(store);
        return Ok(self.cursor(slot));
    }

    /// Remove and return the element after `at`.
    ///
    /// Fails with `UpdateOutOfBounds` when `at` is the last element.
    pub fn remove_after(&mut self, at: &ListCursor<T>) -> Result<T> {
        let anchor = self.anchor(at)?;
        return self.shared.write().unlink_after(anchor).ok_or(Error::UpdateOutOfBounds);
    }
}

impl<T: Clone> Container for List<T> {
    type Item = T;
    type Cursor = ListCursor<T>;

    fn begin(&self) -> Result<ListCursor<T>> {
        self.shared.live()?;
        let store = self.shared.read();
        let slot = store.arena.slot(store.first());
        drop(store);
        return Ok(self.cursor(slot));
    }

    fn end(&self) -> Result<ListCursor<T>> {
        self.shared.live()?;
        return Ok(self.cursor(Slot::END));
    }

    fn count(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().arena.len());
    }

    fn front(&self) -> Result<T> {
        self.shared.live()?;
        let store = self.shared.read();
        let first = store.first();
        if first == NIL {
            return Err(Error::Empty);
        }
        return store.arena.node(first).value.clone().ok_or(Error::Empty);
    }

    fn dispose(&mut self) {
        self.shared.dispose();
    }

    fn is_disposed(&self) -> bool {
        return self.shared.is_disposed();
    }

    fn version(&self) -> u64 {
        return self.shared.version();
    }
}

impl<T: Clone> Sequence for List<T> {
    fn push(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let tail = store.tail;
        store.link_after(tail, value);
        return Ok(());
    }

    fn shift(&mut self) -> Result<T> {
        self.shared.live()?;
        return self.shared.write().unlink_after(ROOT).ok_or(Error::Empty);
    }

    fn unshift(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().link_after(ROOT, value);
        return Ok(());
    }
}

impl<T: Clone> Default for List<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = List::new();
        {
            let mut store = list.shared.write();
            for value in iter {
                let tail = store.tail;
                store.link_after(tail, value);
            }
        }
        return list;
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_disposed() {
            return f.write_str("List(<disposed>)");
        }
        let store = self.shared.read();
        let mut list = f.debug_list();
        let mut index = store.first();
        while index != NIL {
            let node = store.arena.node(index);
            if let Some(value) = &node.value {
                list.entry(value);
            }
            index = node.next;
        }
        return list.finish();
    }
}

impl<T> ListCursor<T> {
    /// Fail unless the list is live and this cursor's node still exists.
    fn validate(&self) -> Result<()> {
        self.shared.live()?;
        require!(self.shared.read().arena.is_live(self.slot), Error::Stale);
        return Ok(());
    }

    /// Whether this cursor is at the end position.
    pub fn is_end(&self) -> bool {
        return self.slot.index == NIL;
    }
}

impl<T> Clone for ListCursor<T> {
    fn clone(&self) -> Self {
        return ListCursor { shared: Rc::clone(&self.shared), slot: self.slot };
    }
}

impl<T> fmt::Debug for ListCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self.slot.index {
            NIL => f.write_str("ListCursor(end)"),
            ROOT => f.write_str("ListCursor(before_begin)"),
            index => write!(f, "ListCursor({}@{})", index, self.slot.generation),
        };
    }
}

impl<T: Clone> Cursor for ListCursor<T> {
    type Item = T;
    const TIER: Tier = Tier::Forward;

    fn equatable_to(&self, other: &Self) -> bool {
        return Rc::ptr_eq(&self.shared, &other.shared);
    }

    fn equals(&self, other: &Self) -> Result<bool> {
        require!(self.equatable_to(other), Error::NotEquatable);
        self.validate()?;
        other.validate()?;
        return Ok(self.slot == other.slot);
    }
}

impl<T: Clone> InputCursor for ListCursor<T> {
    fn value(&self) -> Result<T> {
        self.validate()?;
        require!(self.slot.index != NIL, Error::OutOfBoundsRead);
        let store = self.shared.read();
        return store.arena.node(self.slot.index).value.clone().ok_or(Error::OutOfBoundsRead);
    }
}

impl<T: Clone> OutputCursor for ListCursor<T> {
    fn set_value(&self, value: T) -> Result<()> {
        self.validate()?;
        require!(self.slot.index != NIL, Error::OutOfBoundsWrite);
        let mut store = self.shared.write();
        let node = store.arena.node_mut(self.slot.index);
        let Some(slot) = node.value.as_mut() else {
            return Err(Error::OutOfBoundsWrite);
        };
        *slot = value;
        return Ok(());
    }
}

impl<T: Clone> ForwardCursor for ListCursor<T> {
    fn step(&mut self) -> Result<()> {
        self.validate()?;
        require!(self.slot.index != NIL, Error::OutOfBoundsMove);
        let store = self.shared.read();
        let next = store.arena.node(self.slot.index).next;
        let slot = store.arena.slot(next);
        drop(store);
        self.slot = slot;
        return Ok(());
    }
}

impl<T: Clone + 'static> Surface for ListCursor<T> {
    const MEMBERS: &'static [Member] = surface_of(Tier::Forward);
}
