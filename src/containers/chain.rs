//! Doubly-linked list closed into a ring by a sentinel root.
//!
//! ```text
//!   ┌──────────────────────────────────┐
//!   v                                  │
//! root <──> a <──> b <──> c <──────────┘
//! ```
//!
//! `root.next` is the first node and `root.prev` the last, so both ends are
//! O(1). The root doubles as the end position: stepping past the last node
//! lands on it, and stepping back from it reaches the last node.
//!
//! Like `List`, cursors follow node identity; removing a node only stales the
//! cursors that pointed at it.

use std::fmt;
use std::rc::Rc;

use super::arena::{Arena, ROOT, Slot};
use crate::check::require;
use crate::concept::{surface_of, Member, Surface, Tier};
use crate::container::{Container, Rewind, Sequence, Shared, Structural};
use crate::cursor::{BidirectionalCursor, Cursor, ForwardCursor, InputCursor, OutputCursor};
use crate::error::{Error, Result};

pub(crate) struct ChainStore<T> {
    arena: Arena<T>,
}

impl<T> ChainStore<T> {
    /// Link a new node in front of `anchor`.
    fn link_before(&mut self, anchor: u32, value: T) -> u32 {
        let index = self.arena.alloc(value);
        let prev = self.arena.node(anchor).prev;
        {
            let node = self.arena.node_mut(index);
            node.prev = prev;
            node.next = anchor;
        }
        self.arena.node_mut(prev).next = index;
        self.arena.node_mut(anchor).prev = index;
        return index;
    }

    fn unlink(&mut self, index: u32) -> Option<T> {
        if index == ROOT {
            return None;
        }
        let (prev, next) = {
            let node = self.arena.node(index);
            (node.prev, node.next)
        };
        self.arena.node_mut(prev).next = next;
        self.arena.node_mut(next).prev = prev;
        return self.arena.release(index);
    }

    fn first(&self) -> u32 {
        return self.arena.node(ROOT).next;
    }

    fn last(&self) -> u32 {
        return self.arena.node(ROOT).prev;
    }

    fn value(&self, index: u32) -> Option<&T> {
        return self.arena.node(index).value.as_ref();
    }
}

impl<T> Default for ChainStore<T> {
    fn default() -> Self {
        return ChainStore { arena: Arena::new() };
    }
}

/// Bidirectional linked list.
pub struct Chain<T> {
    shared: Rc<Shared<ChainStore<T>>>,
}

/// Cursor into a [`Chain`].
pub struct ChainCursor<T> {
    shared: Rc<Shared<ChainStore<T>>>,
    slot: Slot,
}

impl<T: Clone> Chain<T> {
    /// Create an empty chain.
    pub fn new() -> Chain<T> {
        return Chain { shared: Shared::new(ChainStore::default()) };
    }

    fn cursor(&self, slot: Slot) -> ChainCursor<T> {
        return ChainCursor { shared: Rc::clone(&self.shared), slot };
    }

    fn anchor(&self, at: &ChainCursor<T>) -> Result<u32> {
        self.shared.live()?;
        require!(Rc::ptr_eq(&self.shared, &at.shared), Error::NotEquatable);
        require!(self.shared.read().arena.is_live(at.slot), Error::Stale);
        require!(at.slot.index != ROOT, Error::UpdateOutOfBounds);
        return Ok(at.slot.index);
    }
}

impl<T: Clone> Container for Chain<T> {
    type Item = T;
    type Cursor = ChainCursor<T>;

    fn begin(&self) -> Result<ChainCursor<T>> {
        self.shared.live()?;
        let store = self.shared.read();
        let slot = store.arena.slot(store.first());
        drop(store);
        return Ok(self.cursor(slot));
    }

    fn end(&self) -> Result<ChainCursor<T>> {
        self.shared.live()?;
        let slot = self.shared.read().arena.slot(ROOT);
        return Ok(self.cursor(slot));
    }

    fn count(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().arena.len());
    }

    fn front(&self) -> Result<T> {
        self.shared.live()?;
        let store = self.shared.read();
        return store.value(store.first()).cloned().ok_or(Error::Empty);
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

impl<T: Clone> Sequence for Chain<T> {
    fn push(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().link_before(ROOT, value);
        return Ok(());
    }

    fn shift(&mut self) -> Result<T> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let first = store.first();
        return store.unlink(first).ok_or(Error::Empty);
    }

    fn unshift(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let first = store.first();
        store.link_before(first, value);
        return Ok(());
    }
}

impl<T: Clone> Rewind for Chain<T> {
    fn back(&self) -> Result<T> {
        self.shared.live()?;
        let store = self.shared.read();
        return store.value(store.last()).cloned().ok_or(Error::Empty);
    }

    fn pop(&mut self) -> Result<T> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let last = store.last();
        return store.unlink(last).ok_or(Error::Empty);
    }
}

impl<T: Clone> Structural for Chain<T> {
    fn insert(&mut self, at: &ChainCursor<T>, value: T) -> Result<ChainCursor<T>> {
        let anchor = self.anchor(at)?;
        let mut store = self.shared.write();
        let index = store.link_before(anchor, value);
        let slot = store.arena.slot(index);
        drop(store);
        return Ok(self.cursor(slot));
    }

    fn remove(&mut self, at: &ChainCursor<T>) -> Result<T> {
        let anchor = self.anchor(at)?;
        return self.shared.write().unlink(anchor).ok_or(Error::UpdateOutOfBounds);
    }
}

impl<T: Clone> Default for Chain<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let chain = Chain::new();
        {
            let mut store = chain.shared.write();
            for value in iter {
                store.link_before(ROOT, value);
            }
        }
        return chain;
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_disposed() {
            return f.write_str("Chain(<disposed>)");
        }
        let store = self.shared.read();
        let mut list = f.debug_list();
        let mut index = store.first();
        while index != ROOT {
            if let Some(value) = store.value(index) {
                list.entry(value);
            }
            index = store.arena.node(index).next;
        }
        return list.finish();
    }
}

impl<T> ChainCursor<T> {
    fn validate(&self) -> Result<()> {
        self.shared.live()?;
        require!(self.shared.read().arena.is_live(self.slot), Error::Stale);
        return Ok(());
    }

    /// Whether this cursor is at the end position.
    pub fn is_end(&self) -> bool {
        return self.slot.index == ROOT;
    }
}

impl<T> Clone for ChainCursor<T> {
    fn clone(&self) -> Self {
        return ChainCursor { shared: Rc::clone(&self.shared), slot: self.slot };
    }
}

impl<T> fmt::Debug for ChainCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slot.index == ROOT {
            return f.write_str("ChainCursor(end)");
        }
        return write!(f, "ChainCursor({}@{})", self.slot.index, self.slot.generation);
    }
}

impl<T: Clone> Cursor for ChainCursor<T> {
    type Item = T;
    const TIER: Tier = Tier::Bidirectional;

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

impl<T: Clone> InputCursor for ChainCursor<T> {
    fn value(&self) -> Result<T> {
        self.validate()?;
        require!(self.slot.index != ROOT, Error::OutOfBoundsRead);
        return self.shared.read().value(self.slot.index).cloned().ok_or(Error::OutOfBoundsRead);
    }
}

impl<T: Clone> OutputCursor for ChainCursor<T> {
    fn set_value(&self, value: T) -> Result<()> {
        self.validate()?;
        require!(self.slot.index != ROOT, Error::OutOfBoundsWrite);
        let mut store = self.shared.write();
        let Some(slot) = store.arena.node_mut(self.slot.index).value.as_mut() else {
            return Err(Error::OutOfBoundsWrite);
        };
        *slot = value;
        return Ok(());
    }
}

impl<T: Clone> ForwardCursor for ChainCursor<T> {
    fn step(&mut self) -> Result<()> {
        self.validate()?;
        require!(self.slot.index != ROOT, Error::OutOfBoundsMove);
        let store = self.shared.read();
        let slot = store.arena.slot(store.arena.node(self.slot.index).next);
        drop(store);
        self.slot = slot;
        return Ok(());
    }
}

impl<T: Clone> BidirectionalCursor for ChainCursor<T> {
    fn step_back(&mut self) -> Result<()> {
        self.validate()?;
        let store = self.shared.read();
        let prev = store.arena.node(self.slot.index).prev;
        // Stepping back from the first node would land on the root.
        if prev == ROOT {
            return Err(Error::OutOfBoundsMove);
        }
        let slot = store.arena.slot(prev);
        drop(store);
        self.slot = slot;
        return Ok(());
    }
}

impl<T: Clone + 'static> Surface for ChainCursor<T> {
    const MEMBERS: &'static [Member] = surface_of(Tier::Bidirectional);
}
