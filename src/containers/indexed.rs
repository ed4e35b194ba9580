//! Index cursors shared by the vector, deque and byte buffers.
//!
//! An index cursor is `(storage cell, index, version)`. The index is only
//! meaningful at the version it was taken, so the owning container bumps the
//! version whenever it shifts elements to other indices (front edits and
//! interior inserts/removes). Appending and popping at the back leave
//! existing indices in place and do not bump.

use std::cell::Ref;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::check::require;
use crate::concept::{surface_of, Member, Surface, Tier};
use crate::container::Shared;
use crate::cursor::{
    self, BidirectionalCursor, ContiguousCursor, Cursor, ForwardCursor, InputCursor, OutputCursor,
    RandomAccessCursor,
};
use crate::error::{Error, Result};

/// Storage addressed by a dense index.
pub trait Slots: Default + 'static {
    /// Element type.
    type Item: Clone;
    /// Tier of cursors over this storage.
    const TIER: Tier;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether there are no elements.
    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// The element at `index`.
    fn get(&self, index: usize) -> Option<&Self::Item>;

    /// The element at `index`, mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Item>;
}

/// Storage whose elements form one slice.
pub trait ContiguousSlots: Slots {
    /// Every element, in order.
    fn as_slice(&self) -> &[Self::Item];
}

impl<T: Clone + 'static> Slots for Vec<T> {
    type Item = T;
    const TIER: Tier = Tier::RandomAccess;

    fn len(&self) -> usize {
        return Vec::len(self);
    }

    fn get(&self, index: usize) -> Option<&T> {
        return <[T]>::get(self, index);
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        return <[T]>::get_mut(self, index);
    }
}

impl<T: Clone + 'static> Slots for VecDeque<T> {
    type Item = T;
    const TIER: Tier = Tier::RandomAccess;

    fn len(&self) -> usize {
        return VecDeque::len(self);
    }

    fn get(&self, index: usize) -> Option<&T> {
        return VecDeque::get(self, index);
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        return VecDeque::get_mut(self, index);
    }
}

/// Cursor holding an index into `S`.
pub struct IndexCursor<S> {
    shared: Rc<Shared<S>>,
    index: usize,
    version: u64,
}

impl<S: Slots> IndexCursor<S> {
    pub(crate) fn new(shared: &Rc<Shared<S>>, index: usize) -> IndexCursor<S> {
        return IndexCursor { shared: Rc::clone(shared), index, version: shared.version() };
    }

    /// The raw index, without validation.
    pub fn position(&self) -> usize {
        return self.index;
    }

    /// Whether `shared` is the storage this cursor points into.
    pub(crate) fn belongs_to(&self, shared: &Rc<Shared<S>>) -> bool {
        return Rc::ptr_eq(&self.shared, shared);
    }

    /// Fail if disposed or stale, otherwise return the current length.
    #[inline]
    pub(crate) fn checked_len(&self) -> Result<usize> {
        self.shared.current(self.version)?;
        return Ok(self.shared.read().len());
    }

    pub(crate) fn storage(&self) -> Ref<'_, S> {
        return self.shared.read();
    }
}

impl<S> Clone for IndexCursor<S> {
    fn clone(&self) -> Self {
        return IndexCursor { shared: Rc::clone(&self.shared), index: self.index, version: self.version };
    }
}

impl<S> fmt::Debug for IndexCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "IndexCursor({} v{})", self.index, self.version);
    }
}

impl<S: Slots> Cursor for IndexCursor<S> {
    type Item = S::Item;
    const TIER: Tier = S::TIER;

    fn equatable_to(&self, other: &Self) -> bool {
        return Rc::ptr_eq(&self.shared, &other.shared);
    }

    fn equals(&self, other: &Self) -> Result<bool> {
        require!(self.equatable_to(other), Error::NotEquatable);
        self.shared.current(self.version)?;
        other.shared.current(other.version)?;
        return Ok(self.index == other.index);
    }
}

impl<S: Slots> InputCursor for IndexCursor<S> {
    fn value(&self) -> Result<S::Item> {
        self.shared.current(self.version)?;
        return self.shared.read().get(self.index).cloned().ok_or(Error::OutOfBoundsRead);
    }
}

impl<S: Slots> OutputCursor for IndexCursor<S> {
    fn set_value(&self, value: S::Item) -> Result<()> {
        self.shared.current(self.version)?;
        let mut store = self.shared.write();
        let slot = store.get_mut(self.index).ok_or(Error::OutOfBoundsWrite)?;
        *slot = value;
        return Ok(());
    }
}

impl<S: Slots> ForwardCursor for IndexCursor<S> {
    fn step(&mut self) -> Result<()> {
        let len = self.checked_len()?;
        require!(self.index < len, Error::OutOfBoundsMove);
        self.index += 1;
        return Ok(());
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        return cursor::advance_by_move(self, n);
    }

    fn distance_to(&self, end: &Self) -> Result<usize> {
        return cursor::distance_by_subtract(self, end);
    }
}

impl<S: Slots> BidirectionalCursor for IndexCursor<S> {
    fn step_back(&mut self) -> Result<()> {
        self.shared.current(self.version)?;
        require!(self.index > 0, Error::OutOfBoundsMove);
        self.index -= 1;
        return Ok(());
    }

    fn rewind(&mut self, n: usize) -> Result<()> {
        return cursor::rewind_by_move(self, n);
    }
}

impl<S: Slots> RandomAccessCursor for IndexCursor<S> {
    fn move_by(&mut self, k: isize) -> Result<()> {
        let len = self.checked_len()?;
        let target = self.index.checked_add_signed(k).ok_or(Error::OutOfBoundsMove)?;
        require!(target <= len, Error::OutOfBoundsMove);
        self.index = target;
        return Ok(());
    }

    fn subtract(&self, other: &Self) -> Result<isize> {
        require!(self.equatable_to(other), Error::NotEquatable);
        self.shared.current(self.version)?;
        other.shared.current(other.version)?;
        return Ok(self.index as isize - other.index as isize);
    }
}

impl<S: ContiguousSlots> ContiguousCursor for IndexCursor<S> {
    fn offset(&self) -> Result<usize> {
        self.shared.current(self.version)?;
        return Ok(self.index);
    }

    fn data(&self, end: &Self) -> Result<Ref<'_, [S::Item]>> {
        require!(self.equatable_to(end), Error::NotEquatable);
        let len = self.checked_len()?;
        end.shared.current(end.version)?;
        require!(self.index <= end.index && end.index <= len, Error::OutOfBoundsRead);
        let (from, to) = (self.index, end.index);
        return Ok(Ref::map(self.shared.read(), |store| &store.as_slice()[from..to]));
    }
}

impl<S: Slots> Surface for IndexCursor<S> {
    const MEMBERS: &'static [Member] = surface_of(S::TIER);
}
