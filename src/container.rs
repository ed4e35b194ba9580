//! Container traits and the shared storage cell behind every container.
//!
//! A container owns its storage through `Shared`, a reference-counted cell
//! that its cursors also point at. Only the container mutates the layout of
//! storage; cursors read through the cell and may overwrite single values when
//! their tier allows it.
//!
//! `Shared` carries the two pieces of state the precondition guards need:
//!
//! - a version counter, bumped by mutations that displace index positions
//! - a disposed flag, after which every operation fails

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::check::require;
use crate::cursor::{Cursor, ForwardCursor, InputCursor};
use crate::error::{Error, Result};
use crate::range::Range;

/// Storage cell shared between a container and its cursors.
pub(crate) struct Shared<S> {
    version: Cell<u64>,
    disposed: Cell<bool>,
    store: RefCell<S>,
}

impl<S> Shared<S> {
    pub(crate) fn new(store: S) -> Rc<Shared<S>> {
        return Rc::new(Shared {
            version: Cell::new(0),
            disposed: Cell::new(false),
            store: RefCell::new(store),
        });
    }

    /// Fail if the container has been disposed.
    #[inline]
    pub(crate) fn live(&self) -> Result<()> {
        require!(!self.disposed.get(), Error::Disposed);
        return Ok(());
    }

    /// Fail if disposed or if `version` is no longer current.
    #[inline]
    pub(crate) fn current(&self, version: u64) -> Result<()> {
        self.live()?;
        require!(self.version.get() == version, Error::Stale);
        return Ok(());
    }

    #[inline]
    pub(crate) fn version(&self) -> u64 {
        return self.version.get();
    }

    /// Invalidate every index cursor issued so far.
    #[inline]
    pub(crate) fn bump(&self) {
        self.version.set(self.version.get().wrapping_add(1));
    }

    pub(crate) fn is_disposed(&self) -> bool {
        return self.disposed.get();
    }

    #[inline]
    pub(crate) fn read(&self) -> Ref<'_, S> {
        return self.store.borrow();
    }

    #[inline]
    pub(crate) fn write(&self) -> RefMut<'_, S> {
        return self.store.borrow_mut();
    }
}

impl<S: Default> Shared<S> {
    /// Release storage and mark the container disposed. Idempotent.
    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        drop(std::mem::take(&mut *self.store.borrow_mut()));
        self.bump();
    }
}

/// Common surface of every container.
pub trait Container {
    /// Element type.
    type Item: Clone;
    /// Cursor type issued by this container.
    type Cursor: ForwardCursor<Item = Self::Item>;

    /// Cursor at the first element, or at the end when empty.
    fn begin(&self) -> Result<Self::Cursor>;

    /// Cursor one past the last element.
    fn end(&self) -> Result<Self::Cursor>;

    /// Number of elements.
    fn count(&self) -> Result<usize>;

    /// Whether the container holds no elements.
    fn is_empty(&self) -> Result<bool> {
        return Ok(self.count()? == 0);
    }

    /// The first element.
    fn front(&self) -> Result<Self::Item>;

    /// Release storage. Every later operation, on the container or on any
    /// cursor it issued, fails with `Error::Disposed`.
    fn dispose(&mut self);

    /// Whether `dispose` has been called.
    fn is_disposed(&self) -> bool;

    /// Current version. Index cursors issued at an older version are stale.
    fn version(&self) -> u64;

    /// Copy every element out in traversal order.
    fn to_vec(&self) -> Result<Vec<Self::Item>> {
        let mut out = Vec::with_capacity(self.count()?);
        let end = self.end()?;
        let mut cursor = self.begin()?;
        while !cursor.equals(&end)? {
            out.push(cursor.value()?);
            cursor.step()?;
        }
        return Ok(out);
    }

    /// The range covering every element.
    fn range(&self) -> Result<Range<Self::Cursor>> {
        return Range::new(self.begin()?, self.end()?);
    }
}

/// Containers that append at the back and consume from the front.
pub trait Sequence: Container {
    /// Append a value at the back.
    fn push(&mut self, value: Self::Item) -> Result<()>;

    /// Remove and return the first value.
    fn shift(&mut self) -> Result<Self::Item>;

    /// Prepend a value at the front.
    fn unshift(&mut self, value: Self::Item) -> Result<()>;
}

/// Sequences that can also consume from the back.
pub trait Rewind: Sequence {
    /// The last element.
    fn back(&self) -> Result<Self::Item>;

    /// Remove and return the last value.
    fn pop(&mut self) -> Result<Self::Item>;
}

/// Containers that insert and remove at an arbitrary cursor.
pub trait Structural: Container {
    /// Insert `value` before `at` and return a cursor to it.
    ///
    /// Fails with `UpdateOutOfBounds` when `at` is the end position.
    fn insert(&mut self, at: &Self::Cursor, value: Self::Item) -> Result<Self::Cursor>;

    /// Remove and return the element at `at`.
    ///
    /// Fails with `UpdateOutOfBounds` when `at` is the end position.
    fn remove(&mut self, at: &Self::Cursor) -> Result<Self::Item>;
}

/// Containers addressable by index.
pub trait Indexed: Container {
    /// The element at `index`.
    fn at(&self, index: usize) -> Result<Self::Item>;

    /// Overwrite the element at `index`.
    fn set_at(&mut self, index: usize, value: Self::Item) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_invalidates_captured_version() {
        let shared = Shared::new(vec![1, 2, 3]);
        let version = shared.version();
        assert_eq!(shared.current(version), Ok(()));
        shared.bump();
        assert_eq!(shared.current(version), Err(Error::Stale));
    }

    #[test]
    fn dispose_releases_storage() {
        let shared = Shared::new(vec![1, 2, 3]);
        shared.dispose();
        assert!(shared.is_disposed());
        assert!(shared.read().is_empty());
        assert_eq!(shared.live(), Err(Error::Disposed));
        // Disposed wins over stale.
        assert_eq!(shared.current(0), Err(Error::Disposed));
    }

    #[test]
    fn dispose_twice_is_harmless() {
        let shared = Shared::new(vec![1]);
        shared.dispose();
        let version = shared.version();
        shared.dispose();
        assert_eq!(shared.version(), version);
    }
}
