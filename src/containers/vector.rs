//! Growable array with random-access cursors.

use std::fmt;
use std::rc::Rc;

use super::indexed::IndexCursor;
use crate::check::require;
use crate::container::{Container, Indexed, Rewind, Sequence, Shared, Structural};
use crate::error::{Error, Result};

/// Cursor into a [`Vector`].
pub type VectorCursor<T> = IndexCursor<Vec<T>>;

/// Resizable contiguous array.
///
/// Front edits and interior inserts/removes move elements to new indices and
/// bump the version, staling every cursor issued before them.
pub struct Vector<T: Clone + 'static> {
    shared: Rc<Shared<Vec<T>>>,
}

impl<T: Clone + 'static> Vector<T> {
    /// Create an empty vector.
    pub fn new() -> Vector<T> {
        return Vector { shared: Shared::new(Vec::new()) };
    }

    /// Create an empty vector with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Vector<T> {
        return Vector { shared: Shared::new(Vec::with_capacity(capacity)) };
    }

    /// Allocated capacity.
    pub fn capacity(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().capacity());
    }

    /// Validate that `at` is a current cursor into this vector and return
    /// its index.
    fn anchor(&self, at: &VectorCursor<T>) -> Result<usize> {
        require!(at.belongs_to(&self.shared), Error::NotEquatable);
        let len = at.checked_len()?;
        require!(at.position() < len, Error::UpdateOutOfBounds);
        return Ok(at.position());
    }
}

impl<T: Clone + 'static> Container for Vector<T> {
    type Item = T;
    type Cursor = VectorCursor<T>;

    fn begin(&self) -> Result<VectorCursor<T>> {
        self.shared.live()?;
        return Ok(IndexCursor::new(&self.shared, 0));
    }

    fn end(&self) -> Result<VectorCursor<T>> {
        self.shared.live()?;
        let len = self.shared.read().len();
        return Ok(IndexCursor::new(&self.shared, len));
    }

    fn count(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().len());
    }

    fn front(&self) -> Result<T> {
        self.shared.live()?;
        return self.shared.read().first().cloned().ok_or(Error::Empty);
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

    fn to_vec(&self) -> Result<Vec<T>> {
        self.shared.live()?;
        return Ok(self.shared.read().clone());
    }
}

impl<T: Clone + 'static> Sequence for Vector<T> {
    fn push(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().push(value);
        return Ok(());
    }

    fn shift(&mut self) -> Result<T> {
        self.shared.live()?;
        let mut store = self.shared.write();
        if store.is_empty() {
            return Err(Error::Empty);
        }
        let value = store.remove(0);
        drop(store);
        self.shared.bump();
        return Ok(value);
    }

    fn unshift(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().insert(0, value);
        self.shared.bump();
        return Ok(());
    }
}

impl<T: Clone + 'static> Rewind for Vector<T> {
    fn back(&self) -> Result<T> {
        self.shared.live()?;
        return self.shared.read().last().cloned().ok_or(Error::Empty);
    }

    fn pop(&mut self) -> Result<T> {
        self.shared.live()?;
        return self.shared.write().pop().ok_or(Error::Empty);
    }
}

impl<T: Clone + 'static> Structural for Vector<T> {
    fn insert(&mut self, at: &VectorCursor<T>, value: T) -> Result<VectorCursor<T>> {
        let index = self.anchor(at)?;
        self.shared.write().insert(index, value);
        self.shared.bump();
        return Ok(IndexCursor::new(&self.shared, index));
    }

    fn remove(&mut self, at: &VectorCursor<T>) -> Result<T> {
        let index = self.anchor(at)?;
        let value = self.shared.write().remove(index);
        self.shared.bump();
        return Ok(value);
    }
}

impl<T: Clone + 'static> Indexed for Vector<T> {
    fn at(&self, index: usize) -> Result<T> {
        self.shared.live()?;
        return self.shared.read().get(index).cloned().ok_or(Error::OutOfBoundsRead);
    }

    fn set_at(&mut self, index: usize, value: T) -> Result<()> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let slot = store.get_mut(index).ok_or(Error::OutOfBoundsWrite)?;
        *slot = value;
        return Ok(());
    }
}

impl<T: Clone + 'static> Default for Vector<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        return Vector { shared: Shared::new(values) };
    }
}

impl<T: Clone + 'static> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        return Vector::from(iter.into_iter().collect::<Vec<T>>());
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_disposed() {
            return f.write_str("Vector(<disposed>)");
        }
        return f.debug_list().entries(self.shared.read().iter()).finish();
    }
}
