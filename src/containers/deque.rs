//! Ring-buffer deque with random-access cursors.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::indexed::IndexCursor;
use crate::check::require;
use crate::container::{Container, Indexed, Rewind, Sequence, Shared, Structural};
use crate::error::{Error, Result};

/// Cursor into a [`Deque`].
pub type DequeCursor<T> = IndexCursor<VecDeque<T>>;

/// Double-ended queue.
///
/// Cursor indices are logical (0 is always the front), so `shift` and
/// `unshift` renumber every element and bump the version. `push` and `pop`
/// at the back do not.
pub struct Deque<T: Clone + 'static> {
    shared: Rc<Shared<VecDeque<T>>>,
}

impl<T: Clone + 'static> Deque<T> {
    pub fn new() -> Deque<T> {
        return Deque { shared: Shared::new(VecDeque::new()) };
    }

    pub fn with_capacity(capacity: usize) -> Deque<T> {
        return Deque { shared: Shared::new(VecDeque::with_capacity(capacity)) };
    }

    fn anchor(&self, at: &DequeCursor<T>) -> Result<usize> {
        require!(at.belongs_to(&self.shared), Error::NotEquatable);
        let len = at.checked_len()?;
        require!(at.position() < len, Error::UpdateOutOfBounds);
        return Ok(at.position());
    }
}

impl<T: Clone + 'static> Container for Deque<T> {
    type Item = T;
    type Cursor = DequeCursor<T>;

    fn begin(&self) -> Result<DequeCursor<T>> {
        self.shared.live()?;
        return Ok(IndexCursor::new(&self.shared, 0));
    }

    fn end(&self) -> Result<DequeCursor<T>> {
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
        return self.shared.read().front().cloned().ok_or(Error::Empty);
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
        return Ok(self.shared.read().iter().cloned().collect());
    }
}

impl<T: Clone + 'static> Sequence for Deque<T> {
    fn push(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().push_back(value);
        return Ok(());
    }

    fn shift(&mut self) -> Result<T> {
        self.shared.live()?;
        let value = self.shared.write().pop_front().ok_or(Error::Empty)?;
        self.shared.bump();
        return Ok(value);
    }

    fn unshift(&mut self, value: T) -> Result<()> {
        self.shared.live()?;
        self.shared.write().push_front(value);
        self.shared.bump();
        return Ok(());
    }
}

impl<T: Clone + 'static> Rewind for Deque<T> {
    fn back(&self) -> Result<T> {
        self.shared.live()?;
        return self.shared.read().back().cloned().ok_or(Error::Empty);
    }

    fn pop(&mut self) -> Result<T> {
        self.shared.live()?;
        return self.shared.write().pop_back().ok_or(Error::Empty);
    }
}

impl<T: Clone + 'static> Structural for Deque<T> {
    fn insert(&mut self, at: &DequeCursor<T>, value: T) -> Result<DequeCursor<T>> {
        let index = self.anchor(at)?;
        self.shared.write().insert(index, value);
        self.shared.bump();
        return Ok(IndexCursor::new(&self.shared, index));
    }

    fn remove(&mut self, at: &DequeCursor<T>) -> Result<T> {
        let index = self.anchor(at)?;
        let value = self.shared.write().remove(index).ok_or(Error::UpdateOutOfBounds)?;
        self.shared.bump();
        return Ok(value);
    }
}

impl<T: Clone + 'static> Indexed for Deque<T> {
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

impl<T: Clone + 'static> Default for Deque<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone + 'static> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        return Deque { shared: Shared::new(iter.into_iter().collect()) };
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_disposed() {
            return f.write_str("Deque(<disposed>)");
        }
        return f.debug_list().entries(self.shared.read().iter()).finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Cursor, ForwardCursor, InputCursor, OutputCursor, RandomAccessCursor};

    #[test]
    fn both_ends() {
        let mut deque: Deque<i32> = Deque::new();
        deque.push(2).unwrap();
        deque.unshift(1).unwrap();
        deque.push(3).unwrap();
        assert_eq!(deque.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(deque.front().unwrap(), 1);
        assert_eq!(deque.back().unwrap(), 3);
        assert_eq!(deque.shift().unwrap(), 1);
        assert_eq!(deque.pop().unwrap(), 3);
        assert_eq!(deque.to_vec().unwrap(), vec![2]);
    }

    #[test]
    fn empty_ends_report_empty() {
        let mut deque: Deque<i32> = Deque::new();
        assert_eq!(deque.front(), Err(Error::Empty));
        assert_eq!(deque.back(), Err(Error::Empty));
        assert_eq!(deque.shift(), Err(Error::Empty));
        assert_eq!(deque.pop(), Err(Error::Empty));
    }

    #[test]
    fn cursor_follows_logical_index() {
        let deque: Deque<i32> = (0..5).collect();
        let mut cursor = deque.begin().unwrap();
        cursor.move_by(4).unwrap();
        assert_eq!(cursor.value().unwrap(), 4);
        cursor.set_value(40).unwrap();
        assert_eq!(deque.at(4).unwrap(), 40);
        assert_eq!(deque.begin().unwrap().distance_to(&deque.end().unwrap()).unwrap(), 5);
    }

    #[test]
    fn front_edits_stale_but_back_edits_do_not() {
        let mut deque: Deque<i32> = (0..3).collect();
        let cursor = deque.begin().unwrap();
        deque.push(3).unwrap();
        deque.pop().unwrap();
        assert_eq!(cursor.value().unwrap(), 0);
        deque.shift().unwrap();
        assert_eq!(cursor.value(), Err(Error::Stale));
    }

    #[test]
    fn insert_and_remove_in_the_middle() {
        let mut deque: Deque<i32> = vec![1, 3].into_iter().collect();
        let mut at = deque.begin().unwrap();
        at.step().unwrap();
        let two = deque.insert(&at, 2).unwrap();
        assert_eq!(deque.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(deque.remove(&two).unwrap(), 2);
        assert_eq!(deque.to_vec().unwrap(), vec![1, 3]);
        assert!(!two.equatable_to(&Deque::<i32>::new().begin().unwrap()));
    }

    #[test]
    fn dispose_fails_everything() {
        let mut deque: Deque<i32> = (0..3).collect();
        let cursor = deque.begin().unwrap();
        deque.dispose();
        assert!(deque.is_disposed());
        assert_eq!(deque.count(), Err(Error::Disposed));
        assert_eq!(deque.push(1), Err(Error::Disposed));
        assert_eq!(cursor.value(), Err(Error::Disposed));
        assert_eq!(format!("{:?}", deque), "Deque(<disposed>)");
    }
}
