//! Cursor traits, one per capability tier, and the generic algorithms built
//! on them.
//!
//! A cursor is a positional handle into a container. It does not borrow the
//! container: it shares the container's storage cell and re-validates its
//! position on every call, so use after an invalidating mutation reports
//! `Error::Stale` instead of reading the wrong element.
//!
//! The generic algorithms (`distance`, `advance`, `rewind`) dispatch on the
//! tier through trait methods. Forward cursors walk element by element;
//! random-access cursors override the same methods with offset arithmetic.

use std::cell::Ref;
use std::fmt;

use crate::check::require;
use crate::concept::Tier;
use crate::error::{Error, Result};

/// Identity shared by every cursor.
pub trait Cursor: Clone + fmt::Debug {
    /// Element type the cursor reads and writes.
    type Item: Clone;

    /// Capability tier of this cursor type.
    const TIER: Tier;

    /// Whether `other` points into the same container instance.
    ///
    /// This is the one check that still answers for stale cursors and
    /// disposed containers.
    fn equatable_to(&self, other: &Self) -> bool;

    /// Whether both cursors denote the same position.
    fn equals(&self, other: &Self) -> Result<bool>;
}

/// A cursor whose value can be read.
pub trait InputCursor: Cursor {
    /// Read the element at the cursor.
    fn value(&self) -> Result<Self::Item>;
}

/// A cursor whose value can be written.
pub trait OutputCursor: Cursor {
    /// Overwrite the element at the cursor.
    fn set_value(&self, value: Self::Item) -> Result<()>;
}

/// A read/write cursor that can step forward.
pub trait ForwardCursor: InputCursor + OutputCursor {
    /// Move to the next position. Fails at the end position.
    fn step(&mut self) -> Result<()>;

    /// Move forward `n` positions. The cursor is unchanged on failure.
    fn advance(&mut self, n: usize) -> Result<()> {
        let mut next = self.clone();
        for _ in 0..n {
            next.step()?;
        }
        *self = next;
        return Ok(());
    }

    /// Number of steps from `self` to `end`.
    ///
    /// Fails with `OutOfBoundsMove` when `end` is not reachable.
    fn distance_to(&self, end: &Self) -> Result<usize> {
        require!(self.equatable_to(end), Error::NotEquatable);
        let mut walker = self.clone();
        let mut n = 0;
        while !walker.equals(end)? {
            walker.step()?;
            n += 1;
        }
        return Ok(n);
    }
}

/// A forward cursor that can also step backward.
pub trait BidirectionalCursor: ForwardCursor {
    /// Move to the previous position. Fails at the first position.
    fn step_back(&mut self) -> Result<()>;

    /// Move backward `n` positions. The cursor is unchanged on failure.
    fn rewind(&mut self, n: usize) -> Result<()> {
        let mut next = self.clone();
        for _ in 0..n {
            next.step_back()?;
        }
        *self = next;
        return Ok(());
    }
}

/// A bidirectional cursor with constant-time moves.
pub trait RandomAccessCursor: BidirectionalCursor {
    /// Move by `k` positions in either direction.
    fn move_by(&mut self, k: isize) -> Result<()>;

    /// Signed distance `self - other`.
    fn subtract(&self, other: &Self) -> Result<isize>;

    /// Order two positions of the same container.
    fn compare(&self, other: &Self) -> Result<std::cmp::Ordering> {
        return Ok(self.subtract(other)?.cmp(&0));
    }
}

/// A random-access cursor over a single slice of memory.
pub trait ContiguousCursor: RandomAccessCursor {
    /// Offset of the cursor from the start of storage.
    fn offset(&self) -> Result<usize>;

    /// Borrow the elements between `self` and `end` without copying.
    ///
    /// The container cannot be mutated while the returned view is held.
    fn data(&self, end: &Self) -> Result<Ref<'_, [Self::Item]>>;
}

/// Number of steps from `first` to `last`.
pub fn distance<C: ForwardCursor>(first: &C, last: &C) -> Result<usize> {
    return first.distance_to(last);
}

/// Move `cursor` forward by `n`.
pub fn advance<C: ForwardCursor>(cursor: &mut C, n: usize) -> Result<()> {
    return cursor.advance(n);
}

/// Move `cursor` backward by `n`.
pub fn rewind<C: BidirectionalCursor>(cursor: &mut C, n: usize) -> Result<()> {
    return cursor.rewind(n);
}

/// Shared body for random-access `advance` overrides.
pub(crate) fn advance_by_move<C: RandomAccessCursor>(cursor: &mut C, n: usize) -> Result<()> {
    let k = isize::try_from(n).map_err(|_| Error::OutOfBoundsMove)?;
    return cursor.move_by(k);
}

/// Shared body for random-access `distance_to` overrides.
pub(crate) fn distance_by_subtract<C: RandomAccessCursor>(first: &C, last: &C) -> Result<usize> {
    require!(first.equatable_to(last), Error::NotEquatable);
    let d = last.subtract(first)?;
    return usize::try_from(d).map_err(|_| Error::OutOfBoundsMove);
}

/// Shared body for random-access `rewind` overrides.
pub(crate) fn rewind_by_move<C: RandomAccessCursor>(cursor: &mut C, n: usize) -> Result<()> {
    let k = isize::try_from(n).map_err(|_| Error::OutOfBoundsMove)?;
    return cursor.move_by(-k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::containers::{List, Vector};

    #[test]
    fn random_access_overrides_agree_with_stepping() {
        let vector: Vector<u8> = (0..6).collect();
        let list: List<u8> = (0..6).collect();
        assert_eq!(distance(&vector.begin().unwrap(), &vector.end().unwrap()), Ok(6));
        assert_eq!(distance(&list.begin().unwrap(), &list.end().unwrap()), Ok(6));

        let mut fast = vector.begin().unwrap();
        let mut slow = list.begin().unwrap();
        advance(&mut fast, 4).unwrap();
        advance(&mut slow, 4).unwrap();
        assert_eq!(fast.value(), slow.value());
    }

    #[test]
    fn rewind_past_begin_fails_without_moving() {
        let vector: Vector<u8> = (0..3).collect();
        let mut cursor = vector.end().unwrap();
        assert_eq!(rewind(&mut cursor, 4), Err(Error::OutOfBoundsMove));
        assert!(cursor.equals(&vector.end().unwrap()).unwrap());
        rewind(&mut cursor, 3).unwrap();
        assert_eq!(cursor.value(), Ok(0));
    }

    #[test]
    fn compare_orders_positions() {
        let vector: Vector<u8> = (0..3).collect();
        let begin = vector.begin().unwrap();
        let end = vector.end().unwrap();
        assert_eq!(begin.compare(&end), Ok(std::cmp::Ordering::Less));
        assert_eq!(end.compare(&begin), Ok(std::cmp::Ordering::Greater));
        assert_eq!(end.compare(&end.clone()), Ok(std::cmp::Ordering::Equal));
    }
}
