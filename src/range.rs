//! Half-open intervals between two cursors of one container.

use crate::check::{self, require};
use crate::cursor::ForwardCursor;
use crate::error::{Error, Result};

/// The positions from `begin` up to, not including, `end`.
///
/// Both endpoints always point into the same container. A range does not
/// keep its endpoints fresh: if the container is mutated in a way that stales
/// them, every operation on the range reports it.
#[derive(Clone, Debug)]
pub struct Range<C> {
    begin: C,
    end: C,
}

impl<C: ForwardCursor> Range<C> {
    /// Pair two cursors. Fails with `NotEquatable` if they come from
    /// different containers.
    ///
    /// With checking enabled, `end` must be reachable from `begin`.
    pub fn new(begin: C, end: C) -> Result<Range<C>> {
        require!(begin.equatable_to(&end), Error::NotEquatable);
        if check::enabled() {
            begin.distance_to(&end)?;
        }
        return Ok(Range { begin, end });
    }

    pub fn begin(&self) -> &C {
        return &self.begin;
    }

    pub fn end(&self) -> &C {
        return &self.end;
    }

    pub fn into_parts(self) -> (C, C) {
        return (self.begin, self.end);
    }

    pub fn is_empty(&self) -> Result<bool> {
        return self.begin.equals(&self.end);
    }

    /// Number of positions covered.
    pub fn len(&self) -> Result<usize> {
        return self.begin.distance_to(&self.end);
    }

    /// Whether both endpoints match.
    pub fn equals(&self, other: &Range<C>) -> Result<bool> {
        return Ok(self.begin.equals(&other.begin)? && self.end.equals(&other.end)?);
    }

    /// Copy the covered values out.
    pub fn to_vec(&self) -> Result<Vec<C::Item>> {
        return self.values().collect();
    }

    /// Split into `[begin, at)` and `[at, end)`.
    ///
    /// With checking enabled, `at` must lie between the endpoints.
    pub fn split(&self, at: &C) -> Result<(Range<C>, Range<C>)> {
        require!(self.begin.equatable_to(at), Error::NotEquatable);
        if check::enabled() {
            self.begin.distance_to(at)?;
            at.distance_to(&self.end)?;
        }
        let head = Range { begin: self.begin.clone(), end: at.clone() };
        let tail = Range { begin: at.clone(), end: self.end.clone() };
        return Ok((head, tail));
    }

    /// Every cursor in the range, in order.
    pub fn cursors(&self) -> Cursors<C> {
        return Cursors { next: self.begin.clone(), end: self.end.clone(), done: false };
    }

    /// Every value in the range, in order.
    pub fn values(&self) -> impl Iterator<Item = Result<C::Item>> {
        return self.cursors().map(|cursor| cursor.and_then(|cursor| cursor.value()));
    }
}

/// Iterator over the cursors of a [`Range`].
///
/// Yields an error and stops if a cursor goes stale or the end is never
/// reached.
pub struct Cursors<C> {
    next: C,
    end: C,
    done: bool,
}

impl<C: ForwardCursor> Iterator for Cursors<C> {
    type Item = Result<C>;

    fn next(&mut self) -> Option<Result<C>> {
        if self.done {
            return None;
        }
        match self.next.equals(&self.end) {
            Ok(true) => {
                self.done = true;
                return None;
            }
            Ok(false) => {}
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }
        let current = self.next.clone();
        if let Err(e) = self.next.step() {
            self.done = true;
            return Some(Err(e));
        }
        return Some(Ok(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, Sequence};
    use crate::containers::{List, Vector};
    use crate::cursor::{Cursor, ForwardCursor, InputCursor};

    #[test]
    fn endpoints_must_share_a_container() {
        let a: Vector<i32> = vec![1].into();
        let b: Vector<i32> = vec![1].into();
        assert_eq!(Range::new(a.begin().unwrap(), b.end().unwrap()).err(), Some(Error::NotEquatable));
    }

    #[cfg(feature = "checked")]
    #[test]
    fn reversed_endpoints_are_rejected() {
        let vector: Vector<i32> = vec![1, 2, 3].into();
        let reversed = Range::new(vector.end().unwrap(), vector.begin().unwrap());
        assert_eq!(reversed.err(), Some(Error::OutOfBoundsMove));

        let list: List<i32> = (0..3).collect();
        let reversed = Range::new(list.end().unwrap(), list.begin().unwrap());
        assert_eq!(reversed.err(), Some(Error::OutOfBoundsMove));

        let empty = Range::new(vector.end().unwrap(), vector.end().unwrap()).unwrap();
        assert!(empty.is_empty().unwrap());
    }

    #[test]
    fn split_reconstructs_the_whole() {
        let list: List<i32> = (0..5).collect();
        let range = list.range().unwrap();
        let mut at = list.begin().unwrap();
        at.advance(2).unwrap();

        let (head, tail) = range.split(&at).unwrap();
        assert_eq!(head.to_vec().unwrap(), vec![0, 1]);
        assert_eq!(tail.to_vec().unwrap(), vec![2, 3, 4]);
        assert_eq!(head.len().unwrap() + tail.len().unwrap(), range.len().unwrap());
        assert!(head.end().equals(tail.begin()).unwrap());
    }

    #[test]
    fn split_at_the_edges_gives_an_empty_side() {
        let vector: Vector<i32> = vec![1, 2].into();
        let range = vector.range().unwrap();
        let (head, tail) = range.split(&vector.begin().unwrap()).unwrap();
        assert!(head.is_empty().unwrap());
        assert!(tail.equals(&range).unwrap());
    }

    #[cfg(feature = "checked")]
    #[test]
    fn split_outside_the_range_fails() {
        let vector: Vector<i32> = vec![1, 2, 3].into();
        let mut begin = vector.begin().unwrap();
        begin.step().unwrap();
        let range = Range::new(begin, vector.end().unwrap()).unwrap();
        let outside = vector.begin().unwrap();
        assert_eq!(range.split(&outside).err(), Some(Error::OutOfBoundsMove));
    }

    #[test]
    fn iteration_reports_staleness() {
        let mut vector: Vector<i32> = vec![1, 2].into();
        let range = vector.range().unwrap();
        vector.unshift(0).unwrap();
        let items: Vec<Result<i32>> = range.values().collect();
        assert_eq!(items, vec![Err(Error::Stale)]);
    }

    #[test]
    fn cursors_walk_in_order() {
        let list: List<char> = "abc".chars().collect();
        let range = list.range().unwrap();
        let values: Vec<char> = range.cursors().map(|c| c.unwrap().value().unwrap()).collect();
        assert_eq!(values, vec!['a', 'b', 'c']);
    }
}
