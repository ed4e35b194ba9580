//! Queue of ranges with partial eviction.
//!
//! A [`SegmentContainer`] buffers chunks of data as [`Range`]s, oldest at the
//! front, and reads across them through a [`JoinView`]. Eviction works at a
//! flattened cursor boundary: whole ranges on the evicted side are dequeued
//! as they are, and the range straddling the boundary is split so only its
//! evicted part leaves the queue.
//!
//! ```text
//! queue:    [0] [1 2 3]            shift_many(at 3)
//!                    ^ boundary    ─────────────────> evicted [0] [1 2]
//!                                                     queue   [3]
//! ```
//!
//! No range in the queue is ever empty. Pushing an empty range is a no-op.

use std::collections::VecDeque;
use std::fmt;

use smallvec::SmallVec;

use crate::check::require;
use crate::container::{Container, Indexed, Rewind, Sequence};
use crate::containers::{Deque, DequeCursor};
use crate::cursor::{Cursor, ForwardCursor, RandomAccessCursor};
use crate::error::{Error, Result};
use crate::range::Range;
use crate::view::{JoinCursor, JoinView};

/// Flattened cursor over a [`SegmentContainer`].
pub type SegmentCursor<C> = JoinCursor<DequeCursor<Range<C>>>;

/// Ranges removed by one eviction, in queue order.
pub type Evicted<C> = SmallVec<[Range<C>; 4]>;

/// The two halves of a range split at an eviction boundary.
struct Cut<C> {
    head: Range<C>,
    head_len: usize,
    tail: Range<C>,
    tail_len: usize,
}

pub struct SegmentContainer<C: ForwardCursor + 'static> {
    queue: Deque<Range<C>>,
    lengths: VecDeque<usize>,
    count: usize,
}

impl<C: ForwardCursor + 'static> SegmentContainer<C> {
    pub fn new() -> SegmentContainer<C> {
        return SegmentContainer { queue: Deque::new(), lengths: VecDeque::new(), count: 0 };
    }

    /// Total number of elements across every range.
    pub fn count(&self) -> Result<usize> {
        self.queue.count()?;
        return Ok(self.count);
    }

    pub fn is_empty(&self) -> Result<bool> {
        return Ok(self.count()? == 0);
    }

    /// Number of ranges held.
    pub fn segments(&self) -> Result<usize> {
        return self.queue.count();
    }

    /// Append a range at the back.
    pub fn push(&mut self, range: Range<C>) -> Result<()> {
        let len = range.len()?;
        if len == 0 {
            self.queue.count()?;
            return Ok(());
        }
        self.queue.push(range)?;
        self.lengths.push_back(len);
        self.count += len;
        return Ok(());
    }

    /// Prepend a range at the front.
    pub fn unshift(&mut self, range: Range<C>) -> Result<()> {
        let len = range.len()?;
        if len == 0 {
            self.queue.count()?;
            return Ok(());
        }
        self.queue.unshift(range)?;
        self.lengths.push_front(len);
        self.count += len;
        return Ok(());
    }

    /// Remove and return the oldest range.
    pub fn shift(&mut self) -> Result<Range<C>> {
        let range = self.queue.shift()?;
        let len = self.lengths.pop_front().unwrap_or(0);
        self.count -= len;
        return Ok(range);
    }

    /// Remove and return the newest range.
    pub fn pop(&mut self) -> Result<Range<C>> {
        let range = self.queue.pop()?;
        let len = self.lengths.pop_back().unwrap_or(0);
        self.count -= len;
        return Ok(range);
    }

    /// Flattened view over every range. Cursors from a view taken before a
    /// front-end mutation are stale.
    pub fn view(&self) -> Result<JoinView<DequeCursor<Range<C>>>> {
        return Ok(JoinView::new(self.queue.range()?));
    }

    pub fn begin(&self) -> Result<SegmentCursor<C>> {
        return self.view()?.begin();
    }

    pub fn end(&self) -> Result<SegmentCursor<C>> {
        return self.view()?.end();
    }

    /// Copy every element out, in order.
    pub fn to_vec(&self) -> Result<Vec<C::Item>> {
        return self.view()?.to_vec();
    }

    /// The queued ranges, oldest first.
    pub fn ranges(&self) -> Result<Vec<Range<C>>> {
        return self.queue.to_vec();
    }

    /// Queue index of the range `boundary` points into.
    ///
    /// A boundary taken before a back-end `pop` is not stale but may name a
    /// range that is gone, so the index is checked against the current queue.
    fn locate(&self, boundary: &SegmentCursor<C>) -> Result<usize> {
        let first = self.queue.begin()?;
        require!(boundary.outer().equatable_to(&first), Error::NotEquatable);
        let index = boundary.outer().subtract(&first)?;
        let index = usize::try_from(index).map_err(|_| Error::OutOfBoundsMove)?;
        let segments = self.queue.count()?;
        let limit = match boundary.inner() {
            Some(_) => segments,
            None => segments + 1,
        };
        if index >= limit {
            return Err(Error::OutOfBoundsMove);
        }
        return Ok(index);
    }

    /// Split the range at `index` around `inner`.
    ///
    /// Returns `None` when `inner` is the first element of that range, so
    /// nothing needs splitting. Otherwise returns both halves with their
    /// lengths.
    fn cut(&self, index: usize, inner: &C) -> Result<Option<Cut<C>>> {
        let straddling = self.queue.at(index)?;
        if straddling.begin().equals(inner)? {
            return Ok(None);
        }
        let (head, tail) = straddling.split(inner)?;
        let (head_len, tail_len) = (head.len()?, tail.len()?);
        return Ok(Some(Cut { head, head_len, tail, tail_len }));
    }

    /// Evict every element before `boundary`.
    ///
    /// Returns the evicted ranges oldest first. The element at `boundary`
    /// stays. Every cursor issued before the call is stale afterwards. On
    /// error the container is unchanged.
    pub fn shift_many(&mut self, boundary: &SegmentCursor<C>) -> Result<Evicted<C>> {
        let index = self.locate(boundary)?;
        let cut = match boundary.inner() {
            Some(inner) => self.cut(index, inner)?,
            None => None,
        };

        let mut evicted = Evicted::new();
        for _ in 0..index {
            evicted.push(self.shift()?);
        }
        if let Some(cut) = cut {
            self.shift()?;
            self.queue.unshift(cut.tail)?;
            self.lengths.push_front(cut.tail_len);
            self.count += cut.tail_len;
            evicted.push(cut.head);
        }
        return Ok(evicted);
    }

    /// Evict every element from `boundary` to the end.
    ///
    /// Returns the evicted ranges oldest first. The element before
    /// `boundary` stays. On error the container is unchanged.
    pub fn pop_many(&mut self, boundary: &SegmentCursor<C>) -> Result<Evicted<C>> {
        let index = self.locate(boundary)?;
        let cut = match boundary.inner() {
            Some(inner) => self.cut(index, inner)?,
            None => None,
        };

        let mut evicted = Evicted::new();
        while self.lengths.len() > index + 1 {
            evicted.push(self.pop()?);
        }
        if self.lengths.len() > index {
            let whole = self.pop()?;
            match cut {
                Some(cut) => {
                    self.queue.push(cut.head)?;
                    self.lengths.push_back(cut.head_len);
                    self.count += cut.head_len;
                    evicted.push(cut.tail);
                }
                None => evicted.push(whole),
            }
        }
        evicted.reverse();
        return Ok(evicted);
    }

    /// Release the queue. Every later operation fails with `Disposed`.
    pub fn dispose(&mut self) {
        self.queue.dispose();
        self.lengths.clear();
        self.count = 0;
    }

    pub fn is_disposed(&self) -> bool {
        return self.queue.is_disposed();
    }
}

impl<C: ForwardCursor + 'static> Default for SegmentContainer<C> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<C: ForwardCursor + 'static> fmt::Debug for SegmentContainer<C>
where
    C::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.queue.is_disposed() {
            return f.write_str("SegmentContainer(<disposed>)");
        }
        let mut list = f.debug_list();
        for range in self.queue.to_vec().unwrap_or_default() {
            match range.to_vec() {
                Ok(values) => list.entry(&values),
                Err(e) => list.entry(&e),
            };
        }
        return list.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{List, ListCursor, Vector, VectorCursor};
    use crate::cursor::InputCursor;

    fn split_source(values: &[i32], cuts: &[usize]) -> (Vector<i32>, SegmentContainer<VectorCursor<i32>>) {
        let source: Vector<i32> = values.iter().copied().collect();
        let mut container = SegmentContainer::new();
        let mut from = 0;
        let last = values.len();
        for &to in cuts.iter().chain(std::iter::once(&last)) {
            let mut begin = source.begin().unwrap();
            begin.move_by(from as isize).unwrap();
            let mut end = source.begin().unwrap();
            end.move_by(to as isize).unwrap();
            container.push(Range::new(begin, end).unwrap()).unwrap();
            from = to;
        }
        return (source, container);
    }

    fn contents<C: ForwardCursor>(ranges: &[Range<C>]) -> Vec<Vec<C::Item>> {
        return ranges.iter().map(|r| r.to_vec().unwrap()).collect();
    }

    #[test]
    fn shift_many_splits_the_straddling_range() {
        let (_source, mut container) = split_source(&[0, 1, 2, 3], &[1]);
        let mut boundary = container.begin().unwrap();
        boundary.move_by(3).unwrap();
        assert_eq!(boundary.value().unwrap(), 3);

        let evicted = container.shift_many(&boundary).unwrap();
        assert_eq!(contents(&evicted), vec![vec![0], vec![1, 2]]);
        assert_eq!(container.to_vec().unwrap(), vec![3]);
        assert_eq!(container.count().unwrap(), 1);
        assert_eq!(container.segments().unwrap(), 1);
    }

    #[test]
    fn shift_many_at_a_range_start_moves_nothing_partial() {
        let (_source, mut container) = split_source(&[0, 1, 2, 3], &[2]);
        let mut boundary = container.begin().unwrap();
        boundary.move_by(2).unwrap();
        let evicted = container.shift_many(&boundary).unwrap();
        assert_eq!(contents(&evicted), vec![vec![0, 1]]);
        assert_eq!(container.to_vec().unwrap(), vec![2, 3]);
    }

    #[test]
    fn shift_many_at_end_empties_the_queue() {
        let (_source, mut container) = split_source(&[0, 1, 2], &[1]);
        let end = container.end().unwrap();
        let evicted = container.shift_many(&end).unwrap();
        assert_eq!(evicted.len(), 2);
        assert!(container.is_empty().unwrap());
        assert_eq!(container.segments().unwrap(), 0);
    }

    #[test]
    fn pop_many_keeps_the_front() {
        let (_source, mut container) = split_source(&[0, 1, 2, 3, 4], &[2, 4]);
        let mut boundary = container.begin().unwrap();
        boundary.move_by(1).unwrap();
        let evicted = container.pop_many(&boundary).unwrap();
        assert_eq!(contents(&evicted), vec![vec![1], vec![2, 3], vec![4]]);
        assert_eq!(container.to_vec().unwrap(), vec![0]);
        assert_eq!(container.count().unwrap(), 1);
    }

    #[test]
    fn stale_boundary_is_rejected() {
        let (_source, mut container) = split_source(&[0, 1, 2], &[1]);
        let boundary = container.begin().unwrap();
        container.shift().unwrap();
        assert_eq!(container.shift_many(&boundary).err(), Some(Error::Stale));
    }

    #[test]
    fn boundary_past_a_popped_range_leaves_the_queue_intact() {
        let (_source, mut container) = split_source(&[0, 1, 2, 3], &[1]);
        let mut boundary = container.begin().unwrap();
        boundary.move_by(3).unwrap();
        container.pop().unwrap();

        assert_eq!(container.shift_many(&boundary).err(), Some(Error::OutOfBoundsMove));
        assert_eq!(container.pop_many(&boundary).err(), Some(Error::OutOfBoundsMove));
        assert_eq!(container.to_vec().unwrap(), vec![0]);
        assert_eq!(container.segments().unwrap(), 1);
        assert_eq!(container.count().unwrap(), 1);
    }

    #[test]
    fn end_boundary_after_pop_is_rejected() {
        let (_source, mut container) = split_source(&[0, 1, 2], &[1]);
        let end = container.end().unwrap();
        container.pop().unwrap();
        assert_eq!(container.shift_many(&end).err(), Some(Error::OutOfBoundsMove));
        assert_eq!(container.to_vec().unwrap(), vec![0]);
    }

    #[cfg(feature = "checked")]
    #[test]
    fn boundary_into_a_replaced_range_fails_before_evicting() {
        let (_source, mut container) = split_source(&[0, 1, 2], &[1]);
        let mut boundary = container.begin().unwrap();
        boundary.move_by(2).unwrap();
        container.pop().unwrap();
        let other: Vector<i32> = vec![7, 8].into_iter().collect();
        container.push(other.range().unwrap()).unwrap();

        assert_eq!(container.shift_many(&boundary).err(), Some(Error::NotEquatable));
        assert_eq!(container.pop_many(&boundary).err(), Some(Error::NotEquatable));
        assert_eq!(container.to_vec().unwrap(), vec![0, 7, 8]);
        assert_eq!(container.segments().unwrap(), 2);
    }

    #[test]
    fn end_boundary_pop_many_evicts_ranges_pushed_later() {
        let (_source, mut container) = split_source(&[0, 1], &[1]);
        let end = container.end().unwrap();
        let extra: Vector<i32> = vec![5].into_iter().collect();
        container.push(extra.range().unwrap()).unwrap();

        let evicted = container.pop_many(&end).unwrap();
        assert_eq!(contents(&evicted), vec![vec![5]]);
        assert_eq!(container.to_vec().unwrap(), vec![0, 1]);
        assert_eq!(container.count().unwrap(), 2);
    }

    #[test]
    fn empty_ranges_are_ignored() {
        let list: List<i32> = List::new();
        let mut container: SegmentContainer<ListCursor<i32>> = SegmentContainer::new();
        container.push(list.range().unwrap()).unwrap();
        container.unshift(list.range().unwrap()).unwrap();
        assert_eq!(container.segments().unwrap(), 0);
        assert!(container.begin().unwrap().equals(&container.end().unwrap()).unwrap());
    }

    #[test]
    fn whole_range_pop_and_shift() {
        let (_source, mut container) = split_source(&[0, 1, 2, 3], &[1, 3]);
        assert_eq!(container.count().unwrap(), 4);
        assert_eq!(container.pop().unwrap().to_vec().unwrap(), vec![3]);
        assert_eq!(container.shift().unwrap().to_vec().unwrap(), vec![0]);
        assert_eq!(container.count().unwrap(), 2);
        assert_eq!(container.to_vec().unwrap(), vec![1, 2]);
    }

    #[test]
    fn disposal_fails_later_calls() {
        let (_source, mut container) = split_source(&[0, 1], &[]);
        container.dispose();
        assert!(container.is_disposed());
        assert_eq!(container.count(), Err(Error::Disposed));
        assert_eq!(container.begin().err(), Some(Error::Disposed));
    }
}
