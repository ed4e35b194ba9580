use std::fmt;
use std::rc::Rc;

use super::Segment;
use crate::check::require;
use crate::concept::{surface_of, Member, Surface, Tier};
use crate::cursor::{
    BidirectionalCursor, Cursor, ForwardCursor, InputCursor, OutputCursor, RandomAccessCursor,
};
use crate::error::{Error, Result};
use crate::range::Range;

type InnerCursor<O> = <<O as Cursor>::Item as Segment>::Cursor;

struct Inner<S: Segment> {
    segment: S,
    cursor: S::Cursor,
}

impl<S: Segment> Inner<S> {
    fn at_begin(segment: S) -> Inner<S> {
        return Inner { cursor: segment.begin_cursor(), segment };
    }

    fn at_end(segment: S) -> Inner<S> {
        return Inner { cursor: segment.end_cursor(), segment };
    }

    fn exhausted(&self) -> Result<bool> {
        return self.cursor.equals(&self.segment.end_cursor());
    }
}

impl<S: Segment> Clone for Inner<S> {
    fn clone(&self) -> Self {
        return Inner { segment: self.segment.clone(), cursor: self.cursor.clone() };
    }
}

/// Signed `a - b` for cursors known to be ordered, as a count.
fn offset<C: RandomAccessCursor>(a: &C, b: &C) -> Result<usize> {
    return usize::try_from(a.subtract(b)?).map_err(|_| Error::OutOfBoundsMove);
}

/// Cursor over the flattened elements of a [`super::JoinView`].
///
/// Holds an outer cursor naming the current segment and an inner cursor
/// within it. Away from the end, the inner cursor never rests at its
/// segment's end: stepping onto it moves on to the next non-empty segment.
/// At the end the outer cursor equals the view's outer end and there is no
/// inner cursor.
pub struct JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    bounds: Rc<Range<O>>,
    outer: O,
    inner: Option<Inner<O::Item>>,
}

impl<O> JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    pub(crate) fn begin(bounds: Rc<Range<O>>) -> Result<JoinCursor<O>> {
        let outer = bounds.begin().clone();
        let mut cursor = JoinCursor { bounds, outer, inner: None };
        cursor.load()?;
        cursor.settle_forward()?;
        return Ok(cursor);
    }

    pub(crate) fn end(bounds: Rc<Range<O>>) -> JoinCursor<O> {
        let outer = bounds.end().clone();
        return JoinCursor { bounds, outer, inner: None };
    }

    /// Outer cursor naming the current segment.
    pub fn outer(&self) -> &O {
        return &self.outer;
    }

    /// Inner cursor within the current segment, or `None` at the end.
    pub fn inner(&self) -> Option<&InnerCursor<O>> {
        return self.inner.as_ref().map(|inner| &inner.cursor);
    }

    /// Point the inner cursor at the start of the outer cursor's segment.
    fn load(&mut self) -> Result<()> {
        if self.outer.equals(self.bounds.end())? {
            self.inner = None;
        } else {
            self.inner = Some(Inner::at_begin(self.outer.value()?));
        }
        return Ok(());
    }

    /// Move past exhausted and empty segments.
    fn settle_forward(&mut self) -> Result<()> {
        loop {
            match &self.inner {
                None => return Ok(()),
                Some(inner) if !inner.exhausted()? => return Ok(()),
                Some(_) => {}
            }
            self.outer.step()?;
            self.load()?;
        }
    }
}

impl<O> Clone for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn clone(&self) -> Self {
        return JoinCursor {
            bounds: Rc::clone(&self.bounds),
            outer: self.outer.clone(),
            inner: self.inner.clone(),
        };
    }
}

impl<O> fmt::Debug for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("JoinCursor")
            .field("outer", &self.outer)
            .field("inner", &self.inner())
            .finish();
    }
}

impl<O> Cursor for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    type Item = <InnerCursor<O> as Cursor>::Item;
    const TIER: Tier = O::TIER.meet(<InnerCursor<O> as Cursor>::TIER).meet(Tier::RandomAccess);

    fn equatable_to(&self, other: &Self) -> bool {
        return self.outer.equatable_to(&other.outer);
    }

    fn equals(&self, other: &Self) -> Result<bool> {
        require!(self.equatable_to(other), Error::NotEquatable);
        if !self.outer.equals(&other.outer)? {
            return Ok(false);
        }
        return match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => a.cursor.equals(&b.cursor),
            (None, None) => Ok(true),
            _ => Ok(false),
        };
    }
}

impl<O> InputCursor for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn value(&self) -> Result<Self::Item> {
        let inner = self.inner.as_ref().ok_or(Error::OutOfBoundsRead)?;
        return inner.cursor.value();
    }
}

impl<O> OutputCursor for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn set_value(&self, value: Self::Item) -> Result<()> {
        let inner = self.inner.as_ref().ok_or(Error::OutOfBoundsWrite)?;
        return inner.cursor.set_value(value);
    }
}

impl<O> ForwardCursor for JoinCursor<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn step(&mut self) -> Result<()> {
        let mut next = self.clone();
        let inner = next.inner.as_mut().ok_or(Error::OutOfBoundsMove)?;
        inner.cursor.step()?;
        next.settle_forward()?;
        *self = next;
        return Ok(());
    }
}

impl<O> BidirectionalCursor for JoinCursor<O>
where
    O: BidirectionalCursor,
    O::Item: Segment,
    InnerCursor<O>: BidirectionalCursor,
{
    fn step_back(&mut self) -> Result<()> {
        let mut next = self.clone();
        loop {
            if let Some(inner) = next.inner.as_mut() {
                if !inner.cursor.equals(&inner.segment.begin_cursor())? {
                    inner.cursor.step_back()?;
                    *self = next;
                    return Ok(());
                }
            }
            require!(!next.outer.equals(next.bounds.begin())?, Error::OutOfBoundsMove);
            next.outer.step_back()?;
            next.inner = Some(Inner::at_end(next.outer.value()?));
        }
    }
}

impl<O> JoinCursor<O>
where
    O: RandomAccessCursor,
    O::Item: Segment,
    InnerCursor<O>: RandomAccessCursor,
{
    /// Number of elements from `self` to `end`, summing segment lengths
    /// instead of stepping.
    ///
    /// `ForwardCursor::distance_to` and `cursor::distance` stay element by
    /// element on a join, since the forward impl cannot assume random-access
    /// segments. Type-erased joins get this path through `AnyCursor`.
    pub fn distance_by_segments(&self, end: &Self) -> Result<usize> {
        let d = end.subtract(self)?;
        return usize::try_from(d).map_err(|_| Error::OutOfBoundsMove);
    }

    /// Move forward `n` elements, skipping whole segments.
    pub fn advance_by_segments(&mut self, n: usize) -> Result<()> {
        let k = isize::try_from(n).map_err(|_| Error::OutOfBoundsMove)?;
        return self.move_by(k);
    }

    /// Elements from `lo` to `hi`, given `lo.outer` precedes `hi.outer`.
    fn span(lo: &Self, hi: &Self) -> Result<usize> {
        let first = lo.inner.as_ref().ok_or(Error::OutOfBoundsMove)?;
        let mut total = offset(&first.segment.end_cursor(), &first.cursor)?;
        let mut walker = lo.outer.clone();
        walker.step()?;
        while !walker.equals(&hi.outer)? {
            total += walker.value()?.len()?;
            walker.step()?;
        }
        if let Some(last) = &hi.inner {
            total += offset(&last.cursor, &last.segment.begin_cursor())?;
        }
        return Ok(total);
    }
}

impl<O> RandomAccessCursor for JoinCursor<O>
where
    O: RandomAccessCursor,
    O::Item: Segment,
    InnerCursor<O>: RandomAccessCursor,
{
    fn move_by(&mut self, k: isize) -> Result<()> {
        let mut next = self.clone();
        if k >= 0 {
            let mut remaining = k as usize;
            while remaining > 0 {
                let inner = next.inner.as_mut().ok_or(Error::OutOfBoundsMove)?;
                let left = offset(&inner.segment.end_cursor(), &inner.cursor)?;
                if remaining < left {
                    inner.cursor.move_by(remaining as isize)?;
                    break;
                }
                remaining -= left;
                next.outer.step()?;
                next.load()?;
            }
            next.settle_forward()?;
        } else {
            let mut remaining = k.unsigned_abs();
            while remaining > 0 {
                if let Some(inner) = next.inner.as_mut() {
                    let before = offset(&inner.cursor, &inner.segment.begin_cursor())?;
                    if remaining <= before {
                        inner.cursor.move_by(-(remaining as isize))?;
                        break;
                    }
                    remaining -= before;
                }
                require!(!next.outer.equals(next.bounds.begin())?, Error::OutOfBoundsMove);
                next.outer.step_back()?;
                next.inner = Some(Inner::at_end(next.outer.value()?));
            }
        }
        *self = next;
        return Ok(());
    }

    fn subtract(&self, other: &Self) -> Result<isize> {
        require!(self.equatable_to(other), Error::NotEquatable);
        let n = match self.outer.compare(&other.outer)? {
            std::cmp::Ordering::Equal => {
                return match (&self.inner, &other.inner) {
                    (Some(a), Some(b)) => a.cursor.subtract(&b.cursor),
                    _ => Ok(0),
                };
            }
            std::cmp::Ordering::Greater => Self::span(other, self)? as isize,
            std::cmp::Ordering::Less => -(Self::span(self, other)? as isize),
        };
        return Ok(n);
    }
}

impl<O> Surface for JoinCursor<O>
where
    O: ForwardCursor + 'static,
    O::Item: Segment + 'static,
{
    const MEMBERS: &'static [Member] = surface_of(<Self as Cursor>::TIER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, Sequence};
    use crate::containers::{ChainCursor, Deque, DequeCursor, List, ListCursor, Vector, VectorCursor};
    use crate::view::JoinView;

    fn nested(parts: &[&[i32]]) -> (Vec<Vector<i32>>, Vector<Range<VectorCursor<i32>>>) {
        let inner: Vec<Vector<i32>> = parts.iter().map(|part| part.iter().copied().collect()).collect();
        let outer = inner.iter().map(|v| v.range().unwrap()).collect();
        return (inner, outer);
    }

    #[test]
    fn flattens_in_order() {
        let (_inner, outer) = nested(&[&[1], &[2, 3]]);
        let view = JoinView::new(outer.range().unwrap());
        let mut cursor = view.begin().unwrap();
        let end = view.end().unwrap();
        let mut seen = Vec::new();
        while !cursor.equals(&end).unwrap() {
            seen.push(cursor.value().unwrap());
            cursor.step().unwrap();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(cursor.step(), Err(Error::OutOfBoundsMove));
        assert_eq!(cursor.value(), Err(Error::OutOfBoundsRead));
    }

    #[test]
    fn subtract_crosses_segments() {
        let (_inner, outer) = nested(&[&[1], &[2, 3]]);
        let view = JoinView::new(outer.range().unwrap());
        let first = view.begin().unwrap();
        let mut last = view.begin().unwrap();
        last.move_by(2).unwrap();
        assert_eq!(last.value().unwrap(), 3);
        assert_eq!(last.subtract(&first).unwrap(), 2);
        assert_eq!(first.subtract(&last).unwrap(), -2);
        assert_eq!(view.end().unwrap().subtract(&first).unwrap(), 3);
    }

    #[test]
    fn segment_paths_agree_with_stepping() {
        let (_inner, outer) = nested(&[&[1, 2], &[], &[3], &[4, 5, 6]]);
        let view = JoinView::new(outer.range().unwrap());
        let begin = view.begin().unwrap();
        let end = view.end().unwrap();
        assert_eq!(begin.distance_by_segments(&end), begin.distance_to(&end));
        assert_eq!(begin.distance_by_segments(&end), Ok(6));
        assert_eq!(end.distance_by_segments(&begin), Err(Error::OutOfBoundsMove));

        let mut fast = begin.clone();
        let mut slow = begin.clone();
        fast.advance_by_segments(4).unwrap();
        slow.advance(4).unwrap();
        assert!(fast.equals(&slow).unwrap());
        assert_eq!(fast.value().unwrap(), 5);
        assert_eq!(fast.advance_by_segments(3), Err(Error::OutOfBoundsMove));
        assert_eq!(fast.value().unwrap(), 5);
    }

    #[test]
    fn skips_empty_segments_both_ways() {
        let (_inner, outer) = nested(&[&[], &[1], &[], &[], &[2], &[]]);
        let view = JoinView::new(outer.range().unwrap());
        let mut cursor = view.begin().unwrap();
        assert_eq!(cursor.value().unwrap(), 1);
        cursor.step().unwrap();
        assert_eq!(cursor.value().unwrap(), 2);
        cursor.step().unwrap();
        assert!(cursor.equals(&view.end().unwrap()).unwrap());

        cursor.step_back().unwrap();
        assert_eq!(cursor.value().unwrap(), 2);
        cursor.step_back().unwrap();
        assert_eq!(cursor.value().unwrap(), 1);
        assert_eq!(cursor.step_back(), Err(Error::OutOfBoundsMove));
        assert!(cursor.equals(&view.begin().unwrap()).unwrap());
    }

    #[test]
    fn move_by_in_both_directions() {
        let (_inner, outer) = nested(&[&[0, 1, 2], &[], &[3], &[4, 5]]);
        let view = JoinView::new(outer.range().unwrap());
        let begin = view.begin().unwrap();
        for k in 0..6 {
            let mut cursor = begin.clone();
            cursor.move_by(k).unwrap();
            assert_eq!(cursor.value().unwrap(), k as i32);
            assert_eq!(cursor.subtract(&begin).unwrap(), k);
        }

        let mut end = view.end().unwrap();
        assert_eq!(end.clone().move_by(1), Err(Error::OutOfBoundsMove));
        end.move_by(-6).unwrap();
        assert!(end.equals(&begin).unwrap());
        assert_eq!(end.move_by(-1), Err(Error::OutOfBoundsMove));
        assert!(end.equals(&begin).unwrap());
    }

    #[test]
    fn writes_go_through_to_segments() {
        let (inner, outer) = nested(&[&[1], &[2]]);
        let view = JoinView::new(outer.range().unwrap());
        let mut cursor = view.begin().unwrap();
        cursor.step().unwrap();
        cursor.set_value(20).unwrap();
        assert_eq!(inner[1].to_vec().unwrap(), vec![20]);
    }

    #[test]
    fn tier_is_the_weaker_of_outer_and_inner() {
        type OverLists = JoinCursor<VectorCursor<Range<ListCursor<i32>>>>;
        type OverChains = JoinCursor<DequeCursor<Range<ChainCursor<i32>>>>;
        type OverVectors = JoinCursor<VectorCursor<Range<VectorCursor<i32>>>>;
        assert_eq!(OverLists::TIER, Tier::Forward);
        assert_eq!(OverChains::TIER, Tier::Bidirectional);
        assert_eq!(OverVectors::TIER, Tier::RandomAccess);
    }

    #[test]
    fn forward_only_inner_segments() {
        let a: List<i32> = vec![1, 2].into_iter().collect();
        let b: List<i32> = vec![3].into_iter().collect();
        let mut outer: Deque<Range<ListCursor<i32>>> = Deque::new();
        outer.push(a.range().unwrap()).unwrap();
        outer.push(b.range().unwrap()).unwrap();
        let view = JoinView::new(outer.range().unwrap());
        assert_eq!(view.begin().unwrap().distance_to(&view.end().unwrap()).unwrap(), 3);
        assert_eq!(view.to_vec().unwrap(), vec![1, 2, 3]);
    }
}
