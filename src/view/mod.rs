//! Views that present nested sequences as one flat sequence.
//!
//! A [`JoinView`] takes a range over an outer container whose elements are
//! themselves sequences ([`Segment`]s) and yields a [`JoinCursor`] that walks
//! every inner element in order, crossing segment boundaries transparently
//! and skipping empty segments.

mod join;

pub use join::JoinCursor;

use std::fmt;
use std::rc::Rc;

use crate::cursor::{Cursor, ForwardCursor, InputCursor};
use crate::error::Result;
use crate::range::Range;

/// A sequence that can stand as one element of a joined view.
pub trait Segment: Clone {
    /// Cursor over the segment's elements.
    type Cursor: ForwardCursor;

    /// Cursor at the segment's first element.
    fn begin_cursor(&self) -> Self::Cursor;

    /// Cursor one past the segment's last element.
    fn end_cursor(&self) -> Self::Cursor;

    /// Number of elements.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        return Ok(self.len()? == 0);
    }
}

impl<C: ForwardCursor> Segment for Range<C> {
    type Cursor = C;

    fn begin_cursor(&self) -> C {
        return self.begin().clone();
    }

    fn end_cursor(&self) -> C {
        return self.end().clone();
    }

    fn len(&self) -> Result<usize> {
        return Range::len(self);
    }

    fn is_empty(&self) -> Result<bool> {
        return Range::is_empty(self);
    }
}

/// Element type produced by joining over outer cursor `O`.
pub type JoinItem<O> = <<<O as Cursor>::Item as Segment>::Cursor as Cursor>::Item;

/// Flattening view over a range of segments.
pub struct JoinView<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    outer: Rc<Range<O>>,
}

impl<O> JoinView<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    pub fn new(outer: Range<O>) -> JoinView<O> {
        return JoinView { outer: Rc::new(outer) };
    }

    /// The range of segments being joined.
    pub fn segments(&self) -> &Range<O> {
        return &self.outer;
    }

    /// Cursor at the first element of the first non-empty segment.
    pub fn begin(&self) -> Result<JoinCursor<O>> {
        return JoinCursor::begin(Rc::clone(&self.outer));
    }

    /// Cursor past the last element.
    pub fn end(&self) -> Result<JoinCursor<O>> {
        return Ok(JoinCursor::end(Rc::clone(&self.outer)));
    }

    /// Total number of inner elements.
    pub fn count(&self) -> Result<usize> {
        let mut total = 0;
        for segment in self.outer.values() {
            total += segment?.len()?;
        }
        return Ok(total);
    }

    pub fn is_empty(&self) -> Result<bool> {
        return Ok(self.count()? == 0);
    }

    /// Copy every inner element out, in order.
    pub fn to_vec(&self) -> Result<Vec<JoinItem<O>>> {
        let mut out = Vec::new();
        for segment in self.outer.values() {
            let segment = segment?;
            let end = segment.end_cursor();
            let mut cursor = segment.begin_cursor();
            while !cursor.equals(&end)? {
                out.push(cursor.value()?);
                cursor.step()?;
            }
        }
        return Ok(out);
    }
}

impl<O> Clone for JoinView<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn clone(&self) -> Self {
        return JoinView { outer: Rc::clone(&self.outer) };
    }
}

impl<O> fmt::Debug for JoinView<O>
where
    O: ForwardCursor,
    O::Item: Segment,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_struct("JoinView").field("outer", &self.outer).finish();
    }
}
