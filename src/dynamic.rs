//! Type-erased cursors.
//!
//! [`AnyCursor<T>`] boxes any cursor over `T` behind the [`DynCursor`]
//! trait object, so heterogeneous cursor types can be stored and driven
//! together. The statically typed tier traits no longer apply once erased;
//! instead every cursor reports its tier at runtime, as classified by the
//! conformance checker, and the generic algorithms on `AnyCursor` branch on
//! it.
//!
//! Operations outside a cursor's tier fail with `Unsupported`. An operation
//! inside the claimed tier that an implementation forgot to provide fails
//! with `NotImplemented`.

use std::any::Any;
use std::fmt;

use crate::concept::{classify, Surface, Tier};
use crate::cursor::{BidirectionalCursor, ForwardCursor, RandomAccessCursor};
use crate::error::{Error, Result};

/// Error for an operation a cursor does not provide.
fn missing<R>(tier: Tier, needed: Tier, op: &'static str) -> Result<R> {
    if tier.includes(needed) {
        return Err(Error::NotImplemented { op });
    }
    return Err(Error::Unsupported { op });
}

/// Object-safe cursor interface.
///
/// Implementors provide the forward operations and override the others up to
/// the tier they report.
pub trait DynCursor<T>: fmt::Debug {
    fn tier(&self) -> Tier;

    fn value(&self) -> Result<T>;

    fn set_value(&self, value: T) -> Result<()>;

    fn step(&mut self) -> Result<()>;

    fn step_back(&mut self) -> Result<()> {
        return missing(self.tier(), Tier::Bidirectional, "step_back");
    }

    fn move_by(&mut self, _k: isize) -> Result<()> {
        return missing(self.tier(), Tier::RandomAccess, "move_by");
    }

    fn subtract(&self, _other: &dyn DynCursor<T>) -> Result<isize> {
        return missing(self.tier(), Tier::RandomAccess, "subtract");
    }

    fn equals(&self, other: &dyn DynCursor<T>) -> Result<bool>;

    fn equatable_to(&self, other: &dyn DynCursor<T>) -> bool;

    fn clone_box(&self) -> Box<dyn DynCursor<T>>;

    fn as_any(&self) -> &dyn Any;
}

/// Downcast `other` to the wrapper type of `this`.
fn same_kind<'a, W: 'static, T>(other: &'a dyn DynCursor<T>) -> Result<&'a W> {
    return other.as_any().downcast_ref::<W>().ok_or(Error::NotEquatable);
}

macro_rules! erased_common {
    () => {
        fn tier(&self) -> Tier {
            return self.tier;
        }

        fn value(&self) -> Result<C::Item> {
            return self.cursor.value();
        }

        fn set_value(&self, value: C::Item) -> Result<()> {
            return self.cursor.set_value(value);
        }

        fn step(&mut self) -> Result<()> {
            return self.cursor.step();
        }

        fn equals(&self, other: &dyn DynCursor<C::Item>) -> Result<bool> {
            let other = same_kind::<Self, C::Item>(other)?;
            return self.cursor.equals(&other.cursor);
        }

        fn equatable_to(&self, other: &dyn DynCursor<C::Item>) -> bool {
            return match same_kind::<Self, C::Item>(other) {
                Ok(other) => self.cursor.equatable_to(&other.cursor),
                Err(_) => false,
            };
        }

        fn clone_box(&self) -> Box<dyn DynCursor<C::Item>> {
            return Box::new(self.clone());
        }

        fn as_any(&self) -> &dyn Any {
            return self;
        }
    };
}

#[derive(Clone, Debug)]
struct ForwardErased<C> {
    cursor: C,
    tier: Tier,
}

impl<C: ForwardCursor + 'static> DynCursor<C::Item> for ForwardErased<C> {
    erased_common!();
}

#[derive(Clone, Debug)]
struct BidirectionalErased<C> {
    cursor: C,
    tier: Tier,
}

impl<C: BidirectionalCursor + 'static> DynCursor<C::Item> for BidirectionalErased<C> {
    erased_common!();

    fn step_back(&mut self) -> Result<()> {
        return self.cursor.step_back();
    }
}

#[derive(Clone, Debug)]
struct RandomErased<C> {
    cursor: C,
    tier: Tier,
}

impl<C: RandomAccessCursor + 'static> DynCursor<C::Item> for RandomErased<C> {
    erased_common!();

    fn step_back(&mut self) -> Result<()> {
        return self.cursor.step_back();
    }

    fn move_by(&mut self, k: isize) -> Result<()> {
        return self.cursor.move_by(k);
    }

    fn subtract(&self, other: &dyn DynCursor<C::Item>) -> Result<isize> {
        let other = same_kind::<Self, C::Item>(other)?;
        return self.cursor.subtract(&other.cursor);
    }
}

/// Classify `C` and cap the result at `ceiling`, failing if it does not
/// reach `floor`.
fn erased_tier<C: Surface>(floor: Tier, ceiling: Tier, op: &'static str) -> Result<Tier> {
    let tier = classify::<C>().ok_or(Error::Unsupported { op })?;
    if !tier.includes(floor) {
        return Err(Error::Unsupported { op });
    }
    return Ok(tier.meet(ceiling));
}

/// A boxed cursor of any type over `T`.
pub struct AnyCursor<T>(Box<dyn DynCursor<T>>);

impl<T: 'static> AnyCursor<T> {
    /// Erase a forward cursor.
    pub fn forward<C>(cursor: C) -> Result<AnyCursor<T>>
    where
        C: ForwardCursor<Item = T> + Surface,
    {
        let tier = erased_tier::<C>(Tier::Forward, Tier::Forward, "forward")?;
        return Ok(AnyCursor(Box::new(ForwardErased { cursor, tier })));
    }

    /// Erase a bidirectional cursor.
    pub fn bidirectional<C>(cursor: C) -> Result<AnyCursor<T>>
    where
        C: BidirectionalCursor<Item = T> + Surface,
    {
        let tier = erased_tier::<C>(Tier::Bidirectional, Tier::Bidirectional, "bidirectional")?;
        return Ok(AnyCursor(Box::new(BidirectionalErased { cursor, tier })));
    }

    /// Erase a random-access cursor.
    pub fn random_access<C>(cursor: C) -> Result<AnyCursor<T>>
    where
        C: RandomAccessCursor<Item = T> + Surface,
    {
        let tier = erased_tier::<C>(Tier::RandomAccess, Tier::RandomAccess, "random_access")?;
        return Ok(AnyCursor(Box::new(RandomErased { cursor, tier })));
    }

    /// Wrap a custom [`DynCursor`] implementation.
    pub fn from_dyn(cursor: Box<dyn DynCursor<T>>) -> AnyCursor<T> {
        return AnyCursor(cursor);
    }
}

impl<T> AnyCursor<T> {
    pub fn tier(&self) -> Tier {
        return self.0.tier();
    }

    pub fn value(&self) -> Result<T> {
        return self.0.value();
    }

    pub fn set_value(&self, value: T) -> Result<()> {
        return self.0.set_value(value);
    }

    pub fn step(&mut self) -> Result<()> {
        return self.0.step();
    }

    pub fn step_back(&mut self) -> Result<()> {
        return self.0.step_back();
    }

    pub fn move_by(&mut self, k: isize) -> Result<()> {
        return self.0.move_by(k);
    }

    pub fn subtract(&self, other: &AnyCursor<T>) -> Result<isize> {
        return self.0.subtract(other.0.as_ref());
    }

    pub fn equals(&self, other: &AnyCursor<T>) -> Result<bool> {
        return self.0.equals(other.0.as_ref());
    }

    pub fn equatable_to(&self, other: &AnyCursor<T>) -> bool {
        return self.0.equatable_to(other.0.as_ref());
    }

    /// Move forward `n` positions, by offset when the tier allows it.
    ///
    /// The cursor is unchanged on failure.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        if self.tier().includes(Tier::RandomAccess) {
            let k = isize::try_from(n).map_err(|_| Error::OutOfBoundsMove)?;
            return self.move_by(k);
        }
        let mut next = self.clone();
        for _ in 0..n {
            next.step()?;
        }
        *self = next;
        return Ok(());
    }

    /// Move backward `n` positions. Requires a bidirectional tier.
    pub fn rewind(&mut self, n: usize) -> Result<()> {
        if self.tier().includes(Tier::RandomAccess) {
            let k = isize::try_from(n).map_err(|_| Error::OutOfBoundsMove)?;
            return self.move_by(-k);
        }
        if !self.tier().includes(Tier::Bidirectional) {
            return Err(Error::Unsupported { op: "rewind" });
        }
        let mut next = self.clone();
        for _ in 0..n {
            next.step_back()?;
        }
        *self = next;
        return Ok(());
    }

    /// Number of steps from `self` to `end`.
    pub fn distance_to(&self, end: &AnyCursor<T>) -> Result<usize> {
        if !self.equatable_to(end) {
            return Err(Error::NotEquatable);
        }
        if self.tier().includes(Tier::RandomAccess) {
            let d = end.subtract(self)?;
            return usize::try_from(d).map_err(|_| Error::OutOfBoundsMove);
        }
        let mut walker = self.clone();
        let mut n = 0;
        while !walker.equals(end)? {
            walker.step()?;
            n += 1;
        }
        return Ok(n);
    }
}

impl<T> Clone for AnyCursor<T> {
    fn clone(&self) -> Self {
        return AnyCursor(self.0.clone_box());
    }
}

impl<T> fmt::Debug for AnyCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "AnyCursor<{}>({:?})", self.tier().name(), self.0);
    }
}
