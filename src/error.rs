//! Error kinds raised by containers, cursors and views.
//!
//! Every failure is local and synchronous. Nothing is retried internally, and
//! a disposed container or a stale cursor stays that way: the only way out is
//! to drop the handle.

use std::fmt;

/// Errors returned by container and cursor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The owning container has been disposed.
    Disposed,
    /// The cursor was issued before a mutation that invalidated it.
    Stale,
    /// A value was read at a position that holds no element.
    OutOfBoundsRead,
    /// A value was written at a position that holds no element.
    OutOfBoundsWrite,
    /// A step or move would leave the valid positions of the container.
    OutOfBoundsMove,
    /// Two cursors from different containers were compared or combined.
    NotEquatable,
    /// An insert or remove was anchored at a position that forbids it.
    UpdateOutOfBounds,
    /// The container holds no elements.
    Empty,
    /// The operation needs a capability tier the cursor does not have.
    Unsupported {
        /// Name of the rejected operation.
        op: &'static str,
    },
    /// The cursor claims the tier for this operation but never provided it.
    NotImplemented {
        /// Name of the missing operation.
        op: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Disposed => write!(f, "container has been disposed"),
            Error::Stale => write!(f, "cursor is stale"),
            Error::OutOfBoundsRead => write!(f, "read out of bounds"),
            Error::OutOfBoundsWrite => write!(f, "write out of bounds"),
            Error::OutOfBoundsMove => write!(f, "move out of bounds"),
            Error::NotEquatable => write!(f, "cursors are not equatable"),
            Error::UpdateOutOfBounds => write!(f, "update anchored out of bounds"),
            Error::Empty => write!(f, "container is empty"),
            Error::Unsupported { op } => write!(f, "operation '{op}' is not supported by this cursor"),
            Error::NotImplemented { op } => write!(f, "operation '{op}' is not implemented"),
        }
    }
}

impl std::error::Error for Error {}
