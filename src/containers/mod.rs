//! Concrete containers.
//!
//! | Container | Cursor tier | Storage |
//! |---|---|---|
//! | [`List`] | Forward | arena nodes, singly linked |
//! | [`Chain`] | Bidirectional | arena nodes, ring through a sentinel |
//! | [`Vector`] | RandomAccess | `Vec<T>` |
//! | [`Deque`] | RandomAccess | `VecDeque<T>` |
//! | [`ByteBuffer`], [`InlineBuffer`] | Contiguous | zero-filled bytes |

pub(crate) mod arena;
pub mod bytes;
pub mod chain;
pub mod deque;
pub mod indexed;
pub mod list;
pub mod vector;

pub use bytes::{Buffer, ByteBuffer, ByteCursor, ByteStorage, InlineBuffer, INLINE_CAPACITY};
pub use chain::{Chain, ChainCursor};
pub use deque::{Deque, DequeCursor};
pub use indexed::IndexCursor;
pub use list::{List, ListCursor};
pub use vector::{Vector, VectorCursor};
