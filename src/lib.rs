//! Cursors - linear containers with capability-tiered cursors.
//!
//! Every container hands out cursors: positional handles that re-validate
//! themselves on each call. A cursor's tier (forward, bidirectional,
//! random-access, contiguous) says what it can do, and generic code states the
//! tier it needs as a trait bound. Cursors invalidated by a mutation report
//! `Error::Stale` instead of reading the wrong element.
//!
//! # Quick Start
//!
//! ```
//! use cursors::container::{Container, Sequence};
//! use cursors::containers::Vector;
//! use cursors::cursor::{ForwardCursor, InputCursor, RandomAccessCursor};
//! use cursors::error::Error;
//!
//! let mut vector: Vector<i32> = (0..5).collect();
//! let mut cursor = vector.begin().unwrap();
//! cursor.move_by(3).unwrap();
//! assert_eq!(cursor.value().unwrap(), 3);
//!
//! // Shifting renumbers every element, so old cursors go stale.
//! vector.shift().unwrap();
//! assert_eq!(cursor.value(), Err(Error::Stale));
//! ```
//!
//! # Layout
//!
//! - [`concept`]: tiers, member surfaces and the conformance checker
//! - [`cursor`]: one trait per tier, plus `distance`/`advance`/`rewind`
//! - [`container`]: container traits and the shared storage cell
//! - [`containers`]: list, chain, vector, deque and byte buffers
//! - [`range`], [`view`], [`segment`]: intervals, flattening, eviction
//! - [`dynamic`]: boxed cursors with runtime tier dispatch

pub mod check;
pub mod concept;
pub mod container;
pub mod containers;
pub mod cursor;
pub mod dynamic;
pub mod error;
pub mod range;
pub mod segment;
pub mod view;

pub use error::{Error, Result};
