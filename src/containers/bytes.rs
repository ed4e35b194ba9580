//! Growable byte buffers with typed numeric access.
//!
//! There is one buffer implementation, generic over where the bytes live:
//!
//! - [`ByteBuffer`] keeps them in a heap `Vec<u8>`
//! - [`InlineBuffer`] keeps the first [`INLINE_CAPACITY`] bytes inline and
//!   spills to the heap past that
//!
//! Physical storage is always zero-filled up to the capacity; the logical
//! length is tracked separately. Inserting past capacity doubles it (or grows
//! to the required size if that is larger) with a single reallocation, then
//! opens a gap with one `copy_within`.

use std::cell::Ref;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::indexed::{ContiguousSlots, IndexCursor, Slots};
use crate::check::require;
use crate::concept::Tier;
use crate::container::{Container, Indexed, Rewind, Sequence, Shared, Structural};
use crate::error::{Error, Result};

/// Bytes an [`InlineBuffer`] holds before spilling to the heap.
pub const INLINE_CAPACITY: usize = 64;

/// Physical byte storage behind a [`Buffer`].
pub trait ByteStorage: Default + 'static {
    /// Storage for a freshly constructed buffer.
    fn initial() -> Self;

    /// Every allocated byte, including unused capacity.
    fn bytes(&self) -> &[u8];

    /// Every allocated byte, writable.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Resize to exactly `capacity` bytes, zero-filling new space.
    fn grow_to(&mut self, capacity: usize);
}

impl ByteStorage for Vec<u8> {
    fn initial() -> Self {
        return Vec::new();
    }

    fn bytes(&self) -> &[u8] {
        return self.as_slice();
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        return self.as_mut_slice();
    }

    fn grow_to(&mut self, capacity: usize) {
        self.resize(capacity, 0);
    }
}

impl ByteStorage for SmallVec<[u8; INLINE_CAPACITY]> {
    fn initial() -> Self {
        return SmallVec::from_elem(0, INLINE_CAPACITY);
    }

    fn bytes(&self) -> &[u8] {
        return self.as_slice();
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        return self.as_mut_slice();
    }

    fn grow_to(&mut self, capacity: usize) {
        self.resize(capacity, 0);
    }
}

/// Bytes plus logical length.
pub struct ByteStore<B> {
    raw: B,
    len: usize,
}

impl<B: ByteStorage> ByteStore<B> {
    fn with_raw(raw: B) -> ByteStore<B> {
        return ByteStore { raw, len: 0 };
    }

    fn capacity(&self) -> usize {
        return self.raw.bytes().len();
    }

    /// Make room for `required` bytes in total.
    fn reserve(&mut self, required: usize) {
        let capacity = self.capacity();
        if required > capacity {
            self.raw.grow_to(required.max(capacity * 2));
        }
    }

    fn insert(&mut self, index: usize, byte: u8) {
        let len = self.len;
        self.reserve(len + 1);
        let bytes = self.raw.bytes_mut();
        bytes.copy_within(index..len, index + 1);
        bytes[index] = byte;
        self.len += 1;
    }

    fn remove(&mut self, index: usize) -> u8 {
        let len = self.len;
        let bytes = self.raw.bytes_mut();
        let byte = bytes[index];
        bytes.copy_within(index + 1..len, index);
        self.len -= 1;
        return byte;
    }

    fn extend_from_slice(&mut self, values: &[u8]) {
        let len = self.len;
        self.reserve(len + values.len());
        self.raw.bytes_mut()[len..len + values.len()].copy_from_slice(values);
        self.len += values.len();
    }

    /// The `length` bytes at `offset`, if they lie within the logical length.
    fn window(&self, offset: usize, length: usize) -> Option<&[u8]> {
        let end = offset.checked_add(length)?;
        return self.as_slice().get(offset..end);
    }
}

impl<B: ByteStorage> Default for ByteStore<B> {
    fn default() -> Self {
        return ByteStore { raw: B::default(), len: 0 };
    }
}

impl<B: ByteStorage> Slots for ByteStore<B> {
    type Item = u8;
    const TIER: Tier = Tier::Contiguous;

    fn len(&self) -> usize {
        return self.len;
    }

    fn get(&self, index: usize) -> Option<&u8> {
        return self.as_slice().get(index);
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut u8> {
        let len = self.len;
        return self.raw.bytes_mut()[..len].get_mut(index);
    }
}

impl<B: ByteStorage> ContiguousSlots for ByteStore<B> {
    fn as_slice(&self) -> &[u8] {
        return &self.raw.bytes()[..self.len];
    }
}

/// Widths accepted by the typed accessors.
fn check_width(length: usize, op: &'static str) -> Result<()> {
    return match length {
        1 | 2 | 4 => Ok(()),
        _ => Err(Error::Unsupported { op }),
    };
}

/// Decode up to eight bytes as an integer, sign-extending when `signed`.
fn decode(bytes: &[u8], signed: bool, little_endian: bool) -> i64 {
    let mut raw: u64 = 0;
    if little_endian {
        for &byte in bytes.iter().rev() {
            raw = (raw << 8) | byte as u64;
        }
    } else {
        for &byte in bytes {
            raw = (raw << 8) | byte as u64;
        }
    }
    if signed {
        let shift = 64 - 8 * bytes.len() as u32;
        return ((raw << shift) as i64) >> shift;
    }
    return raw as i64;
}

fn encode(bytes: &mut [u8], value: i64, little_endian: bool) {
    let n = bytes.len();
    for i in 0..n {
        let byte = (value >> (8 * i)) as u8;
        if little_endian {
            bytes[i] = byte;
        } else {
            bytes[n - 1 - i] = byte;
        }
    }
}

/// Growable byte buffer over a [`ByteStorage`] backing.
pub struct Buffer<B: ByteStorage> {
    shared: Rc<Shared<ByteStore<B>>>,
}

/// Byte buffer on the heap.
pub type ByteBuffer = Buffer<Vec<u8>>;

/// Byte buffer with inline storage for short contents.
pub type InlineBuffer = Buffer<SmallVec<[u8; INLINE_CAPACITY]>>;

/// Cursor into a byte buffer.
pub type ByteCursor<B> = IndexCursor<ByteStore<B>>;

impl<B: ByteStorage> Buffer<B> {
    pub fn new() -> Buffer<B> {
        return Buffer { shared: Shared::new(ByteStore::with_raw(B::initial())) };
    }

    /// An empty buffer with at least `capacity` bytes of room.
    pub fn with_capacity(capacity: usize) -> Buffer<B> {
        let mut store = ByteStore::with_raw(B::initial());
        store.reserve(capacity);
        return Buffer { shared: Shared::new(store) };
    }

    pub fn capacity(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().capacity());
    }

    /// Append every byte of `values`, growing at most once.
    pub fn extend_from_slice(&mut self, values: &[u8]) -> Result<()> {
        self.shared.live()?;
        self.shared.write().extend_from_slice(values);
        return Ok(());
    }

    /// Decode the `length`-byte integer at `offset`.
    ///
    /// `length` must be 1, 2 or 4. Unsigned values are zero-extended, signed
    /// values sign-extended.
    pub fn read_at(&self, offset: usize, length: usize, signed: bool, little_endian: bool) -> Result<i64> {
        self.shared.live()?;
        check_width(length, "read_at")?;
        let store = self.shared.read();
        let bytes = store.window(offset, length).ok_or(Error::OutOfBoundsRead)?;
        return Ok(decode(bytes, signed, little_endian));
    }

    /// Encode the low `length` bytes of `value` at `offset`.
    pub fn write_at(&mut self, offset: usize, length: usize, value: i64, little_endian: bool) -> Result<()> {
        self.shared.live()?;
        check_width(length, "write_at")?;
        let mut store = self.shared.write();
        let end = offset.checked_add(length).ok_or(Error::OutOfBoundsWrite)?;
        require!(end <= store.len, Error::OutOfBoundsWrite);
        let len = store.len;
        let bytes = &mut store.raw.bytes_mut()[..len];
        encode(&mut bytes[offset..end], value, little_endian);
        return Ok(());
    }

    /// Borrow the bytes from the start of the buffer up to `boundary`.
    pub fn data(&self, boundary: &ByteCursor<B>) -> Result<Ref<'_, [u8]>> {
        require!(boundary.belongs_to(&self.shared), Error::NotEquatable);
        let len = boundary.checked_len()?;
        let to = boundary.position();
        require!(to <= len, Error::OutOfBoundsRead);
        return Ok(Ref::map(self.shared.read(), |store| &store.as_slice()[..to]));
    }

    fn anchor(&self, at: &ByteCursor<B>) -> Result<usize> {
        require!(at.belongs_to(&self.shared), Error::NotEquatable);
        let len = at.checked_len()?;
        require!(at.position() < len, Error::UpdateOutOfBounds);
        return Ok(at.position());
    }
}

impl<B: ByteStorage> IndexCursor<ByteStore<B>> {
    /// Decode the `length`-byte integer `offset` bytes past this cursor.
    pub fn read(&self, offset: usize, length: usize, signed: bool, little_endian: bool) -> Result<i64> {
        self.checked_len()?;
        check_width(length, "read")?;
        let start = self.position().checked_add(offset).ok_or(Error::OutOfBoundsRead)?;
        let store = self.storage();
        let bytes = store.window(start, length).ok_or(Error::OutOfBoundsRead)?;
        return Ok(decode(bytes, signed, little_endian));
    }
}

impl<B: ByteStorage> Container for Buffer<B> {
    type Item = u8;
    type Cursor = ByteCursor<B>;

    fn begin(&self) -> Result<ByteCursor<B>> {
        self.shared.live()?;
        return Ok(IndexCursor::new(&self.shared, 0));
    }

    fn end(&self) -> Result<ByteCursor<B>> {
        self.shared.live()?;
        let len = self.shared.read().len;
        return Ok(IndexCursor::new(&self.shared, len));
    }

    fn count(&self) -> Result<usize> {
        self.shared.live()?;
        return Ok(self.shared.read().len);
    }

    fn front(&self) -> Result<u8> {
        self.shared.live()?;
        return self.shared.read().as_slice().first().copied().ok_or(Error::Empty);
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

    fn to_vec(&self) -> Result<Vec<u8>> {
        self.shared.live()?;
        return Ok(self.shared.read().as_slice().to_vec());
    }
}

impl<B: ByteStorage> Sequence for Buffer<B> {
    fn push(&mut self, value: u8) -> Result<()> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let len = store.len;
        store.insert(len, value);
        return Ok(());
    }

    fn shift(&mut self) -> Result<u8> {
        self.shared.live()?;
        let mut store = self.shared.write();
        if store.len == 0 {
            return Err(Error::Empty);
        }
        let value = store.remove(0);
        drop(store);
        self.shared.bump();
        return Ok(value);
    }

    fn unshift(&mut self, value: u8) -> Result<()> {
        self.shared.live()?;
        self.shared.write().insert(0, value);
        self.shared.bump();
        return Ok(());
    }
}

impl<B: ByteStorage> Rewind for Buffer<B> {
    fn back(&self) -> Result<u8> {
        self.shared.live()?;
        return self.shared.read().as_slice().last().copied().ok_or(Error::Empty);
    }

    fn pop(&mut self) -> Result<u8> {
        self.shared.live()?;
        let mut store = self.shared.write();
        if store.len == 0 {
            return Err(Error::Empty);
        }
        let last = store.len - 1;
        return Ok(store.remove(last));
    }
}

impl<B: ByteStorage> Structural for Buffer<B> {
    fn insert(&mut self, at: &ByteCursor<B>, value: u8) -> Result<ByteCursor<B>> {
        let index = self.anchor(at)?;
        self.shared.write().insert(index, value);
        self.shared.bump();
        return Ok(IndexCursor::new(&self.shared, index));
    }

    fn remove(&mut self, at: &ByteCursor<B>) -> Result<u8> {
        let index = self.anchor(at)?;
        let value = self.shared.write().remove(index);
        self.shared.bump();
        return Ok(value);
    }
}

impl<B: ByteStorage> Indexed for Buffer<B> {
    fn at(&self, index: usize) -> Result<u8> {
        self.shared.live()?;
        return self.shared.read().get(index).copied().ok_or(Error::OutOfBoundsRead);
    }

    fn set_at(&mut self, index: usize, value: u8) -> Result<()> {
        self.shared.live()?;
        let mut store = self.shared.write();
        let slot = store.get_mut(index).ok_or(Error::OutOfBoundsWrite)?;
        *slot = value;
        return Ok(());
    }
}

impl<B: ByteStorage> Default for Buffer<B> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<B: ByteStorage> FromIterator<u8> for Buffer<B> {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut store = ByteStore::with_raw(B::initial());
        let values: Vec<u8> = iter.into_iter().collect();
        store.extend_from_slice(&values);
        return Buffer { shared: Shared::new(store) };
    }
}

impl<B: ByteStorage> fmt::Debug for Buffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_disposed() {
            return f.write_str("Buffer(<disposed>)");
        }
        let store = self.shared.read();
        write!(f, "Buffer[")?;
        for (i, byte) in store.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        return write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{ContiguousCursor, ForwardCursor, InputCursor, RandomAccessCursor};

    #[test]
    fn little_endian_u16() {
        let mut buffer = ByteBuffer::new();
        buffer.push(0x01).unwrap();
        buffer.push(0x02).unwrap();
        assert_eq!(buffer.read_at(0, 2, false, true).unwrap(), 0x0201);
        assert_eq!(buffer.read_at(0, 2, false, false).unwrap(), 0x0102);
    }

    #[test]
    fn signed_reads_sign_extend() {
        let buffer: ByteBuffer = vec![0xff, 0xfe, 0xff, 0xff].into_iter().collect();
        assert_eq!(buffer.read_at(0, 1, true, true).unwrap(), -1);
        assert_eq!(buffer.read_at(0, 1, false, true).unwrap(), 0xff);
        assert_eq!(buffer.read_at(0, 4, true, true).unwrap(), -257);
        assert_eq!(buffer.read_at(0, 4, false, true).unwrap(), 0xfffffeff);
    }

    #[test]
    fn bad_widths_and_offsets() {
        let buffer: ByteBuffer = vec![1, 2, 3].into_iter().collect();
        assert_eq!(buffer.read_at(0, 3, false, true), Err(Error::Unsupported { op: "read_at" }));
        assert_eq!(buffer.read_at(2, 2, false, true), Err(Error::OutOfBoundsRead));
        assert_eq!(buffer.read_at(usize::MAX, 1, false, true), Err(Error::OutOfBoundsRead));
    }

    #[test]
    fn write_then_read() {
        let mut buffer: ByteBuffer = vec![0; 4].into_iter().collect();
        buffer.write_at(0, 4, -2, false).unwrap();
        assert_eq!(buffer.to_vec().unwrap(), vec![0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(buffer.read_at(0, 4, true, false).unwrap(), -2);
        assert_eq!(buffer.write_at(2, 4, 0, true), Err(Error::OutOfBoundsWrite));
    }

    #[test]
    fn capacity_doubles() {
        let mut buffer = ByteBuffer::with_capacity(4);
        assert_eq!(buffer.capacity().unwrap(), 4);
        buffer.extend_from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.capacity().unwrap(), 4);
        buffer.push(5).unwrap();
        assert_eq!(buffer.capacity().unwrap(), 8);
        buffer.extend_from_slice(&[0; 20]).unwrap();
        assert_eq!(buffer.capacity().unwrap(), 25);
    }

    #[test]
    fn insert_and_remove_shift_bytes() {
        let mut buffer: ByteBuffer = vec![1, 2, 4].into_iter().collect();
        let mut at = buffer.begin().unwrap();
        at.move_by(2).unwrap();
        let three = buffer.insert(&at, 3).unwrap();
        assert_eq!(buffer.to_vec().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(buffer.remove(&three).unwrap(), 3);
        assert_eq!(buffer.to_vec().unwrap(), vec![1, 2, 4]);
        let end = buffer.end().unwrap();
        assert_eq!(buffer.remove(&end), Err(Error::UpdateOutOfBounds));
    }

    #[test]
    fn front_and_back_ends() {
        let mut buffer = ByteBuffer::new();
        buffer.unshift(2).unwrap();
        buffer.unshift(1).unwrap();
        buffer.push(3).unwrap();
        assert_eq!(buffer.front().unwrap(), 1);
        assert_eq!(buffer.back().unwrap(), 3);
        assert_eq!(buffer.shift().unwrap(), 1);
        assert_eq!(buffer.pop().unwrap(), 3);
        assert_eq!(buffer.pop().unwrap(), 2);
        assert_eq!(buffer.pop(), Err(Error::Empty));
    }

    #[test]
    fn data_is_zero_copy_prefix() {
        let buffer: InlineBuffer = (0..10).collect();
        let mut boundary = buffer.begin().unwrap();
        boundary.advance(4).unwrap();
        assert_eq!(&*buffer.data(&boundary).unwrap(), &[0, 1, 2, 3]);

        let begin = buffer.begin().unwrap();
        assert_eq!(&*begin.data(&boundary).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(boundary.offset().unwrap(), 4);
    }

    #[test]
    fn cursor_reads_relative_to_position() {
        let buffer: ByteBuffer = vec![0, 0x34, 0x12].into_iter().collect();
        let mut cursor = buffer.begin().unwrap();
        cursor.step().unwrap();
        assert_eq!(cursor.value().unwrap(), 0x34);
        assert_eq!(cursor.read(0, 2, false, true).unwrap(), 0x1234);
        assert_eq!(cursor.read(1, 2, false, true), Err(Error::OutOfBoundsRead));
    }

    #[test]
    fn inline_buffer_spills_past_inline_capacity() {
        let mut buffer = InlineBuffer::new();
        assert_eq!(buffer.capacity().unwrap(), INLINE_CAPACITY);
        buffer.extend_from_slice(&[7; INLINE_CAPACITY]).unwrap();
        buffer.push(8).unwrap();
        assert_eq!(buffer.capacity().unwrap(), INLINE_CAPACITY * 2);
        assert_eq!(buffer.count().unwrap(), INLINE_CAPACITY + 1);
        assert_eq!(buffer.back().unwrap(), 8);
    }

    #[test]
    fn debug_is_hex() {
        let buffer: ByteBuffer = vec![0x0a, 0xff].into_iter().collect();
        assert_eq!(format!("{:?}", buffer), "Buffer[0a ff]");
    }
}
