//! AFL fuzz harness for the structural containers
//!
//! Every container that supports push/pop/shift/unshift/insert/remove is
//! driven through the same operation stream as a plain `Vec<u8>` model.
//! After each operation:
//! 1. Every container returns what the model returns (values and errors)
//! 2. Every container holds the same elements as the model
//! 3. A cursor taken before the operation is stale iff the version moved

use afl::fuzz;
use cursors::container::{Container, Rewind, Structural};
use cursors::containers::{ByteBuffer, Chain, Deque, InlineBuffer, Vector};
use cursors::cursor::{ForwardCursor, InputCursor};
use cursors::{Error, Result};

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Push(u8),
    Unshift(u8),
    Pop,
    Shift,
    /// Insert before the element at `pos_frac / 256` of the length
    Insert { pos_frac: u8, value: u8 },
    /// Remove the element at `pos_frac / 256` of the length
    Remove { pos_frac: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 6;
        let rest = &bytes[1..];

        match op_type {
            0 if !rest.is_empty() => Some((FuzzOp::Push(rest[0]), &rest[1..])),
            1 if !rest.is_empty() => Some((FuzzOp::Unshift(rest[0]), &rest[1..])),
            2 => Some((FuzzOp::Pop, rest)),
            3 => Some((FuzzOp::Shift, rest)),
            4 if rest.len() >= 2 => {
                let op = FuzzOp::Insert { pos_frac: rest[0], value: rest[1] };
                Some((op, &rest[2..]))
            }
            5 if !rest.is_empty() => Some((FuzzOp::Remove { pos_frac: rest[0] }, &rest[1..])),
            _ => None,
        }
    }
}

fn position(pos_frac: u8, len: usize) -> usize {
    return pos_frac as usize * len / 256;
}

fn model(values: &mut Vec<u8>, op: FuzzOp) -> Result<Option<u8>> {
    match op {
        FuzzOp::Push(v) => {
            values.push(v);
            Ok(None)
        }
        FuzzOp::Unshift(v) => {
            values.insert(0, v);
            Ok(None)
        }
        FuzzOp::Pop => values.pop().map(Some).ok_or(Error::Empty),
        FuzzOp::Shift if values.is_empty() => Err(Error::Empty),
        FuzzOp::Shift => Ok(Some(values.remove(0))),
        FuzzOp::Insert { pos_frac, value } => {
            let pos = position(pos_frac, values.len());
            if pos >= values.len() {
                return Err(Error::UpdateOutOfBounds);
            }
            values.insert(pos, value);
            Ok(None)
        }
        FuzzOp::Remove { pos_frac } => {
            let pos = position(pos_frac, values.len());
            if pos >= values.len() {
                return Err(Error::UpdateOutOfBounds);
            }
            Ok(Some(values.remove(pos)))
        }
    }
}

fn run<C>(container: &mut C, op: FuzzOp) -> Result<Option<u8>>
where
    C: Rewind + Structural + Container<Item = u8>,
{
    match op {
        FuzzOp::Push(v) => container.push(v).map(|_| None),
        FuzzOp::Unshift(v) => container.unshift(v).map(|_| None),
        FuzzOp::Pop => container.pop().map(Some),
        FuzzOp::Shift => container.shift().map(Some),
        FuzzOp::Insert { pos_frac, value } => {
            let mut at = container.begin()?;
            at.advance(position(pos_frac, container.count()?))?;
            container.insert(&at, value).map(|_| None)
        }
        FuzzOp::Remove { pos_frac } => {
            let mut at = container.begin()?;
            at.advance(position(pos_frac, container.count()?))?;
            container.remove(&at).map(Some)
        }
    }
}

fn check<C>(name: &str, container: &mut C, op: FuzzOp, expected: &Result<Option<u8>>, after: &[u8])
where
    C: Rewind + Structural + Container<Item = u8>,
{
    let witness = container.begin().expect("begin on a live container");
    let version = container.version();

    let got = run(container, op);
    assert_eq!(&got, expected, "{}: result mismatch on {:?}", name, op);
    assert_eq!(container.to_vec().expect("to_vec"), after, "{}: contents diverged after {:?}", name, op);

    if container.version() != version {
        assert_eq!(witness.value(), Err(Error::Stale), "{}: old cursor survived a version bump", name);
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut values: Vec<u8> = Vec::new();
        let mut vector: Vector<u8> = Vector::new();
        let mut deque: Deque<u8> = Deque::new();
        let mut chain: Chain<u8> = Chain::new();
        let mut bytes = ByteBuffer::new();
        let mut inline = InlineBuffer::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            let expected = model(&mut values, op);
            check("vector", &mut vector, op, &expected, &values);
            check("deque", &mut deque, op, &expected, &values);
            check("chain", &mut chain, op, &expected, &values);
            check("bytes", &mut bytes, op, &expected, &values);
            check("inline", &mut inline, op, &expected, &values);
        }

        // Capacity never drops below the length
        assert!(bytes.capacity().expect("capacity") >= values.len());
        assert!(inline.capacity().expect("capacity") >= values.len());
    });
}
