//! Reproduce fuzz_ops crashes without AFL instrumentation
//!
//! Usage: cargo run --bin repro_ops -- <crash_file>

use std::fs;

use cursors::container::{Container, Rewind, Structural};
use cursors::containers::{ByteBuffer, Chain, Deque, InlineBuffer, Vector};
use cursors::cursor::ForwardCursor;
use cursors::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Push(u8),
    Unshift(u8),
    Pop,
    Shift,
    Insert { pos_frac: u8, value: u8 },
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

/// Run `op` on `container` and report whether it still agrees with the model.
fn trace<C>(name: &str, container: &mut C, op: FuzzOp, expected: &Result<Option<u8>>, after: &[u8]) -> bool
where
    C: Rewind + Structural + Container<Item = u8>,
{
    let version = container.version();
    let got = run(container, op);
    let contents = container.to_vec();
    let ok = &got == expected && contents.as_deref() == Ok(after);
    eprintln!(
        "  {:<7} {:?} v{}->v{} {:?}{}",
        name,
        got,
        version,
        container.version(),
        contents,
        if ok { "" } else { "  <-- MISMATCH" }
    );
    return ok;
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <crash_file>", args[0]);
        std::process::exit(1);
    }
    let data = match fs::read(&args[1]) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    eprintln!("Input: {} bytes", data.len());
    eprintln!("Hex: {}", data.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" "));

    let mut values: Vec<u8> = Vec::new();
    let mut vector: Vector<u8> = Vector::new();
    let mut deque: Deque<u8> = Deque::new();
    let mut chain: Chain<u8> = Chain::new();
    let mut bytes = ByteBuffer::new();
    let mut inline = InlineBuffer::new();
    let mut remaining = data.as_slice();
    let mut op_num = 0;
    let mut failures = 0;

    while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
        remaining = rest;
        op_num += 1;

        let expected = model(&mut values, op);
        eprintln!("Op {}: {:?}", op_num, op);
        eprintln!("  model   {:?} {:?}", expected, values);

        let results = [
            trace("vector", &mut vector, op, &expected, &values),
            trace("deque", &mut deque, op, &expected, &values),
            trace("chain", &mut chain, op, &expected, &values),
            trace("bytes", &mut bytes, op, &expected, &values),
            trace("inline", &mut inline, op, &expected, &values),
        ];
        failures += results.iter().filter(|ok| !**ok).count();
    }

    if failures > 0 {
        eprintln!("\n{} mismatches", failures);
        std::process::exit(1);
    }
    eprintln!("\nAll checks passed!");
}
