//! Quick single-run benchmark for development iteration.
//!
//! Replays one random edit trace against every structural container and
//! prints the wall time of each. Runs with `--features bench`.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cursors::container::{Container, Rewind, Structural};
use cursors::containers::{ByteBuffer, Chain, Deque, InlineBuffer, Vector};
use cursors::cursor::ForwardCursor;

#[derive(Debug, Clone, Copy)]
enum Edit {
    Push(u8),
    Unshift(u8),
    Pop,
    Shift,
    Insert(usize, u8),
    Remove(usize),
}

fn trace(len: usize, seed: u64) -> Vec<Edit> {
    let mut rng = StdRng::seed_from_u64(seed);
    return (0..len)
        .map(|_| match rng.gen_range(0..6) {
            0 => Edit::Push(rng.r#gen()),
            1 => Edit::Unshift(rng.r#gen()),
            2 => Edit::Pop,
            3 => Edit::Shift,
            4 => Edit::Insert(rng.r#gen(), rng.r#gen()),
            _ => Edit::Remove(rng.r#gen()),
        })
        .collect();
}

/// Replay `edits` and return the final element count.
fn replay<C>(container: &mut C, edits: &[Edit]) -> usize
where
    C: Rewind + Structural + Container<Item = u8>,
{
    for edit in edits {
        let len = container.count().unwrap_or(0);
        let _ = match *edit {
            Edit::Push(v) => container.push(v),
            Edit::Unshift(v) => container.unshift(v),
            Edit::Pop => container.pop().map(|_| ()),
            Edit::Shift => container.shift().map(|_| ()),
            Edit::Insert(_, _) | Edit::Remove(_) if len == 0 => Ok(()),
            Edit::Insert(pos, v) => {
                let mut at = container.begin().expect("begin");
                at.advance(pos % len).expect("advance");
                container.insert(&at, v).map(|_| ())
            }
            Edit::Remove(pos) => {
                let mut at = container.begin().expect("begin");
                at.advance(pos % len).expect("advance");
                container.remove(&at).map(|_| ())
            }
        };
    }
    return container.count().unwrap_or(0);
}

fn time<C>(name: &str, mut container: C, edits: &[Edit]) -> Duration
where
    C: Rewind + Structural + Container<Item = u8>,
{
    let start = Instant::now();
    let len = replay(&mut container, edits);
    let elapsed = start.elapsed();
    println!("  {:<8} {:>10.2?}  (final length {})", name, elapsed, len);
    return elapsed;
}

fn main() {
    let edits = trace(20_000, 42);
    println!("Replaying {} edits", edits.len());

    let times = [
        time("vector", Vector::<u8>::new(), &edits),
        time("deque", Deque::<u8>::new(), &edits),
        time("chain", Chain::<u8>::new(), &edits),
        time("bytes", ByteBuffer::new(), &edits),
        time("inline", InlineBuffer::new(), &edits),
    ];

    let total: Duration = times.iter().sum();
    println!("Total: {:?}", total);
}
