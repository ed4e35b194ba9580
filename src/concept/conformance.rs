//! Runtime conformance checks against tier concepts.
//!
//! Conformance cannot change for the lifetime of a type, so answers are cached
//! per `(TypeId, Tier)`. Hits and misses live in separate sets; a lookup
//! consults both before walking the concept.

use std::any::TypeId;
use std::cell::RefCell;

use rustc_hash::FxHashSet;

use super::{Concept, Member, Surface, Tier};

/// Conformance checker with per-type caches.
#[derive(Debug, Default)]
pub struct Checker {
    hits: FxHashSet<(TypeId, Tier)>,
    misses: FxHashSet<(TypeId, Tier)>,
    walks: u64,
}

impl Checker {
    /// Create a checker with empty caches.
    pub fn new() -> Checker {
        return Checker::default();
    }

    /// Whether `T` exposes every member the concept for `tier` requires.
    pub fn satisfies<T: Surface + ?Sized>(&mut self, tier: Tier) -> bool {
        return self.satisfies_members(TypeId::of::<T>(), T::MEMBERS, tier);
    }

    /// Check an explicit member list on behalf of the type `id`.
    pub fn satisfies_members(&mut self, id: TypeId, members: &[Member], tier: Tier) -> bool {
        let key = (id, tier);
        if self.hits.contains(&key) {
            return true;
        }
        if self.misses.contains(&key) {
            return false;
        }
        self.walks += 1;
        let ok = Concept::of(tier).covered_by(members);
        if ok {
            self.hits.insert(key);
        } else {
            self.misses.insert(key);
        }
        return ok;
    }

    /// The strongest tier `T` satisfies, if any.
    ///
    /// `Input` wins over `Output` when a type offers only one of the two
    /// halves of `value`.
    pub fn classify<T: Surface + ?Sized>(&mut self) -> Option<Tier> {
        for tier in Tier::ALL.iter().rev() {
            if self.satisfies::<T>(*tier) {
                return Some(*tier);
            }
        }
        return None;
    }

    /// Number of concept walks performed; cached answers do not count.
    pub fn walks(&self) -> u64 {
        return self.walks;
    }

    /// Number of cached `(type, tier)` answers.
    pub fn cached(&self) -> usize {
        return self.hits.len() + self.misses.len();
    }
}

thread_local! {
    static CHECKER: RefCell<Checker> = RefCell::new(Checker::new());
}

/// Check `T` against the concept for `tier` using the thread's shared cache.
pub fn satisfies<T: Surface + ?Sized>(tier: Tier) -> bool {
    return CHECKER.with(|checker| checker.borrow_mut().satisfies::<T>(tier));
}

/// The strongest tier `T` satisfies, using the thread's shared cache.
pub fn classify<T: Surface + ?Sized>() -> Option<Tier> {
    return CHECKER.with(|checker| checker.borrow_mut().classify::<T>());
}
