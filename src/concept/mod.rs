//! Capability tiers and the member surfaces that describe them.
//!
//! A tier names what a cursor can do. Each tier has a `Concept`: the list of
//! members a type must expose to satisfy it. Concepts inherit the surface of
//! their parents, so `Forward` asks for everything `Input` and `Output` ask
//! for, plus stepping and identity.
//!
//! ```text
//! Input ──┐
//!         ├──> Forward ──> Bidirectional ──> RandomAccess ──> Contiguous
//! Output ─┘
//! ```
//!
//! Generic code normally states tiers as trait bounds (see `crate::cursor`).
//! The runtime surfaces here back the `conformance` checker, which answers the
//! same question for erased cursors.

pub mod conformance;

pub use conformance::{classify, satisfies, Checker};

/// Ordered classification of cursor capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Values can be read.
    Input,
    /// Values can be written.
    Output,
    /// Read, write, and step forward one element at a time.
    Forward,
    /// Forward plus stepping backward.
    Bidirectional,
    /// Bidirectional plus constant-time moves and subtraction.
    RandomAccess,
    /// RandomAccess over elements laid out in one slice of memory.
    Contiguous,
}

impl Tier {
    /// All tiers, weakest first.
    pub const ALL: [Tier; 6] = [
        Tier::Input,
        Tier::Output,
        Tier::Forward,
        Tier::Bidirectional,
        Tier::RandomAccess,
        Tier::Contiguous,
    ];

    /// Whether a cursor of this tier supports everything `other` requires.
    ///
    /// `Input` and `Output` only include themselves; every tier from
    /// `Forward` up includes all tiers below it.
    pub const fn includes(self, other: Tier) -> bool {
        let (a, b) = (self as u8, other as u8);
        if a == b {
            return true;
        }
        if a < Tier::Forward as u8 {
            return false;
        }
        return b < a;
    }

    /// The weaker of two tiers, treating `Input`/`Output` as below `Forward`.
    pub const fn meet(self, other: Tier) -> Tier {
        if self.includes(other) {
            return other;
        }
        if other.includes(self) {
            return self;
        }
        // Input and Output share no tier but neither is stronger.
        return Tier::Input;
    }

    /// Short lower-case name used in error messages and debug output.
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Input => "input",
            Tier::Output => "output",
            Tier::Forward => "forward",
            Tier::Bidirectional => "bidirectional",
            Tier::RandomAccess => "random-access",
            Tier::Contiguous => "contiguous",
        }
    }
}

/// How a member is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable or value-bearing member; presence is enough.
    Method,
    /// A property read and/or written through accessors.
    Accessor {
        /// Readable.
        get: bool,
        /// Writable.
        set: bool,
    },
}

/// One named member of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Member name.
    pub name: &'static str,
    /// Method or accessor.
    pub kind: MemberKind,
}

impl Member {
    /// A method member.
    pub const fn method(name: &'static str) -> Member {
        return Member { name, kind: MemberKind::Method };
    }

    /// An accessor member with the given halves.
    pub const fn accessor(name: &'static str, get: bool, set: bool) -> Member {
        return Member { name, kind: MemberKind::Accessor { get, set } };
    }

    /// Whether `self`, offered by a candidate, fulfils `required`.
    pub fn fulfils(&self, required: &Member) -> bool {
        if self.name != required.name {
            return false;
        }
        match (required.kind, self.kind) {
            (MemberKind::Method, _) => true,
            (MemberKind::Accessor { get, set }, MemberKind::Accessor { get: has_get, set: has_set }) => {
                (!get || has_get) && (!set || has_set)
            }
            (MemberKind::Accessor { .. }, MemberKind::Method) => false,
        }
    }
}

/// The declared member surface of one tier.
#[derive(Debug)]
pub struct Concept {
    /// Tier this concept describes.
    pub tier: Tier,
    /// Members added by this tier.
    pub members: &'static [Member],
    /// Concepts whose surfaces are inherited.
    pub parents: &'static [&'static Concept],
}

impl Concept {
    /// The concept describing `tier`.
    pub fn of(tier: Tier) -> &'static Concept {
        match tier {
            Tier::Input => &INPUT,
            Tier::Output => &OUTPUT,
            Tier::Forward => &FORWARD,
            Tier::Bidirectional => &BIDIRECTIONAL,
            Tier::RandomAccess => &RANDOM_ACCESS,
            Tier::Contiguous => &CONTIGUOUS,
        }
    }

    /// Visit every required member, parents first. Stops early when `visit`
    /// returns false and reports whether the walk completed.
    pub fn walk(&self, visit: &mut dyn FnMut(&Member) -> bool) -> bool {
        for parent in self.parents {
            if !parent.walk(visit) {
                return false;
            }
        }
        for member in self.members {
            if !visit(member) {
                return false;
            }
        }
        return true;
    }

    /// Whether a list of offered members covers this concept.
    pub fn covered_by(&self, offered: &[Member]) -> bool {
        return self.walk(&mut |required| offered.iter().any(|m| m.fulfils(required)));
    }
}

static INPUT: Concept = Concept {
    tier: Tier::Input,
    members: INPUT_SURFACE,
    parents: &[],
};

static OUTPUT: Concept = Concept {
    tier: Tier::Output,
    members: OUTPUT_SURFACE,
    parents: &[],
};

static FORWARD: Concept = Concept {
    tier: Tier::Forward,
    members: &[STEP, CLONE, EQUALS, EQUATABLE_TO],
    parents: &[&INPUT, &OUTPUT],
};

static BIDIRECTIONAL: Concept = Concept {
    tier: Tier::Bidirectional,
    members: &[STEP_BACK],
    parents: &[&FORWARD],
};

static RANDOM_ACCESS: Concept = Concept {
    tier: Tier::RandomAccess,
    members: &[MOVE_BY, SUBTRACT],
    parents: &[&BIDIRECTIONAL],
};

static CONTIGUOUS: Concept = Concept {
    tier: Tier::Contiguous,
    members: &[OFFSET, DATA],
    parents: &[&RANDOM_ACCESS],
};

const VALUE_RW: Member = Member::accessor("value", true, true);
const STEP: Member = Member::method("step");
const CLONE: Member = Member::method("clone");
const EQUALS: Member = Member::method("equals");
const EQUATABLE_TO: Member = Member::method("equatable_to");
const STEP_BACK: Member = Member::method("step_back");
const MOVE_BY: Member = Member::method("move_by");
const SUBTRACT: Member = Member::method("subtract");
const OFFSET: Member = Member::method("offset");
const DATA: Member = Member::method("data");

const INPUT_SURFACE: &[Member] = &[Member::accessor("value", true, false)];
const OUTPUT_SURFACE: &[Member] = &[Member::accessor("value", false, true)];
const FORWARD_SURFACE: &[Member] = &[VALUE_RW, STEP, CLONE, EQUALS, EQUATABLE_TO];
const BIDIRECTIONAL_SURFACE: &[Member] = &[VALUE_RW, STEP, CLONE, EQUALS, EQUATABLE_TO, STEP_BACK];
const RANDOM_ACCESS_SURFACE: &[Member] =
    &[VALUE_RW, STEP, CLONE, EQUALS, EQUATABLE_TO, STEP_BACK, MOVE_BY, SUBTRACT];
const CONTIGUOUS_SURFACE: &[Member] =
    &[VALUE_RW, STEP, CLONE, EQUALS, EQUATABLE_TO, STEP_BACK, MOVE_BY, SUBTRACT, OFFSET, DATA];

/// The full surface a cursor of `tier` exposes.
pub const fn surface_of(tier: Tier) -> &'static [Member] {
    match tier {
        Tier::Input => INPUT_SURFACE,
        Tier::Output => OUTPUT_SURFACE,
        Tier::Forward => FORWARD_SURFACE,
        Tier::Bidirectional => BIDIRECTIONAL_SURFACE,
        Tier::RandomAccess => RANDOM_ACCESS_SURFACE,
        Tier::Contiguous => CONTIGUOUS_SURFACE,
    }
}

/// A type that declares the members it exposes.
pub trait Surface: 'static {
    /// Every member the type offers.
    const MEMBERS: &'static [Member];
}
