//! Precondition guards.
//!
//! Each public operation opens with one or more `require!` clauses. With the
//! `checked` feature (on by default) a failed clause returns its error before
//! the operation touches storage. Without it the clauses fold away and the
//! success path is unchanged.

/// Return `Err($err)` from the enclosing function when `$cond` is false.
///
/// The condition is not evaluated at all when the `checked` feature is off.
macro_rules! require {
    ($cond:expr, $err:expr) => {
        if cfg!(feature = "checked") && !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use require;

/// Whether precondition guards are compiled in.
pub const fn enabled() -> bool {
    return cfg!(feature = "checked");
}
