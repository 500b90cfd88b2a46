//! Crate-internal helpers. Nothing here is reachable from outside:
//!
//! ```compile_fail
//! use parallel_rs::util::CancelSignal;
//! ```

pub(crate) mod cancel;

pub(crate) use cancel::CancelSignal;
