//! Run coordination.
//!
//! The coordinator owns the only state workers share: the failure counter
//! and the cancellation signal derived from it.

pub(crate) mod coordinator;

pub(crate) use coordinator::Coordinator;
