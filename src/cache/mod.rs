//! In-process request coalescing
//!
//! Wraps an async operation so that every distinct key is computed at most
//! once per wrapper instance. Callers that arrive while a computation is
//! running share it; callers that arrive afterwards get its stored outcome.
//!
//! # Entry States
//!
//! | State | Caller sees |
//! |-------|-------------|
//! | Absent | Starts the operation, inserts a pending entry |
//! | Pending | Waits on the same pending computation |
//! | Resolved | Stored success or failure, no new call |
//!
//! Entries never expire and are never evicted. The map lives exactly as long
//! as the wrapper.

mod memo;

pub use memo::Memoized;
