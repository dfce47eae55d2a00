//! Operations over the task and statistics stores.
//!
//! Each function takes the stores and the clock explicitly, so the engine
//! holds no state of its own between calls.

pub mod aggregate;
pub mod rollover;
pub mod timer;
