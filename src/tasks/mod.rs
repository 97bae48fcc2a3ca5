//! Background Tasks Module
//!
//! Work decoupled from the request path: the periodic cache sweep and the
//! fire-and-forget stat snapshot write.

mod cleanup;
mod snapshot;

pub use cleanup::spawn_cleanup_task;
pub use snapshot::spawn_stat_snapshot;
