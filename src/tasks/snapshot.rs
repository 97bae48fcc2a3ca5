//! Stat snapshot task
//!
//! The daily stat write rides along with a successful player fetch, but
//! the HTTP response never waits on it: the write runs on its own task
//! and its failures stop here, logged and discarded.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::db::Database;
use crate::tag::Tag;

/// Spawns a fire-and-forget snapshot write for a freshly fetched player.
///
/// The returned handle exists for tests; callers in the request path drop
/// it without awaiting.
pub fn spawn_stat_snapshot(db: Database, tag: Tag, player: Value) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = db.record_snapshot(&tag, &player).await {
            warn!(tag = %tag, error = %e, "stat snapshot write failed");
        }
    })
}
