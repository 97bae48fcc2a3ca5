//! Stat snapshot persistence
//!
//! One SQLite row per player per day, extracted from the loot
//! achievements of a freshly fetched player record. Writes happen on a
//! fire-and-forget task after the HTTP response is already decided;
//! reads back the rows for the history endpoint.

pub mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use tokio::task;

use crate::models::StatRow;
use crate::tag::Tag;

// The cumulative loot counters live in these achievements.
const GOLD_ACHIEVEMENT: &str = "Gold Grab";
const ELIXIR_ACHIEVEMENT: &str = "Elixir Escapade";
const DARK_ELIXIR_ACHIEVEMENT: &str = "Heroic Heist";

// == Database ==
/// Connection wrapper for the snapshot store.
///
/// rusqlite is synchronous; every query runs on the blocking pool with
/// the connection behind a mutex.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database at `path` and runs migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        Self::from_connection(conn)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::SCHEMA)
            .context("failed to run migrations")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // == Record Snapshot ==
    /// Upserts today's stat row for the player.
    pub async fn record_snapshot(&self, tag: &Tag, player: &Value) -> Result<()> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        let tag = tag.canonical().to_string();
        let gold = achievement_value(player, GOLD_ACHIEVEMENT);
        let elixir = achievement_value(player, ELIXIR_ACHIEVEMENT);
        let dark_elixir = achievement_value(player, DARK_ELIXIR_ACHIEVEMENT);

        let conn = self.conn.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = conn.lock().expect("stats db lock poisoned");
            conn.execute(
                "INSERT INTO player_stats (tag, date, gold, elixir, dark_elixir)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (tag, date) DO UPDATE SET
                     gold = excluded.gold,
                     elixir = excluded.elixir,
                     dark_elixir = excluded.dark_elixir",
                params![tag, date, gold, elixir, dark_elixir],
            )
            .context("failed to upsert stat snapshot")?;
            Ok(())
        })
        .await
        .context("snapshot task panicked")?
    }

    // == History ==
    /// All recorded rows for a tag, ascending by date.
    pub async fn history(&self, tag: &Tag) -> Result<Vec<StatRow>> {
        let tag = tag.canonical().to_string();
        let conn = self.conn.clone();

        task::spawn_blocking(move || -> Result<Vec<StatRow>> {
            let conn = conn.lock().expect("stats db lock poisoned");
            let mut stmt = conn.prepare(
                "SELECT date, gold, elixir, dark_elixir
                 FROM player_stats
                 WHERE tag = ?1
                 ORDER BY date ASC",
            )?;
            let rows = stmt
                .query_map([tag], |row| {
                    Ok(StatRow {
                        date: row.get(0)?,
                        gold: row.get(1)?,
                        elixir: row.get(2)?,
                        dark_elixir: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .context("history task panicked")?
    }
}

/// Looks up the cumulative value of a named achievement, defaulting to 0.
fn achievement_value(player: &Value, name: &str) -> i64 {
    player
        .get("achievements")
        .and_then(Value::as_array)
        .and_then(|achievements| {
            achievements
                .iter()
                .find(|a| a.get("name").and_then(Value::as_str) == Some(name))
        })
        .and_then(|a| a.get("value"))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player_with_loot(gold: i64, elixir: i64, dark: i64) -> Value {
        json!({
            "tag": "#2PP",
            "name": "Ada",
            "achievements": [
                { "name": "Gold Grab", "value": gold },
                { "name": "Elixir Escapade", "value": elixir },
                { "name": "Heroic Heist", "value": dark },
                { "name": "Unbreakable", "value": 123 },
            ],
        })
    }

    #[test]
    fn test_achievement_value_extraction() {
        let player = player_with_loot(100, 200, 300);
        assert_eq!(achievement_value(&player, GOLD_ACHIEVEMENT), 100);
        assert_eq!(achievement_value(&player, ELIXIR_ACHIEVEMENT), 200);
        assert_eq!(achievement_value(&player, DARK_ELIXIR_ACHIEVEMENT), 300);
        assert_eq!(achievement_value(&player, "No Such Achievement"), 0);
        assert_eq!(achievement_value(&json!({}), GOLD_ACHIEVEMENT), 0);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_replaces_daily_row() {
        let db = Database::open_in_memory().unwrap();
        let tag = Tag::parse("#2PP").unwrap();

        db.record_snapshot(&tag, &player_with_loot(100, 200, 300))
            .await
            .unwrap();
        // A second fetch on the same day replaces the row, not appends.
        db.record_snapshot(&tag, &player_with_loot(150, 250, 350))
            .await
            .unwrap();

        let rows = db.history(&tag).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gold, 150);
        assert_eq!(rows[0].elixir, 250);
        assert_eq!(rows[0].dark_elixir, 350);
    }

    #[tokio::test]
    async fn test_history_is_ascending_and_scoped_to_tag() {
        let db = Database::open_in_memory().unwrap();
        let tag = Tag::parse("#2PP").unwrap();

        {
            let conn = db.conn.lock().unwrap();
            for (t, date, gold) in [
                ("#2PP", "2026-08-03", 30),
                ("#2PP", "2026-08-01", 10),
                ("#2PP", "2026-08-02", 20),
                ("#OTHER", "2026-08-01", 999),
            ] {
                conn.execute(
                    "INSERT INTO player_stats (tag, date, gold, elixir, dark_elixir)
                     VALUES (?1, ?2, ?3, 0, 0)",
                    params![t, date, gold],
                )
                .unwrap();
            }
        }

        let rows = db.history(&tag).await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-08-01", "2026-08-02", "2026-08-03"]);
        assert!(rows.iter().all(|r| r.gold != 999));
    }

    #[tokio::test]
    async fn test_history_empty_for_unknown_tag() {
        let db = Database::open_in_memory().unwrap();
        let tag = Tag::parse("#NOBODY").unwrap();
        assert!(db.history(&tag).await.unwrap().is_empty());
    }
}
