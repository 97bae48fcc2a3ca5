//! SQLite schema for daily player-stat snapshots.

/// Applied at every open; statements are idempotent.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS player_stats (
    tag         TEXT NOT NULL,
    date        TEXT NOT NULL,
    gold        INTEGER NOT NULL DEFAULT 0,
    elixir      INTEGER NOT NULL DEFAULT 0,
    dark_elixir INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tag, date)
);
";
