//! SQL schema for the rotation store.
//!
//! Table and column names match existing `reperibili.db` files, which open
//! unchanged.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS reperibile (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    nome      VARCHAR(255),
    cognome   VARCHAR(255),
    cellulare VARCHAR(255)
);

-- Append-only: a correction is a new row, the highest id wins.
-- reperibile_id refers to reperibile(id) by convention only.
CREATE TABLE IF NOT EXISTS assegnazione (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at    DATETIME,
    updated_at    DATETIME,
    deleted_at    DATETIME,
    piattaforma   VARCHAR(255),
    giorno        VARCHAR(255),
    gruppo        VARCHAR(255),
    reperibile_id INTEGER
);

CREATE INDEX IF NOT EXISTS reperibile_cognome_idx   ON reperibile(cognome);
CREATE INDEX IF NOT EXISTS assegnazione_giorno_idx  ON assegnazione(giorno, piattaforma);

PRAGMA user_version = 1;
";
