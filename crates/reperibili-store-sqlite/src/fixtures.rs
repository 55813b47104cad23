//! Demo rows for a fresh database. Never inserted implicitly.

/// `(id, nome, cognome, cellulare)`
pub const FIXTURE_PERSONS: &[(i64, &str, &str, &str)] = &[
  (1, "Alberto", "Bregliano", "+393357291533"),
  (2, "Antonio", "Gasponi", "+393357291533"),
];
