//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`] and
//! [`AssignmentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::{debug, info};

use reperibili_core::{
  assignment::{Assignment, NewAssignment, Platform},
  day::DayKey,
  person::{NewPerson, Person, PersonId, PersonInsert},
  store::{AssignmentStore, PersonStore},
};

use crate::{
  Result,
  encode::{RawAssignment, RawPerson, encode_day, encode_dt, encode_platform},
  fixtures::FIXTURE_PERSONS,
  schema::SCHEMA,
};

const PERSON_SELECT: &str = "SELECT id, nome, cognome, cellulare FROM reperibile";

const ASSIGNMENT_SELECT: &str = "SELECT id, created_at, updated_at, piattaforma, giorno, gruppo, reperibile_id
   FROM assegnazione";

// For the default platform, also match rows written by older tools: NULL,
// blank or any casing of "CDN". Must agree with `Platform::from`.
const ASSIGNMENT_FOR_DAY: &str = "WHERE giorno = ?1
     AND deleted_at IS NULL
     AND CASE WHEN ?3
           THEN piattaforma IS NULL
             OR TRIM(piattaforma) = ''
             OR UPPER(TRIM(piattaforma)) = 'CDN'
           ELSE TRIM(piattaforma) = ?2
         END
   ORDER BY id DESC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An on-call rotation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Each
/// operation holds the connection for exactly one `call` closure.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    debug!(path = %path.display(), "opening rotation store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert the two demo persons with fixed ids. Rows that already exist are
  /// left untouched; returns how many were inserted.
  pub async fn seed_fixtures(&self) -> Result<usize> {
    let inserted = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO reperibile (id, nome, cognome, cellulare)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (id, nome, cognome, cellulare) in FIXTURE_PERSONS {
            inserted += stmt.execute(rusqlite::params![id, nome, cognome, cellulare])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    info!(inserted, "seeded fixture persons");
    Ok(inserted)
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn add_person(&self, input: NewPerson) -> Result<PersonInsert> {
    let outcome = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front so no other writer can slip
        // an identical row in between the check and the insert.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM reperibile
             WHERE nome = ?1 AND cognome = ?2 AND cellulare = ?3
             ORDER BY id LIMIT 1",
            rusqlite::params![input.first_name, input.last_name, input.phone],
            |r| r.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(PersonInsert::Duplicate(PersonId(id)));
        }

        tx.execute(
          "INSERT INTO reperibile (nome, cognome, cellulare) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.first_name, input.last_name, input.phone],
        )?;
        let id = PersonId(tx.last_insert_rowid());
        tx.commit()?;

        Ok(PersonInsert::Created(Person {
          id,
          first_name: input.first_name,
          last_name: input.last_name,
          phone: input.phone,
        }))
      })
      .await?;

    Ok(outcome)
  }

  async fn find_person_by_last_name(&self, last_name: String) -> Result<Option<PersonId>> {
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id FROM reperibile WHERE cognome = ?1 ORDER BY id LIMIT 1",
            rusqlite::params![last_name],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(id.map(PersonId))
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{PERSON_SELECT} WHERE id = ?1"),
            rusqlite::params![id.0],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawPerson::into_person))
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{PERSON_SELECT} ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawPerson::into_person).collect())
  }
}

// ─── AssignmentStore impl ────────────────────────────────────────────────────

impl AssignmentStore for SqliteStore {
  async fn set_assignment(&self, input: NewAssignment) -> Result<Option<Assignment>> {
    let now          = Utc::now();
    let at_str       = encode_dt(now);
    let day_str      = encode_day(input.day);
    let platform_str = encode_platform(&input.platform);
    let group        = input.group.clone();
    let person_id    = input.person_id.0;

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let person_exists = tx
          .query_row(
            "SELECT 1 FROM reperibile WHERE id = ?1",
            rusqlite::params![person_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !person_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO assegnazione
             (created_at, updated_at, piattaforma, giorno, gruppo, reperibile_id)
           VALUES (?1, ?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![at_str, platform_str, day_str, group, person_id],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    Ok(id.map(|id| Assignment {
      id,
      day: input.day,
      platform: input.platform,
      group: input.group,
      person_id: input.person_id,
      created_at: now,
      updated_at: now,
    }))
  }

  async fn get_assignment(
    &self,
    day:      DayKey,
    platform: Platform,
  ) -> Result<Option<Assignment>> {
    let day_str      = encode_day(day);
    let is_default   = platform.is_default();
    let platform_str = encode_platform(&platform);

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{ASSIGNMENT_SELECT} {ASSIGNMENT_FOR_DAY} LIMIT 1"),
            rusqlite::params![day_str, platform_str, is_default],
            RawAssignment::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn assignment_history(
    &self,
    day:      DayKey,
    platform: Platform,
  ) -> Result<Vec<Assignment>> {
    let day_str      = encode_day(day);
    let is_default   = platform.is_default();
    let platform_str = encode_platform(&platform);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("{ASSIGNMENT_SELECT} {ASSIGNMENT_FOR_DAY}"))?;
        let rows = stmt
          .query_map(
            rusqlite::params![day_str, platform_str, is_default],
            RawAssignment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }
}
