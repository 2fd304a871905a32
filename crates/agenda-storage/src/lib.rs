use agenda_core::{Event, EventDraft, FieldUpdate, Stage};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

pub const CALENDAR_SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("timestamp parse error: {0}")]
    Timestamp(String),
    #[error("unsupported schema version {found}, max supported {supported}")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },
}

/// SQLite-backed store for events and per-owner conversation state.
///
/// Every event operation is additionally scoped by owner id, so a guessed
/// numeric id never reaches another owner's row.
pub struct CalendarStore {
    conn: Connection,
}

impl CalendarStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn schema_version(&self) -> Result<i64, StorageError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    pub fn migrate(&self) -> Result<(), StorageError> {
        let current = self.schema_version()?;
        if current > CALENDAR_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchemaVersion {
                found: current,
                supported: CALENDAR_SCHEMA_VERSION,
            });
        }

        if current < 1 {
            let sql = include_str!("../migrations/0001_calendar_schema.sql");
            self.conn.execute_batch(sql)?;
            self.conn
                .execute("PRAGMA user_version = 1", [])
                .map(|_| ())?;
        }

        Ok(())
    }

    pub fn create_event(
        &self,
        owner_id: i64,
        name: &str,
        date: &str,
        time: Option<&str>,
        details: Option<&str>,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "
            INSERT INTO events (owner_id, name, event_date, event_time, details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![owner_id, name, date, time, details, Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All events for one owner, ordered by date ascending, then time
    /// ascending with untimed events sorted before timed ones on the same
    /// date. The null placement is explicit in the query rather than
    /// inherited from engine defaults.
    pub fn events_for_owner(&self, owner_id: i64) -> Result<Vec<Event>, StorageError> {
        let mut statement = self.conn.prepare(
            "
            SELECT id, owner_id, name, event_date, event_time, details, created_at
            FROM events
            WHERE owner_id = ?1
            ORDER BY event_date ASC, (event_time IS NOT NULL) ASC, event_time ASC, id ASC
            ",
        )?;

        let rows = statement.query_map([owner_id], event_from_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    pub fn event(&self, owner_id: i64, event_id: i64) -> Result<Option<Event>, StorageError> {
        let event = self
            .conn
            .query_row(
                "
                SELECT id, owner_id, name, event_date, event_time, details, created_at
                FROM events
                WHERE owner_id = ?1 AND id = ?2
                ",
                params![owner_id, event_id],
                event_from_row,
            )
            .optional()?;
        Ok(event)
    }

    /// Applies the supplied field changes to one event. An empty update set
    /// is a no-op and reports no row affected.
    pub fn update_event_fields(
        &self,
        owner_id: i64,
        event_id: i64,
        updates: &[FieldUpdate],
    ) -> Result<bool, StorageError> {
        if updates.is_empty() {
            return Ok(false);
        }

        let mut assignments = Vec::with_capacity(updates.len());
        let mut bindings: Vec<Value> = Vec::with_capacity(updates.len() + 2);
        for update in updates {
            match update {
                FieldUpdate::Name(value) => {
                    assignments.push("name = ?");
                    bindings.push(Value::Text(value.clone()));
                }
                FieldUpdate::Date(value) => {
                    assignments.push("event_date = ?");
                    bindings.push(Value::Text(value.clone()));
                }
                FieldUpdate::Time(value) => {
                    assignments.push("event_time = ?");
                    bindings.push(optional_text(value));
                }
                FieldUpdate::Details(value) => {
                    assignments.push("details = ?");
                    bindings.push(optional_text(value));
                }
            }
        }
        bindings.push(Value::Integer(owner_id));
        bindings.push(Value::Integer(event_id));

        let sql = format!(
            "UPDATE events SET {} WHERE owner_id = ? AND id = ?",
            assignments.join(", ")
        );
        let changes = self.conn.execute(&sql, params_from_iter(bindings))?;
        Ok(changes > 0)
    }

    pub fn delete_event(&self, owner_id: i64, event_id: i64) -> Result<bool, StorageError> {
        let changes = self.conn.execute(
            "DELETE FROM events WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, event_id],
        )?;
        Ok(changes > 0)
    }

    /// Current wizard position for one owner; a missing row reads as
    /// `(Idle, empty draft)`.
    pub fn conversation_state(
        &self,
        owner_id: i64,
    ) -> Result<(Stage, EventDraft), StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT stage, draft_json FROM conversation_state WHERE owner_id = ?1",
                [owner_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((stage_raw, draft_json)) = row else {
            return Ok((Stage::Idle, EventDraft::default()));
        };

        let stage = Stage::parse(&stage_raw)
            .ok_or_else(|| StorageError::Serialization(format!("invalid stage: {stage_raw}")))?;
        let draft = serde_json::from_str(&draft_json)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok((stage, draft))
    }

    /// Upserts the conversation row for one owner, replacing any prior
    /// stage and draft entirely.
    pub fn set_conversation_state(
        &self,
        owner_id: i64,
        stage: Stage,
        draft: &EventDraft,
    ) -> Result<(), StorageError> {
        let draft_json = serde_json::to_string(draft)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.conn.execute(
            "
            INSERT INTO conversation_state (owner_id, stage, draft_json, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(owner_id) DO UPDATE SET
                stage=excluded.stage,
                draft_json=excluded.draft_json,
                updated_at=excluded.updated_at
            ",
            params![owner_id, stage.as_str(), draft_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn clear_conversation_state(&self, owner_id: i64) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM conversation_state WHERE owner_id = ?1",
            [owner_id],
        )?;
        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool, StorageError> {
        let exists = self
            .conn
            .query_row(
                "
                SELECT 1
                FROM sqlite_master
                WHERE type='table' AND name = ?1
                LIMIT 1
                ",
                [table_name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(exists.is_some())
    }
}

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    let created_at = parse_timestamp(row.get::<_, String>(6)?).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(Event {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        details: row.get(5)?,
        created_at,
    })
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| StorageError::Timestamp(err.to_string()))
}
