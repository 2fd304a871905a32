pub mod render;
pub mod validate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input value meaning "leave this optional field absent" (or, during an
/// edit, "clear the field").
pub const SKIP_MARKER: &str = "-";

/// A persisted calendar event. Reads and writes are always scoped by
/// `owner_id`; the numeric `id` alone never grants access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Optional 24-hour clock time, `HH:MM`.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Position of a user's wizard in its field-collection sequence.
///
/// `Idle` is represented in storage by the absence of a conversation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    AwaitingName,
    AwaitingDate,
    AwaitingTime,
    AwaitingDetails,
    AwaitingEditTargetId,
    AwaitingEditFieldChoice,
    AwaitingEditValue,
    AwaitingDeleteTargetId,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Idle
    }
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::AwaitingName => "awaiting_name",
            Stage::AwaitingDate => "awaiting_date",
            Stage::AwaitingTime => "awaiting_time",
            Stage::AwaitingDetails => "awaiting_details",
            Stage::AwaitingEditTargetId => "awaiting_edit_target_id",
            Stage::AwaitingEditFieldChoice => "awaiting_edit_field_choice",
            Stage::AwaitingEditValue => "awaiting_edit_value",
            Stage::AwaitingDeleteTargetId => "awaiting_delete_target_id",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Stage::Idle),
            "awaiting_name" => Some(Stage::AwaitingName),
            "awaiting_date" => Some(Stage::AwaitingDate),
            "awaiting_time" => Some(Stage::AwaitingTime),
            "awaiting_details" => Some(Stage::AwaitingDetails),
            "awaiting_edit_target_id" => Some(Stage::AwaitingEditTargetId),
            "awaiting_edit_field_choice" => Some(Stage::AwaitingEditFieldChoice),
            "awaiting_edit_value" => Some(Stage::AwaitingEditValue),
            "awaiting_delete_target_id" => Some(Stage::AwaitingDeleteTargetId),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Stage::Idle)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One editable field of an event, as offered by the edit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Name,
    Date,
    Time,
    Details,
}

impl EventField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventField::Name => "name",
            EventField::Date => "date",
            EventField::Time => "time",
            EventField::Details => "details",
        }
    }

    /// Maps a menu reply ("1" through "4") to the chosen field.
    pub fn from_menu_choice(input: &str) -> Option<Self> {
        match input {
            "1" => Some(EventField::Name),
            "2" => Some(EventField::Date),
            "3" => Some(EventField::Time),
            "4" => Some(EventField::Details),
            _ => None,
        }
    }

    /// Whether the skip marker is a legal value for this field.
    pub fn is_clearable(&self) -> bool {
        matches!(self, EventField::Time | EventField::Details)
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The partially filled event accumulated across wizard stages, persisted as
/// `draft_json`. During edit flows it also carries the target event id and
/// the chosen field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<EventField>,
}

/// One validated change for a partial update. `None` on the clearable
/// variants means "clear the field to absent"; name and date cannot be
/// cleared. Updates are built only from these variants, never from
/// string-keyed maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Date(String),
    Time(Option<String>),
    Details(Option<String>),
}

impl FieldUpdate {
    pub fn field(&self) -> EventField {
        match self {
            FieldUpdate::Name(_) => EventField::Name,
            FieldUpdate::Date(_) => EventField::Date,
            FieldUpdate::Time(_) => EventField::Time,
            FieldUpdate::Details(_) => EventField::Details,
        }
    }
}
