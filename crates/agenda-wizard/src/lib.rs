pub mod dispatch;

use agenda_core::render::{chunk_text, render_listing, MAX_CHUNK_CHARS};
use agenda_core::validate::{validate_date, validate_time, DateError, TimeError};
use agenda_core::{EventDraft, EventField, FieldUpdate, Stage, SKIP_MARKER};
use agenda_storage::{CalendarStore, StorageError};
use thiserror::Error;
use tracing::warn;

pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Use /help for the command list.";
pub const GENERIC_FAILURE: &str = "❌ Something went wrong. Please try again.";

const EMPTY_LISTING: &str = "📭 You have no events yet.";
const PROMPT_NAME: &str = "Enter the event name:";
const PROMPT_DATE: &str = "Enter the event date as YYYY-MM-DD:\nExample: 2025-12-15";
const PROMPT_TIME: &str =
    "Enter the event time as HH:MM (or send '-' to skip):\nExample: 14:30";
const PROMPT_DETAILS: &str = "Enter the event details (or send '-' to skip):";
const PROMPT_EDIT_ID: &str = "Enter the id of the event to edit:";
const PROMPT_DELETE_ID: &str = "Enter the id of the event to delete:";
const PROMPT_FIELD_CHOICE: &str =
    "What do you want to change?\n1. Name\n2. Date\n3. Time\n4. Details\n\nSend the item number:";
const RETRY_ID_NOT_NUMERIC: &str = "❌ The id must be a number. Try again:";
const RETRY_ID_NOT_FOUND: &str = "❌ No event with that id was found. Try again:";

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// One wizard response: the text to show the user and the stage the
/// conversation is in afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub stage: Stage,
}

impl Reply {
    fn new(text: impl Into<String>, stage: Stage) -> Self {
        Self {
            text: text.into(),
            stage,
        }
    }
}

/// Drives one owner through the multi-step event flows, one field per
/// incoming message. Holds the single store handle; transports stay thin.
pub struct Wizard {
    store: CalendarStore,
}

impl Wizard {
    pub fn new(store: CalendarStore) -> Self {
        Self { store }
    }

    /// Direct store access for adapters that bypass the conversation
    /// surface (the REST event API).
    pub fn store(&self) -> &CalendarStore {
        &self.store
    }

    /// Begins the create flow, discarding any draft already in progress.
    pub fn start_create(&self, owner_id: i64) -> Result<Reply, WizardError> {
        self.store
            .set_conversation_state(owner_id, Stage::AwaitingName, &EventDraft::default())?;
        Ok(Reply::new(PROMPT_NAME, Stage::AwaitingName))
    }

    pub fn start_edit(&self, owner_id: i64) -> Result<Reply, WizardError> {
        self.store.set_conversation_state(
            owner_id,
            Stage::AwaitingEditTargetId,
            &EventDraft::default(),
        )?;
        Ok(Reply::new(PROMPT_EDIT_ID, Stage::AwaitingEditTargetId))
    }

    pub fn start_delete(&self, owner_id: i64) -> Result<Reply, WizardError> {
        self.store.set_conversation_state(
            owner_id,
            Stage::AwaitingDeleteTargetId,
            &EventDraft::default(),
        )?;
        Ok(Reply::new(PROMPT_DELETE_ID, Stage::AwaitingDeleteTargetId))
    }

    /// Clears any active wizard without touching the event store.
    /// A cancel while idle is a harmless no-op.
    pub fn cancel(&self, owner_id: i64) -> Result<Reply, WizardError> {
        self.store.clear_conversation_state(owner_id)?;
        Ok(Reply::new("Current operation cancelled.", Stage::Idle))
    }

    /// Renders the owner's events, chunked to the transport message limit.
    pub fn list(&self, owner_id: i64) -> Result<Vec<String>, WizardError> {
        let events = self.store.events_for_owner(owner_id)?;
        if events.is_empty() {
            return Ok(vec![EMPTY_LISTING.to_string()]);
        }
        Ok(chunk_text(&render_listing(&events), MAX_CHUNK_CHARS))
    }

    /// Routes one raw message through the current stage. Validation
    /// failures re-prompt at the same stage; terminal transitions commit
    /// to the event store and clear the conversation row.
    pub fn submit(&self, owner_id: i64, raw_text: &str) -> Result<Reply, WizardError> {
        let text = raw_text.trim();
        let (stage, draft) = self.store.conversation_state(owner_id)?;

        match stage {
            Stage::Idle => Ok(Reply::new(UNKNOWN_COMMAND, Stage::Idle)),
            Stage::AwaitingName => self.on_name(owner_id, draft, text),
            Stage::AwaitingDate => self.on_date(owner_id, draft, text),
            Stage::AwaitingTime => self.on_time(owner_id, draft, text),
            Stage::AwaitingDetails => self.on_details(owner_id, draft, text),
            Stage::AwaitingEditTargetId => self.on_edit_target_id(owner_id, draft, text),
            Stage::AwaitingEditFieldChoice => self.on_edit_field_choice(owner_id, draft, text),
            Stage::AwaitingEditValue => self.on_edit_value(owner_id, draft, text),
            Stage::AwaitingDeleteTargetId => self.on_delete_target_id(owner_id, text),
        }
    }

    fn on_name(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        if text.is_empty() {
            return Ok(Reply::new(
                "❌ The event name cannot be empty. Try again:",
                Stage::AwaitingName,
            ));
        }
        draft.name = Some(text.to_string());
        self.store
            .set_conversation_state(owner_id, Stage::AwaitingDate, &draft)?;
        Ok(Reply::new(PROMPT_DATE, Stage::AwaitingDate))
    }

    fn on_date(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        match validate_date(text) {
            Err(DateError::Format) => Ok(Reply::new(
                "❌ Invalid date format. Use YYYY-MM-DD\nExample: 2025-12-15\nTry again:",
                Stage::AwaitingDate,
            )),
            Err(DateError::Impossible) => Ok(Reply::new(
                "❌ That date does not exist in the calendar. Try again:",
                Stage::AwaitingDate,
            )),
            Ok(()) => {
                draft.date = Some(text.to_string());
                self.store
                    .set_conversation_state(owner_id, Stage::AwaitingTime, &draft)?;
                Ok(Reply::new(PROMPT_TIME, Stage::AwaitingTime))
            }
        }
    }

    fn on_time(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        if text != SKIP_MARKER {
            match validate_time(text) {
                Err(TimeError::Format) => {
                    return Ok(Reply::new(
                        "❌ Invalid time format. Use HH:MM\nExample: 14:30\nTry again (or '-' to skip):",
                        Stage::AwaitingTime,
                    ));
                }
                Err(TimeError::Impossible) => {
                    return Ok(Reply::new(
                        "❌ That time does not exist. Try again (or '-' to skip):",
                        Stage::AwaitingTime,
                    ));
                }
                Ok(()) => {}
            }
        }
        draft.time = (text != SKIP_MARKER).then(|| text.to_string());
        self.store
            .set_conversation_state(owner_id, Stage::AwaitingDetails, &draft)?;
        Ok(Reply::new(PROMPT_DETAILS, Stage::AwaitingDetails))
    }

    fn on_details(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        draft.details = (text != SKIP_MARKER).then(|| text.to_string());

        // Terminal transition: the conversation row is cleared whether or
        // not the commit succeeds, so a failed commit never leaves a stuck
        // wizard behind.
        let outcome = self.commit_create(owner_id, &draft);
        self.store.clear_conversation_state(owner_id)?;

        match outcome {
            Ok(summary) => Ok(Reply::new(summary, Stage::Idle)),
            Err(err) => {
                warn!(owner_id, error = %err, "event creation failed");
                Ok(Reply::new(GENERIC_FAILURE, Stage::Idle))
            }
        }
    }

    fn commit_create(&self, owner_id: i64, draft: &EventDraft) -> Result<String, StorageError> {
        let name = draft
            .name
            .as_deref()
            .ok_or_else(|| StorageError::Serialization("draft missing name".to_string()))?;
        let date = draft
            .date
            .as_deref()
            .ok_or_else(|| StorageError::Serialization("draft missing date".to_string()))?;

        let id = self.store.create_event(
            owner_id,
            name,
            date,
            draft.time.as_deref(),
            draft.details.as_deref(),
        )?;

        let mut text = format!("✅ Event created!\n🆔 ID: {id}\n📝 Name: {name}\n📅 Date: {date}");
        if let Some(time) = &draft.time {
            text.push_str(&format!("\n⏰ Time: {time}"));
        }
        if let Some(details) = &draft.details {
            text.push_str(&format!("\n📋 Details: {details}"));
        }
        Ok(text)
    }

    fn on_edit_target_id(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        let Ok(event_id) = text.parse::<i64>() else {
            return Ok(Reply::new(RETRY_ID_NOT_NUMERIC, Stage::AwaitingEditTargetId));
        };
        if self.store.event(owner_id, event_id)?.is_none() {
            return Ok(Reply::new(RETRY_ID_NOT_FOUND, Stage::AwaitingEditTargetId));
        }

        draft.target_id = Some(event_id);
        self.store
            .set_conversation_state(owner_id, Stage::AwaitingEditFieldChoice, &draft)?;
        Ok(Reply::new(PROMPT_FIELD_CHOICE, Stage::AwaitingEditFieldChoice))
    }

    fn on_edit_field_choice(
        &self,
        owner_id: i64,
        mut draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        let Some(field) = EventField::from_menu_choice(text) else {
            return Ok(Reply::new(
                "❌ Invalid choice. Send a number from 1 to 4:",
                Stage::AwaitingEditFieldChoice,
            ));
        };

        draft.field = Some(field);
        self.store
            .set_conversation_state(owner_id, Stage::AwaitingEditValue, &draft)?;
        Ok(Reply::new(edit_value_prompt(field), Stage::AwaitingEditValue))
    }

    fn on_edit_value(
        &self,
        owner_id: i64,
        draft: EventDraft,
        text: &str,
    ) -> Result<Reply, WizardError> {
        let (Some(target_id), Some(field)) = (draft.target_id, draft.field) else {
            // The draft lost its edit context, which should not happen
            // through the normal flow. Clear rather than loop forever.
            self.store.clear_conversation_state(owner_id)?;
            warn!(owner_id, "edit draft missing target id or field");
            return Ok(Reply::new(GENERIC_FAILURE, Stage::Idle));
        };

        let update = match validate_edit_value(field, text) {
            Ok(update) => update,
            Err(reply_text) => return Ok(Reply::new(reply_text, Stage::AwaitingEditValue)),
        };

        let outcome = self.store.update_event_fields(owner_id, target_id, &[update]);
        self.store.clear_conversation_state(owner_id)?;

        match outcome {
            Ok(true) => Ok(Reply::new("✅ Event updated!", Stage::Idle)),
            Ok(false) => Ok(Reply::new("❌ Could not update the event.", Stage::Idle)),
            Err(err) => {
                warn!(owner_id, event_id = target_id, error = %err, "event update failed");
                Ok(Reply::new(GENERIC_FAILURE, Stage::Idle))
            }
        }
    }

    fn on_delete_target_id(&self, owner_id: i64, text: &str) -> Result<Reply, WizardError> {
        let Ok(event_id) = text.parse::<i64>() else {
            return Ok(Reply::new(
                RETRY_ID_NOT_NUMERIC,
                Stage::AwaitingDeleteTargetId,
            ));
        };

        match self.store.delete_event(owner_id, event_id) {
            // A miss re-prompts, mirroring the edit flow.
            Ok(false) => Ok(Reply::new(RETRY_ID_NOT_FOUND, Stage::AwaitingDeleteTargetId)),
            Ok(true) => {
                self.store.clear_conversation_state(owner_id)?;
                Ok(Reply::new(
                    format!("✅ Event {event_id} deleted!"),
                    Stage::Idle,
                ))
            }
            Err(err) => {
                self.store.clear_conversation_state(owner_id)?;
                warn!(owner_id, event_id, error = %err, "event deletion failed");
                Ok(Reply::new(GENERIC_FAILURE, Stage::Idle))
            }
        }
    }
}

fn edit_value_prompt(field: EventField) -> &'static str {
    match field {
        EventField::Name => "Enter the new event name:",
        EventField::Date => "Enter the new date as YYYY-MM-DD:",
        EventField::Time => "Enter the new time as HH:MM (or send '-' to clear it):",
        EventField::Details => "Enter the new details (or send '-' to clear them):",
    }
}

/// Validates an edit-flow value with the create-flow rules. The skip marker
/// clears the clearable fields and is rejected for the required ones.
fn validate_edit_value(field: EventField, text: &str) -> Result<FieldUpdate, &'static str> {
    if text == SKIP_MARKER {
        return match field {
            EventField::Time => Ok(FieldUpdate::Time(None)),
            EventField::Details => Ok(FieldUpdate::Details(None)),
            EventField::Name => Err("❌ The name cannot be cleared. Enter a new name:"),
            EventField::Date => Err("❌ The date cannot be cleared. Enter a new date:"),
        };
    }

    match field {
        EventField::Name => {
            if text.is_empty() {
                Err("❌ The event name cannot be empty. Try again:")
            } else {
                Ok(FieldUpdate::Name(text.to_string()))
            }
        }
        EventField::Date => match validate_date(text) {
            Ok(()) => Ok(FieldUpdate::Date(text.to_string())),
            Err(DateError::Format) => Err("❌ Invalid date format. Use YYYY-MM-DD\nTry again:"),
            Err(DateError::Impossible) => {
                Err("❌ That date does not exist in the calendar. Try again:")
            }
        },
        EventField::Time => match validate_time(text) {
            Ok(()) => Ok(FieldUpdate::Time(Some(text.to_string()))),
            Err(TimeError::Format) => {
                Err("❌ Invalid time format. Use HH:MM\nTry again (or '-' to clear it):")
            }
            Err(TimeError::Impossible) => {
                Err("❌ That time does not exist. Try again (or '-' to clear it):")
            }
        },
        EventField::Details => Ok(FieldUpdate::Details(Some(text.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_storage::CalendarStore;

    fn wizard() -> Wizard {
        Wizard::new(CalendarStore::open_in_memory().expect("open db"))
    }

    fn run_create(wizard: &Wizard, owner_id: i64, inputs: [&str; 4]) -> Reply {
        wizard.start_create(owner_id).expect("start");
        let mut reply = None;
        for input in inputs {
            reply = Some(wizard.submit(owner_id, input).expect("submit"));
        }
        reply.expect("at least one input")
    }

    #[test]
    fn create_flow_collects_all_four_fields() {
        let wizard = wizard();
        let reply = run_create(&wizard, 100, ["Meeting", "2025-12-15", "14:30", "Q4 review"]);
        assert_eq!(reply.stage, Stage::Idle);
        assert!(reply.text.starts_with("✅ Event created!"));

        let events = wizard.store().events_for_owner(100).expect("list");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Meeting");
        assert_eq!(events[0].date, "2025-12-15");
        assert_eq!(events[0].time.as_deref(), Some("14:30"));
        assert_eq!(events[0].details.as_deref(), Some("Q4 review"));
    }

    #[test]
    fn skip_marker_leaves_time_and_details_absent() {
        let wizard = wizard();
        run_create(&wizard, 100, ["Birthday", "2025-12-12", "-", "-"]);

        let events = wizard.store().events_for_owner(100).expect("list");
        assert_eq!(events[0].time, None);
        assert_eq!(events[0].details, None);
    }

    #[test]
    fn empty_name_reprompts_without_advancing() {
        let wizard = wizard();
        wizard.start_create(100).expect("start");
        let reply = wizard.submit(100, "   ").expect("submit");
        assert_eq!(reply.stage, Stage::AwaitingName);

        let (stage, _) = wizard.store().conversation_state(100).expect("state");
        assert_eq!(stage, Stage::AwaitingName);
    }

    #[test]
    fn impossible_date_message_differs_from_format_message() {
        let wizard = wizard();
        wizard.start_create(100).expect("start");
        wizard.submit(100, "Meeting").expect("name");

        let format_reply = wizard.submit(100, "next friday").expect("submit");
        let impossible_reply = wizard.submit(100, "2025-02-30").expect("submit");
        assert_eq!(format_reply.stage, Stage::AwaitingDate);
        assert_eq!(impossible_reply.stage, Stage::AwaitingDate);
        assert_ne!(format_reply.text, impossible_reply.text);
    }

    #[test]
    fn out_of_range_times_reprompt() {
        let wizard = wizard();
        wizard.start_create(100).expect("start");
        wizard.submit(100, "Meeting").expect("name");
        wizard.submit(100, "2025-12-15").expect("date");

        for bad in ["25:00", "14:60", "2pm"] {
            let reply = wizard.submit(100, bad).expect("submit");
            assert_eq!(reply.stage, Stage::AwaitingTime, "input {bad:?}");
        }
    }

    #[test]
    fn starting_a_new_flow_discards_the_prior_draft() {
        let wizard = wizard();
        wizard.start_create(100).expect("start");
        wizard.submit(100, "Half-built").expect("name");
        wizard.submit(100, "2025-12-15").expect("date");

        // Restart mid-flight; no field may bleed into the new draft.
        wizard.start_create(100).expect("restart");
        let (stage, draft) = wizard.store().conversation_state(100).expect("state");
        assert_eq!(stage, Stage::AwaitingName);
        assert_eq!(draft, EventDraft::default());
    }

    #[test]
    fn cancel_clears_state_and_is_idempotent_from_idle() {
        let wizard = wizard();
        wizard.start_create(100).expect("start");
        wizard.submit(100, "Meeting").expect("name");

        let reply = wizard.cancel(100).expect("cancel");
        assert_eq!(reply.stage, Stage::Idle);
        assert!(wizard.store().events_for_owner(100).expect("list").is_empty());

        // Twice more from idle: no error, no state change.
        wizard.cancel(100).expect("cancel again");
        wizard.cancel(100).expect("cancel a third time");
        let (stage, _) = wizard.store().conversation_state(100).expect("state");
        assert_eq!(stage, Stage::Idle);
    }

    #[test]
    fn submit_while_idle_reports_unknown_command() {
        let wizard = wizard();
        let reply = wizard.submit(100, "hello there").expect("submit");
        assert_eq!(reply.stage, Stage::Idle);
        assert_eq!(reply.text, UNKNOWN_COMMAND);
    }

    #[test]
    fn edit_flow_updates_exactly_one_field() {
        let wizard = wizard();
        let reply = run_create(&wizard, 100, ["Meeting", "2025-12-15", "14:30", "notes"]);
        assert_eq!(reply.stage, Stage::Idle);
        let id = wizard.store().events_for_owner(100).expect("list")[0].id;

        wizard.start_edit(100).expect("start edit");
        wizard.submit(100, &id.to_string()).expect("target id");
        let menu_reply = wizard.submit(100, "2").expect("field choice");
        assert_eq!(menu_reply.stage, Stage::AwaitingEditValue);
        let final_reply = wizard.submit(100, "2025-12-16").expect("value");
        assert_eq!(final_reply.stage, Stage::Idle);
        assert_eq!(final_reply.text, "✅ Event updated!");

        let event = wizard.store().event(100, id).expect("get").expect("present");
        assert_eq!(event.date, "2025-12-16");
        assert_eq!(event.name, "Meeting");
        assert_eq!(event.time.as_deref(), Some("14:30"));
    }

    #[test]
    fn edit_skip_marker_clears_time_to_absent() {
        let wizard = wizard();
        run_create(&wizard, 100, ["Meeting", "2025-12-15", "14:30", "-"]);
        let id = wizard.store().events_for_owner(100).expect("list")[0].id;

        wizard.start_edit(100).expect("start edit");
        wizard.submit(100, &id.to_string()).expect("target id");
        wizard.submit(100, "3").expect("choose time");
        let reply = wizard.submit(100, "-").expect("clear");
        assert_eq!(reply.stage, Stage::Idle);

        let event = wizard.store().event(100, id).expect("get").expect("present");
        assert_eq!(event.time, None);
    }

    #[test]
    fn edit_rejects_clearing_required_fields() {
        let wizard = wizard();
        run_create(&wizard, 100, ["Meeting", "2025-12-15", "-", "-"]);
        let id = wizard.store().events_for_owner(100).expect("list")[0].id;

        wizard.start_edit(100).expect("start edit");
        wizard.submit(100, &id.to_string()).expect("target id");
        wizard.submit(100, "1").expect("choose name");
        let reply = wizard.submit(100, "-").expect("attempt clear");
        assert_eq!(reply.stage, Stage::AwaitingEditValue);

        let event = wizard.store().event(100, id).expect("get").expect("present");
        assert_eq!(event.name, "Meeting");
    }

    #[test]
    fn edit_reprompts_on_bad_and_foreign_ids() {
        let wizard = wizard();
        run_create(&wizard, 200, ["Someone else's", "2025-12-15", "-", "-"]);
        let foreign_id = wizard.store().events_for_owner(200).expect("list")[0].id;

        wizard.start_edit(100).expect("start edit");
        let non_numeric = wizard.submit(100, "abc").expect("submit");
        assert_eq!(non_numeric.stage, Stage::AwaitingEditTargetId);

        let foreign = wizard.submit(100, &foreign_id.to_string()).expect("submit");
        assert_eq!(foreign.stage, Stage::AwaitingEditTargetId);
        assert_eq!(foreign.text, RETRY_ID_NOT_FOUND);
    }

    #[test]
    fn invalid_menu_choice_reprompts() {
        let wizard = wizard();
        run_create(&wizard, 100, ["Meeting", "2025-12-15", "-", "-"]);
        let id = wizard.store().events_for_owner(100).expect("list")[0].id;

        wizard.start_edit(100).expect("start edit");
        wizard.submit(100, &id.to_string()).expect("target id");
        let reply = wizard.submit(100, "9").expect("bad choice");
        assert_eq!(reply.stage, Stage::AwaitingEditFieldChoice);
    }

    #[test]
    fn delete_flow_removes_the_event() {
        let wizard = wizard();
        run_create(&wizard, 100, ["Obsolete", "2025-12-15", "-", "-"]);
        let id = wizard.store().events_for_owner(100).expect("list")[0].id;

        wizard.start_delete(100).expect("start delete");
        let reply = wizard.submit(100, &id.to_string()).expect("submit");
        assert_eq!(reply.stage, Stage::Idle);
        assert_eq!(reply.text, format!("✅ Event {id} deleted!"));
        assert!(wizard.store().event(100, id).expect("get").is_none());
    }

    #[test]
    fn delete_reprompts_on_not_found_like_edit() {
        let wizard = wizard();
        run_create(&wizard, 200, ["Foreign", "2025-12-15", "-", "-"]);
        let foreign_id = wizard.store().events_for_owner(200).expect("list")[0].id;

        wizard.start_delete(100).expect("start delete");
        let miss = wizard.submit(100, "999").expect("submit");
        assert_eq!(miss.stage, Stage::AwaitingDeleteTargetId);
        assert_eq!(miss.text, RETRY_ID_NOT_FOUND);

        let foreign = wizard.submit(100, &foreign_id.to_string()).expect("submit");
        assert_eq!(foreign.stage, Stage::AwaitingDeleteTargetId);
        assert!(wizard.store().event(200, foreign_id).expect("get").is_some());
    }

    #[test]
    fn listing_for_fresh_owner_is_an_explicit_empty_reply() {
        let wizard = wizard();
        let chunks = wizard.list(100).expect("list");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("no events"));
    }

    #[test]
    fn long_listing_is_split_into_ordered_chunks() {
        let wizard = wizard();
        // Enough bulky events to push the rendered listing past two chunks.
        for index in 0..60 {
            let details = format!("{index:03} {}", "d".repeat(160));
            wizard
                .store()
                .create_event(100, &format!("event {index:03}"), "2025-12-15", None, Some(&details))
                .expect("create");
        }

        let chunks = wizard.list(100).expect("list");
        assert!(chunks.len() >= 3, "got {} chunks", chunks.len());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS);
        }
        let rebuilt = chunks.concat();
        assert!(rebuilt.contains("event 000"));
        assert!(rebuilt.contains("event 059"));
    }
}
