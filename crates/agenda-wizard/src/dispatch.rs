//! Slash-command dispatch shared by every chat-style transport. Adapters
//! hand over `(owner id, raw text)` and render the returned replies.

use crate::{Wizard, WizardError, UNKNOWN_COMMAND};
use agenda_core::Stage;

const GREETING: &str = "Hi! I'm the Agenda calendar bot.\n\n\
Available commands:\n\
/create_event - create an event\n\
/my_events - list my events\n\
/edit_event - edit an event\n\
/delete_event - delete an event\n\
/cancel - cancel the current operation\n\
/help - help";

const HELP: &str = "📅 <b>Agenda</b> - event management\n\n\
<b>Commands:</b>\n\
/create_event - Create a new event (step by step)\n\
/my_events - Show all my events\n\
/edit_event - Edit an event (step by step)\n\
/delete_event - Delete an event (step by step)\n\
/cancel - Cancel the current operation\n\n\
<b>Date and time examples:</b>\n\
Date: 2025-12-15 (YYYY-MM-DD)\n\
Time: 14:30 (HH:MM)";

/// A recognized incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Help,
    CreateEvent,
    MyEvents,
    EditEvent,
    DeleteEvent,
    Cancel,
    /// Plain text, fed to whatever wizard stage is active.
    Message(&'a str),
    /// A slash command nobody registered.
    Unknown,
}

pub fn parse_command(text: &str) -> Command<'_> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return Command::Message(trimmed);
    }
    match trimmed.split_whitespace().next().unwrap_or(trimmed) {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/create_event" => Command::CreateEvent,
        "/my_events" => Command::MyEvents,
        "/edit_event" => Command::EditEvent,
        "/delete_event" => Command::DeleteEvent,
        "/cancel" => Command::Cancel,
        _ => Command::Unknown,
    }
}

/// Handles one incoming message end to end and returns the replies to
/// emit, in order. Listing output may span several replies; everything
/// else is a single one.
pub fn handle_message(
    wizard: &Wizard,
    owner_id: i64,
    text: &str,
) -> Result<Vec<String>, WizardError> {
    let replies = match parse_command(text) {
        Command::Start => {
            // Entering via /start abandons any wizard in progress.
            wizard.cancel(owner_id)?;
            vec![GREETING.to_string()]
        }
        Command::Help => {
            wizard.cancel(owner_id)?;
            vec![HELP.to_string()]
        }
        Command::CreateEvent => vec![wizard.start_create(owner_id)?.text],
        Command::MyEvents => wizard.list(owner_id)?,
        Command::EditEvent => vec![wizard.start_edit(owner_id)?.text],
        Command::DeleteEvent => vec![wizard.start_delete(owner_id)?.text],
        Command::Cancel => vec![wizard.cancel(owner_id)?.text],
        Command::Message(body) => vec![wizard.submit(owner_id, body)?.text],
        Command::Unknown => vec![UNKNOWN_COMMAND.to_string()],
    };
    Ok(replies)
}

/// Like [`handle_message`] but also reports the resulting stage, for
/// transports that surface it.
pub fn handle_message_with_stage(
    wizard: &Wizard,
    owner_id: i64,
    text: &str,
) -> Result<(Vec<String>, Stage), WizardError> {
    let replies = handle_message(wizard, owner_id, text)?;
    let (stage, _) = wizard.store().conversation_state(owner_id)?;
    Ok((replies, stage))
}
