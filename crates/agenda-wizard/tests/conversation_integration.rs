use agenda_core::Stage;
use agenda_storage::CalendarStore;
use agenda_wizard::dispatch::handle_message;
use agenda_wizard::Wizard;
use tempfile::NamedTempFile;

fn drive(wizard: &Wizard, owner_id: i64, lines: &[&str]) -> Vec<String> {
    let mut last = Vec::new();
    for line in lines {
        last = handle_message(wizard, owner_id, line).expect("handle message");
    }
    last
}

#[test]
fn interleaved_owners_keep_independent_wizards() {
    let wizard = Wizard::new(CalendarStore::open_in_memory().expect("open db"));

    // Two users mid-conversation at different stages, messages interleaved.
    handle_message(&wizard, 1, "/create_event").expect("start a");
    handle_message(&wizard, 2, "/create_event").expect("start b");
    handle_message(&wizard, 1, "Dentist").expect("a name");
    handle_message(&wizard, 2, "Flight to Oslo").expect("b name");
    handle_message(&wizard, 1, "2025-11-03").expect("a date");
    handle_message(&wizard, 2, "2025-11-20").expect("b date");
    handle_message(&wizard, 1, "09:15").expect("a time");
    handle_message(&wizard, 2, "-").expect("b time");
    drive(&wizard, 1, &["-"]);
    drive(&wizard, 2, &["gate closes 06:40"]);

    let a_events = wizard.store().events_for_owner(1).expect("list a");
    let b_events = wizard.store().events_for_owner(2).expect("list b");
    assert_eq!(a_events.len(), 1);
    assert_eq!(b_events.len(), 1);
    assert_eq!(a_events[0].name, "Dentist");
    assert_eq!(a_events[0].time.as_deref(), Some("09:15"));
    assert_eq!(b_events[0].name, "Flight to Oslo");
    assert_eq!(b_events[0].time, None);
    assert_eq!(b_events[0].details.as_deref(), Some("gate closes 06:40"));
}

#[test]
fn conversation_survives_a_store_reopen() {
    let file = NamedTempFile::new().expect("temp db");

    {
        let wizard = Wizard::new(CalendarStore::open(file.path()).expect("open db"));
        handle_message(&wizard, 7, "/create_event").expect("start");
        handle_message(&wizard, 7, "Quarterly report").expect("name");
    }

    // The wizard resumes exactly where the previous process stopped.
    let wizard = Wizard::new(CalendarStore::open(file.path()).expect("reopen db"));
    let (stage, draft) = wizard.store().conversation_state(7).expect("state");
    assert_eq!(stage, Stage::AwaitingDate);
    assert_eq!(draft.name.as_deref(), Some("Quarterly report"));

    handle_message(&wizard, 7, "2025-12-01").expect("date");
    handle_message(&wizard, 7, "-").expect("time");
    let replies = drive(&wizard, 7, &["-"]);
    assert!(replies[0].starts_with("✅ Event created!"));
}

#[test]
fn cross_owner_edit_and_delete_read_as_not_found() {
    let wizard = Wizard::new(CalendarStore::open_in_memory().expect("open db"));
    drive(
        &wizard,
        1,
        &["/create_event", "Owner one's event", "2025-12-15", "-", "-"],
    );
    let id = wizard.store().events_for_owner(1).expect("list")[0].id;

    // Owner 2 guesses the id; both flows re-prompt rather than leak.
    handle_message(&wizard, 2, "/edit_event").expect("start edit");
    let edit_reply = drive(&wizard, 2, &[&id.to_string()]);
    assert!(edit_reply[0].contains("was found"));

    handle_message(&wizard, 2, "/cancel").expect("cancel");
    handle_message(&wizard, 2, "/delete_event").expect("start delete");
    let delete_reply = drive(&wizard, 2, &[&id.to_string()]);
    assert!(delete_reply[0].contains("was found"));

    assert!(wizard.store().event(1, id).expect("get").is_some());
}

#[test]
fn switching_flows_discards_the_previous_draft() {
    let wizard = Wizard::new(CalendarStore::open_in_memory().expect("open db"));
    drive(&wizard, 5, &["/create_event", "Doomed draft", "2025-12-15"]);

    // Jumping straight into the edit flow replaces the create draft.
    handle_message(&wizard, 5, "/edit_event").expect("start edit");
    let (stage, draft) = wizard.store().conversation_state(5).expect("state");
    assert_eq!(stage, Stage::AwaitingEditTargetId);
    assert_eq!(draft.name, None);
    assert_eq!(draft.date, None);

    // Nothing was ever committed for the abandoned create.
    assert!(wizard.store().events_for_owner(5).expect("list").is_empty());
}
