use crate::Event;

/// Transport message-size ceiling; longer listings are split into
/// successive chunks of at most this many characters.
pub const MAX_CHUNK_CHARS: usize = 4096;

/// Escapes user-supplied text for embedding in an HTML-formatted reply.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders one event as a listing block. Name and details are escaped;
/// id, date and time are machine-generated and embedded as-is.
pub fn render_event(event: &Event) -> String {
    let mut block = format!(
        "🆔 {}\n📝 {}\n📅 {}",
        event.id,
        escape_html(&event.name),
        event.date
    );
    if let Some(time) = &event.time {
        block.push_str(&format!(" ⏰ {time}"));
    }
    if let Some(details) = &event.details {
        block.push_str(&format!("\n📋 {}", escape_html(details)));
    }
    block.push('\n');
    block.push_str(&"-".repeat(30));
    block.push('\n');
    block
}

/// Renders a non-empty listing with a header. Callers handle the empty
/// case with an explicit "no events" reply.
pub fn render_listing(events: &[Event]) -> String {
    let mut text = String::from("📅 <b>Your events:</b>\n\n");
    for event in events {
        text.push_str(&render_event(event));
    }
    text
}

/// Splits `text` into in-order chunks of at most `max_chars` characters,
/// never breaking inside a character.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    debug_assert!(max_chars > 0);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
