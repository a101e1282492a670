//! Text clean-up for values typed or pasted into sheet fields.

/// Make pasted or typed text safe for a single-line field.
///
/// Tabs and line breaks become single spaces and other control characters
/// are dropped, so a paste can never break the editor layout.
pub fn sanitize_field_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut last_was_break = false;

    for c in text.chars() {
        match c {
            '\r' | '\n' => {
                if !last_was_break {
                    sanitized.push(' ');
                }
                last_was_break = true;
                continue;
            }
            '\t' => sanitized.push(' '),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
        last_was_break = false;
    }

    sanitized
}

/// Collapse internal whitespace runs, as stored for names and list entries.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
