use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Ticket key, one non-digit separator on the same line, then any padding.
static TICKET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-[0-9]+[^0-9\n][ \t]*").unwrap());

/// Strip a leading ticket reference such as `ABC-123: ` from the subject line.
pub fn normalize_message(message: &str) -> Cow<'_, str> {
    TICKET_PREFIX.replace(message, "")
}
