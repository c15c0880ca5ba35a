/// Title given to sessions that have no messages yet
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of words kept when deriving a title from the first message
pub const TITLE_WORD_LIMIT: usize = 6;

/// Derive a session title from its first message
///
/// Keeps the first six whitespace-separated words joined by single spaces
/// and appends "…" when the message had more words than that. Blank input
/// keeps the default title.
///
/// # Examples
///
/// ```
/// use thinktank::session::derive_title;
///
/// assert_eq!(
///     derive_title("Reset my VPN password for the east cluster please"),
///     "Reset my VPN password for the…"
/// );
/// assert_eq!(derive_title("Hi"), "Hi");
/// ```
pub fn derive_title(first_message: &str) -> String {
    let words: Vec<&str> = first_message.split_whitespace().collect();
    if words.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let mut title = words
        .iter()
        .take(TITLE_WORD_LIMIT)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > TITLE_WORD_LIMIT {
        title.push('…');
    }
    title
}
