//! Small helpers for emitting Markdown from untrusted strings.

/// Backslash-escape the characters that would end a Markdown link early.
pub(crate) fn escape_link(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut out, c| {
        if matches!(c, '[' | ']' | '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
        out
    })
}

/// Flatten text onto one line so it can sit in a heading or list item.
pub(crate) fn single_line(s: &str) -> String {
    s.split(|c: char| c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
