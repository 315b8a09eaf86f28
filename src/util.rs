/// Longest label or boundary name the store accepts.
pub const MAX_LABEL_CHARS: usize = 120;

/// Trims `raw`, falls back to `default` when nothing is left and cuts the
/// result to [`MAX_LABEL_CHARS`] characters.
pub fn label_or_default(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(label) => label.chars().take(MAX_LABEL_CHARS).collect(),
        None => default.to_string(),
    }
}

/// Lowercased, trimmed email used as the account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Escapes text for safe inclusion in HTML bodies and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
