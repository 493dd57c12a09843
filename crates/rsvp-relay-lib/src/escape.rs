//! HTML escaping for values interpolated into the notification body.

/// Escape `value` for safe interpolation into HTML text or attribute content.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their entity forms in a single
/// pass, so substituted output is never matched again. Escaping text that is
/// already escaped double-escapes its ampersands.
///
/// # Example
///
/// ```
/// use rsvp_relay_lib::escape_html;
///
/// assert_eq!(escape_html("<b>A&B</b>"), "&lt;b&gt;A&amp;B&lt;/b&gt;");
/// ```
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
