/// Server-rendered HTML pages
///
/// Pages are plain functions returning `String`. Every value that came from a
/// user passes through [`escape`] before it is written into markup.
///
/// - `layout`: Document shell, navigation and form helpers
/// - `auth`: Login and registration pages
/// - `tasks`: Task list, detail, form and delete confirmation pages
/// - `errors`: 403, 404 and 500 pages

pub mod auth;
pub mod errors;
pub mod layout;
pub mod tasks;

/// Escapes text for use in HTML element content and quoted attribute values
///
/// # Example
///
/// ```
/// use tasklist_web::views::escape;
///
/// assert_eq!(escape("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#x27;s&quot;&lt;/b&gt;");
/// ```
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
