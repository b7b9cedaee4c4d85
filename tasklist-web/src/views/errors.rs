/// Error pages
///
/// None of these pages include task contents.

use super::layout::page;

pub fn forbidden_page() -> String {
    page(
        "Forbidden",
        None,
        r#"<p>You do not have permission to access this task.</p><p><a href="/">Back to your tasks</a></p>"#,
    )
}

pub fn not_found_page() -> String {
    page(
        "Not found",
        None,
        r#"<p>The page you requested does not exist.</p><p><a href="/">Back to your tasks</a></p>"#,
    )
}

pub fn internal_error_page() -> String {
    page(
        "Server error",
        None,
        "<p>Something went wrong on our side. Please try again later.</p>",
    )
}
