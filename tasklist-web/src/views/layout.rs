/// Document shell shared by every page

use super::escape;
use crate::forms::FormErrors;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f4f4f6;margin:0;color:#222}\
main{max-width:640px;margin:2rem auto;background:#fff;padding:1.5rem 2rem;border-radius:8px}\
header{display:flex;justify-content:space-between;align-items:center;border-bottom:1px solid #ddd;margin-bottom:1rem}\
header form{display:inline}\
.task{display:flex;justify-content:space-between;padding:.5rem 0;border-bottom:1px solid #eee}\
.task.complete a.title{text-decoration:line-through;color:#888}\
.errors{color:#b00020;margin:.25rem 0;padding-left:1.2rem}\
label{display:block;margin-top:.75rem}\
input[type=text],input[type=password],textarea{width:100%;box-sizing:border-box;padding:.4rem}";

/// Wraps `body` in the site layout
///
/// `username` is the logged-in user, or `None` on the public pages.
pub fn page(title: &str, username: Option<&str>, body: &str) -> String {
    let nav = match username {
        Some(name) => format!(
            r#"<span>Hello {}</span> <form method="post" action="/logout/"><button type="submit">Logout</button></form>"#,
            escape(name)
        ),
        None => r#"<a href="/login/">Login</a> <a href="/register/">Register</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Tasklist</title>
<style>{style}</style>
</head>
<body>
<main>
<header><h1>{title}</h1><nav>{nav}</nav></header>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        nav = nav,
        body = body,
    )
}

/// Renders the messages recorded against `field`, or nothing
pub fn field_errors(errors: &FormErrors, field: &str) -> String {
    error_list(errors.for_field(field))
}

/// Renders the errors that apply to the whole form, or nothing
pub fn non_field_errors(errors: &FormErrors) -> String {
    error_list(errors.non_field())
}

fn error_list<'a>(messages: impl Iterator<Item = &'a str>) -> String {
    let items: String = messages
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();

    if items.is_empty() {
        String::new()
    } else {
        format!(r#"<ul class="errors">{}</ul>"#, items)
    }
}
