/// Task pages

use super::{
    escape,
    layout::{field_errors, page},
};
use crate::forms::{FormErrors, TaskForm};
use tasklist_shared::models::task::{Task, MAX_TITLE_LENGTH};

/// "1 incomplete task", "3 incomplete tasks"
pub fn incomplete_summary(count: i64) -> String {
    if count == 1 {
        "1 incomplete task".to_string()
    } else {
        format!("{} incomplete tasks", count)
    }
}

/// The requester's tasks with the search box and incomplete count
pub fn task_list(username: &str, tasks: &[Task], incomplete_count: i64, q: &str) -> String {
    let items: String = tasks
        .iter()
        .map(|task| {
            format!(
                r#"<div class="task{class}"><a class="title" href="/task/{id}/">{title}</a><span><a href="/task/update/{id}/">Edit</a> <a href="/task/delete/{id}/">Delete</a></span></div>
"#,
                class = if task.complete { " complete" } else { "" },
                id = task.id,
                title = escape(&task.title),
            )
        })
        .collect();

    let items = if items.is_empty() {
        if q.is_empty() {
            "<p>No tasks yet.</p>".to_string()
        } else {
            format!("<p>No tasks match &quot;{}&quot;.</p>", escape(q))
        }
    } else {
        items
    };

    let body = format!(
        r#"<p>You have <strong id="incomplete-count">{summary}</strong>.</p>
<form method="get" action="/">
<input type="text" name="q" value="{q}" placeholder="Search tasks">
<button type="submit">Search</button>
</form>
<p><a href="/task/create/">Add task</a></p>
<div class="tasks">
{items}</div>"#,
        summary = incomplete_summary(incomplete_count),
        q = escape(q),
        items = items,
    );

    page("My tasks", Some(username), &body)
}

pub fn task_detail(username: &str, task: &Task) -> String {
    let description = match &task.description {
        Some(text) => format!("<p>{}</p>", escape(text).replace('\n', "<br>")),
        None => "<p><em>No description.</em></p>".to_string(),
    };

    let body = format!(
        r#"<h2>{title}</h2>
{description}
<p>Status: {status}</p>
<p>Created: {created}</p>
<p><a href="/task/update/{id}/">Edit</a> <a href="/task/delete/{id}/">Delete</a> <a href="/">Back to list</a></p>"#,
        title = escape(&task.title),
        description = description,
        status = if task.complete { "Complete" } else { "Incomplete" },
        created = task.created_at.format("%Y-%m-%d %H:%M UTC"),
        id = task.id,
    );

    page("Task", Some(username), &body)
}

/// Create or edit form
///
/// `action` is the URL the form posts back to.
pub fn task_form(
    username: &str,
    heading: &str,
    action: &str,
    form: &TaskForm,
    errors: &FormErrors,
) -> String {
    let body = format!(
        r#"<form method="post" action="{action}">
<label for="id_title">Title</label>
<input type="text" name="title" id="id_title" value="{title}" maxlength="{max_title}" required>
{title_errors}
<label for="id_description">Description</label>
<textarea name="description" id="id_description" rows="4">{description}</textarea>
<label><input type="checkbox" name="complete" id="id_complete"{checked}> Complete</label>
<p><button type="submit">Save</button> <a href="/">Cancel</a></p>
</form>"#,
        action = escape(action),
        title = escape(&form.title),
        max_title = MAX_TITLE_LENGTH,
        title_errors = field_errors(errors, "title"),
        description = escape(form.description.as_deref().unwrap_or("")),
        checked = if form.complete { " checked" } else { "" },
    );

    page(heading, Some(username), &body)
}

/// Delete confirmation naming the task
pub fn confirm_delete(username: &str, task: &Task) -> String {
    let body = format!(
        r#"<form method="post" action="/task/delete/{id}/">
<p>Are you sure you want to delete "{title}"?</p>
<p><button type="submit">Delete</button> <a href="/">Cancel</a></p>
</form>"#,
        id = task.id,
        title = escape(&task.title),
    );

    page("Delete task", Some(username), &body)
}
