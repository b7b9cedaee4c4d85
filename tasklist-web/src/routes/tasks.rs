/// Task pages
///
/// Every handler here sits behind the session auth gate and receives the
/// requester's `AuthContext`. Handlers that touch an existing task resolve it
/// through the ownership guard first, for GET and POST alike.
///
/// # Endpoints
///
/// - `GET /?q=` - The requester's tasks, optionally filtered by title
/// - `GET /task/:id/` - Task detail
/// - `GET|POST /task/create/` - New task form / create
/// - `GET|POST /task/update/:id/` - Edit form / update
/// - `GET|POST /task/delete/:id/` - Delete confirmation / delete

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    forms::{FormErrors, TaskForm, TaskFormInput},
    routes::auth::HOME_URL,
    views,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tasklist_shared::{
    auth::{
        authorization::{find_owned_task, AuthzError},
        middleware::AuthContext,
    },
    models::task::Task,
};

/// Task ID taken from the path
///
/// Anything but a run of digits that fits in an `i64` is treated as a
/// missing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Missing task id".to_string()))?;

        parse_task_id(&raw)
            .map(TaskId)
            .ok_or_else(|| AppError::NotFound(format!("Invalid task id {:?}", raw)))
    }
}

fn parse_task_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// List query string
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive title search
    #[serde(default)]
    pub q: String,
}

/// Resolves a task through the ownership guard, logging refusals
async fn owned_task(state: &AppState, auth: &AuthContext, id: i64) -> AppResult<Task> {
    find_owned_task(&state.db, id, auth.user_id)
        .await
        .map_err(|e| {
            if matches!(e, AuthzError::NotOwner) {
                tracing::warn!(user_id = %auth.user_id, task_id = id, "Refused access to another user's task");
            }
            AppError::from(e)
        })
}

fn task_form_response(
    status: StatusCode,
    auth: &AuthContext,
    heading: &str,
    action: &str,
    form: &TaskForm,
    errors: &FormErrors,
) -> Response {
    (
        status,
        Html(views::tasks::task_form(&auth.username, heading, action, form, errors)),
    )
        .into_response()
}

/// Task list with search and incomplete count
///
/// The count covers all of the requester's tasks, whatever the search.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let q = query.q.trim();

    let tasks = Task::list_for_owner(&state.db, auth.user_id, q).await?;
    let incomplete_count = Task::count_incomplete(&state.db, auth.user_id).await?;

    Ok(Html(views::tasks::task_list(
        &auth.username,
        &tasks,
        incomplete_count,
        q,
    )))
}

/// Task detail
///
/// # Errors
///
/// - `404 Not Found`: no such task
/// - `403 Forbidden`: the task belongs to someone else
pub async fn task_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    TaskId(id): TaskId,
) -> AppResult<Html<String>> {
    let task = owned_task(&state, &auth, id).await?;

    Ok(Html(views::tasks::task_detail(&auth.username, &task)))
}

/// Empty create form
pub async fn create_task_page(Extension(auth): Extension<AuthContext>) -> Response {
    task_form_response(
        StatusCode::OK,
        &auth,
        "Create task",
        "/task/create/",
        &TaskForm::default(),
        &FormErrors::new(),
    )
}

/// Create a task owned by the requester
///
/// Owner fields in the submission are ignored.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(input): Form<TaskFormInput>,
) -> AppResult<Response> {
    let form = TaskForm::from(input);
    if let Err(errors) = form.validate() {
        return Ok(task_form_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &auth,
            "Create task",
            "/task/create/",
            &form,
            &errors,
        ));
    }

    let task = Task::create(&state.db, form.into_create(auth.user_id)).await?;
    tracing::info!(user_id = %auth.user_id, task_id = task.id, "Task created");

    Ok(Redirect::to(HOME_URL).into_response())
}

/// Edit form prefilled with the task's current values
pub async fn update_task_page(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    TaskId(id): TaskId,
) -> AppResult<Response> {
    let task = owned_task(&state, &auth, id).await?;

    Ok(task_form_response(
        StatusCode::OK,
        &auth,
        "Edit task",
        &format!("/task/update/{}/", task.id),
        &TaskForm::from(&task),
        &FormErrors::new(),
    ))
}

/// Update title, description and completion of an owned task
///
/// # Errors
///
/// - `404 Not Found`: no such task (including one deleted mid-request)
/// - `403 Forbidden`: the task belongs to someone else
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    TaskId(id): TaskId,
    Form(input): Form<TaskFormInput>,
) -> AppResult<Response> {
    let task = owned_task(&state, &auth, id).await?;

    let form = TaskForm::from(input);
    if let Err(errors) = form.validate() {
        return Ok(task_form_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &auth,
            "Edit task",
            &format!("/task/update/{}/", task.id),
            &form,
            &errors,
        ));
    }

    let updated = Task::update(&state.db, task.id, auth.user_id, form.into_update())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))?;
    tracing::info!(
        user_id = %auth.user_id,
        task_id = updated.id,
        complete = updated.complete,
        "Task updated"
    );

    Ok(Redirect::to(HOME_URL).into_response())
}

/// Delete confirmation
pub async fn delete_task_page(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    TaskId(id): TaskId,
) -> AppResult<Html<String>> {
    let task = owned_task(&state, &auth, id).await?;

    Ok(Html(views::tasks::confirm_delete(&auth.username, &task)))
}

/// Delete an owned task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    TaskId(id): TaskId,
) -> AppResult<Response> {
    let task = owned_task(&state, &auth, id).await?;

    if !Task::delete(&state.db, task.id, auth.user_id).await? {
        return Err(AppError::NotFound(format!("Task {} not found", task.id)));
    }
    tracing::info!(user_id = %auth.user_id, task_id = task.id, "Task deleted");

    Ok(Redirect::to(HOME_URL).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_id() {
        assert_eq!(parse_task_id("1"), Some(1));
        assert_eq!(parse_task_id("0042"), Some(42));
        assert_eq!(parse_task_id(""), None);
        assert_eq!(parse_task_id("abc"), None);
        assert_eq!(parse_task_id("-1"), None);
        assert_eq!(parse_task_id("+1"), None);
        assert_eq!(parse_task_id("99999999999999999999"), None);
    }

    #[test]
    fn test_list_query_defaults_to_empty_search() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.q, "");
    }
}
