/// Task ownership guard
///
/// A task can only be seen, edited or deleted by the user who created it.
/// Every handler that reveals or mutates an existing task resolves it through
/// [`find_owned_task`], so the rule lives in exactly one place.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::authorization::{find_owned_task, AuthzError};
/// use tasklist_shared::auth::middleware::AuthContext;
/// use sqlx::PgPool;
///
/// async fn show(pool: &PgPool, auth: &AuthContext, id: i64) -> Result<String, AuthzError> {
///     let task = find_owned_task(pool, id, auth.user_id).await?;
///     Ok(task.title)
/// }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::Task;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No task with this ID exists
    #[error("Task {0} not found")]
    NotFound(i64),

    /// The task belongs to another user
    #[error("Not authorized to access this task")]
    NotOwner,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Returns true when `requester` owns `task`
pub fn is_owner(task: &Task, requester: Uuid) -> bool {
    task.user_id == requester
}

/// Fails with `NotOwner` unless `requester` owns `task`
pub fn require_owner(task: &Task, requester: Uuid) -> Result<(), AuthzError> {
    if is_owner(task, requester) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

/// Loads a task and applies the ownership check
///
/// # Errors
///
/// - `NotFound` if no task has this ID
/// - `NotOwner` if the task belongs to someone else
/// - `DatabaseError` if the lookup fails
pub async fn find_owned_task(pool: &PgPool, id: i64, requester: Uuid) -> Result<Task, AuthzError> {
    let task = Task::find_by_id(pool, id)
        .await?
        .ok_or(AuthzError::NotFound(id))?;

    require_owner(&task, requester)?;

    Ok(task)
}
