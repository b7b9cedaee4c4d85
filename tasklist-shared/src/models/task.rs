/// Task model and database operations
///
/// A task is a personal to-do item owned by exactly one user. The owner is
/// bound once at creation and never changes; every query here takes the owner
/// explicitly so callers cannot forget to scope by it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     complete BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Ordering
///
/// Lists put incomplete tasks first, then order by creation time and id.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::task::{Task, CreateTask};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, owner: Uuid) -> Result<(), sqlx::Error> {
/// Task::create(&pool, CreateTask {
///     user_id: owner,
///     title: "Buy milk".to_string(),
///     description: None,
///     complete: false,
/// }).await?;
///
/// let matching = Task::list_for_owner(&pool, owner, "milk").await?;
/// let remaining = Task::count_incomplete(&pool, owner).await?;
/// assert_eq!(matching.len() as i64, remaining);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum title length, in characters
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Task owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owner
    pub user_id: Uuid,

    /// Short title, 1-200 characters
    pub title: String,

    /// Optional free text
    pub description: Option<String>,

    /// Whether the task is done
    pub complete: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `user_id` always comes from the authenticated requester, never from a form.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub complete: bool,
}

/// Editable fields of a task
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub complete: bool,
}

/// Escapes `%`, `_` and `\` so they match literally in a `LIKE` pattern
///
/// # Example
///
/// ```
/// use tasklist_shared::models::task::escape_like;
///
/// assert_eq!(escape_like("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the `ILIKE` pattern for a title search, or `None` to match everything
fn search_pattern(search: &str) -> Option<String> {
    let search = search.trim();
    if search.is_empty() {
        None
    } else {
        Some(format!("%{}%", escape_like(search)))
    }
}

impl Task {
    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the owner doesn't exist or the database is unreachable
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, complete)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, complete, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.complete)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID regardless of owner
    ///
    /// Callers serving a request go through
    /// [`find_owned_task`](crate::auth::authorization::find_owned_task) instead.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, complete, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the owner's tasks whose title contains `search`, ignoring case
    ///
    /// Surrounding whitespace in `search` is ignored and an empty search
    /// returns every task of the owner. Wildcard characters match literally.
    /// A search containing a NUL character matches nothing, since no stored
    /// title can contain one.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: Uuid,
        search: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if search.contains('\0') {
            return Ok(Vec::new());
        }

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, complete, created_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR title ILIKE $2 ESCAPE '\')
            ORDER BY complete ASC, created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(search_pattern(search))
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts the owner's tasks that are not complete
    pub async fn count_incomplete(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND complete = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Replaces the editable fields of an owned task
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with this ID belongs to `user_id`
    pub async fn update(
        pool: &PgPool,
        id: i64,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, complete = $5
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, complete, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.complete)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes an owned task
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if none matched
    pub async fn delete(pool: &PgPool, id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
