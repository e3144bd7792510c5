use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::{CreateTask, Task, TaskPage, UpdateTask},
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub limit: Option<i64>,
    pub search: Option<String>,
}

// Query strings arrive as text; anything that does not parse as an
// integer falls back to the default instead of rejecting the request.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// LIKE metacharacters in the search term are literals, not wildcards;
// the queries pair this with ESCAPE '\'.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn require_title(title: Option<String>) -> Result<String, AppError> {
    title
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::Validation("Title required"))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Title missing or empty")
    )
)]
pub async fn create_task(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let title = require_title(payload.title)?;
    let now = Utc::now().naive_utc();

    let id = sqlx::query(
        "INSERT INTO tasks (title, description, completed, created_at, updated_at)
         VALUES (?, ?, 0, ?, ?)",
    )
    .bind(&title)
    .bind(&payload.description)
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .map_err(AppError::db("Failed to create task"))?
    .last_insert_rowid();

    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .map_err(AppError::db("Failed to create task"))?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/tasks",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated task list", body = TaskPage)
    )
)]
pub async fn get_tasks(
    State(pool): State<SqlitePool>,
    Query(params): Query<Pagination>,
) -> Result<Json<TaskPage>, AppError> {
    // Non-positive values get the same treatment as absent ones, keeping
    // the OFFSET and the page-count math well defined.
    let page = params.page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT);
    // Saturating so an absurd page stays a valid (empty) page instead of
    // overflowing the OFFSET.
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let pattern = like_pattern(&params.search.unwrap_or_default());

    // Two independent statements; the count may lag the page under
    // concurrent writes, which is accepted.
    let total_tasks = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks
         WHERE lower(title) LIKE ? ESCAPE '\\'
            OR lower(coalesce(description, '')) LIKE ? ESCAPE '\\'",
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(&pool)
    .await
    .map_err(AppError::db("Failed to get tasks"))?;

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks
         WHERE lower(title) LIKE ? ESCAPE '\\'
            OR lower(coalesce(description, '')) LIKE ? ESCAPE '\\'
         ORDER BY id ASC LIMIT ? OFFSET ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await
    .map_err(AppError::db("Failed to get tasks"))?;

    Ok(Json(TaskPage {
        page,
        limit,
        total_tasks,
        total_pages: (total_tasks + limit - 1) / limit,
        tasks,
    }))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Get task details", body = Task),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(AppError::db("Failed to get task"))?
        .ok_or(AppError::NotFound("Task not found"))?;

    Ok(Json(task))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Title missing or empty"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    let title = require_title(payload.title)?;

    let result = sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, completed = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&title)
    .bind(&payload.description)
    .bind(payload.completed)
    .bind(Utc::now().naive_utc())
    .bind(id)
    .execute(&pool)
    .await
    .map_err(AppError::db("Failed to update task"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found"));
    }

    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .map_err(AppError::db("Failed to update task"))?;

    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(AppError::db("Failed to delete task"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Task deleted successfully" })))
}
