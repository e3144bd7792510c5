use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Domain Models (Mapped to DB) ---

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64, // SQLite INTEGER primary key maps to i64
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// --- Request/Response DTOs ---

// `title` stays Option so a missing field reaches our validation instead
// of being rejected by the JSON extractor.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
}

// Full replace semantics: an omitted description is written as NULL and
// an omitted completed flag as false.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub page: i64,
    pub limit: i64,
    pub total_tasks: i64,
    pub total_pages: i64,
    pub tasks: Vec<Task>,
}
