//! Personal task endpoints.
//!
//! ```text
//! GET    /api/v1/tasks
//! POST   /api/v1/tasks {"title":"Draft pitch","priority":"high"}
//! PATCH  /api/v1/tasks/{id} {"done":true}
//! DELETE /api/v1/tasks/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Task, TaskId, TaskPatch, TaskPriority, TaskValidationError, task_title};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, invalid_value_error, parse_uuid};

/// Client route backing the task endpoints.
pub const TASKS_ROUTE: &str = "/dashboard/tasks";

/// Body for `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskBody {
    #[serde(default)]
    pub title: String,
    /// `low`, `medium` or `high`; defaults to `medium`.
    #[serde(default)]
    pub priority: Option<String>,
}

/// Body for `PATCH /api/v1/tasks/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatchBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

fn title_error(err: &TaskValidationError) -> Error {
    let code = match err {
        TaskValidationError::EmptyTitle => "missing_field",
        TaskValidationError::TitleTooLong { .. } => "too_long",
    };
    field_error(FieldName::new("title"), code, err.to_string())
}

fn parse_priority(raw: &str) -> Result<TaskPriority, Error> {
    raw.parse()
        .map_err(|_| invalid_value_error(FieldName::new("priority"), raw))
}

impl TryFrom<TaskPatchBody> for TaskPatch {
    type Error = Error;

    fn try_from(value: TaskPatchBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value
                .title
                .as_deref()
                .map(task_title)
                .transpose()
                .map_err(|err| title_error(&err))?,
            priority: value.priority.as_deref().map(parse_priority).transpose()?,
            done: value.done,
        })
    }
}

fn task_id(raw: &str) -> Result<TaskId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(TaskId::from_uuid)
}

/// The caller's tasks, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    responses(
        (status = 200, description = "Tasks", body = [Task]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Task>>> {
    let current = authorise(&state, &session, TASKS_ROUTE).await?;
    let tasks = state.tasks.list(&current.user_id).await?;
    Ok(web::Json(tasks))
}

/// Create a task.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = NewTaskBody,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Profile completion required", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewTaskBody>,
) -> ApiResult<HttpResponse> {
    let current = authorise(&state, &session, TASKS_ROUTE).await?;
    let body = payload.into_inner();
    let title = task_title(&body.title).map_err(|err| title_error(&err))?;
    let priority = body
        .priority
        .as_deref()
        .map(parse_priority)
        .transpose()?
        .unwrap_or_default();
    let task = state.tasks.create(&current.user_id, title, priority).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Change a task's title, priority or completion flag.
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = TaskPatchBody,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[patch("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<TaskPatchBody>,
) -> ApiResult<web::Json<Task>> {
    let current = authorise(&state, &session, TASKS_ROUTE).await?;
    let id = task_id(&path.into_inner())?;
    let patch = TaskPatch::try_from(payload.into_inner())?;
    let task = state.tasks.update(&current.user_id, &id, patch).await?;
    Ok(web::Json(task))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let current = authorise(&state, &session, TASKS_ROUTE).await?;
    let id = task_id(&path.into_inner())?;
    state.tasks.delete(&current.user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
