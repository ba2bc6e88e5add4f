//! Per-user preparation tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Maximum title length.
pub const TASK_TITLE_MAX: usize = 200;

/// Identifier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a new identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
}

impl TaskPriority {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Raised when a stored priority string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task priority: {0}")]
pub struct UnknownTaskPriority(pub String);

impl FromStr for TaskPriority {
    type Err = UnknownTaskPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownTaskPriority(other.to_owned())),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owner.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Title.
    pub title: String,
    /// Urgency.
    pub priority: TaskPriority,
    /// Completion flag.
    pub done: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Title validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`TASK_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Validate and trim a task title.
pub fn task_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > TASK_TITLE_MAX {
        return Err(TaskValidationError::TitleTooLong {
            max: TASK_TITLE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Partial update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title, already validated.
    pub title: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New completion flag.
    pub done: Option<bool>,
}

impl TaskPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.priority.is_none() && self.done.is_none()
    }

    /// Apply the patch to `task`.
    #[must_use]
    pub fn apply(self, task: Task) -> Task {
        Task {
            title: self.title.unwrap_or(task.title),
            priority: self.priority.unwrap_or(task.priority),
            done: self.done.unwrap_or(task.done),
            ..task
        }
    }
}
