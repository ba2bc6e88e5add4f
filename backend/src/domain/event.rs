//! Hackathon events and their approval state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Maximum title length.
pub const EVENT_TITLE_MAX: usize = 200;
/// Maximum description length.
pub const EVENT_DESCRIPTION_MAX: usize = 5000;

/// Identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct EventId(Uuid);

impl EventId {
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

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Who can see an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Every member, once approved.
    #[default]
    Shared,
    /// Only the creator (and admins).
    Private,
}

impl Visibility {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Private => "private",
        }
    }
}

/// Raised when a stored visibility string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility: {0}")]
pub struct UnknownVisibility(pub String);

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(Self::Shared),
            "private" => Ok(Self::Private),
            other => Err(UnknownVisibility(other.to_owned())),
        }
    }
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date of the event.
    pub event_date: NaiveDate,
    /// Creator.
    #[schema(value_type = String, format = Uuid)]
    pub created_by: UserId,
    /// Audience.
    pub visibility: Visibility,
    /// Admin approval flag.
    pub approved: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether `viewer` may see this event.
    #[must_use]
    pub fn is_visible_to(&self, viewer: &UserId, viewer_is_admin: bool) -> bool {
        viewer_is_admin
            || self.created_by == *viewer
            || (self.approved && self.visibility == Visibility::Shared)
    }

    /// Whether `actor` may delete this event.
    #[must_use]
    pub fn can_be_deleted_by(&self, actor: &UserId, actor_is_admin: bool) -> bool {
        actor_is_admin || self.created_by == *actor
    }
}

/// Notification sent to a non-admin creator on submission.
#[must_use]
pub fn submitted_message(title: &str) -> String {
    format!("Your event \"{title}\" has been submitted for approval.")
}

/// Notification sent to the creator on approval.
#[must_use]
pub fn approved_message(title: &str) -> String {
    format!("Your event \"{title}\" has been approved! 🎉")
}

/// Validation failures for a new event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`EVENT_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Description exceeded [`EVENT_DESCRIPTION_MAX`].
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Date was missing or not `YYYY-MM-DD`.
    #[error("eventDate must be an ISO date (YYYY-MM-DD)")]
    InvalidDate,
}

impl EventValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::InvalidDate => "eventDate",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "missing_field",
            Self::TitleTooLong { .. } | Self::DescriptionTooLong { .. } => "too_long",
            Self::InvalidDate => "invalid_date",
        }
    }
}

/// Validated event submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    title: String,
    description: Option<String>,
    event_date: NaiveDate,
    visibility: Visibility,
}

impl EventDraft {
    /// Validate raw input.
    ///
    /// # Examples
    /// ```
    /// use hacktrack::domain::{EventDraft, Visibility};
    ///
    /// let draft = EventDraft::try_from_parts(" HackX ", None, "2026-05-01", None).unwrap();
    /// assert_eq!(draft.title(), "HackX");
    /// assert_eq!(draft.visibility(), Visibility::Shared);
    /// ```
    pub fn try_from_parts(
        title: &str,
        description: Option<&str>,
        event_date: &str,
        visibility: Option<Visibility>,
    ) -> Result<Self, EventValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if title.chars().count() > EVENT_TITLE_MAX {
            return Err(EventValidationError::TitleTooLong {
                max: EVENT_TITLE_MAX,
            });
        }
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        if description
            .as_ref()
            .is_some_and(|text| text.chars().count() > EVENT_DESCRIPTION_MAX)
        {
            return Err(EventValidationError::DescriptionTooLong {
                max: EVENT_DESCRIPTION_MAX,
            });
        }
        let event_date = NaiveDate::parse_from_str(event_date.trim(), "%Y-%m-%d")
            .map_err(|_| EventValidationError::InvalidDate)?;
        Ok(Self {
            title: title.to_owned(),
            description,
            event_date,
            visibility: visibility.unwrap_or_default(),
        })
    }

    /// Trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested audience.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Materialise the event for `creator`.
    #[must_use]
    pub fn into_event(
        self,
        id: EventId,
        creator: UserId,
        approved: bool,
        created_at: DateTime<Utc>,
    ) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            created_by: creator,
            visibility: self.visibility,
            approved,
            created_at,
        }
    }
}
