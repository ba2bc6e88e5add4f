//! Member profiles and the completion gate.
//!
//! A profile row is created together with the account. The owner flips
//! `profile_completed` once, after supplying every mandatory field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Upper bound for free-text profile fields.
pub const PROFILE_FIELD_MAX: usize = 64;

/// Stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owner.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Phone number as typed.
    pub mobile: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// University roll number.
    pub university_roll_number: Option<String>,
    /// Gate flag; true once all mandatory fields were supplied.
    pub profile_completed: bool,
}

impl Profile {
    /// Fresh profile for a newly provisioned account.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            mobile: None,
            date_of_birth: None,
            university_roll_number: None,
            profile_completed: false,
        }
    }
}

/// Field-level validation failure for profile completion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// A mandatory field was blank after trimming.
    #[error("{field} must not be empty")]
    Missing {
        /// Wire name of the field.
        field: &'static str,
    },
    /// A field exceeded [`PROFILE_FIELD_MAX`].
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Wire name of the field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },
    /// Date of birth was not `YYYY-MM-DD`.
    #[error("dateOfBirth must be an ISO date (YYYY-MM-DD)")]
    InvalidDate,
    /// Date of birth was after today.
    #[error("dateOfBirth must not be in the future")]
    FutureDate,
}

impl ProfileValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } => field,
            Self::InvalidDate | Self::FutureDate => "dateOfBirth",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::TooLong { .. } => "too_long",
            Self::InvalidDate => "invalid_date",
            Self::FutureDate => "future_date",
        }
    }
}

/// Mandatory onboarding fields, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCompletion {
    mobile: String,
    date_of_birth: NaiveDate,
    university_roll_number: String,
}

fn required_text(raw: &str, field: &'static str) -> Result<String, ProfileValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProfileValidationError::Missing { field });
    }
    if trimmed.chars().count() > PROFILE_FIELD_MAX {
        return Err(ProfileValidationError::TooLong {
            field,
            max: PROFILE_FIELD_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

impl ProfileCompletion {
    /// Validate raw input against `today`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use hacktrack::domain::ProfileCompletion;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    /// let done = ProfileCompletion::try_from_parts(" 555 ", "2000-02-29", "R-1", today).unwrap();
    /// assert_eq!(done.mobile(), "555");
    /// ```
    pub fn try_from_parts(
        mobile: &str,
        date_of_birth: &str,
        university_roll_number: &str,
        today: NaiveDate,
    ) -> Result<Self, ProfileValidationError> {
        let mobile = required_text(mobile, "mobile")?;
        let raw_date = date_of_birth.trim();
        if raw_date.is_empty() {
            return Err(ProfileValidationError::Missing {
                field: "dateOfBirth",
            });
        }
        let date_of_birth = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| ProfileValidationError::InvalidDate)?;
        if date_of_birth > today {
            return Err(ProfileValidationError::FutureDate);
        }
        let university_roll_number =
            required_text(university_roll_number, "universityRollNumber")?;
        Ok(Self {
            mobile,
            date_of_birth,
            university_roll_number,
        })
    }

    /// Phone number.
    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    /// Date of birth.
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Roll number.
    pub fn university_roll_number(&self) -> &str {
        &self.university_roll_number
    }

    /// Apply to `profile`, setting the completion flag.
    #[must_use]
    pub fn apply_to(self, profile: Profile) -> Profile {
        Profile {
            user_id: profile.user_id,
            mobile: Some(self.mobile),
            date_of_birth: Some(self.date_of_birth),
            university_roll_number: Some(self.university_roll_number),
            profile_completed: true,
        }
    }
}
