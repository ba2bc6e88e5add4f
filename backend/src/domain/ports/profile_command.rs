//! Driving port for profile onboarding.

use async_trait::async_trait;

use crate::domain::{Error, Profile, UserId};

/// Raw completion form; validated by the implementation against today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteProfileRequest {
    /// Phone number.
    pub mobile: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Roll number.
    pub university_roll_number: String,
}

/// Profile use-cases for the signed-in owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// The caller's profile.
    async fn fetch(&self, user_id: &UserId) -> Result<Profile, Error>;

    /// Fill the mandatory fields and flip the completion flag once.
    async fn complete(
        &self,
        user_id: &UserId,
        request: CompleteProfileRequest,
    ) -> Result<Profile, Error>;
}
