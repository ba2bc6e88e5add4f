//! Profile onboarding service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CompleteProfileRequest, ProfileCommand, ProfileRepository};
use crate::domain::service_support::map_profile_error;
use crate::domain::{Error, Profile, ProfileCompletion, ProfileValidationError, UserId};

/// Service implementing [`ProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<P> {
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> ProfileService<P> {
    /// Create a service over the profile repository.
    pub fn new(profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }
}

fn validation_error(err: &ProfileValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

fn already_completed() -> Error {
    Error::conflict("profile is already completed")
        .with_details(json!({ "code": "profile_already_completed" }))
}

impl<P> ProfileService<P>
where
    P: ProfileRepository,
{
    async fn load(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.profiles
            .find(user_id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }
}

#[async_trait]
impl<P> ProfileCommand for ProfileService<P>
where
    P: ProfileRepository,
{
    async fn fetch(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.load(user_id).await
    }

    async fn complete(
        &self,
        user_id: &UserId,
        request: CompleteProfileRequest,
    ) -> Result<Profile, Error> {
        let completion = ProfileCompletion::try_from_parts(
            &request.mobile,
            &request.date_of_birth,
            &request.university_roll_number,
            self.clock.utc().date_naive(),
        )
        .map_err(|err| validation_error(&err))?;
        let current = self.load(user_id).await?;
        if current.profile_completed {
            return Err(already_completed());
        }
        let completed = completion.apply_to(current);
        let stored = self
            .profiles
            .complete(&completed)
            .await
            .map_err(map_profile_error)?;
        if !stored {
            return Err(already_completed());
        }
        info!(user_id = %user_id, "profile completed");
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockProfileRepository;
    use crate::test_support::fixture_clock;
    use rstest::rstest;

    fn request(dob: &str) -> CompleteProfileRequest {
        CompleteProfileRequest {
            mobile: "555-0100".to_owned(),
            date_of_birth: dob.to_owned(),
            university_roll_number: "CS-42".to_owned(),
        }
    }

    fn existing(completed: bool) -> MockProfileRepository {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().returning(move |id| {
            Ok(Some(Profile {
                profile_completed: completed,
                ..Profile::empty(*id)
            }))
        });
        profiles
    }

    #[tokio::test]
    async fn completes_once() {
        let mut profiles = existing(false);
        profiles
            .expect_complete()
            .withf(|p| p.profile_completed && p.mobile.as_deref() == Some("555-0100"))
            .times(1)
            .return_once(|_| Ok(true));
        let service = ProfileService::new(Arc::new(profiles), fixture_clock());

        let profile = service
            .complete(&UserId::random(), request("2001-07-04"))
            .await
            .expect("completed");
        assert!(profile.profile_completed);
    }

    #[tokio::test]
    async fn second_completion_is_a_conflict() {
        let service = ProfileService::new(Arc::new(existing(true)), fixture_clock());
        let err = service
            .complete(&UserId::random(), request("2001-07-04"))
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case("2099-01-01", "future_date")]
    #[case("04/07/2001", "invalid_date")]
    #[tokio::test]
    async fn invalid_dates_are_rejected_before_storage(#[case] dob: &str, #[case] code: &str) {
        let service = ProfileService::new(Arc::new(MockProfileRepository::new()), fixture_clock());
        let err = service
            .complete(&UserId::random(), request(dob))
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "dateOfBirth");
        assert_eq!(details["code"], code);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().times(1).return_once(|_| Ok(None));
        let service = ProfileService::new(Arc::new(profiles), fixture_clock());
        let err = service
            .fetch(&UserId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
