//! Profile onboarding endpoints.
//!
//! ```text
//! GET  /api/v1/profile
//! POST /api/v1/profile/complete {"mobile":"555","dateOfBirth":"2000-01-01","universityRollNumber":"R-1"}
//! ```
//!
//! Both endpoints back the complete-profile page, which renders for any
//! signed-in member whatever their completion state.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CompleteProfileRequest;
use crate::domain::{COMPLETE_PROFILE_PATH, Error, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::authorise;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/profile/complete`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteProfileBody {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub university_roll_number: String,
}

impl From<CompleteProfileBody> for CompleteProfileRequest {
    fn from(value: CompleteProfileBody) -> Self {
        Self {
            mobile: value.mobile,
            date_of_birth: value.date_of_birth,
            university_roll_number: value.university_roll_number,
        }
    }
}

/// The caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Profile>> {
    let current = authorise(&state, &session, COMPLETE_PROFILE_PATH).await?;
    let profile = state.profiles.fetch(&current.user_id).await?;
    Ok(web::Json(profile))
}

/// Supply the mandatory fields and lift the completion gate.
#[utoipa::path(
    post,
    path = "/api/v1/profile/complete",
    request_body = CompleteProfileBody,
    responses(
        (status = 200, description = "Profile completed", body = Profile),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Already completed", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["profile"],
    operation_id = "completeProfile"
)]
#[post("/profile/complete")]
pub async fn complete_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CompleteProfileBody>,
) -> ApiResult<web::Json<Profile>> {
    let current = authorise(&state, &session, COMPLETE_PROFILE_PATH).await?;
    let profile = state
        .profiles
        .complete(&current.user_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}
