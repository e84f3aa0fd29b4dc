//! User endpoints: activity toggle and review listing.

use actix_web::{get, post, web};

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    PullRequestShortResponse, SetActiveRequest, UserEnvelope, UserIdQuery, UserResponse,
    UserReviewsResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_required, require_flag};

const USER_ID: FieldName = FieldName::new("user_id");
const IS_ACTIVE: FieldName = FieldName::new("is_active");

/// Toggle whether a user may be picked as a reviewer.
///
/// Existing assignments are left alone.
#[utoipa::path(
    post,
    path = "/users/setIsActive",
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setUserActive"
)]
#[post("/users/setIsActive")]
pub async fn set_is_active(
    state: web::Data<HttpState>,
    payload: web::Json<SetActiveRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let SetActiveRequest { user_id, is_active } = payload.into_inner();
    let user_id = parse_required(user_id, USER_ID, UserId::new)?;
    let is_active = require_flag(is_active, IS_ACTIVE)?;
    let user = state.users.set_user_active(&user_id, is_active).await?;
    Ok(web::Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// List pull requests on which the user currently holds a reviewer slot.
///
/// Unknown users get an empty list.
#[utoipa::path(
    get,
    path = "/users/getReview",
    params(("user_id" = String, Query, description = "Reviewer identifier")),
    responses(
        (status = 200, description = "Assigned pull requests", body = UserReviewsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserReviews"
)]
#[get("/users/getReview")]
pub async fn get_review(
    state: web::Data<HttpState>,
    query: web::Query<UserIdQuery>,
) -> ApiResult<web::Json<UserReviewsResponse>> {
    let user_id = parse_required(query.into_inner().user_id, USER_ID, UserId::new)?;
    let pull_requests = state.reviews.list_reviews(&user_id).await?;
    Ok(web::Json(UserReviewsResponse {
        user_id: user_id.to_string(),
        pull_requests: pull_requests
            .iter()
            .map(PullRequestShortResponse::from)
            .collect(),
    }))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
