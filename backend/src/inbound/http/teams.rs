//! Team endpoints.
//!
//! ```text
//! POST /team/add {"team_name":"backend","members":[...]}
//! GET  /team/get?team_name=backend
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::ports::UpdateTeamRequest;
use crate::domain::{DisplayName, DomainError, TeamMember, TeamName, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    AddTeamRequest, TeamEnvelope, TeamMemberRequest, TeamNameQuery, TeamResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, at_index, missing_field_error, parse_required, require_flag,
};

const TEAM_NAME: FieldName = FieldName::new("team_name");
const MEMBERS: FieldName = FieldName::new("members");
const USER_ID: FieldName = FieldName::new("user_id");
const USERNAME: FieldName = FieldName::new("username");
const IS_ACTIVE: FieldName = FieldName::new("is_active");

fn parse_member(member: TeamMemberRequest) -> Result<TeamMember, DomainError> {
    let TeamMemberRequest {
        user_id,
        username,
        is_active,
    } = member;
    Ok(TeamMember {
        id: parse_required(user_id, USER_ID, UserId::new)?,
        display_name: parse_required(username, USERNAME, DisplayName::new)?,
        is_active: require_flag(is_active, IS_ACTIVE)?,
    })
}

fn parse_add_team(payload: AddTeamRequest) -> Result<UpdateTeamRequest, DomainError> {
    let team_name = parse_required(payload.team_name, TEAM_NAME, TeamName::new)?;
    let members = payload
        .members
        .ok_or_else(|| missing_field_error(MEMBERS))?
        .into_iter()
        .enumerate()
        .map(|(index, member)| parse_member(member).map_err(|err| at_index(err, index)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(UpdateTeamRequest { team_name, members })
}

/// Create a team or upsert members into an existing one.
#[utoipa::path(
    post,
    path = "/team/add",
    request_body = AddTeamRequest,
    responses(
        (status = 201, description = "Team with its full member list", body = TeamEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Concurrent update conflict", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "addTeam"
)]
#[post("/team/add")]
pub async fn add_team(
    state: web::Data<HttpState>,
    payload: web::Json<AddTeamRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_add_team(payload.into_inner())?;
    let roster = state.teams.update_team(request).await?;
    Ok(HttpResponse::Created().json(TeamEnvelope {
        team: TeamResponse::from(&roster),
    }))
}

/// Fetch a team and its members.
#[utoipa::path(
    get,
    path = "/team/get",
    params(("team_name" = String, Query, description = "Team name")),
    responses(
        (status = 200, description = "Team", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Team not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/team/get")]
pub async fn get_team(
    state: web::Data<HttpState>,
    query: web::Query<TeamNameQuery>,
) -> ApiResult<web::Json<TeamResponse>> {
    let name = parse_required(query.into_inner().team_name, TEAM_NAME, TeamName::new)?;
    let roster = state.teams_query.get_team(&name).await?;
    Ok(web::Json(TeamResponse::from(&roster)))
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
