use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use reviewer_types::api::{AddTeamRequest, TeamQuery, TeamResponse};
use reviewer_types::models::NewMember;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn add_team(
    State(state): State<AppState>,
    payload: Result<Json<AddTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let Json(req) = payload?;
    let team_name = req.team_name;
    let members: Vec<NewMember> = req.members.into_iter().map(NewMember::from).collect();

    let team = run_blocking(&state, move |svc| svc.create_team(&team_name, members)).await?;
    Ok((StatusCode::CREATED, Json(team.into())))
}

pub async fn get_team(
    State(state): State<AppState>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamResponse>, ApiError> {
    let Query(query) = query?;
    if query.team_name.is_empty() {
        return Err(ApiError::BadRequest("team_name parameter is required".into()));
    }

    let team = run_blocking(&state, move |svc| svc.get_team(&query.team_name)).await?;
    Ok(Json(team.into()))
}
