use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Assignment, NewMember, PullRequest, PullRequestStatus, Reassignment, Team, User,
};

// -- Teams --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTeamRequest {
    pub team_name: String,
    pub members: Vec<TeamMemberRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamMemberRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub username: String,
    pub is_active: bool,
}

impl From<TeamMemberRequest> for NewMember {
    fn from(m: TeamMemberRequest) -> Self {
        Self {
            id: m.user_id,
            name: m.username,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team_name: String,
    pub members: Vec<TeamMemberResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMemberResponse {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team
                .members
                .into_iter()
                .map(|u| TeamMemberResponse {
                    user_id: u.id,
                    username: u.name,
                    is_active: u.is_active,
                })
                .collect(),
        }
    }
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetUserActiveRequest {
    pub user_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.name,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserReviewsResponse {
    pub user_id: Uuid,
    pub pull_requests: Vec<PullRequestShort>,
}

// -- Pull requests --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergePullRequestRequest {
    pub pull_request_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReassignReviewerRequest {
    pub pull_request_id: Uuid,
    pub old_user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<Assignment> for PullRequestResponse {
    fn from(a: Assignment) -> Self {
        let status = a.pull_request.status();
        Self {
            pull_request_id: a.pull_request.id,
            pull_request_name: a.pull_request.name,
            author_id: a.pull_request.author_id,
            status,
            assigned_reviewers: a.reviewer_ids,
            created_at: a.pull_request.created_at,
            merged_at: a.pull_request.merged_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignReviewerResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: Uuid,
}

impl From<Reassignment> for ReassignReviewerResponse {
    fn from(r: Reassignment) -> Self {
        Self {
            pr: r.assignment.into(),
            replaced_by: r.replaced_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestShort {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: PullRequestStatus,
}

impl From<PullRequest> for PullRequestShort {
    fn from(pr: PullRequest) -> Self {
        let status = pr.status();
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status,
        }
    }
}

// -- Errors --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TeamExists,
    PrExists,
    PrMerged,
    NotAssigned,
    NoCandidate,
    NotFound,
    BadRequest,
    DuplicateUserId,
    Conflict,
    InternalError,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}
