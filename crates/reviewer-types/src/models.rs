use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Empty when the user does not belong to any team.
    pub team_name: String,
    pub is_active: bool,
}

/// Insert-or-update payload for a user. A missing `id` gets a fresh UUID on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    pub id: Option<Uuid>,
    pub name: String,
    pub team_name: String,
    pub is_active: bool,
}

/// A member listed in a team-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub id: Option<Uuid>,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: Uuid,
    pub name: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Status is never stored; it follows from the merge timestamp.
    pub fn status(&self) -> PullRequestStatus {
        match self.merged_at {
            Some(_) => PullRequestStatus::Merged,
            None => PullRequestStatus::Open,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// A pull request together with its reviewers, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub pull_request: PullRequest,
    pub reviewer_ids: Vec<Uuid>,
}

/// Outcome of swapping one reviewer for another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub assignment: Assignment,
    pub replaced_by: Uuid,
}
