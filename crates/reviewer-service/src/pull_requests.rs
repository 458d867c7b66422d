//! Reviewer assignment engine: pull request creation, merge and reviewer
//! reassignment.
//!
//! Selection is positional. Candidates are taken in the order storage returns
//! team members (insertion order), so the first eligible teammates always win
//! and review load is not balanced across the team.

use std::collections::HashSet;

use reviewer_types::ReviewError;
use reviewer_types::models::{Assignment, PullRequest, Reassignment, User};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::Service;
use crate::validation::validate_pull_request_name;

pub const MAX_REVIEWERS: usize = 2;

impl Service {
    /// Create an open pull request and assign up to [`MAX_REVIEWERS`] active
    /// teammates of the author. Fewer (possibly zero) are assigned when the
    /// team is short of eligible members.
    #[instrument(skip_all, fields(%pull_request_id, %author_id))]
    pub fn create_pull_request(
        &self,
        pull_request_id: Uuid,
        name: &str,
        author_id: Uuid,
    ) -> Result<Assignment, ReviewError> {
        validate_pull_request_name(name)?;

        let created_at = self.now();
        let assignment = self
            .db
            .write(|tx| {
                let author = tx.get_user_by_id(author_id)?;
                let team = teammates(&author, |team| tx.get_users_by_team_name(team))?;

                let pull_request = tx.create_pull_request(&PullRequest {
                    id: pull_request_id,
                    name: name.to_string(),
                    author_id,
                    created_at,
                    merged_at: None,
                })?;

                let reviewer_ids = select_reviewers(author_id, &team);
                tx.create_pull_request_reviewers(pull_request_id, &reviewer_ids)?;

                Ok(Assignment {
                    pull_request,
                    reviewer_ids,
                })
            })
            .map_err(|e| e.within("create pull request"))?;

        info!(reviewers = ?assignment.reviewer_ids, "pull request created");
        Ok(assignment)
    }

    /// Mark the pull request merged. Merging twice returns the stored state
    /// without writing anything.
    #[instrument(skip_all, fields(%pull_request_id))]
    pub fn merge_pull_request(&self, pull_request_id: Uuid) -> Result<Assignment, ReviewError> {
        let merged_at = self.now();
        self.db
            .write(|tx| {
                let mut pull_request = tx.get_pull_request_by_id(pull_request_id)?;
                let reviewer_ids = tx.get_pull_request_reviewer_ids(pull_request_id)?;

                if pull_request.is_merged() {
                    info!("pull request already merged");
                    return Ok(Assignment {
                        pull_request,
                        reviewer_ids,
                    });
                }

                pull_request.merged_at = Some(merged_at);
                let pull_request = tx.update_pull_request(&pull_request)?;
                info!("pull request merged");

                Ok(Assignment {
                    pull_request,
                    reviewer_ids,
                })
            })
            .map_err(|e| e.within("merge pull request"))
    }

    /// Replace `old_reviewer_id` on an open pull request with the first
    /// eligible member of the old reviewer's team.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// pull request exists, is not merged, old reviewer exists, old reviewer
    /// is assigned, a replacement exists.
    #[instrument(skip_all, fields(%pull_request_id, %old_reviewer_id))]
    pub fn reassign_reviewer(
        &self,
        pull_request_id: Uuid,
        old_reviewer_id: Uuid,
    ) -> Result<Reassignment, ReviewError> {
        let reassignment = self
            .db
            .write(|tx| {
                let pull_request = tx.get_pull_request_by_id(pull_request_id)?;
                if pull_request.is_merged() {
                    return Err(ReviewError::PullRequestAlreadyMerged {
                        id: pull_request_id,
                    });
                }

                let old_reviewer = tx.get_user_by_id(old_reviewer_id)?;

                let current = tx.get_pull_request_reviewer_ids(pull_request_id)?;
                if !current.contains(&old_reviewer_id) {
                    return Err(ReviewError::ReviewerNotAssigned {
                        pull_request_id,
                        reviewer_id: old_reviewer_id,
                    });
                }

                let team = teammates(&old_reviewer, |team| tx.get_users_by_team_name(team))?;
                let replaced_by = find_replacement(old_reviewer_id, &current, &team).ok_or(
                    ReviewError::NoReplacementCandidate {
                        pull_request_id,
                        reviewer_id: old_reviewer_id,
                    },
                )?;

                tx.delete_pull_request_reviewer(pull_request_id, old_reviewer_id)?;
                tx.create_pull_request_reviewers(pull_request_id, &[replaced_by])?;

                Ok(Reassignment {
                    assignment: Assignment {
                        pull_request,
                        reviewer_ids: replace_reviewer(&current, old_reviewer_id, replaced_by),
                    },
                    replaced_by,
                })
            })
            .map_err(|e| e.within("reassign reviewer"))?;

        info!(replaced_by = %reassignment.replaced_by, "reviewer reassigned");
        Ok(reassignment)
    }
}

// A user without a team has no teammates; the empty team name is not a team.
fn teammates<F>(user: &User, load: F) -> Result<Vec<User>, ReviewError>
where
    F: FnOnce(&str) -> Result<Vec<User>, ReviewError>,
{
    if user.team_name.is_empty() {
        return Ok(Vec::new());
    }
    load(&user.team_name)
}

/// First [`MAX_REVIEWERS`] active team members other than the author, in order.
pub fn select_reviewers(author_id: Uuid, team: &[User]) -> Vec<Uuid> {
    team.iter()
        .filter(|u| u.id != author_id && u.is_active)
        .map(|u| u.id)
        .take(MAX_REVIEWERS)
        .collect()
}

/// First active team member who is neither the reviewer being replaced nor
/// already reviewing. The pull request author is not excluded here; authors
/// never enter a reviewer set at creation.
pub fn find_replacement(old_reviewer_id: Uuid, current: &[Uuid], team: &[User]) -> Option<Uuid> {
    let current: HashSet<_> = current.iter().copied().collect();
    team.iter()
        .find(|u| u.id != old_reviewer_id && u.is_active && !current.contains(&u.id))
        .map(|u| u.id)
}

/// Drop `old` from the list and append `new` at the end.
pub fn replace_reviewer(current: &[Uuid], old: Uuid, new: Uuid) -> Vec<Uuid> {
    current
        .iter()
        .copied()
        .filter(|id| *id != old)
        .chain(std::iter::once(new))
        .collect()
}
