use reviewer_types::ReviewError;
use reviewer_types::models::{PullRequest, User};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::Service;

impl Service {
    /// Toggle a user's active flag. Deactivation also drops every review
    /// link the user holds; turning the user back on does not restore them.
    #[instrument(skip_all, fields(%user_id, is_active))]
    pub fn set_user_active(&self, user_id: Uuid, is_active: bool) -> Result<User, ReviewError> {
        self.db
            .write(|tx| {
                let mut user = tx.get_user_by_id(user_id)?;
                user.is_active = is_active;
                let user = tx.update_user(&user)?;

                if !is_active {
                    let removed = tx.delete_pull_request_reviewers_by_reviewer_id(user_id)?;
                    info!(removed, "reviewer links removed");
                }

                Ok(user)
            })
            .map_err(|e| e.within("set user active"))
    }

    /// Pull requests the user is currently reviewing.
    #[instrument(skip_all, fields(%user_id))]
    pub fn get_user_reviews(&self, user_id: Uuid) -> Result<Vec<PullRequest>, ReviewError> {
        self.db
            .read(|tx| {
                if !tx.is_user_exists(user_id)? {
                    return Err(ReviewError::UserNotFound { id: user_id });
                }
                tx.get_pull_requests_by_reviewer_id(user_id)
            })
            .map_err(|e| e.within("get user reviews"))
    }
}
