use thiserror::Error;
use uuid::Uuid;

/// Every failure the reviewer engine can report.
///
/// Business-rule variants carry the IDs or reasons involved so callers can
/// branch on the kind without matching on message text. `Conflict` and
/// `Internal` cover the store: the first is a transaction that lost a race and
/// may be retried by the caller, the second is anything else that went wrong.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("team already exists: {name}")]
    TeamAlreadyExists { name: String },

    #[error("team not found: {name}")]
    TeamNotFound { name: String },

    #[error("team name is invalid: {reason}")]
    TeamNameValidation { reason: String },

    #[error("user not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("user name is invalid: {reason}")]
    UserNameValidation { reason: String },

    #[error("duplicate user IDs in request: {}", join_ids(.ids))]
    DuplicateUserIds { ids: Vec<Uuid> },

    #[error("pull request already exists: {id}")]
    PullRequestAlreadyExists { id: Uuid },

    #[error("pull request not found: {id}")]
    PullRequestNotFound { id: Uuid },

    #[error("pull request name is invalid: {reason}")]
    PullRequestNameValidation { reason: String },

    #[error("pull request already merged: {id}")]
    PullRequestAlreadyMerged { id: Uuid },

    #[error("reviewer {reviewer_id} is not assigned to pull request {pull_request_id}")]
    ReviewerNotAssigned { pull_request_id: Uuid, reviewer_id: Uuid },

    #[error("no replacement candidate for reviewer {reviewer_id} on pull request {pull_request_id}")]
    NoReplacementCandidate { pull_request_id: Uuid, reviewer_id: Uuid },

    #[error("transaction conflict during {context}, retry the request")]
    Conflict { context: &'static str },

    #[error("{context}: {source}")]
    Internal {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ReviewError {
    pub fn internal(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Prefix the context of an internal failure with the operation it happened in.
    /// Typed failures pass through untouched.
    pub fn within(self, operation: &str) -> Self {
        match self {
            Self::Internal { context, source } => Self::Internal {
                context: format!("{operation}: {context}"),
                source,
            },
            other => other,
        }
    }

    /// True when repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TeamNameValidation { .. }
                | Self::UserNameValidation { .. }
                | Self::PullRequestNameValidation { .. }
        )
    }
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_only_touches_internal_errors() {
        let err = ReviewError::internal("get user by id", anyhow::anyhow!("disk I/O error"))
            .within("create pull request");
        assert_eq!(
            err.to_string(),
            "create pull request: get user by id: disk I/O error"
        );

        let id = Uuid::nil();
        let err = ReviewError::UserNotFound { id }.within("create pull request");
        assert!(matches!(err, ReviewError::UserNotFound { id: got } if got == id));
    }

    #[test]
    fn duplicate_ids_are_listed() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let err = ReviewError::DuplicateUserIds { ids: vec![a, b] };
        assert_eq!(
            err.to_string(),
            format!("duplicate user IDs in request: {a}, {b}")
        );
    }

    #[test]
    fn only_conflicts_are_retryable() {
        assert!(ReviewError::Conflict { context: "commit transaction" }.is_retryable());
        assert!(!ReviewError::PullRequestNotFound { id: Uuid::nil() }.is_retryable());
    }
}
