use std::collections::HashSet;

use reviewer_types::ReviewError;
use reviewer_types::models::NewMember;
use uuid::Uuid;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const PULL_REQUEST_NAME_MIN_LEN: usize = 2;
pub const PULL_REQUEST_NAME_MAX_LEN: usize = 100;

pub fn validate_team_name(name: &str) -> Result<(), ReviewError> {
    check_letters_name("team name", name).map_err(|reason| ReviewError::TeamNameValidation { reason })
}

pub fn validate_user_name(name: &str) -> Result<(), ReviewError> {
    check_letters_name("user name", name).map_err(|reason| ReviewError::UserNameValidation { reason })
}

pub fn validate_pull_request_name(name: &str) -> Result<(), ReviewError> {
    let len = name.chars().count();
    let reason = if len < PULL_REQUEST_NAME_MIN_LEN {
        format!("pull request name must contain at least {PULL_REQUEST_NAME_MIN_LEN} characters")
    } else if len > PULL_REQUEST_NAME_MAX_LEN {
        format!("pull request name must contain at most {PULL_REQUEST_NAME_MAX_LEN} characters")
    } else {
        return Ok(());
    };
    Err(ReviewError::PullRequestNameValidation { reason })
}

/// Report every ID that appears more than once, each listed once in
/// first-seen order. Members without an ID never collide.
pub fn check_duplicate_user_ids(members: &[NewMember]) -> Result<(), ReviewError> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut ids: Vec<Uuid> = Vec::new();

    for id in members.iter().filter_map(|m| m.id) {
        if !seen.insert(id) && reported.insert(id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        Ok(())
    } else {
        Err(ReviewError::DuplicateUserIds { ids })
    }
}

// Team and user names: 2-50 ASCII letters.
fn check_letters_name(kind: &str, name: &str) -> Result<(), String> {
    if name.len() < NAME_MIN_LEN {
        return Err(format!("{kind} must contain at least {NAME_MIN_LEN} characters"));
    }
    if name.len() > NAME_MAX_LEN {
        return Err(format!("{kind} must contain at most {NAME_MAX_LEN} characters"));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("{kind} '{name}' must contain only english letters"));
    }
    Ok(())
}
