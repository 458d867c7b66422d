use reviewer_db::Tx;
use reviewer_types::ReviewError;
use reviewer_types::models::{NewMember, Team, UserUpsert};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::Service;
use crate::validation::{check_duplicate_user_ids, validate_team_name, validate_user_name};

impl Service {
    /// Create a team and upsert its members into it.
    ///
    /// Names and IDs are validated before any transaction opens. Existing
    /// users listed as members move to the new team; any of them switched
    /// from active to inactive lose their review links, as with
    /// [`Service::set_user_active`].
    #[instrument(skip_all, fields(team_name = %name, members = members.len()))]
    pub fn create_team(&self, name: &str, members: Vec<NewMember>) -> Result<Team, ReviewError> {
        validate_team_name(name)?;
        for member in &members {
            validate_user_name(&member.name)?;
        }
        check_duplicate_user_ids(&members)?;

        let upserts: Vec<UserUpsert> = members
            .into_iter()
            .map(|m| UserUpsert {
                id: m.id,
                name: m.name,
                team_name: name.to_string(),
                is_active: m.is_active,
            })
            .collect();

        let team = self
            .db
            .write(|tx| {
                let mut team = tx.create_team(name)?;
                let deactivated = newly_deactivated(tx, &upserts)?;
                team.members = tx.create_or_update_users(&upserts)?;

                for user_id in deactivated {
                    let removed = tx.delete_pull_request_reviewers_by_reviewer_id(user_id)?;
                    info!(%user_id, removed, "reviewer links removed");
                }

                Ok(team)
            })
            .map_err(|e| e.within("create team"))?;

        info!("team created");
        Ok(team)
    }

    #[instrument(skip_all, fields(team_name = %name))]
    pub fn get_team(&self, name: &str) -> Result<Team, ReviewError> {
        self.db
            .read(|tx| {
                if !tx.is_team_exists(name)? {
                    return Err(ReviewError::TeamNotFound {
                        name: name.to_string(),
                    });
                }

                Ok(Team {
                    name: name.to_string(),
                    members: tx.get_users_by_team_name(name)?,
                })
            })
            .map_err(|e| e.within("get team"))
    }
}

// Existing users the upsert is about to flip from active to inactive.
fn newly_deactivated(tx: &Tx<'_>, upserts: &[UserUpsert]) -> Result<Vec<Uuid>, ReviewError> {
    let mut ids = Vec::new();
    for id in upserts.iter().filter(|u| !u.is_active).filter_map(|u| u.id) {
        if tx.is_user_exists(id)? && tx.get_user_by_id(id)?.is_active {
            ids.push(id);
        }
    }
    Ok(ids)
}
