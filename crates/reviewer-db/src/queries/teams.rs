use reviewer_types::ReviewError;
use reviewer_types::models::Team;

use super::{is_unique_violation, store_error};
use crate::Tx;

impl Tx<'_> {
    /// Insert a team row. The returned team has no members yet.
    pub fn create_team(&self, name: &str) -> Result<Team, ReviewError> {
        match self.execute("INSERT INTO teams (name) VALUES (?1)", [name]) {
            Ok(_) => Ok(Team {
                name: name.to_string(),
                members: Vec::new(),
            }),
            Err(e) if is_unique_violation(&e) => Err(ReviewError::TeamAlreadyExists {
                name: name.to_string(),
            }),
            Err(e) => Err(store_error("create team")(e)),
        }
    }

    pub fn is_team_exists(&self, name: &str) -> Result<bool, ReviewError> {
        self.query_row(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE name = ?1)",
            [name],
            |row| row.get(0),
        )
        .map_err(store_error("check team exists"))
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use reviewer_types::ReviewError;

    #[test]
    fn duplicate_team_name_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.write(|tx| tx.create_team("backend").map(|_| ())).unwrap();

        let err = db.write(|tx| tx.create_team("backend")).unwrap_err();
        assert!(matches!(err, ReviewError::TeamAlreadyExists { name } if name == "backend"));
    }

    #[test]
    fn missing_team_does_not_exist() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.read(|tx| tx.is_team_exists("ghosts")).unwrap());
    }
}
