use reviewer_types::ReviewError;
use reviewer_types::models::{User, UserUpsert};
use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use super::store_error;
use crate::Tx;
use crate::models::UserRow;

impl Tx<'_> {
    /// Insert or update each user by ID, generating an ID where none is given.
    /// Returns the stored users in input order.
    pub fn create_or_update_users(&self, users: &[UserUpsert]) -> Result<Vec<User>, ReviewError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "INSERT INTO users (id, name, team_name, is_active) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                 name = excluded.name,
                 team_name = excluded.team_name,
                 is_active = excluded.is_active
             RETURNING {}",
            UserRow::COLUMNS
        );
        let mut stmt = self
            .prepare_cached(&sql)
            .map_err(store_error("prepare user upsert"))?;

        let mut stored = Vec::with_capacity(users.len());
        for user in users {
            let id = user.id.unwrap_or_else(Uuid::new_v4);
            let row = stmt
                .query_row(
                    params![id.to_string(), user.name, user.team_name, user.is_active],
                    UserRow::from_row,
                )
                .map_err(store_error("upsert user"))?;
            stored.push(row.into_user()?);
        }

        Ok(stored)
    }

    /// Members of `team_name` in storage order.
    pub fn get_users_by_team_name(&self, team_name: &str) -> Result<Vec<User>, ReviewError> {
        let sql = format!(
            "SELECT {} FROM users WHERE team_name = ?1 ORDER BY rowid",
            UserRow::COLUMNS
        );
        let mut stmt = self
            .prepare_cached(&sql)
            .map_err(store_error("prepare users by team"))?;

        let rows = stmt
            .query_map([team_name], UserRow::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(store_error("query users by team"))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<User, ReviewError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", UserRow::COLUMNS);
        self.query_row(&sql, [id.to_string()], UserRow::from_row)
            .optional()
            .map_err(store_error("get user by id"))?
            .ok_or(ReviewError::UserNotFound { id })?
            .into_user()
    }

    pub fn is_user_exists(&self, id: Uuid) -> Result<bool, ReviewError> {
        self.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            [id.to_string()],
            |row| row.get(0),
        )
        .map_err(store_error("check user exists"))
    }

    pub fn update_user(&self, user: &User) -> Result<User, ReviewError> {
        let sql = format!(
            "UPDATE users SET name = ?2, team_name = ?3, is_active = ?4
             WHERE id = ?1
             RETURNING {}",
            UserRow::COLUMNS
        );
        self.query_row(
            &sql,
            params![user.id.to_string(), user.name, user.team_name, user.is_active],
            UserRow::from_row,
        )
        .optional()
        .map_err(store_error("update user"))?
        .ok_or(ReviewError::UserNotFound { id: user.id })?
        .into_user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn upsert(id: Option<Uuid>, name: &str, team: &str, active: bool) -> UserUpsert {
        UserUpsert {
            id,
            name: name.to_string(),
            team_name: team.to_string(),
            is_active: active,
        }
    }

    #[test]
    fn upsert_generates_missing_ids_and_updates_existing() {
        let db = Database::open_in_memory().unwrap();
        let alice = Uuid::new_v4();

        let first = db
            .write(|tx| {
                tx.create_or_update_users(&[
                    upsert(Some(alice), "Alice", "backend", true),
                    upsert(None, "Bob", "backend", true),
                ])
            })
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, alice);
        assert_ne!(first[1].id, Uuid::nil());

        let updated = db
            .write(|tx| tx.create_or_update_users(&[upsert(Some(alice), "Alicia", "frontend", false)]))
            .unwrap();
        assert_eq!(updated[0].name, "Alicia");
        assert_eq!(updated[0].team_name, "frontend");
        assert!(!updated[0].is_active);

        let backend = db.read(|tx| tx.get_users_by_team_name("backend")).unwrap();
        assert_eq!(backend.len(), 1);
        assert_eq!(backend[0].name, "Bob");
    }

    #[test]
    fn team_members_come_back_in_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        let names = ["Dave", "Alice", "Carol", "Bob"];
        let input: Vec<_> = names
            .iter()
            .map(|n| upsert(None, n, "backend", true))
            .collect();
        db.write(|tx| tx.create_or_update_users(&input)).unwrap();

        let members = db.read(|tx| tx.get_users_by_team_name("backend")).unwrap();
        let got: Vec<_> = members.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn missing_user_is_typed_not_found() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        let err = db.read(|tx| tx.get_user_by_id(id)).unwrap_err();
        assert!(matches!(err, ReviewError::UserNotFound { id: got } if got == id));
        assert!(!db.read(|tx| tx.is_user_exists(id)).unwrap());

        let ghost = User {
            id,
            name: "Ghost".into(),
            team_name: String::new(),
            is_active: true,
        };
        let err = db.write(|tx| tx.update_user(&ghost)).unwrap_err();
        assert!(matches!(err, ReviewError::UserNotFound { .. }));
    }

    #[test]
    fn update_user_flips_active_flag() {
        let db = Database::open_in_memory().unwrap();
        let mut user = db
            .write(|tx| tx.create_or_update_users(&[upsert(None, "Alice", "backend", true)]))
            .unwrap()
            .remove(0);

        user.is_active = false;
        let stored = db.write(|tx| tx.update_user(&user)).unwrap();
        assert!(!stored.is_active);
        assert_eq!(db.read(|tx| tx.get_user_by_id(user.id)).unwrap(), stored);
    }
}
