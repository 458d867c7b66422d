//! Database row types. These map directly to SQLite rows and are converted
//! into reviewer-types models once the text columns have been parsed.

use chrono::{DateTime, SecondsFormat, Utc};
use reviewer_types::ReviewError;
use reviewer_types::models::{PullRequest, User};
use rusqlite::Row;
use uuid::Uuid;

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub team_name: String,
    pub is_active: bool,
}

impl UserRow {
    pub(crate) const COLUMNS: &'static str = "id, name, team_name, is_active";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            team_name: row.get(2)?,
            is_active: row.get(3)?,
        })
    }

    pub fn into_user(self) -> Result<User, ReviewError> {
        Ok(User {
            id: parse_id(&self.id)?,
            name: self.name,
            team_name: self.team_name,
            is_active: self.is_active,
        })
    }
}

pub struct PullRequestRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub created_at: String,
    pub merged_at: Option<String>,
}

impl PullRequestRow {
    pub(crate) const COLUMNS: &'static str = "id, name, author_id, created_at, merged_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            author_id: row.get(2)?,
            created_at: row.get(3)?,
            merged_at: row.get(4)?,
        })
    }

    pub fn into_pull_request(self) -> Result<PullRequest, ReviewError> {
        Ok(PullRequest {
            id: parse_id(&self.id)?,
            name: self.name,
            author_id: parse_id(&self.author_id)?,
            created_at: parse_timestamp(&self.created_at)?,
            merged_at: self.merged_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ReviewError> {
    raw.parse()
        .map_err(|e| ReviewError::internal(format!("corrupt id '{raw}'"), e))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ReviewError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ReviewError::internal(format!("corrupt timestamp '{raw}'"), e))
}

pub(crate) fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}
