use reviewer_types::ReviewError;
use reviewer_types::models::PullRequest;
use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use super::{is_unique_violation, store_error};
use crate::Tx;
use crate::models::{PullRequestRow, format_timestamp, parse_id};

impl Tx<'_> {
    pub fn create_pull_request(&self, pr: &PullRequest) -> Result<PullRequest, ReviewError> {
        let sql = format!(
            "INSERT INTO pull_requests (id, name, author_id, created_at, merged_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {}",
            PullRequestRow::COLUMNS
        );
        let inserted = self.query_row(
            &sql,
            params![
                pr.id.to_string(),
                pr.name,
                pr.author_id.to_string(),
                format_timestamp(&pr.created_at),
                pr.merged_at.as_ref().map(format_timestamp),
            ],
            PullRequestRow::from_row,
        );

        match inserted {
            Ok(row) => row.into_pull_request(),
            Err(e) if is_unique_violation(&e) => {
                Err(ReviewError::PullRequestAlreadyExists { id: pr.id })
            }
            Err(e) => Err(store_error("create pull request")(e)),
        }
    }

    /// Link every reviewer in `reviewer_ids` to the pull request.
    pub fn create_pull_request_reviewers(
        &self,
        pull_request_id: Uuid,
        reviewer_ids: &[Uuid],
    ) -> Result<(), ReviewError> {
        if reviewer_ids.is_empty() {
            return Ok(());
        }

        let mut stmt = self
            .prepare_cached(
                "INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id) VALUES (?1, ?2)",
            )
            .map_err(store_error("prepare reviewer insert"))?;

        let pr_id = pull_request_id.to_string();
        for reviewer_id in reviewer_ids {
            stmt.execute(params![pr_id, reviewer_id.to_string()])
                .map_err(store_error("insert reviewer"))?;
        }

        Ok(())
    }

    pub fn get_pull_request_by_id(&self, id: Uuid) -> Result<PullRequest, ReviewError> {
        let sql = format!(
            "SELECT {} FROM pull_requests WHERE id = ?1",
            PullRequestRow::COLUMNS
        );
        self.query_row(&sql, [id.to_string()], PullRequestRow::from_row)
            .optional()
            .map_err(store_error("get pull request by id"))?
            .ok_or(ReviewError::PullRequestNotFound { id })?
            .into_pull_request()
    }

    /// Reviewer IDs of a pull request in the order they were linked.
    pub fn get_pull_request_reviewer_ids(
        &self,
        pull_request_id: Uuid,
    ) -> Result<Vec<Uuid>, ReviewError> {
        let mut stmt = self
            .prepare_cached(
                "SELECT reviewer_id FROM pull_request_reviewers
                 WHERE pull_request_id = ?1
                 ORDER BY rowid",
            )
            .map_err(store_error("prepare reviewer ids"))?;

        let raw = stmt
            .query_map([pull_request_id.to_string()], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(store_error("query reviewer ids"))?;

        raw.iter().map(|id| parse_id(id)).collect()
    }

    pub fn update_pull_request(&self, pr: &PullRequest) -> Result<PullRequest, ReviewError> {
        let sql = format!(
            "UPDATE pull_requests SET name = ?2, author_id = ?3, merged_at = ?4
             WHERE id = ?1
             RETURNING {}",
            PullRequestRow::COLUMNS
        );
        self.query_row(
            &sql,
            params![
                pr.id.to_string(),
                pr.name,
                pr.author_id.to_string(),
                pr.merged_at.as_ref().map(format_timestamp),
            ],
            PullRequestRow::from_row,
        )
        .optional()
        .map_err(store_error("update pull request"))?
        .ok_or(ReviewError::PullRequestNotFound { id: pr.id })?
        .into_pull_request()
    }

    /// Drop every review link held by `reviewer_id`. Returns the number removed.
    pub fn delete_pull_request_reviewers_by_reviewer_id(
        &self,
        reviewer_id: Uuid,
    ) -> Result<usize, ReviewError> {
        self.execute(
            "DELETE FROM pull_request_reviewers WHERE reviewer_id = ?1",
            [reviewer_id.to_string()],
        )
        .map_err(store_error("delete reviewers by reviewer id"))
    }

    pub fn delete_pull_request_reviewer(
        &self,
        pull_request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<usize, ReviewError> {
        self.execute(
            "DELETE FROM pull_request_reviewers WHERE pull_request_id = ?1 AND reviewer_id = ?2",
            [pull_request_id.to_string(), reviewer_id.to_string()],
        )
        .map_err(store_error("delete reviewer"))
    }

    /// Pull requests on which `reviewer_id` is currently a reviewer.
    pub fn get_pull_requests_by_reviewer_id(
        &self,
        reviewer_id: Uuid,
    ) -> Result<Vec<PullRequest>, ReviewError> {
        let sql = format!(
            "SELECT {} FROM pull_requests
             WHERE id IN (
                 SELECT pull_request_id FROM pull_request_reviewers WHERE reviewer_id = ?1
             )
             ORDER BY rowid",
            PullRequestRow::COLUMNS
        );
        let mut stmt = self
            .prepare_cached(&sql)
            .map_err(store_error("prepare pull requests by reviewer"))?;

        let rows = stmt
            .query_map([reviewer_id.to_string()], PullRequestRow::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(store_error("query pull requests by reviewer"))?;

        rows.into_iter().map(PullRequestRow::into_pull_request).collect()
    }
}
