use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE teams (
                name        TEXT PRIMARY KEY
            );

            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                team_name   TEXT NOT NULL DEFAULT '',
                is_active   INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX idx_users_team ON users(team_name);

            CREATE TABLE pull_requests (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                author_id   TEXT NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL,
                merged_at   TEXT
            );

            CREATE TABLE pull_request_reviewers (
                pull_request_id TEXT NOT NULL REFERENCES pull_requests(id),
                reviewer_id     TEXT NOT NULL REFERENCES users(id),
                PRIMARY KEY (pull_request_id, reviewer_id)
            );

            CREATE INDEX idx_reviewers_reviewer ON pull_request_reviewers(reviewer_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
