use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use reviewer_types::api::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse,
    ReassignReviewerRequest, ReassignReviewerResponse,
};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestResponse>), ApiError> {
    let Json(req) = payload?;
    let assignment = run_blocking(&state, move |svc| {
        svc.create_pull_request(req.pull_request_id, &req.pull_request_name, req.author_id)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

pub async fn merge(
    State(state): State<AppState>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> Result<Json<PullRequestResponse>, ApiError> {
    let Json(req) = payload?;
    let assignment =
        run_blocking(&state, move |svc| svc.merge_pull_request(req.pull_request_id)).await?;
    Ok(Json(assignment.into()))
}

pub async fn reassign(
    State(state): State<AppState>,
    payload: Result<Json<ReassignReviewerRequest>, JsonRejection>,
) -> Result<Json<ReassignReviewerResponse>, ApiError> {
    let Json(req) = payload?;
    let reassignment = run_blocking(&state, move |svc| {
        svc.reassign_reviewer(req.pull_request_id, req.old_user_id)
    })
    .await?;
    Ok(Json(reassignment.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use reviewer_types::api::{
        ErrorCode, ErrorResponse, PullRequestResponse, ReassignReviewerResponse, TeamResponse,
    };
    use reviewer_types::models::PullRequestStatus;
    use serde_json::json;
    use uuid::Uuid;

    use crate::AppState;
    use crate::test_support::{app, json, post, state};

    /// Seeds Bob, Carol, Dave, then the author Alice, and opens one pull
    /// request authored by Alice.
    async fn seed_open_pull_request(state: &AppState) -> (Uuid, Vec<Uuid>) {
        let body = json!({
            "team_name": "backend",
            "members": [
                { "username": "Bob", "is_active": true },
                { "username": "Carol", "is_active": true },
                { "username": "Dave", "is_active": true },
                { "username": "Alice", "is_active": true }
            ]
        });
        let resp = post(app(state), "/team/add", body).await;
        let team: TeamResponse = json(resp, StatusCode::CREATED).await;
        let ids: Vec<Uuid> = team.members.into_iter().map(|m| m.user_id).collect();

        let pr_id = Uuid::new_v4();
        let body = json!({
            "pull_request_id": pr_id,
            "pull_request_name": "Add caching",
            "author_id": ids[3]
        });
        let resp = post(app(state), "/pullRequest/create", body).await;
        let pr: PullRequestResponse = json(resp, StatusCode::CREATED).await;
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert_eq!(pr.assigned_reviewers, vec![ids[0], ids[1]]);
        assert!(pr.merged_at.is_none());

        (pr_id, ids)
    }

    #[tokio::test]
    async fn create_reassign_merge_flow() {
        let state = state();
        let (pr_id, ids) = seed_open_pull_request(&state).await;

        let body = json!({ "pull_request_id": pr_id, "old_user_id": ids[0] });
        let resp = post(app(&state), "/pullRequest/reassign", body).await;
        let swapped: ReassignReviewerResponse = json(resp, StatusCode::OK).await;
        assert_eq!(swapped.replaced_by, ids[2]);
        assert_eq!(swapped.pr.assigned_reviewers, vec![ids[1], ids[2]]);

        let body = json!({ "pull_request_id": pr_id });
        let resp = post(app(&state), "/pullRequest/merge", body.clone()).await;
        let merged: PullRequestResponse = json(resp, StatusCode::OK).await;
        assert_eq!(merged.status, PullRequestStatus::Merged);
        let merged_at = merged.merged_at.unwrap();

        let resp = post(app(&state), "/pullRequest/merge", body).await;
        let again: PullRequestResponse = json(resp, StatusCode::OK).await;
        assert_eq!(again.merged_at, Some(merged_at));

        let body = json!({ "pull_request_id": pr_id, "old_user_id": ids[1] });
        let resp = post(app(&state), "/pullRequest/reassign", body).await;
        let err: ErrorResponse = json(resp, StatusCode::CONFLICT).await;
        assert_eq!(err.error.code, ErrorCode::PrMerged);
    }

    #[tokio::test]
    async fn duplicate_pull_request_is_conflict() {
        let state = state();
        let (pr_id, ids) = seed_open_pull_request(&state).await;

        let body = json!({
            "pull_request_id": pr_id,
            "pull_request_name": "Add caching again",
            "author_id": ids[3]
        });
        let resp = post(app(&state), "/pullRequest/create", body).await;
        let err: ErrorResponse = json(resp, StatusCode::CONFLICT).await;
        assert_eq!(err.error.code, ErrorCode::PrExists);
    }

    #[tokio::test]
    async fn reassigning_a_non_reviewer_is_rejected() {
        let state = state();
        let (pr_id, ids) = seed_open_pull_request(&state).await;

        let body = json!({ "pull_request_id": pr_id, "old_user_id": ids[2] });
        let resp = post(app(&state), "/pullRequest/reassign", body).await;
        let err: ErrorResponse = json(resp, StatusCode::CONFLICT).await;
        assert_eq!(err.error.code, ErrorCode::NotAssigned);

        let body = json!({ "pull_request_id": Uuid::new_v4(), "old_user_id": ids[0] });
        let resp = post(app(&state), "/pullRequest/reassign", body).await;
        let err: ErrorResponse = json(resp, StatusCode::NOT_FOUND).await;
        assert_eq!(err.error.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn invalid_pull_request_name_is_bad_request() {
        let state = state();
        let (_, ids) = seed_open_pull_request(&state).await;

        let body = json!({
            "pull_request_id": Uuid::new_v4(),
            "pull_request_name": "x",
            "author_id": ids[3]
        });
        let resp = post(app(&state), "/pullRequest/create", body).await;
        let err: ErrorResponse = json(resp, StatusCode::BAD_REQUEST).await;
        assert_eq!(err.error.code, ErrorCode::BadRequest);
    }
}
