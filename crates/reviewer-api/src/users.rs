use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use reviewer_types::api::{SetUserActiveRequest, UserQuery, UserResponse, UserReviewsResponse};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn set_is_active(
    State(state): State<AppState>,
    payload: Result<Json<SetUserActiveRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;
    let user = run_blocking(&state, move |svc| {
        svc.set_user_active(req.user_id, req.is_active)
    })
    .await?;
    Ok(Json(user.into()))
}

pub async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserReviewsResponse>, ApiError> {
    let Query(UserQuery { user_id }) = query?;
    let pull_requests = run_blocking(&state, move |svc| svc.get_user_reviews(user_id)).await?;

    Ok(Json(UserReviewsResponse {
        user_id,
        pull_requests: pull_requests.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use reviewer_types::api::{
        ErrorCode, ErrorResponse, PullRequestResponse, TeamResponse, UserResponse,
        UserReviewsResponse,
    };
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::{app, get, json, post, state};

    async fn seed(state: &crate::AppState) -> Vec<Uuid> {
        let body = json!({
            "team_name": "backend",
            "members": [
                { "username": "Alice", "is_active": true },
                { "username": "Bob", "is_active": true }
            ]
        });
        let resp = post(app(state), "/team/add", body).await;
        let team: TeamResponse = json(resp, StatusCode::CREATED).await;
        team.members.into_iter().map(|m| m.user_id).collect()
    }

    #[tokio::test]
    async fn deactivate_user_and_drop_reviews() {
        let state = state();
        let ids = seed(&state).await;
        let pr_id = Uuid::new_v4();
        let body = json!({
            "pull_request_id": pr_id,
            "pull_request_name": "Add caching",
            "author_id": ids[0]
        });
        let resp = post(app(&state), "/pullRequest/create", body).await;
        let pr: PullRequestResponse = json(resp, StatusCode::CREATED).await;
        assert_eq!(pr.assigned_reviewers, vec![ids[1]]);

        let uri = format!("/users/getReview?user_id={}", ids[1]);
        let resp = get(app(&state), &uri).await;
        let reviews: UserReviewsResponse = json(resp, StatusCode::OK).await;
        assert_eq!(reviews.pull_requests[0].pull_request_id, pr_id);

        let body = json!({ "user_id": ids[1], "is_active": false });
        let resp = post(app(&state), "/users/setIsActive", body).await;
        let user: UserResponse = json(resp, StatusCode::OK).await;
        assert!(!user.is_active);
        assert_eq!(user.team_name, "backend");

        let resp = get(app(&state), &uri).await;
        let reviews: UserReviewsResponse = json(resp, StatusCode::OK).await;
        assert!(reviews.pull_requests.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let state = state();
        let body = json!({ "user_id": Uuid::new_v4(), "is_active": true });
        let resp = post(app(&state), "/users/setIsActive", body).await;
        let err: ErrorResponse = json(resp, StatusCode::NOT_FOUND).await;
        assert_eq!(err.error.code, ErrorCode::NotFound);

        let resp = get(app(&state), "/users/getReview?user_id=not-a-uuid").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
