use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use hyper::HeaderMap;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::models::{MemberSearchCondition, MemberTeamDto};
use crate::openapi::openapi_json;
use crate::pagination::{Page, PageRequest};
use crate::repository::{MemberRepository, MemberSearch};

const RESOURCE_NAME_PLURAL: &str = "members";

type Searched<T> = Result<Query<T>, QueryRejection>;

fn bound<T>(query: Searched<T>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Search members without paging.
#[utoipa::path(
    get,
    path = "/v1/members",
    params(MemberSearchCondition),
    responses(
        (status = 200, description = "All matching members", body = Vec<MemberTeamDto>),
        (status = 400, description = "Malformed query parameter"),
    ),
    tag = "members"
)]
pub async fn search_member_v1(
    State(db): State<DatabaseConnection>,
    condition: Searched<MemberSearchCondition>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    let condition = bound(condition)?;
    let members = MemberRepository::new(db).search(&condition).await?;
    Ok(Json(members))
}

/// Search members, one page at a time, always counting the total.
#[utoipa::path(
    get,
    path = "/v2/members",
    params(MemberSearchCondition, PageRequest),
    responses(
        (status = 200, description = "One page of matching members", body = Page<MemberTeamDto>),
        (status = 400, description = "Malformed query parameter"),
    ),
    tag = "members"
)]
pub async fn search_member_v2(
    State(db): State<DatabaseConnection>,
    condition: Searched<MemberSearchCondition>,
    Query(page): Query<PageRequest>,
) -> Result<(HeaderMap, Json<Page<MemberTeamDto>>), ApiError> {
    let condition = bound(condition)?;
    let page = MemberRepository::new(db)
        .search_page_simple(&condition, page.pageable())
        .await?;
    Ok((page.content_range(RESOURCE_NAME_PLURAL), Json(page)))
}

/// Search members, one page at a time, counting only when the page does not
/// already determine the total.
#[utoipa::path(
    get,
    path = "/v3/members",
    params(MemberSearchCondition, PageRequest),
    responses(
        (status = 200, description = "One page of matching members", body = Page<MemberTeamDto>),
        (status = 400, description = "Malformed query parameter"),
    ),
    tag = "members"
)]
pub async fn search_member_v3(
    State(db): State<DatabaseConnection>,
    condition: Searched<MemberSearchCondition>,
    Query(page): Query<PageRequest>,
) -> Result<(HeaderMap, Json<Page<MemberTeamDto>>), ApiError> {
    let condition = bound(condition)?;
    let page = MemberRepository::new(db)
        .search_page_complex(&condition, page.pageable())
        .await?;
    Ok((page.content_range(RESOURCE_NAME_PLURAL), Json(page)))
}

/// The three search endpoints and the OpenAPI document, with request tracing.
pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/v1/members", get(search_member_v1))
        .route("/v2/members", get(search_member_v2))
        .route("/v3/members", get(search_member_v3))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}
