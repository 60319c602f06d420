use axum::Json;
use utoipa::OpenApi;

use crate::models::MemberTeamDto;
use crate::pagination::PageMetadata;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "Member search", description = "Member/team search with optional filters"),
    paths(
        routes::search_member_v1,
        routes::search_member_v2,
        routes::search_member_v3
    ),
    components(schemas(MemberTeamDto, PageMetadata)),
    tags((name = "members", description = "Member search"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
