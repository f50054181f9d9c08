//! Member directory endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        member::{Member, MemberQuery, UpdateMember},
        pagination::Page,
    },
};

use super::{ApiPath, ApiQuery, AuthenticatedMember, MessageResponse, ValidatedJson};

/// One page of members
#[derive(Serialize, ToSchema)]
pub struct MemberListResponse {
    pub members: Vec<Member>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

impl From<Page<Member>> for MemberListResponse {
    fn from(page: Page<Member>) -> Self {
        Self {
            members: page.items,
            total_pages: page.total_pages,
            current_page: page.current_page,
            total_items: page.total_items,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MemberResponse {
    pub message: String,
    pub member: Member,
}

/// List members with pagination
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    params(MemberQuery),
    responses(
        (status = 200, description = "One page of members", body = MemberListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    ApiQuery(query): ApiQuery<MemberQuery>,
) -> AppResult<Json<MemberListResponse>> {
    let page = state.services.directory.list_members(&query).await?;
    Ok(Json(page.into()))
}

/// Get member details by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Member>> {
    let member = state.services.directory.get_member(id).await?;
    Ok(Json(member))
}

/// Update an existing member (partial, optional new password)
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateMember>,
) -> AppResult<Json<MemberResponse>> {
    let updated = state.services.directory.update_member(id, &changes).await?;
    Ok(Json(MemberResponse {
        message: "Member updated successfully".to_string(),
        member: updated,
    }))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    AuthenticatedMember(_claims): AuthenticatedMember,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.directory.delete_member(id).await?;
    Ok(Json(MessageResponse::new("Member deleted successfully")))
}
