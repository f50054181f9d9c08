//! Member directory service

use crate::{
    error::AppResult,
    models::{
        member::{Member, MemberQuery, UpdateMember},
        pagination::{Page, PageRequest},
    },
    repository::Repository,
};

use super::auth::AuthService;

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
    auth: AuthService,
    per_page: i64,
}

impl DirectoryService {
    pub fn new(repository: Repository, auth: AuthService, per_page: i64) -> Self {
        Self {
            repository,
            auth,
            per_page,
        }
    }

    /// List one page of members
    pub async fn list_members(&self, query: &MemberQuery) -> AppResult<Page<Member>> {
        let request = PageRequest::parse(query.page.as_deref(), self.per_page);
        let (members, total) = self.repository.members.list(request).await?;
        Ok(Page::new(members, total, request))
    }

    /// Get member by ID
    pub async fn get_member(&self, id: i64) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Apply a partial update, re-hashing a supplied password.
    /// Email uniqueness against other members is left to the store constraint.
    pub async fn update_member(&self, id: i64, changes: &UpdateMember) -> AppResult<Member> {
        let password = match changes.password {
            Some(ref password) => Some(self.auth.hash_password(password)?),
            None => None,
        };

        self.repository.members.update(id, changes, password).await
    }

    /// Remove a member permanently
    pub async fn delete_member(&self, id: i64) -> AppResult<()> {
        self.repository.members.delete(id).await?;
        tracing::info!("Deleted member id={}", id);
        Ok(())
    }
}
