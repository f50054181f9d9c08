//! Members repository (the credential store)

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{Member, MemberCredentials, UpdateMember},
        pagination::PageRequest,
    },
};

/// Public columns; `password` is only ever read by `find_credentials`
const COLUMNS: &str = "id, name, email, created_at";

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(&format!("SELECT {COLUMNS} FROM members WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Look up the stored password hash for an email
    pub async fn find_credentials(&self, email: &str) -> AppResult<Option<MemberCredentials>> {
        let credentials = sqlx::query_as::<_, MemberCredentials>(
            "SELECT id, password FROM members WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// List members with pagination, ordered by id
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<Member>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        let members = sqlx::query_as::<_, Member>(&format!(
            "SELECT {COLUMNS} FROM members ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((members, total))
    }

    /// Insert a new member with an already hashed password.
    /// The `UNIQUE` constraint on `email` rejects duplicates.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(&format!(
            "INSERT INTO members (name, email, password, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, || "Email already registered".to_string()))
    }

    /// Overwrite only the supplied fields. `password_hash` replaces the stored
    /// hash when given; the raw password in `member` is never written.
    ///
    /// Email collisions are not checked here and surface as a raw store error.
    pub async fn update(
        &self,
        id: i64,
        member: &UpdateMember,
        password_hash: Option<String>,
    ) -> AppResult<Member> {
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $name:literal) => {
                if $field.is_some() {
                    sets.push(concat!($name, " = ?"));
                }
            };
        }

        add_field!(member.name, "name");
        add_field!(member.email, "email");
        add_field!(password_hash, "password");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE members SET {} WHERE id = ? RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Member>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(member.name);
        bind_field!(member.email);
        bind_field!(password_hash);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Delete a member permanently
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }
        Ok(())
    }
}
