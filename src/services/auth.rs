//! Authentication service: registration, login and bearer tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::member::{Member, MemberClaims, RegisterMember},
    repository::Repository,
};

/// Well-formed hash with default Argon2 parameters that no password matches.
/// Verified against on unknown emails so both login failures cost the same.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new member. Fails with `Duplicate` if the email is taken.
    pub async fn register(&self, request: &RegisterMember) -> AppResult<Member> {
        let hash = self.hash_password(&request.password)?;
        let member = self
            .repository
            .members
            .create(&request.name, &request.email, &hash)
            .await?;

        tracing::info!("Registered member id={}", member.id);
        Ok(member)
    }

    /// Check credentials and issue a signed access token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let invalid = || AppError::Authentication("Invalid credentials".to_string());

        let Some(credentials) = self.repository.members.find_credentials(email).await? else {
            self.verify_password(DUMMY_HASH, password)?;
            tracing::warn!("Login attempt for unknown email");
            return Err(invalid());
        };

        if !self.verify_password(&credentials.password, password)? {
            tracing::warn!("Failed login for member id={}", credentials.id);
            return Err(invalid());
        }

        let token = self.create_token(credentials.id)?;
        tracing::info!("Member id={} logged in", credentials.id);
        Ok(token)
    }

    /// Validate a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> AppResult<MemberClaims> {
        MemberClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }

    /// Lifetime of issued tokens, in seconds
    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token(&self, member_id: i64) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = MemberClaims {
            sub: member_id.to_string(),
            member_id,
            exp: now + self.token_lifetime_secs(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash
    pub fn verify_password(&self, hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
