//! Authentication for the admin surface.
//!
//! Passwords are stored as unsalted SHA-256 hex digests and logins issue a
//! 24-hour HS256 bearer token carrying the admin id as its only claim.
//! Every admin-gated route runs through [`auth_middleware`], which verifies
//! the token and resolves the embedded id to a live admin record.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::db;
use crate::errors::{ErrorResponse, ServiceError};
use crate::models::admin::{Admin, AdminCreate, AdminLogin};

const ADMINS: &str = "admins";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Claim structure for admin bearer tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub admin_id: String,
    pub exp: i64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_validity: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_validity: Duration::hours(24),
        }
    }
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenCreation(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(status, self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Token issuance and verification, plus admin account management.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Database,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Database) -> Self {
        Self { config, db }
    }

    fn admins(&self) -> Collection<Document> {
        self.db.collection(ADMINS)
    }

    pub fn hash_password(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    pub fn issue_token(&self, admin_id: &str) -> Result<String, AuthError> {
        let claims = Claims {
            admin_id: admin_id.to_string(),
            exp: (Utc::now() + self.config.token_validity).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Rejects only on a taken username; anything else is stored as-is.
    pub async fn create_admin(&self, input: AdminCreate) -> Result<Admin, ServiceError> {
        let existing = self
            .admins()
            .find_one(doc! { "username": &input.username }, None)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }

        let admin = Admin::new(input.username, Self::hash_password(&input.password));
        self.admins()
            .insert_one(db::to_document(&admin)?, None)
            .await?;
        Ok(admin)
    }

    pub async fn login(&self, credentials: AdminLogin) -> Result<TokenResponse, AuthError> {
        let digest = Self::hash_password(&credentials.password);
        let found = self
            .admins()
            .find_one(
                doc! { "username": &credentials.username, "password_hash": digest },
                None,
            )
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let admin: Admin =
            db::from_document(found).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(TokenResponse {
            access_token: self.issue_token(&admin.id)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Decodes a bearer token and resolves it to a live admin record; a
    /// token whose admin has since been deleted fails here.
    pub async fn authorize(&self, token: &str) -> Result<Admin, AuthError> {
        let claims = self.decode_token(token)?;
        let found = self
            .admins()
            .find_one(doc! { "id": &claims.admin_id }, None)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::AdminNotFound)?;
        db::from_document(found).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Seeds the default admin account if it does not exist yet. Part of the
    /// open bootstrap endpoint; idempotent.
    pub async fn ensure_default_admin(&self) -> Result<(), ServiceError> {
        let existing = self
            .admins()
            .find_one(doc! { "username": DEFAULT_ADMIN_USERNAME }, None)
            .await?;
        if existing.is_none() {
            let admin = Admin::new(
                DEFAULT_ADMIN_USERNAME.to_string(),
                Self::hash_password(DEFAULT_ADMIN_PASSWORD),
            );
            self.admins()
                .insert_one(db::to_document(&admin)?, None)
                .await?;
        }
        Ok(())
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

/// Layer applied to every admin-gated route.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(err) => return err.into_response(),
    };

    let admin = match auth.authorize(&token).await {
        Ok(admin) => admin,
        Err(err) => return err.into_response(),
    };

    debug!(admin = %admin.username, "authenticated admin request");
    request.extensions_mut().insert(admin);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    const TEST_SECRET: &str = "quickparts_unit_test_secret";

    async fn test_service() -> AuthService {
        // Lazy client; these tests never reach the network.
        let client = Client::with_uri_str("mongodb://127.0.0.1:27017")
            .await
            .expect("client construction is offline");
        AuthService::new(
            AuthConfig::new(TEST_SECRET.to_string()),
            client.database("quickparts_unit_test"),
        )
    }

    #[test]
    fn password_digest_matches_known_vector() {
        assert_eq!(
            AuthService::hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[tokio::test]
    async fn token_round_trip_preserves_admin_id() {
        let service = test_service().await;
        let token = service.issue_token("admin-42").unwrap();
        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.admin_id, "admin-42");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let service = test_service().await;
        let claims = Claims {
            admin_id: "admin-42".to_string(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            service.decode_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let service = test_service().await;
        let claims = Claims {
            admin_id: "admin-42".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();
        assert!(matches!(
            service.decode_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingToken)
        ));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidToken)
        ));

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidToken)
        ));

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
