use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::database::{DocumentStore, Query};
use crate::models::{User, UserInfo, USERS_PARTITION};
use crate::utils::AppError;

const TOKEN_TTL_HOURS: i64 = 24;
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,           // user id
    pub email: String,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

// Request/Response structures
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Email and password, both present and non-blank.
fn credentials(
    email: &Option<String>,
    password: &Option<String>,
) -> Result<(String, String), AppError> {
    let email = email.as_deref().map(normalize_email).unwrap_or_default();
    let password = password.clone().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidRequest(
            "email and password are required".to_string(),
        ));
    }
    Ok((email, password))
}

// Generate JWT token
pub fn generate_jwt(user: &User, jwt: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: jwt.audience.clone(),
        iss: jwt.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[jwt.audience.as_str()]);

    let mut issuers = HashSet::new();
    issuers.insert(jwt.issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

async fn find_by_email(
    users: &dyn DocumentStore<User>,
    email: &str,
) -> Result<Option<User>, AppError> {
    let query = Query::new()
        .field_eq("pk", USERS_PARTITION)
        .field_eq("email", email);

    Ok(users.query(&query).await?.into_iter().next())
}

// User login
pub async fn login(
    users: &dyn DocumentStore<User>,
    jwt: &JwtConfig,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let (email, password) = credentials(&request.email, &request.password)?;

    let user = find_by_email(users, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    // A malformed stored hash counts as a mismatch
    let valid = verify(&password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(AuthResponse {
        message: "Logged in".to_string(),
        token: generate_jwt(&user, jwt)?,
        user: UserInfo::from(&user),
    })
}

// User registration
pub async fn register(
    users: &dyn DocumentStore<User>,
    jwt: &JwtConfig,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let (email, password) = credentials(&request.email, &request.password)?;

    if find_by_email(users, &email).await?.is_some() {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    let password_hash = hash(&password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4().simple().to_string(),
        pk: USERS_PARTITION.to_string(),
        email,
        password_hash,
        name: request
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    };

    users.create(&user).await?;

    Ok(AuthResponse {
        message: "Registered".to_string(),
        token: generate_jwt(&user, jwt)?,
        user: UserInfo::from(&user),
    })
}
