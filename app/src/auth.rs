//! Password authentication and session login

use std::collections::HashMap;

use chrono::Utc;
use kit::{FrameworkError, Request, SessionStore};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::models::users;

/// Session key holding the logged-in user's id
pub const SESSION_USER_KEY: &str = "user_id";

/// The authenticated user, stored in the request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

pub fn hash_password(password: &str) -> Result<String, FrameworkError> {
    bcrypt::hash(password, AuthConfig::current().hash_cost)
        .map_err(|e| FrameworkError::internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create an active user with a hashed password
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    is_superuser: bool,
) -> Result<users::Model, FrameworkError> {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(hash_password(password)?),
        is_superuser: Set(is_superuser),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    tracing::debug!(user = %user.username, superuser = is_superuser, "User created");
    Ok(user)
}

/// The active user matching the credentials
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<users::Model>, DbErr> {
    Ok(users::Entity::find_by_username(db, username)
        .await?
        .filter(|user| user.is_active && verify_password(password, &user.password)))
}

/// Start a session for `user`, returning the `Set-Cookie` value
pub fn login(sessions: &SessionStore, user: &users::Model) -> String {
    let mut values = HashMap::new();
    values.insert(SESSION_USER_KEY.to_string(), Value::from(user.id));
    let token = sessions.create(values);
    tracing::info!(user = %user.username, "User logged in");
    sessions.cookie(&token)
}

/// End the request's session, returning the `Set-Cookie` value clearing it
pub fn logout(sessions: &SessionStore, request: &Request) -> String {
    if let Some(token) = sessions.token(request) {
        sessions.destroy(&token);
    }
    sessions.expired_cookie()
}

/// User id stored in the request's session
pub fn session_user_id(sessions: &SessionStore, request: &Request) -> Option<i64> {
    let token = sessions.token(request)?;
    sessions.get(&token, SESSION_USER_KEY)?.as_i64()
}

pub fn current_user(request: &Request) -> Option<users::Model> {
    request.extension::<CurrentUser>().map(|current| current.0)
}

/// The logged-in user, or a 403
pub fn require_user(request: &Request) -> Result<users::Model, FrameworkError> {
    current_user(request).ok_or(FrameworkError::Unauthorized)
}

/// Session store shared through the router state
pub fn sessions(request: &Request) -> Result<SessionStore, FrameworkError> {
    request
        .extension::<SessionStore>()
        .ok_or_else(|| FrameworkError::internal("no session store registered on the router"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_only_the_hashed_password() {
        let hash = bcrypt::hash("secret", 4).unwrap();
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("secret", "not a hash"));
    }
}
