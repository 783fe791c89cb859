use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser},
        jwt::{AuthUser, JwtKeys, SessionUser},
    },
    error::{AppError, AppResult, FieldErrors},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Simulated login: any plausible name/email pair is accepted and gets a
/// fresh user id. The email, normalized here, is what reservations are
/// keyed by across sessions.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    let mut errors = FieldErrors::new();
    if payload.name.is_empty() {
        errors.insert("name", "Name is required".into());
    } else if payload.name.chars().count() < 2 {
        errors.insert("name", "Name must be at least 2 characters".into());
    }
    if payload.email.is_empty() {
        errors.insert("email", "Email is required".into());
    } else if !is_valid_email(&payload.email) {
        errors.insert("email", "Invalid email format".into());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = SessionUser {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip(_state))]
pub async fn get_me(
    State(_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plausible_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.ph"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn login_normalizes_name_and_email() {
        let state = AppState::fake();
        let Json(response) = login(
            State(state),
            Json(LoginRequest {
                name: "  Alice Santos ".into(),
                email: " Alice@Example.COM ".into(),
            }),
        )
        .await
        .expect("login should succeed");
        assert_eq!(response.user.name, "Alice Santos");
        assert_eq!(response.user.email, "alice@example.com");
        assert!(!response.access_token.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_malformed_input_per_field() {
        let state = AppState::fake();
        let result = login(
            State(state),
            Json(LoginRequest {
                name: "A".into(),
                email: "not-an-email".into(),
            }),
        )
        .await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("name").unwrap(), "Name must be at least 2 characters");
                assert_eq!(errors.get("email").unwrap(), "Invalid email format");
            }
            Ok(_) => panic!("expected validation error"),
            Err(other) => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let state = AppState::fake();
        let result = login(
            State(state),
            Json(LoginRequest {
                name: String::new(),
                email: String::new(),
            }),
        )
        .await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("name").unwrap(), "Name is required");
                assert_eq!(errors.get("email").unwrap(), "Email is required");
            }
            Ok(_) => panic!("expected validation error"),
            Err(other) => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn public_user_serializes_with_email() {
        let response = PublicUser {
            id: Uuid::new_v4(),
            name: "Alice Santos".into(),
            email: "alice@example.com".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("id"));
    }
}
