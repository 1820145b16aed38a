use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::session::{SessionToken, removal_cookie, session_cookie};
use super::{ApiError, AppState, AuthResult, CredentialsRequest};
use crate::clock::Clock;
use crate::constants::messages;
use crate::services::{AuthError, AuthSession, AuthStatus, LogoutOutcome};

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
/// Create an account and log it in
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, ApiError> {
    match state.auth.signup(&payload.username, &payload.password).await {
        Ok(session) => Ok(issue_session(
            &state,
            StatusCode::CREATED,
            "User created successfully",
            &session,
        )),
        Err(AuthError::UsernameTaken) => Ok((
            StatusCode::CONFLICT,
            Json(AuthResult::failure(messages::USERNAME_TAKEN)),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /auth/login
/// Authenticate with username and password; always issues a new session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, ApiError> {
    match state.auth.login(&payload.username, &payload.password).await {
        Ok(session) => Ok(issue_session(
            &state,
            StatusCode::OK,
            "Login successful",
            &session,
        )),
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(AuthResult::failure(messages::INVALID_CREDENTIALS)),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /auth/logout
/// Revoke the presented session and clear the cookie
pub async fn logout(
    State(state): State<Arc<AppState>>,
    token: SessionToken,
) -> Result<Response, ApiError> {
    match state.auth.logout(token.as_deref()).await? {
        LogoutOutcome::NotAuthenticated => {
            Ok(Json(AuthResult::failure(messages::NOT_AUTHENTICATED)).into_response())
        }
        LogoutOutcome::LoggedOut => {
            let mut response = Json(AuthResult::ok("Logged out successfully")).into_response();
            if let Some(cookie) = removal_cookie(&state.config.server) {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            Ok(response)
        }
    }
}

/// GET /auth/check
/// Report whether the presented session is live
pub async fn check_auth(
    State(state): State<Arc<AppState>>,
    token: SessionToken,
) -> Result<Json<AuthResult>, ApiError> {
    let result = match state.auth.check_auth(token.as_deref()).await? {
        AuthStatus::NotAuthenticated => AuthResult::failure(messages::NOT_AUTHENTICATED),
        AuthStatus::InvalidSession => AuthResult::failure(messages::INVALID_SESSION),
        AuthStatus::Authenticated(user) => AuthResult::authenticated("Authenticated", &user),
    };

    Ok(Json(result))
}

// ============================================================================
// Helpers
// ============================================================================

fn issue_session(
    state: &AppState,
    status: StatusCode,
    message: &str,
    session: &AuthSession,
) -> Response {
    let mut response = (
        status,
        Json(AuthResult::authenticated(message, &session.user)),
    )
        .into_response();

    let cookie: Option<HeaderValue> = session_cookie(
        &state.config.server,
        &session.token,
        session.expires_at,
        state.clock.now(),
    );
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    } else {
        tracing::error!("Failed to encode session cookie");
    }

    response
}
