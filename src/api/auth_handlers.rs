//! Authentication Handlers
//!
//! Signup, login, federated Google login, and the current-user lookup.

use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::api::extract::AppJson;
use crate::api::handlers::{ApiResponse, AppState};
use crate::api::middleware::CurrentUser;
use crate::models::requests::{
    AuthData, GoogleLoginRequest, LoginRequest, SignupRequest, UserData,
};
use crate::utils::error::AppResult;

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let (user, token) = state.auth_service.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Account created",
            AuthData { user, token },
        )),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    let (user, token) = state.auth_service.login(request).await?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        AuthData { user, token },
    )))
}

/// `POST /api/auth/google`
pub async fn google_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<GoogleLoginRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    let (user, token) = state.auth_service.google_login(request).await?;

    Ok(Json(ApiResponse::with_message(
        "Google login successful",
        AuthData { user, token },
    )))
}

/// `GET /api/auth/me`
///
/// The identity resolver has already verified the token and loaded the
/// record; 401/404 outcomes never reach this handler.
pub async fn me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<ApiResponse<UserData>> {
    Json(ApiResponse::data(UserData { user }))
}
