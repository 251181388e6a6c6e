//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{caller_key, extract_client_ip};
use platform::cookie::CookieConfig;
use platform::rate_limit::RateLimitStore;

use crate::application::config::GatewayConfig;
use crate::application::{
    CheckSessionUseCase, SessionOutcome, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::error::GatewayResult;
use crate::presentation::dto::{
    SessionStatusResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};

/// Shared state for gateway handlers
#[derive(Clone)]
pub struct GatewayAppState<R>
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<GatewayConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/gateway/signup
pub async fn sign_up<R>(
    State(state): State<GatewayAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignUpRequest>,
) -> GatewayResult<impl IntoResponse>
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let key = caller_key(&headers, Some(addr.ip()));
    let client_ip = extract_client_ip(&headers, Some(addr.ip())).map(|ip| ip.to_string());

    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        full_name: req.full_name,
        email: req.email,
        university_id: req.university_id,
        password: req.password,
        university_card_ref: req.university_card_ref,
    };

    let output = use_case.execute(input, &key, client_ip).await?;

    match output.session {
        SessionOutcome::Established(issued) => {
            let cookie = session_cookie_config(&state.config).build_set_cookie(&issued.session_token);

            Ok((
                StatusCode::CREATED,
                [(header::SET_COOKIE, cookie)],
                Json(SignUpResponse {
                    member_id: output.member_id.to_string(),
                    session_established: true,
                    expires_at_ms: Some(issued.expires_at_ms),
                    message: None,
                }),
            )
                .into_response())
        }
        // The account exists; report the degraded outcome instead of
        // failing the whole request.
        SessionOutcome::Failed(e) => Ok((
            StatusCode::CREATED,
            Json(SignUpResponse {
                member_id: output.member_id.to_string(),
                session_established: false,
                expires_at_ms: None,
                message: Some(e.to_string()),
            }),
        )
            .into_response()),
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/gateway/signin
pub async fn sign_in<R>(
    State(state): State<GatewayAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignInRequest>,
) -> GatewayResult<impl IntoResponse>
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let key = caller_key(&headers, Some(addr.ip()));
    let client_ip = extract_client_ip(&headers, Some(addr.ip())).map(|ip| ip.to_string());

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let issued = use_case.execute(input, &key, client_ip).await?;

    let cookie = session_cookie_config(&state.config).build_set_cookie(&issued.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            member_id: issued.member_id.to_string(),
            expires_at_ms: issued.expires_at_ms,
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/gateway/signout
pub async fn sign_out<R>(
    State(state): State<GatewayAppState<R>>,
    headers: HeaderMap,
) -> GatewayResult<impl IntoResponse>
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name);

    if let Some(token) = token {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        let _ = use_case.execute(&token).await;
    }

    let cookie = session_cookie_config(&state.config).build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/gateway/status
pub async fn session_status<R>(
    State(state): State<GatewayAppState<R>>,
    headers: HeaderMap,
) -> GatewayResult<Json<SessionStatusResponse>>
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session_info = if let Some(token) = token {
        use_case.execute(&token).await.ok()
    } else {
        None
    };

    match session_info {
        Some(info) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            member_id: Some(info.member_id),
            expires_at_ms: Some(info.expires_at_ms),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            member_id: None,
            expires_at_ms: None,
        })),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    platform::cookie::extract_cookie(headers, name)
}

fn session_cookie_config(config: &GatewayConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}
