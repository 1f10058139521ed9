//! 管理端会话
//!
//! 登录成功后签发随机令牌，保存在内存中。浏览器通过 cookie 携带，
//! 脚本调用通过 `Authorization: Bearer` 携带。

use crate::state::AppState;
use crate::views;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use certverify_common::config::AdminCredentials;
use certverify_common::error::CertError;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "certverify_session";
const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Instant>>>,
}

impl SessionStore {
    pub async fn issue(&self) -> String {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let expires_at = Instant::now() + SESSION_TTL;
        let mut sessions = self.inner.write().await;
        sessions.retain(|_, expiry| *expiry > Instant::now());
        sessions.insert(token.clone(), expires_at);
        token
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        match self.inner.read().await.get(token) {
            Some(expiry) => *expiry > Instant::now(),
            None => false,
        }
    }

    pub async fn revoke(&self, token: &str) {
        self.inner.write().await.remove(token);
    }
}

/// 邮箱忽略大小写与首尾空白，密码逐字比较
pub fn credentials_match(admin: &AdminCredentials, email: &str, password: &str) -> bool {
    admin.email.eq_ignore_ascii_case(email.trim()) && admin.password == password
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|token| !token.is_empty())
}

pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

async fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    match session_token(headers) {
        Some(token) => state.sessions.is_valid(token).await,
        None => false,
    }
}

/// 管理页面：未登录时跳转到登录页
pub async fn require_admin_page(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authenticated(&state, request.headers()).await {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// 管理接口：未登录时返回 401
pub async fn require_admin_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, CertError> {
    if is_authenticated(&state, request.headers()).await {
        Ok(next.run(request).await)
    } else {
        Err(CertError::unauthorized("valid session required"))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_TTL.as_secs()
    )
}

pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if is_authenticated(&state, &headers).await {
        return Redirect::to("/admin/certificates").into_response();
    }
    Html(views::login_page(None)).into_response()
}

pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if !credentials_match(&state.admin, &form.email, &form.password) {
        info!("admin login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some("Email atau password salah"))),
        )
            .into_response();
    }

    let token = state.sessions.issue().await;
    info!("admin session issued");
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Redirect::to("/admin/certificates"),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(token).await;
    }
    let expired = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    ([(header::SET_COOKIE, expired)], Redirect::to("/login")).into_response()
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginForm>,
) -> Result<Json<JsonValue>, CertError> {
    if !credentials_match(&state.admin, &payload.email, &payload.password) {
        return Err(CertError::unauthorized("invalid credentials"));
    }
    let token = state.sessions.issue().await;
    Ok(Json(json!({
        "token": token,
        "expires_in": SESSION_TTL.as_secs(),
    })))
}
