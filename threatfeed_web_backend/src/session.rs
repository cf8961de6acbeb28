use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use threatfeed_core::User;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AppErr, AppState};

pub const SESSION_COOKIE: &str = "threatfeed_session";

/// Logged-in users keyed by the id stored in their session cookie.
/// Sessions live until logout or restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl SessionStore {
    pub async fn start(&self, user: User) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, user);
        id
    }

    pub async fn end(&self, headers: &HeaderMap) -> Option<User> {
        let id = session_id(headers)?;
        self.sessions.write().await.remove(&id)
    }

    pub async fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        let id = session_id(headers)?;
        self.sessions.read().await.get(&id).cloned()
    }
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

/// The user behind the request's session cookie. Rejects with
/// [`AppErr::UnauthorizedErr`] when there is none.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppErr;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .current_user(&parts.headers)
            .await
            .map(CurrentUser)
            .ok_or(AppErr::UnauthorizedErr)
    }
}
