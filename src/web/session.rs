//! Browser sessions: one gate flag, table and filter per cookie.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, request::Parts};
use axum::response::{IntoResponse, Response};
use cookie::{Cookie, SameSite};
use dashmap::DashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::gate::AccessGate;
use crate::schedule::ScheduleTable;
use crate::state::AppState;
use crate::view::GroundFilter;

pub const SESSION_COOKIE: &str = "schedule_session";

/// A one-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct Session {
    pub gate: AccessGate,
    /// Last successful extraction, replaced wholesale by the next one.
    pub table: Option<ScheduleTable>,
    pub filter: GroundFilter,
    /// Text of the URL box as last submitted.
    pub url_input: String,
    pub notice: Option<Notice>,
}

struct Entry {
    last_seen: Instant,
    session: Arc<Mutex<Session>>,
}

/// All live sessions, keyed by cookie value.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `id`, or start a fresh session when it is missing or unknown.
    /// Returns the effective ID and whether it was just created.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, Arc<Mutex<Session>>, bool) {
        let now = Instant::now();
        if let Some(id) = id
            && let Some(mut entry) = self.inner.get_mut(id)
        {
            entry.last_seen = now;
            return (id.to_string(), entry.session.clone(), false);
        }

        let id = nanoid::nanoid!(32);
        let session = Arc::new(Mutex::new(Session::default()));
        self.inner.insert(
            id.clone(),
            Entry {
                last_seen: now,
                session: session.clone(),
            },
        );
        (id, session, true)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.inner.remove(id).is_some()
    }

    /// Drop sessions idle for longer than `ttl`; returns how many.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.last_seen.elapsed() <= ttl);
        before.saturating_sub(self.inner.len())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// The caller's session, created on first contact.
pub struct CurrentSession {
    pub id: String,
    pub session: Arc<Mutex<Session>>,
    is_new: bool,
}

impl CurrentSession {
    /// Attach the session cookie if this request started the session.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            let cookie = Cookie::build((SESSION_COOKIE, self.id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

/// Set-Cookie value that clears the session cookie.
pub fn expired_cookie() -> HeaderValue {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    HeaderValue::from_str(&cookie.to_string()).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn session_id(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = session_id(parts);
        let (id, session, is_new) = state.sessions.get_or_create(requested.as_deref());
        Ok(Self {
            id,
            session,
            is_new,
        })
    }
}
