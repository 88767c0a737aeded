//! Page and form handlers.

use axum::Form;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::RunError;
use crate::gate::GateAttempt;
use crate::pipeline::parse_url_list;
use crate::state::AppState;
use crate::view::{EXPORT_FILENAME, GroundFilter, export_csv};
use crate::web::render;
use crate::web::session::{CurrentSession, Notice, expired_cookie};

static STYLESHEET: &str = include_str!("../../static/app.css");

/// `GET /`
pub(super) async fn index(current: CurrentSession) -> Response {
    let page = {
        let mut session = current.session.lock().await;
        let notice = session.notice.take();
        if session.gate.is_open() {
            render::main_page(
                &session.url_input,
                session.table.as_ref(),
                &session.filter,
                notice.as_ref(),
            )
        } else {
            render::gate_page(notice.as_ref())
        }
    };
    current.respond((
        [(CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Html(page),
    ))
}

#[derive(Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    password: String,
}

/// `POST /login`
pub(super) async fn login(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Response {
    {
        let mut session = current.session.lock().await;
        match session.gate.submit(&form.password, &state.access_password) {
            GateAttempt::Granted => {
                info!("Access granted");
                session.notice = Some(Notice::Success("Access granted.".into()));
            }
            GateAttempt::Rejected => {
                info!("Access rejected");
                session.notice = Some(Notice::Error("Incorrect password".into()));
            }
            GateAttempt::Empty => {}
        }
    }
    current.respond(Redirect::to("/"))
}

/// `POST /logout`
pub(super) async fn logout(State(state): State<AppState>, current: CurrentSession) -> Response {
    state.sessions.remove(&current.id);
    debug!("Session discarded");
    ([(SET_COOKIE, expired_cookie())], Redirect::to("/")).into_response()
}

#[derive(Deserialize)]
pub(super) struct ExtractForm {
    #[serde(default)]
    urls: String,
}

/// `POST /extract`
///
/// Runs the whole pipeline before redirecting back to the page. The session
/// lock is held for the duration, so one run per session at a time.
pub(super) async fn extract(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<ExtractForm>,
) -> Response {
    let mut session = current.session.lock().await;
    if !session.gate.is_open() {
        drop(session);
        return current.respond(Redirect::to("/"));
    }

    let urls = parse_url_list(&form.urls);
    session.url_input = form.urls;

    match state.reader.run(&urls).await {
        Ok(report) => {
            let skipped = report.skipped();
            info!(
                urls = urls.len(),
                rows = report.table.len(),
                skipped,
                "Extraction run finished"
            );
            session.notice = Some(Notice::Success(format!(
                "Extracted {} rows from {} of {} links.",
                report.table.len(),
                urls.len().saturating_sub(skipped),
                urls.len()
            )));
            session.table = Some(report.table);
        }
        Err(e @ RunError::NoInput) => {
            session.notice = Some(Notice::Warning(e.to_string()));
        }
        Err(e @ RunError::NoRows { .. }) => {
            session.notice = Some(Notice::Error(e.to_string()));
        }
    }
    drop(session);

    current.respond(Redirect::to("/"))
}

/// `POST /filter`
///
/// Unchecked boxes are absent from the form body, so every field defaults to
/// false here rather than to [`GroundFilter::default`].
pub(super) async fn filter(current: CurrentSession, Form(filter): Form<GroundFilter>) -> Response {
    {
        let mut session = current.session.lock().await;
        if session.gate.is_open() {
            session.filter = filter;
        }
    }
    current.respond(Redirect::to("/"))
}

/// `GET /export.csv`
pub(super) async fn export(current: CurrentSession) -> Response {
    let body = {
        let session = current.session.lock().await;
        if !session.gate.is_open() {
            return current.respond(StatusCode::UNAUTHORIZED);
        }
        match &session.table {
            Some(table) => export_csv(table, &session.filter),
            None => return current.respond((StatusCode::NOT_FOUND, "Nothing to export")),
        }
    };

    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    current.respond(response)
}

/// `GET /static/app.css`
pub(super) async fn stylesheet() -> Response {
    (
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/css; charset=utf-8")),
            (CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600")),
        ],
        STYLESHEET,
    )
        .into_response()
}
