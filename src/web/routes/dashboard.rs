//! Dashboard Routes
//!
//! The server-rendered page and the form posts that drive it.
//!
//! - GET /                    - Render the page (refetches the viewed date)
//! - POST /navigate           - Shift the viewed date by `days`
//! - POST /entries            - Submit the entry form
//! - POST /rows/:id/edit      - Put a row into edit state
//! - POST /rows/:id/save      - Save the row being edited
//! - POST /rows/:id/cancel    - Leave edit state without saving
//! - GET /rows/:id/delete     - Confirmation page
//! - POST /rows/:id/delete    - Delete once `confirmed=true`
//! - POST /language           - Switch the display language

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, Redirect},
    Form,
};
use std::sync::Arc;

use crate::dashboard::{EditTransition, FetchOutcome, FetchTicket};
use crate::i18n::Language;
use crate::records::RecordId;
use crate::web::dto::{DeleteForm, EntryForm, LanguageForm, NavigateForm, RowEditForm};
use crate::web::error::{WebError, WebResult};
use crate::web::render;
use crate::web::state::AppState;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let ticket = {
        let mut dashboard = state.dashboard.lock().await;
        if let Some(language) = state.detected_language(accept_language) {
            if language != dashboard.language() {
                dashboard.set_language(language);
            }
        }
        dashboard.begin_fetch()
    };
    run_fetch(&state, ticket).await;

    let page = state.dashboard.lock().await.page();
    let meta = state.document.current().unwrap_or_else(|| page.meta.clone());
    Html(render::dashboard_page(&meta, &page))
}

/// POST /navigate
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NavigateForm>,
) -> Redirect {
    let ticket = state.dashboard.lock().await.shift_cursor(form.days);
    run_fetch(&state, ticket).await;
    Redirect::to("/")
}

/// POST /entries
///
/// A field that does not parse is logged and the page is shown again with
/// the previous draft; nothing is sent.
pub async fn submit_entry(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EntryForm>,
) -> Redirect {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected entry form");
            return Redirect::to("/");
        }
    };

    let mut dashboard = state.dashboard.lock().await;
    dashboard.form_mut().fill(draft);
    dashboard.submit().await;

    Redirect::to("/")
}

/// POST /rows/:id/edit
pub async fn edit_row(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> WebResult<Redirect> {
    let id = RecordId::new(id);
    match state.dashboard.lock().await.begin_edit(&id) {
        EditTransition::UnknownRow => Err(WebError::NotFound(format!("Row {}", id))),
        _ => Ok(Redirect::to("/")),
    }
}

/// POST /rows/:id/save
///
/// Only fields whose submitted value differs from the draft are marked as
/// edited, so an unchanged form sends no update.
pub async fn save_row(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<RowEditForm>,
) -> WebResult<Redirect> {
    let id = RecordId::new(id);
    let values = form.values()?;

    let mut dashboard = state.dashboard.lock().await;
    let changed: Vec<_> = match dashboard.table().editing() {
        Some(draft) if draft.id() == &id => values
            .into_iter()
            .filter(|(field, value)| draft.value(*field) != *value)
            .collect(),
        _ => {
            return Err(WebError::Conflict(format!("Row {} is not being edited", id)));
        }
    };

    for (field, value) in changed {
        dashboard.set_edit_field(field, value);
    }
    dashboard.save_edit().await;

    Ok(Redirect::to("/"))
}

/// POST /rows/:id/cancel
pub async fn cancel_row(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Redirect {
    let id = RecordId::new(id);
    let mut dashboard = state.dashboard.lock().await;
    let editing_this = dashboard
        .table()
        .editing()
        .map(|draft| draft.id() == &id)
        .unwrap_or(false);
    if editing_this {
        dashboard.cancel_edit();
    }
    Redirect::to("/")
}

/// GET /rows/:id/delete
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let id = RecordId::new(id);
    let record = state
        .dashboard
        .lock()
        .await
        .table()
        .find(&id)
        .cloned()
        .ok_or_else(|| WebError::NotFound(format!("Row {}", id)))?;

    let meta = state.page_meta().await;
    Ok(Html(render::confirm_delete_page(&meta, &record)))
}

/// POST /rows/:id/delete
pub async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    let id = RecordId::new(id);
    state
        .dashboard
        .lock()
        .await
        .delete_row(&id, &form.confirmed)
        .await;
    Redirect::to("/")
}

/// POST /language
pub async fn set_language(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LanguageForm>,
) -> WebResult<Redirect> {
    let language: Language = form.lang.parse().map_err(WebError::Validation)?;

    state.mark_language_chosen();
    state.dashboard.lock().await.set_language(language);

    Ok(Redirect::to("/"))
}

/// Fetch without holding the dashboard lock, then apply if still current
async fn run_fetch(state: &AppState, ticket: FetchTicket) -> FetchOutcome {
    let result = state.backend.fetch_by_date(ticket.date).await;
    state.dashboard.lock().await.complete_fetch(ticket, result)
}
