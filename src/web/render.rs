//! HTML rendering
//!
//! The dashboard is server-rendered with Leptos components: every control is
//! a plain form that posts back and redirects to `/`. Document language,
//! direction and title come from the published [`PageMeta`].

use chrono::Local;
use leptos::*;

use crate::dashboard::{DashboardPage, EditDraft, EntryDraft, PageMeta, RowState, RowView};
use crate::i18n::{Language, TextKey};
use crate::records::{FieldValue, MetricField, MetricRecord};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;}\
nav,form.entry{margin-bottom:1.5rem;}\
table{border-collapse:collapse;width:100%;}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:start;}\
input[type=number]{width:7rem;}\
.empty{color:#666;}";

/// Render the full dashboard page
pub fn dashboard_page(meta: &PageMeta, page: &DashboardPage) -> String {
    let document_meta = meta.clone();
    let meta = meta.clone();
    let page = page.clone();
    render_document(move || {
        view! {
            <Document meta=document_meta>
                <DashboardBody meta=meta page=page />
            </Document>
        }
    })
}

/// Render the delete confirmation page for one row
pub fn confirm_delete_page(meta: &PageMeta, record: &MetricRecord) -> String {
    let meta = meta.clone();
    let record = record.clone();
    render_document(move || {
        let lang = meta.language;
        view! {
            <Document meta=meta>
                <ConfirmDelete lang=lang record=record />
            </Document>
        }
    })
}

fn render_document<F, N>(page: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let html = leptos::ssr::render_to_string(page);
    format!("<!DOCTYPE html>{}", &*html)
}

fn created_at(record: &MetricRecord) -> String {
    record
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[component]
fn Document(meta: PageMeta, children: Children) -> impl IntoView {
    view! {
        <html lang=meta.language.code() dir=meta.direction.as_str()>
            <head>
                <meta charset="utf-8" />
                <title>{meta.title}</title>
                <style>{STYLE}</style>
            </head>
            <body>{children()}</body>
        </html>
    }
}

#[component]
fn DashboardBody(meta: PageMeta, page: DashboardPage) -> impl IntoView {
    let lang = meta.language;

    view! {
        <h1>{meta.title.clone()}</h1>
        <Navigation lang=lang date=meta.date.to_string() />
        <LanguagePicker lang=lang />
        <EntryFormView lang=lang draft=page.form />
        <MetricsTableView lang=lang date=meta.date.to_string() rows=page.rows />
    }
}

/// Previous / next day buttons around the viewed date
#[component]
fn Navigation(lang: Language, date: String) -> impl IntoView {
    view! {
        <nav>
            <form method="post" action="/navigate" style="display:inline">
                <input type="hidden" name="days" value="-1" />
                <button type="submit">{lang.text(TextKey::PreviousDay)}</button>
            </form>
            " "
            <strong>{date}</strong>
            " "
            <form method="post" action="/navigate" style="display:inline">
                <input type="hidden" name="days" value="1" />
                <button type="submit">{lang.text(TextKey::NextDay)}</button>
            </form>
        </nav>
    }
}

#[component]
fn LanguagePicker(lang: Language) -> impl IntoView {
    view! {
        <form method="post" action="/language">
            <label>
                {lang.text(TextKey::Language)}
                " "
                <select name="lang">
                    {Language::all()
                        .iter()
                        .map(|choice| view! {
                            <option value=choice.code() selected={*choice == lang}>
                                {choice.text(TextKey::LanguageName)}
                            </option>
                        })
                        .collect_view()}
                </select>
            </label>
            " "
            <button type="submit">{lang.text(TextKey::Save)}</button>
        </form>
    }
}

#[component]
fn EntryFormView(lang: Language, draft: EntryDraft) -> impl IntoView {
    let counts = [
        (TextKey::WebsiteVisits, MetricField::WebsiteVisits, draft.website_visits),
        (TextKey::AppDownloads, MetricField::AppDownloads, draft.app_downloads),
        (
            TextKey::FinishedOperations,
            MetricField::FinishedOperations,
            draft.finished_operations,
        ),
    ];

    view! {
        <h2>{lang.text(TextKey::EnterDailyMetrics)}</h2>
        <form class="entry" method="post" action="/entries">
            <label>
                {lang.text(TextKey::Date)}
                " "
                <input type="date" name="metric_date" value=draft.metric_date.to_string() required=true />
            </label>
            " "
            {counts
                .into_iter()
                .map(|(key, field, value)| view! {
                    <label>
                        {lang.text(key)}
                        " "
                        <NumberInput field=field value={FieldValue::Count(value)} form=None />
                    </label>
                    " "
                })
                .collect_view()}
            <label>
                {lang.text(TextKey::Liquidity)}
                " "
                <NumberInput
                    field=MetricField::Liquidity
                    value={FieldValue::Amount(draft.liquidity)}
                    form=None
                />
            </label>
            " "
            <button type="submit">{lang.text(TextKey::AddMetric)}</button>
        </form>
    }
}

/// Numeric input for one metric column
///
/// Counters are bounded below by zero. Liquidity is signed and takes cents.
#[component]
fn NumberInput(field: MetricField, value: FieldValue, form: Option<String>) -> impl IntoView {
    let (min, step) = match field {
        MetricField::Liquidity => (None, Some("0.01".to_string())),
        _ => (Some("0".to_string()), None),
    };

    view! {
        <input
            type="number"
            name=field.column()
            value=value.to_string()
            min=min
            step=step
            form=form
            required=true
        />
    }
}

#[component]
fn MetricsTableView(lang: Language, date: String, rows: Vec<RowView>) -> impl IntoView {
    let body = if rows.is_empty() {
        view! { <p class="empty">{lang.text(TextKey::NoDataForThisDate)}</p> }.into_view()
    } else {
        let headers = [
            TextKey::CreatedAt,
            TextKey::WebsiteVisitsHeader,
            TextKey::AppDownloadsHeader,
            TextKey::FinishedOperationsHeader,
            TextKey::LiquidityHeader,
            TextKey::Actions,
        ];
        view! {
            <table>
                <thead>
                    <tr>
                        {headers
                            .into_iter()
                            .map(|key| view! { <th>{lang.text(key)}</th> })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| match row.state {
                            RowState::Viewing => view! {
                                <ViewRow lang=lang record=row.record />
                            }
                            .into_view(),
                            RowState::Editing(draft) => view! {
                                <EditRow lang=lang record=row.record draft=draft />
                            }
                            .into_view(),
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_view()
    };

    view! {
        <h2>{lang.text(TextKey::MetricsFor)} " " {date}</h2>
        {body}
    }
}

#[component]
fn ViewRow(lang: Language, record: MetricRecord) -> impl IntoView {
    let edit_action = format!("/rows/{}/edit", record.id);
    let delete_href = format!("/rows/{}/delete", record.id);
    let cells: Vec<String> = MetricField::all()
        .iter()
        .map(|field| record.field(*field).to_string())
        .collect();

    view! {
        <tr>
            <td>{created_at(&record)}</td>
            {cells.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
            <td>
                <form method="post" action=edit_action style="display:inline">
                    <button type="submit">{lang.text(TextKey::Edit)}</button>
                </form>
                " "
                <a href=delete_href>{lang.text(TextKey::Delete)}</a>
            </td>
        </tr>
    }
}

/// A row in edit state; its inputs belong to the save form by id
#[component]
fn EditRow(lang: Language, record: MetricRecord, draft: EditDraft) -> impl IntoView {
    let form_id = format!("edit-{}", record.id);
    let save_action = format!("/rows/{}/save", record.id);
    let cancel_action = format!("/rows/{}/cancel", record.id);
    let inputs: Vec<(MetricField, FieldValue)> = MetricField::all()
        .iter()
        .map(|field| (*field, draft.value(*field)))
        .collect();

    view! {
        <tr>
            <td>{created_at(&record)}</td>
            {inputs
                .into_iter()
                .map(|(field, value)| view! {
                    <td><NumberInput field=field value=value form={Some(form_id.clone())} /></td>
                })
                .collect_view()}
            <td>
                <form id=form_id.clone() method="post" action=save_action style="display:inline">
                    <button type="submit">{lang.text(TextKey::Save)}</button>
                </form>
                " "
                <form method="post" action=cancel_action style="display:inline">
                    <button type="submit">{lang.text(TextKey::Cancel)}</button>
                </form>
            </td>
        </tr>
    }
}

#[component]
fn ConfirmDelete(lang: Language, record: MetricRecord) -> impl IntoView {
    let action = format!("/rows/{}/delete", record.id);
    let summary = format!(
        "{} {} | {}: {} | {}: {} | {}: {} | {}: {}",
        lang.text(TextKey::Date),
        record.metric_date,
        lang.text(TextKey::WebsiteVisitsHeader),
        record.website_visits,
        lang.text(TextKey::AppDownloadsHeader),
        record.app_downloads,
        lang.text(TextKey::FinishedOperationsHeader),
        record.finished_operations,
        lang.text(TextKey::LiquidityHeader),
        FieldValue::Amount(record.liquidity),
    );

    view! {
        <h1>{lang.text(TextKey::DashboardTitle)}</h1>
        <p>{lang.text(TextKey::ConfirmDelete)}</p>
        <p>{summary}</p>
        <form method="post" action=action.clone()>
            <input type="hidden" name="confirmed" value="true" />
            <button type="submit">{lang.text(TextKey::Delete)}</button>
        </form>
        <form method="post" action=action>
            <input type="hidden" name="confirmed" value="false" />
            <button type="submit">{lang.text(TextKey::Cancel)}</button>
        </form>
        <p><a href="/">{lang.text(TextKey::BackToDashboard)}</a></p>
    }
}
