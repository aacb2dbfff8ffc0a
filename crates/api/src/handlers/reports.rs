//! Handlers for the dashboard, the report tabs, and their CSV exports.
//!
//! Summaries are recomputed from the backend's entry listing on every
//! request; nothing is cached between calls.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use fila_client::SessionPayload;
use fila_core::entry::QueueEntry;
use fila_core::export::{daily_csv, period_csv};
use fila_core::money::format_brl;
use fila_core::report::{
    daily_summary, period_summary, sales_rows, DailySummary, PeriodSummary, ReportPeriod,
    ReportWindow, SalesRow,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ProviderSession;
use crate::query::DateParams;
use crate::response::DataResponse;
use crate::state::AppState;

const LOAD_FAILED: &str = "Erro inesperado ao obter o relatório.";

// ---- DTOs ----

/// Display strings for the summary cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub total_earnings: String,
    pub average_per_entry: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub summary: DailySummary,
    pub formatted: FormattedTotals,
    /// Every entry of the day, finished or not.
    pub entries: Vec<QueueEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub summary: PeriodSummary,
    pub formatted: FormattedTotals,
    pub rows: Vec<SalesRow>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReportView {
    Daily(DailyReport),
    Period(PeriodReport),
}

// ---- Helpers ----

fn report_offset(state: &AppState) -> FixedOffset {
    state.config.report_offset().unwrap_or_else(|| Utc.fix())
}

/// The requested date, or today in the report offset.
fn selected_date(state: &AppState, params: &DateParams) -> NaiveDate {
    params
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&report_offset(state)).date_naive())
}

async fn entries_in(
    state: &AppState,
    session: &SessionPayload,
    window: &ReportWindow,
) -> AppResult<Vec<QueueEntry>> {
    state
        .backend
        .list_queue(session.token(), Some(window))
        .await
        .map_err(AppError::backend(LOAD_FAILED))
}

async fn daily_report(
    state: &AppState,
    session: &SessionPayload,
    date: NaiveDate,
) -> AppResult<DailyReport> {
    let entries = entries_in(state, session, &ReportWindow::day(date)).await?;
    let summary = daily_summary(date, &entries);
    let formatted = FormattedTotals {
        total_earnings: format_brl(summary.total_earnings),
        average_per_entry: format_brl(summary.average_per_entry),
    };
    Ok(DailyReport {
        summary,
        formatted,
        entries,
    })
}

// ---- Handlers ----

/// GET /dashboard?date=
pub async fn dashboard(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<DailyReport>>> {
    let date = selected_date(&state, &params);
    let report = daily_report(&state, &session, date).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /relatorios/{period}?date=
pub async fn report(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(period): Path<ReportPeriod>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<ReportView>>> {
    let date = selected_date(&state, &params);
    if period == ReportPeriod::Daily {
        let report = daily_report(&state, &session, date).await?;
        return Ok(Json(DataResponse {
            data: ReportView::Daily(report),
        }));
    }

    let window = period.window(date)?;
    let entries = entries_in(&state, &session, &window).await?;
    let summary = period_summary(&entries);
    let formatted = FormattedTotals {
        total_earnings: format_brl(summary.total_earnings),
        average_per_entry: format_brl(summary.average_per_entry),
    };

    Ok(Json(DataResponse {
        data: ReportView::Period(PeriodReport {
            period,
            start: window.start(),
            end: window.end(),
            summary,
            formatted,
            rows: sales_rows(&entries, report_offset(&state)),
        }),
    }))
}

/// GET /relatorios/{period}/export?date=
///
/// Responds with the CSV as an attachment. An empty report is refused.
pub async fn export(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(period): Path<ReportPeriod>,
    Query(params): Query<DateParams>,
) -> AppResult<Response> {
    let date = selected_date(&state, &params);
    let window = period.window(date)?;
    let entries = entries_in(&state, &session, &window).await?;

    let csv = match period {
        ReportPeriod::Daily => daily_csv(&entries)?,
        ReportPeriod::Monthly | ReportPeriod::Annual => {
            period_csv(&sales_rows(&entries, report_offset(&state)))?
        }
    };

    let filename = period.export_filename(date);
    tracing::info!(%filename, bytes = csv.len(), "Report exported");
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
