//! Earnings reports over a day, month, or year.
//!
//! Summaries are pure projections of the listed entries. Only `COMPLETED`
//! entries contribute to totals; they are recomputed on every call.

use chrono::{Datelike, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entry::{EntryStatus, QueueEntry};
use crate::error::CoreError;
use crate::money::average;
use crate::types::Money;

/// Wire date format of the backend's list filters.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format of period report rows.
pub const ROW_DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportWindow {
    Day { date: NaiveDate },
    Range { start: NaiveDate, end: NaiveDate },
}

impl ReportWindow {
    pub fn day(date: NaiveDate) -> Self {
        ReportWindow::Day { date }
    }

    /// First to last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Result<Self, CoreError> {
        let start = date
            .with_day(1)
            .ok_or_else(|| CoreError::Internal(format!("no first day for {date}")))?;
        let next = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        };
        let end = next
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| CoreError::Validation(format!("Data fora do intervalo: {date}")))?;
        Ok(ReportWindow::Range { start, end })
    }

    /// January 1st to December 31st of the year containing `date`.
    pub fn year_of(date: NaiveDate) -> Result<Self, CoreError> {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(ReportWindow::Range { start, end }),
            _ => Err(CoreError::Validation(format!("Data fora do intervalo: {date}"))),
        }
    }

    pub fn start(&self) -> NaiveDate {
        match *self {
            ReportWindow::Day { date } => date,
            ReportWindow::Range { start, .. } => start,
        }
    }

    pub fn end(&self) -> NaiveDate {
        match *self {
            ReportWindow::Day { date } => date,
            ReportWindow::Range { end, .. } => end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }

    /// Query parameters understood by the backend's queue listing.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match *self {
            ReportWindow::Day { date } => {
                vec![("date", date.format(QUERY_DATE_FORMAT).to_string())]
            }
            ReportWindow::Range { start, end } => vec![
                ("startDate", start.format(QUERY_DATE_FORMAT).to_string()),
                ("endDate", end.format(QUERY_DATE_FORMAT).to_string()),
            ],
        }
    }
}

/// The three report tabs of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[serde(rename = "diario")]
    Daily,
    #[serde(rename = "mensal")]
    Monthly,
    #[serde(rename = "anual")]
    Annual,
}

impl ReportPeriod {
    /// Window covering `date` for this period.
    pub fn window(self, date: NaiveDate) -> Result<ReportWindow, CoreError> {
        match self {
            ReportPeriod::Daily => Ok(ReportWindow::day(date)),
            ReportPeriod::Monthly => ReportWindow::month_of(date),
            ReportPeriod::Annual => ReportWindow::year_of(date),
        }
    }

    /// File name offered for the CSV export.
    pub fn export_filename(self, date: NaiveDate) -> String {
        match self {
            ReportPeriod::Daily => format!("transacoes-diarias-{}.csv", date.format("%Y-%m-%d")),
            ReportPeriod::Monthly => format!("relatorio-mensal-{}.csv", date.format("%Y-%m")),
            ReportPeriod::Annual => format!("relatorio-anual-{}.csv", date.format("%Y")),
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_earnings: Money,
    pub total_valid_entries: usize,
    pub average_per_entry: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub total_earnings: Money,
    pub total_entries: usize,
    pub average_per_entry: Money,
}

/// One completed sale in a monthly or annual report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub date: NaiveDate,
    pub name: String,
    /// `-` when the entry had no note.
    pub note: String,
    pub value: Money,
}

fn completed(entries: &[QueueEntry]) -> impl Iterator<Item = &QueueEntry> {
    entries
        .iter()
        .filter(|e| e.status == EntryStatus::Completed)
}

pub fn period_summary(entries: &[QueueEntry]) -> PeriodSummary {
    let (total_earnings, total_entries) = completed(entries)
        .fold((Decimal::ZERO, 0usize), |(sum, n), e| (sum + e.earnings(), n + 1));
    PeriodSummary {
        total_earnings,
        total_entries,
        average_per_entry: average(total_earnings, total_entries),
    }
}

pub fn daily_summary(date: NaiveDate, entries: &[QueueEntry]) -> DailySummary {
    let period = period_summary(entries);
    DailySummary {
        date,
        total_earnings: period.total_earnings,
        total_valid_entries: period.total_entries,
        average_per_entry: period.average_per_entry,
    }
}

/// Completed entries as sales rows, oldest first, dated in `offset`.
pub fn sales_rows(entries: &[QueueEntry], offset: FixedOffset) -> Vec<SalesRow> {
    let mut completed: Vec<&QueueEntry> = completed(entries).collect();
    completed.sort_by_key(|e| e.joined_at);
    completed
        .into_iter()
        .map(|e| SalesRow {
            date: e.joined_at.with_timezone(&offset).date_naive(),
            name: e.client_name().to_string(),
            note: e.note_text().unwrap_or("-").to_string(),
            value: e.earnings(),
        })
        .collect()
}
