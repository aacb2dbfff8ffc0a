//! CSV exports of the report tabs.
//!
//! Rows are `;`-separated with every field quoted, the layout spreadsheet
//! software in pt-BR locales opens without an import wizard. The header line
//! is written unquoted.

use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::Decimal;

use crate::entry::QueueEntry;
use crate::error::CoreError;
use crate::money::csv_amount;
use crate::report::{SalesRow, ROW_DATE_FORMAT};
use crate::types::Money;

pub const DAILY_HEADER: &str = "Status;Nome;Observacao;Valor";
pub const PERIOD_HEADER: &str = "Data;Nome;Observacao;Valor";

const EMPTY_EXPORT: &str = "Não há dados para exportar.";

fn write_rows<I>(header: &str, rows: I) -> Result<String, CoreError>
where
    I: IntoIterator<Item = [String; 4]>,
{
    let mut out = Vec::new();
    out.extend_from_slice(header.as_bytes());
    out.push(b'\n');

    {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .quote_style(QuoteStyle::Always)
            .has_headers(false)
            .from_writer(&mut out);
        for row in rows {
            writer
                .write_record(&row)
                .map_err(|e| CoreError::Internal(format!("csv write failed: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| CoreError::Internal(format!("csv flush failed: {e}")))?;
    }

    String::from_utf8(out).map_err(|e| CoreError::Internal(format!("csv not utf-8: {e}")))
}

fn value_field(value: Money) -> String {
    format!("R$ {}", csv_amount(value))
}

/// Every entry of the day, whatever its status, at its recorded price.
pub fn daily_csv(entries: &[QueueEntry]) -> Result<String, CoreError> {
    if entries.is_empty() {
        return Err(CoreError::Validation(EMPTY_EXPORT.into()));
    }
    write_rows(
        DAILY_HEADER,
        entries.iter().map(|e| {
            [
                e.status.label().to_string(),
                e.client_name().to_string(),
                e.note_text().unwrap_or("-").to_string(),
                value_field(e.price.unwrap_or(Decimal::ZERO)),
            ]
        }),
    )
}

/// Completed sales of a month or year.
pub fn period_csv(rows: &[SalesRow]) -> Result<String, CoreError> {
    if rows.is_empty() {
        return Err(CoreError::Validation(EMPTY_EXPORT.into()));
    }
    write_rows(
        PERIOD_HEADER,
        rows.iter().map(|r| {
            [
                r.date.format(ROW_DATE_FORMAT).to_string(),
                r.name.clone(),
                r.note.clone(),
                value_field(r.value),
            ]
        }),
    )
}
