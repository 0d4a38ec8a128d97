//! Plain-text rendering of table pages and form reports.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use liquid_logic_core::form::{FormValidationResult, NormalizedField};
use liquid_logic_core::table::{ColumnAlign, NormalizedColumn, ProcessedData};
use liquid_logic_core::FormData;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::TableConfig;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Character width from a column's `width` when it reads like `12` or `12ch`.
///
/// CSS widths such as `120px` or `20%` have no terminal meaning and yield
/// `None`.
#[must_use]
pub fn text_width(column: &NormalizedColumn) -> Option<usize> {
    let width = column.width.as_deref()?.trim();
    let digits = width.strip_suffix("ch").unwrap_or(width).trim_end();
    digits.parse().ok().filter(|w| *w > 0)
}

/// Cuts `text` to at most `width` terminal columns and pads it to exactly
/// `width`. Wide glyphs such as CJK count as two columns.
fn fit(text: &str, width: usize, align: ColumnAlign) -> String {
    let mut cut = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        cut.push(c);
        used += w;
    }
    let pad = width - used;
    let (left, right) = match align {
        ColumnAlign::Left => (0, pad),
        ColumnAlign::Center => (pad / 2, pad - pad / 2),
        ColumnAlign::Right => (pad, 0),
    };
    format!("{}{cut}{}", " ".repeat(left), " ".repeat(right))
}

/// Renders one page as an aligned text table followed by a
/// `page P/T (N rows)` footer.
#[must_use]
pub fn render_table(
    columns: &[NormalizedColumn],
    data: &ProcessedData<'_>,
    config: &TableConfig,
) -> String {
    let cells: Vec<Vec<String>> = data
        .rows
        .iter()
        .map(|row| columns.iter().map(|col| col.format_cell(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            text_width(col).unwrap_or_else(|| {
                cells
                    .iter()
                    .map(|line| line[i].width())
                    .chain(std::iter::once(col.label.width()))
                    .max()
                    .unwrap_or(0)
                    .min(config.max_column_width)
            })
        })
        .collect();

    let join = |parts: Vec<String>| parts.join(&config.column_gap).trim_end().to_string();

    let mut out = String::new();
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| fit(&col.label, *w, col.align))
        .collect();
    out.push_str(&join(header));
    out.push('\n');
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&join(rule));
    out.push('\n');
    for line in &cells {
        let parts = line
            .iter()
            .zip(columns.iter().zip(&widths))
            .map(|(cell, (col, w))| fit(cell, *w, col.align))
            .collect();
        out.push_str(&join(parts));
        out.push('\n');
    }
    let _ = write!(
        out,
        "page {}/{} ({} rows)",
        data.page, data.total_pages, data.total
    );
    out
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Form evaluation as printed by the `form` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
    pub hidden_fields: Vec<String>,
    /// Submitted data with hidden fields' values removed.
    pub data: FormData,
    #[serde(skip)]
    pub results: FormValidationResult,
}

/// One line per field in schema order, then an overall verdict.
#[must_use]
pub fn render_form(fields: &[NormalizedField], report: &FormReport) -> String {
    let mut out = String::new();
    for field in fields {
        let name = format!("{} ({})", field.label, field.key);
        let line = match report.results.get(&field.key) {
            None => format!("[hidden] {name}"),
            Some(result) if result.valid => format!("[ok]     {name}"),
            Some(result) => match result.message.as_deref() {
                Some(message) if !message.is_empty() => format!("[error]  {name}: {message}"),
                _ => format!("[error]  {name}"),
            },
        };
        out.push_str(&line);
        out.push('\n');
    }
    if report.valid {
        out.push_str("form is valid");
    } else {
        let invalid = report.results.values().filter(|r| !r.valid).count();
        let _ = write!(out, "form is invalid ({invalid} failing)");
    }
    out
}
