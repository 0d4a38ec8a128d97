//! The table pipeline: sort, then filter, then paginate.
//!
//! Every stage is a pure function over borrowed rows. The stages are
//! generic over `R: Borrow<Row>` so they work both on owned rows and on the
//! `&Row` vectors produced by an earlier stage; [`process_data`] chains them
//! over references and never clones a row.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::{
    FilterState, NormalizedColumn, PaginationState, ProcessedData, SortOrder, SortState,
};
use crate::collation::locale_compare;
use crate::value::{coerce_to_string, field_value, Row, Value};

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Compares two cells: numerically when both are numbers, otherwise by
/// their string coercions under [`locale_compare`].
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => locale_compare(&coerce_to_string(a), &coerce_to_string(b)),
    }
}

/// Sorts rows by `sort.field` in `sort.order`.
///
/// Returns the rows in their original order when either part of the sort
/// state is unset. The sort is stable, so ties keep their relative order.
#[must_use]
pub fn sort_rows<R>(rows: &[R], sort: &SortState) -> Vec<R>
where
    R: Borrow<Row> + Clone,
{
    let mut sorted = rows.to_vec();
    let (Some(field), Some(order)) = (sort.field.as_deref(), sort.order) else {
        return sorted;
    };

    sorted.sort_by(|a, b| {
        let (a, b): (&Row, &Row) = (a.borrow(), b.borrow());
        let ord = compare_cells(field_value(a, field), field_value(b, field));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    sorted
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Keeps rows that match every active filter.
///
/// A filter is active when its text is not blank and its key names a
/// filterable column; other entries are ignored. Matching is a
/// case-insensitive substring test against the cell's string coercion.
#[must_use]
pub fn filter_rows<R>(rows: &[R], filters: &FilterState, columns: &[NormalizedColumn]) -> Vec<R>
where
    R: Borrow<Row> + Clone,
{
    let filterable: HashSet<&str> = columns
        .iter()
        .filter(|col| col.filterable)
        .map(|col| col.key.as_str())
        .collect();

    let active: Vec<(&str, String)> = filters
        .iter()
        .filter(|(key, text)| !text.trim().is_empty() && filterable.contains(key.as_str()))
        .map(|(key, text)| (key.as_str(), text.to_lowercase()))
        .collect();

    if active.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| {
            let row: &Row = <R as Borrow<Row>>::borrow(row);
            active.iter().all(|(key, needle)| {
                coerce_to_string(field_value(row, key))
                    .to_lowercase()
                    .contains(needle.as_str())
            })
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Paginate
// ---------------------------------------------------------------------------

/// Number of pages for `total` rows: at least 1, and exactly 1 when
/// `page_size` is 0.
#[must_use]
pub fn get_total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// The slice of `rows` for `pagination.page`.
///
/// Page 0, or a page whose offset overflows, yields no rows. No clamping
/// happens here; [`process_data`] clamps before calling this.
#[must_use]
pub fn paginate_rows<T: Clone>(rows: &[T], pagination: &PaginationState) -> Vec<T> {
    let start = pagination
        .page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(pagination.page_size));
    let Some(start) = start else {
        return Vec::new();
    };
    rows.iter()
        .skip(start)
        .take(pagination.page_size)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs sort, filter, and paginate over `all_rows`.
///
/// The requested page is clamped into `1..=total_pages` after filtering, so a
/// page that no longer exists serves the nearest one instead of nothing.
/// `pagination` itself is left untouched; the served page is reported in
/// [`ProcessedData::page`].
#[must_use]
pub fn process_data<'a>(
    all_rows: &'a [Row],
    columns: &[NormalizedColumn],
    sort: &SortState,
    filters: &FilterState,
    pagination: &PaginationState,
) -> ProcessedData<'a> {
    let refs: Vec<&'a Row> = all_rows.iter().collect();

    let sorted = sort_rows(&refs, sort);
    let filtered = filter_rows(&sorted, filters, columns);

    let total = filtered.len();
    let total_pages = get_total_pages(total, pagination.page_size);
    let page = pagination.page.clamp(1, total_pages);
    if page != pagination.page {
        tracing::debug!(
            requested = pagination.page,
            served = page,
            total_pages,
            "clamped out-of-range page"
        );
    }

    let safe = PaginationState { page, ..*pagination };
    let rows = paginate_rows(&filtered, &safe);
    tracing::trace!(
        input = all_rows.len(),
        total,
        total_pages,
        page,
        served = rows.len(),
        "processed table data"
    );

    ProcessedData {
        rows,
        total,
        total_pages,
        page,
    }
}
