//! Column normalization and the initial pipeline state built from it.

use super::types::{
    ColumnSchema, FilterState, NormalizedColumn, PaginationState, SortOrder, SortState,
};
use crate::value::{coerce_to_string, field_value, Row};

fn normalize_column(col: &ColumnSchema) -> NormalizedColumn {
    NormalizedColumn {
        key: col.key.clone(),
        label: col.label.clone(),
        width: col.width.clone(),
        align: col.align.unwrap_or_default(),
        sortable: col.sortable.unwrap_or(false),
        filterable: col.filterable.unwrap_or(false),
        formatter: col.formatter.clone(),
    }
}

/// Normalizes every column, preserving order.
#[must_use]
pub fn parse_columns(columns: &[ColumnSchema]) -> Vec<NormalizedColumn> {
    let normalized: Vec<NormalizedColumn> = columns.iter().map(normalize_column).collect();
    tracing::debug!(
        columns = normalized.len(),
        sortable = normalized.iter().filter(|c| c.sortable).count(),
        filterable = normalized.iter().filter(|c| c.filterable).count(),
        "parsed table columns"
    );
    normalized
}

/// No sort: rows keep their input order.
#[must_use]
pub fn build_initial_sort_state() -> SortState {
    SortState::default()
}

/// An empty filter for every filterable column.
#[must_use]
pub fn build_initial_filter_state(columns: &[NormalizedColumn]) -> FilterState {
    columns
        .iter()
        .filter(|col| col.filterable)
        .map(|col| (col.key.clone(), String::new()))
        .collect()
}

/// First page with the given size. Use
/// [`DEFAULT_PAGE_SIZE`](super::types::DEFAULT_PAGE_SIZE) for the usual 10.
#[must_use]
pub fn build_initial_pagination_state(page_size: usize) -> PaginationState {
    PaginationState { page: 1, page_size }
}

/// The sort state after a header click on `column`.
///
/// Non-sortable columns leave the state as it is. A column that is not the
/// current sort field starts ascending; the current one cycles
/// ascending, descending, unsorted.
#[must_use]
pub fn next_sort_state(current: &SortState, column: &NormalizedColumn) -> SortState {
    if !column.sortable {
        return current.clone();
    }
    if current.field.as_deref() != Some(column.key.as_str()) {
        return SortState::by(column.key.clone(), SortOrder::Asc);
    }
    match current.order {
        None => SortState::by(column.key.clone(), SortOrder::Asc),
        Some(SortOrder::Asc) => SortState::by(column.key.clone(), SortOrder::Desc),
        Some(SortOrder::Desc) => SortState::default(),
    }
}

impl NormalizedColumn {
    /// Display text of this column's cell in `row`.
    ///
    /// Uses the formatter when there is one, otherwise the cell's string
    /// coercion (empty for missing or null cells).
    #[must_use]
    pub fn format_cell(&self, row: &Row) -> String {
        let value = field_value(row, &self.key);
        match &self.formatter {
            Some(formatter) => formatter.format(value, row),
            None => coerce_to_string(value),
        }
    }
}
