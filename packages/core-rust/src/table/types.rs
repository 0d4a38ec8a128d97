//! Table engine types: column schemas and the sort/filter/pagination state
//! the data processor consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::{Row, Value};

/// Rows per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

type FormatFn = dyn Fn(Option<&Value>, &Row) -> String + Send + Sync;

/// Custom cell renderer: receives the cell value (`None` when the row lacks
/// the key) and the whole row.
///
/// Cloning shares the closure; equality is identity.
#[derive(Clone)]
pub struct Formatter(Arc<FormatFn>);

impl Formatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Row) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn format(&self, value: Option<&Value>, row: &Row) -> String {
        (self.0)(value, row)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A column declaration as written by the consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Key of the cell value in each row.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Opaque display width, e.g. `"120px"` or `"20%"`.
    #[serde(default)]
    pub width: Option<String>,
    /// Left when unset.
    #[serde(default)]
    pub align: Option<ColumnAlign>,
    /// Off when unset.
    #[serde(default)]
    pub sortable: Option<bool>,
    /// Off when unset.
    #[serde(default)]
    pub filterable: Option<bool>,
    /// Code-only; never loaded from data.
    #[serde(skip)]
    pub formatter: Option<Formatter>,
}

impl ColumnSchema {
    /// A column with every optional property unset.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            align: None,
            sortable: None,
            filterable: None,
            formatter: None,
        }
    }

    #[must_use]
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn align(mut self, align: ColumnAlign) -> Self {
        self.align = Some(align);
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = Some(true);
        self
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = Some(true);
        self
    }

    #[must_use]
    pub fn formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Value>, &Row) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Formatter::new(f));
        self
    }
}

/// A column with every optional property resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    /// Key of the cell value in each row.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Display width as declared; no default.
    pub width: Option<String>,
    /// Cell alignment, left when undeclared.
    pub align: ColumnAlign,
    /// Whether header clicks may sort by this column.
    pub sortable: bool,
    /// Whether filter text applies to this column.
    pub filterable: bool,
    /// Custom cell renderer; cells fall back to string coercion without one.
    pub formatter: Option<Formatter>,
}

impl From<&NormalizedColumn> for ColumnSchema {
    fn from(col: &NormalizedColumn) -> Self {
        Self {
            key: col.key.clone(),
            label: col.label.clone(),
            width: col.width.clone(),
            align: Some(col.align),
            sortable: Some(col.sortable),
            filterable: Some(col.filterable),
            formatter: col.formatter.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline state
// ---------------------------------------------------------------------------

/// Current sort. Both fields `None` means rows keep their original order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    /// Column key to sort by.
    pub field: Option<String>,
    /// Direction of the sort.
    pub order: Option<SortOrder>,
}

impl SortState {
    /// Sort by `field` in `order`.
    pub fn by(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: Some(field.into()),
            order: Some(order),
        }
    }

    /// Whether this state actually sorts anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.field.is_some() && self.order.is_some()
    }
}

/// Filter text per column key. Blank text means no constraint.
pub type FilterState = BTreeMap<String, String>;

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Output of [`process_data`](super::process_data).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedData<'a> {
    /// Rows of the served page, borrowed from the input.
    pub rows: Vec<&'a Row>,
    /// Row count after filtering, before pagination.
    pub total: usize,
    /// Always at least 1.
    pub total_pages: usize,
    /// The page actually served, after clamping into `1..=total_pages`.
    pub page: usize,
}
