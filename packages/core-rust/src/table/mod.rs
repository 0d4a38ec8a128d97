//! Table engine: column normalization and the sort, filter, paginate
//! pipeline.
//!
//! ```
//! use liquid_logic_core::table::{
//!     build_initial_filter_state, parse_columns, process_data, ColumnSchema,
//!     PaginationState, SortOrder, SortState,
//! };
//! use liquid_logic_core::{Row, Value};
//!
//! let columns = parse_columns(&[ColumnSchema::new("score", "Score").sortable()]);
//! let rows: Vec<Row> = [30, 10, 20]
//!     .into_iter()
//!     .map(|s| Row::from([("score".to_string(), Value::from(s))]))
//!     .collect();
//!
//! let out = process_data(
//!     &rows,
//!     &columns,
//!     &SortState::by("score", SortOrder::Asc),
//!     &build_initial_filter_state(&columns),
//!     &PaginationState { page: 1, page_size: 2 },
//! );
//! assert_eq!(out.rows, vec![&rows[1], &rows[2]]);
//! assert_eq!((out.total, out.total_pages), (3, 2));
//! ```

pub mod data_processor;
pub mod schema_parser;
pub mod types;

pub use data_processor::{filter_rows, get_total_pages, paginate_rows, process_data, sort_rows};
pub use schema_parser::{
    build_initial_filter_state, build_initial_pagination_state, build_initial_sort_state,
    next_sort_state, parse_columns,
};
pub use types::{
    ColumnAlign, ColumnSchema, FilterState, Formatter, NormalizedColumn, PaginationState,
    ProcessedData, SortOrder, SortState, DEFAULT_PAGE_SIZE,
};
