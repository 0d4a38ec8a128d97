//! The `table` and `form` commands.
//!
//! Both return the text to print on stdout; the binary only decides where it
//! goes and which exit status to use.

use liquid_logic_core::form::{
    build_initial_values, extract_errors, get_hidden_field_keys, get_visible_fields,
    is_form_valid, parse_schema, validate_form, FieldSchema, NormalizedField,
};
use liquid_logic_core::table::{
    build_initial_filter_state, build_initial_pagination_state, build_initial_sort_state,
    next_sort_state, parse_columns, process_data, ColumnSchema, FilterState, NormalizedColumn,
    SortOrder, SortState,
};
use liquid_logic_core::{FormData, Row};

use crate::config::{FormArgs, OutputFormat, TableArgs, TableConfig};
use crate::error::CliError;
use crate::input::load_document;
use crate::render::{render_form, render_table, FormReport};

// ---------------------------------------------------------------------------
// table
// ---------------------------------------------------------------------------

/// Replays header clicks on the requested column until it reaches the
/// requested order.
fn resolve_sort(
    requested: Option<&SortState>,
    columns: &[NormalizedColumn],
) -> Result<SortState, CliError> {
    let initial = build_initial_sort_state();
    let Some(SortState {
        field: Some(field),
        order,
    }) = requested
    else {
        return Ok(initial);
    };
    let column = columns
        .iter()
        .find(|col| &col.key == field)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown sort column `{field}`")))?;

    let clicks = match order {
        Some(SortOrder::Desc) => 2,
        _ => 1,
    };
    let sort = (0..clicks).fold(initial, |state, _| next_sort_state(&state, column));
    if !sort.is_active() {
        tracing::warn!(column = %field, "column is not sortable, keeping input order");
    }
    Ok(sort)
}

fn resolve_filters(requested: &[(String, String)], columns: &[NormalizedColumn]) -> FilterState {
    let mut filters = build_initial_filter_state(columns);
    for (key, text) in requested {
        match filters.get_mut(key) {
            Some(slot) => text.clone_into(slot),
            None => tracing::warn!(column = %key, "column is not filterable, filter ignored"),
        }
    }
    filters
}

/// Loads columns and rows, runs the pipeline and renders the served page.
///
/// # Errors
///
/// Fails on unreadable input, an unknown sort column, a zero page size, or
/// output that cannot be encoded.
pub fn run_table(args: &TableArgs, config: &TableConfig) -> Result<String, CliError> {
    let schemas: Vec<ColumnSchema> = load_document(&args.columns)?;
    let rows: Vec<Row> = load_document(&args.rows)?;
    let columns = parse_columns(&schemas);

    let page_size = args.page_size.unwrap_or(config.page_size);
    if page_size == 0 {
        return Err(CliError::InvalidArgument(
            "page size must be at least 1".to_string(),
        ));
    }
    let sort = resolve_sort(args.sort.as_ref(), &columns)?;
    let filters = resolve_filters(&args.filters, &columns);
    let mut pagination = build_initial_pagination_state(page_size);
    pagination.page = args.page;

    let processed = process_data(&rows, &columns, &sort, &filters, &pagination);
    tracing::info!(
        rows = rows.len(),
        matched = processed.total,
        page = processed.page,
        total_pages = processed.total_pages,
        "table processed"
    );

    match args.output {
        OutputFormat::Text => Ok(render_table(&columns, &processed, config)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&processed)?),
    }
}

// ---------------------------------------------------------------------------
// form
// ---------------------------------------------------------------------------

/// Validates the visible fields and strips hidden fields' values from `data`.
#[must_use]
pub fn evaluate_form(fields: &[NormalizedField], mut data: FormData) -> FormReport {
    let visible = get_visible_fields(fields, &data);
    let results = validate_form(&visible, &data);
    let hidden_fields = get_hidden_field_keys(fields, &data);
    for key in &hidden_fields {
        data.remove(key);
    }
    FormReport {
        valid: is_form_valid(&results),
        errors: extract_errors(&results),
        hidden_fields,
        data,
        results,
    }
}

/// Result of the `form` command.
#[derive(Debug, Clone)]
pub struct FormOutcome {
    pub valid: bool,
    pub output: String,
}

/// Loads the schema and data, then evaluates and renders the form.
///
/// Without a data file the schema's default values are evaluated.
///
/// # Errors
///
/// Fails on unreadable input or output that cannot be encoded.
pub fn run_form(args: &FormArgs) -> Result<FormOutcome, CliError> {
    let schemas: Vec<FieldSchema> = load_document(&args.schema)?;
    let fields = parse_schema(&schemas);
    let data: FormData = match &args.data {
        Some(path) => load_document(path)?,
        None => build_initial_values(&fields),
    };

    let report = evaluate_form(&fields, data);
    tracing::info!(
        fields = fields.len(),
        hidden = report.hidden_fields.len(),
        errors = report.errors.len(),
        valid = report.valid,
        "form evaluated"
    );

    let output = match args.output {
        OutputFormat::Text => render_form(&fields, &report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    Ok(FormOutcome {
        valid: report.valid,
        output,
    })
}
