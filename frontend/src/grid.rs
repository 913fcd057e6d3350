//! Grid state helpers: sorting, pagination and row selection.
//!
//! Kept free of Leptos so the behaviour can be tested natively.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::types::Row;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

/// Next sort after clicking a column header: asc, then desc, then unsorted.
pub fn next_sort(current: Option<&SortState>, field: &str) -> Option<SortState> {
    match current {
        Some(s) if s.field == field => match s.direction {
            SortDirection::Asc => Some(SortState {
                field: field.to_string(),
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortState {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }),
    }
}

/// Text shown in a cell. Numbers print like the exported CSV: `50`, not `50.0`.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Row id, empty if missing.
pub fn row_id(row: &Row) -> String {
    cell_text(row.get("id"))
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => cell_text(a).cmp(&cell_text(b)),
    }
}

/// Stable sort of rows by one field. Numbers compare numerically.
pub fn sort_rows(rows: &[Row], sort: Option<&SortState>) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if let Some(sort) = sort {
        sorted.sort_by(|a, b| {
            let ord = compare_cells(a.get(&sort.field), b.get(&sort.field));
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    sorted
}

/// Number of pages, at least one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Rows on a 0-based page; out-of-range pages are empty.
pub fn page_slice(rows: &[Row], page: usize, page_size: usize) -> &[Row] {
    let start = page.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// Add or remove one id from the selection.
pub fn toggle_selection(selection: &mut BTreeSet<String>, id: &str) {
    if !selection.remove(id) {
        selection.insert(id.to_string());
    }
}

/// Select every row on the page, or clear them if all are already selected.
pub fn toggle_page_selection(selection: &mut BTreeSet<String>, page: &[Row]) {
    let ids: Vec<String> = page.iter().map(row_id).collect();
    if !ids.is_empty() && ids.iter().all(|id| selection.contains(id)) {
        for id in &ids {
            selection.remove(id);
        }
    } else {
        selection.extend(ids);
    }
}
