//! Row expander: bundled multi-line ledger rows to flat records.
//!
//! A ledger export may pack several legs of one transaction into a single
//! row, one leg per line inside a cell. Each data row is expanded into as
//! many records as its tallest cell has lines:
//!
//! ```text
//! Tx Hash | Buy Amount | Buy Currency | Fee Amount      id      | buyAmount | buyCurrency | feeAmount
//! --------+------------+--------------+-----------  →  ---------+-----------+-------------+----------
//! 0xABC   | 10         | BTC          | 5                0xABC   | 10        | BTC         | 5
//!         | 20         | ETH          |                  0xABC_1 | 20        | ETH         |
//! ```
//!
//! Per-field behaviour is decided by the column's [`FieldRule`]. Cell-level
//! problems never abort the expansion; they are collected as
//! [`ExpansionWarning`]s next to the records.

use serde::Serialize;
use std::fmt;

use super::header::to_camel;
use crate::models::{CellValue, ColumnDescriptor, FieldRule, NormalizedRecord, RawRow};

/// Result of expanding all data rows
#[derive(Debug, Default, Serialize)]
pub struct Expansion {
    /// Flat records, in input row order then line order
    pub records: Vec<NormalizedRecord>,
    /// Cell-level problems encountered
    pub warnings: Vec<ExpansionWarning>,
    /// Number of data rows read (header excluded)
    pub rows_read: usize,
}

impl Expansion {
    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Expanded: {} rows into {} records, {} warnings",
            self.rows_read,
            self.records.len(),
            self.warnings.len()
        )
    }
}

/// A cell that could not be normalized as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionWarning {
    /// 1-based data row number (header excluded), 0 for the header
    pub row: usize,
    /// Canonical field name, empty for row-level warnings
    pub field: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WarningKind {
    /// The row has more lines than this cell; the missing lines are blank.
    MissingSegment { segments: usize, expected: usize },
    /// A single divisible amount is not a number; kept undivided.
    MalformedNumber { value: String },
    /// A date without three `/` parts; kept unchanged.
    MalformedDate { value: String },
    /// Cells past the last header column; ignored.
    ExtraCells { count: usize },
    /// A header label clashing with the record id; stored under `renamed`.
    RenamedField { renamed: String },
}

impl fmt::Display for ExpansionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::MissingSegment { segments, expected } => write!(
                f,
                "Row {}, '{}': {} lines but row has {}, missing lines left blank",
                self.row, self.field, segments, expected
            ),
            WarningKind::MalformedNumber { value } => write!(
                f,
                "Row {}, '{}': '{}' is not a number, kept undivided",
                self.row, self.field, value
            ),
            WarningKind::MalformedDate { value } => write!(
                f,
                "Row {}, '{}': '{}' is not M/D/Y, kept unchanged",
                self.row, self.field, value
            ),
            WarningKind::ExtraCells { count } => {
                write!(f, "Row {}: {} cells past the last column ignored", self.row, count)
            }
            WarningKind::RenamedField { renamed } => write!(
                f,
                "Header, '{}': clashes with the record id, stored as '{}'",
                self.field, renamed
            ),
        }
    }
}

/// Number of newline-delimited segments in a cell; an empty cell has none.
fn segment_count(cell: &str) -> usize {
    if cell.is_empty() {
        0
    } else {
        cell.split('\n').count()
    }
}

/// Number of records a raw row expands into.
pub fn expansion_count(row: &[String]) -> usize {
    row.iter().map(|cell| segment_count(cell)).max().unwrap_or(0)
}

/// Reformat `M/D/Y` as `Y/M/D` without validating the parts.
fn reformat_date(cell: &str) -> Option<String> {
    let parts: Vec<&str> = cell.split('/').collect();
    if parts.len() < 3 {
        return None;
    }
    Some(format!("{}/{}/{}", parts[2], parts[0], parts[1]))
}

/// Lenient numeric coercion: surrounding whitespace is ignored and a blank
/// string counts as zero. Non-finite results are rejected.
fn parse_amount(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Expand all parsed rows. Row 0 is the header and is skipped.
pub fn expand_rows(rows: &[RawRow], columns: &[ColumnDescriptor]) -> Expansion {
    let mut expansion = Expansion::default();

    for column in columns {
        let canonical = to_camel(&column.header_name);
        if canonical != column.field {
            expansion.warnings.push(ExpansionWarning {
                row: 0,
                field: canonical,
                kind: WarningKind::RenamedField {
                    renamed: column.field.clone(),
                },
            });
        }
    }

    // The last hash column wins, as it would when filling the record map.
    let tx_hash_index = columns.iter().rposition(|c| c.rule == FieldRule::TxHash);

    for (index, row) in rows.iter().enumerate().skip(1) {
        expansion.rows_read += 1;
        expand_row(row, index, columns, tx_hash_index, &mut expansion);
    }

    expansion
}

/// Expand one raw row into `expansion_count(row)` records.
fn expand_row(
    row: &[String],
    row_number: usize,
    columns: &[ColumnDescriptor],
    tx_hash_index: Option<usize>,
    out: &mut Expansion,
) {
    let count = expansion_count(row);
    if count == 0 {
        return;
    }

    if row.len() > columns.len() {
        out.warnings.push(ExpansionWarning {
            row: row_number,
            field: String::new(),
            kind: WarningKind::ExtraCells {
                count: row.len() - columns.len(),
            },
        });
    }

    // A blank or missing hash falls back to the row number.
    let base_id = tx_hash_index
        .and_then(|i| row.get(i))
        .filter(|hash| !hash.is_empty())
        .cloned()
        .unwrap_or_else(|| row_number.to_string());

    for line in 0..count {
        let id = if line > 0 {
            format!("{}_{}", base_id, line)
        } else {
            base_id.clone()
        };
        let mut record = NormalizedRecord::new(id);

        for (col_index, column) in columns.iter().enumerate() {
            let cell = row.get(col_index).map(String::as_str).unwrap_or("");
            let value = resolve_cell(cell, column, line, count, row_number, out);
            record.values.insert(column.field.clone(), value);
        }

        out.records.push(record);
    }
}

/// Resolve one cell for one line index according to its column's rule.
///
/// Warnings are only recorded on line 0 so each problem is reported once.
fn resolve_cell(
    cell: &str,
    column: &ColumnDescriptor,
    line: usize,
    count: usize,
    row_number: usize,
    out: &mut Expansion,
) -> CellValue {
    let mut warn = |kind: WarningKind| {
        if line == 0 {
            out.warnings.push(ExpansionWarning {
                row: row_number,
                field: column.field.clone(),
                kind,
            });
        }
    };

    match column.rule {
        FieldRule::Date => match reformat_date(cell) {
            Some(date) => CellValue::Text(date),
            None => {
                if !cell.is_empty() {
                    warn(WarningKind::MalformedDate {
                        value: cell.to_string(),
                    });
                }
                CellValue::from(cell)
            }
        },

        FieldRule::Split { divisible } => {
            let segments: Vec<&str> = cell.split('\n').collect();

            if segments.len() > 1 {
                if segments.len() < count {
                    warn(WarningKind::MissingSegment {
                        segments: segments.len(),
                        expected: count,
                    });
                }
                segments
                    .get(line)
                    .map(|s| CellValue::from(*s))
                    .unwrap_or_else(CellValue::empty)
            } else if divisible {
                if cell.is_empty() {
                    return CellValue::empty();
                }
                match parse_amount(cell) {
                    Some(total) => CellValue::Number(total / count as f64),
                    None => {
                        warn(WarningKind::MalformedNumber {
                            value: cell.to_string(),
                        });
                        CellValue::from(cell)
                    }
                }
            } else {
                CellValue::from(cell)
            }
        }

        FieldRule::Unduplicatable => {
            if line == 0 {
                CellValue::from(cell)
            } else {
                CellValue::empty()
            }
        }

        FieldRule::TxHash | FieldRule::Plain => CellValue::from(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::header::interpret_header;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn expand(rows: &[RawRow]) -> Expansion {
        let columns = interpret_header(&rows[0]);
        expand_rows(rows, &columns)
    }

    fn text(record: &NormalizedRecord, field: &str) -> String {
        record.get(field).map(|v| v.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_expansion_count() {
        assert_eq!(expansion_count(&row(&["a", "1\n2\n3", "x\ny"])), 3);
        assert_eq!(expansion_count(&row(&["a", "b"])), 1);
        assert_eq!(expansion_count(&row(&["", ""])), 0);
        assert_eq!(expansion_count(&[]), 0);
        // A trailing newline still opens a new line.
        assert_eq!(expansion_count(&row(&["1\n"])), 2);
    }

    #[test]
    fn test_date_reformat() {
        let rows = vec![row(&["Date", "Tx Hash"]), row(&["3/14/2021", "0x1"])];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 1);
        assert_eq!(text(&result.records[0], "date"), "2021/3/14");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_malformed_date_kept() {
        let rows = vec![row(&["Date"]), row(&["2021-03-14"])];
        let result = expand(&rows);

        assert_eq!(text(&result.records[0], "date"), "2021-03-14");
        assert!(matches!(result.warnings[0].kind, WarningKind::MalformedDate { .. }));
    }

    #[test]
    fn test_splittable_multiline() {
        let rows = vec![
            row(&["Date", "Buy Amount", "Buy Currency", "Comment", "Tx Hash"]),
            row(&["1/2/2021", "10\n20", "BTC", "note", "0xABC"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].get("buyAmount"), Some(&CellValue::from("10")));
        assert_eq!(result.records[1].get("buyAmount"), Some(&CellValue::from("20")));

        for record in &result.records {
            assert_eq!(text(record, "buyCurrency"), "BTC");
            assert_eq!(text(record, "comment"), "note");
            assert_eq!(text(record, "date"), "2021/1/2");
            assert_eq!(text(record, "txHash"), "0xABC");
        }
    }

    #[test]
    fn test_divisible_apportionment() {
        let rows = vec![
            row(&["Buy Amount", "Buy Currency", "Tx Hash"]),
            row(&["100", "BTC\nETH", "0x1"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 2);
        for record in &result.records {
            assert_eq!(record.get("buyAmount"), Some(&CellValue::Number(50.0)));
        }
        assert_eq!(text(&result.records[0], "buyCurrency"), "BTC");
        assert_eq!(text(&result.records[1], "buyCurrency"), "ETH");
    }

    #[test]
    fn test_divisible_single_line_row() {
        let rows = vec![row(&["Sell Amount"]), row(&["7.5"])];
        let result = expand(&rows);

        assert_eq!(result.records[0].get("sellAmount"), Some(&CellValue::Number(7.5)));
    }

    #[test]
    fn test_divisible_empty_stays_empty() {
        let rows = vec![
            row(&["Buy Fiat Amount", "Sell Currency"]),
            row(&["", "A\nB"]),
        ];
        let result = expand(&rows);

        for record in &result.records {
            assert_eq!(record.get("buyFiatAmount"), Some(&CellValue::empty()));
        }
    }

    #[test]
    fn test_divisible_malformed_number() {
        let rows = vec![
            row(&["Buy Amount", "Buy Currency"]),
            row(&["1,000", "A\nB"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 2);
        for record in &result.records {
            assert_eq!(text(record, "buyAmount"), "1,000");
        }
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::MalformedNumber { value: "1,000".into() }
        );
    }

    #[test]
    fn test_non_divisible_single_duplicated() {
        let rows = vec![
            row(&["Buy Currency Address", "Buy Amount"]),
            row(&["0xdead", "1\n2\n3"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 3);
        for record in &result.records {
            assert_eq!(text(record, "buyCurrencyAddress"), "0xdead");
        }
    }

    #[test]
    fn test_unduplicatable() {
        let rows = vec![
            row(&["Fee Amount", "Fee Currency", "Buy Amount"]),
            row(&["5", "JPY", "1\n2\n3"]),
        ];
        let result = expand(&rows);

        let fees: Vec<String> = result.records.iter().map(|r| text(r, "feeAmount")).collect();
        assert_eq!(fees, vec!["5", "", ""]);
        let currencies: Vec<String> = result.records.iter().map(|r| text(r, "feeCurrency")).collect();
        assert_eq!(currencies, vec!["JPY", "", ""]);
    }

    #[test]
    fn test_id_suffixing() {
        let rows = vec![
            row(&["Tx Hash", "Sell Amount"]),
            row(&["0xABC", "1\n2\n3"]),
        ];
        let result = expand(&rows);

        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0xABC", "0xABC_1", "0xABC_2"]);
        // The raw hash column keeps the unsuffixed value.
        assert_eq!(text(&result.records[2], "txHash"), "0xABC");
    }

    #[test]
    fn test_id_without_tx_hash_column() {
        let rows = vec![
            row(&["Buy Amount"]),
            row(&["1"]),
            row(&["1\n2"]),
        ];
        let result = expand(&rows);

        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "2_1"]);
    }

    #[test]
    fn test_blank_hash_uses_row_number() {
        let rows = vec![
            row(&["Tx Hash", "Buy Amount"]),
            row(&["", "1\n2"]),
            row(&["", "3"]),
            row(&["0xA", "4"]),
            row(&[]),
        ];
        let result = expand(&rows);

        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "1_1", "2", "0xA"]);
        assert_eq!(text(&result.records[0], "txHash"), "");
    }

    #[test]
    fn test_id_column_does_not_shadow_record_id() {
        let rows = vec![row(&["Id", "Tx Hash"]), row(&["7", "0xA"])];
        let result = expand(&rows);

        let record = &result.records[0];
        assert_eq!(record.id, "0xA");
        assert_eq!(text(record, "id_1"), "7");
        assert_eq!(
            result.warnings,
            vec![ExpansionWarning {
                row: 0,
                field: "id".into(),
                kind: WarningKind::RenamedField { renamed: "id_1".into() },
            }]
        );

        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["id"], "0xA");
        assert_eq!(json["id_1"], "7");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_row_yields_nothing() {
        let rows = vec![
            row(&["Date", "Buy Amount", "Tx Hash"]),
            row(&["", "", ""]),
            row(&["1/1/2020", "1", "0x1"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.rows_read, 2);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id, "0x1");
    }

    #[test]
    fn test_missing_segment_is_blank() {
        let rows = vec![
            row(&["Buy Amount", "Buy Currency", "Sell Amount"]),
            row(&["1\n2", "A\nB", "9\n8\n7"]),
        ];
        let result = expand(&rows);

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[2].get("buyAmount"), Some(&CellValue::empty()));
        assert_eq!(result.records[2].get("buyCurrency"), Some(&CellValue::empty()));
        assert_eq!(text(&result.records[2], "sellAmount"), "7");

        let missing: Vec<&str> = result
            .warnings
            .iter()
            .filter(|w| matches!(w.kind, WarningKind::MissingSegment { .. }))
            .map(|w| w.field.as_str())
            .collect();
        assert_eq!(missing, vec!["buyAmount", "buyCurrency"]);
    }

    #[test]
    fn test_short_and_long_rows() {
        let rows = vec![
            row(&["Comment", "Fee Amount"]),
            row(&["only"]),
            row(&["a", "1", "extra\nlines"]),
        ];
        let result = expand(&rows);

        assert_eq!(text(&result.records[0], "feeAmount"), "");
        // Extra cells still drive the expansion count.
        assert_eq!(result.records.len(), 3);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::ExtraCells { count: 1 }));
    }

    #[test]
    fn test_row_order_preserved() {
        let rows = vec![
            row(&["Tx Hash", "Buy Amount"]),
            row(&["0x1", "1\n2"]),
            row(&["0x2", "3"]),
        ];
        let result = expand(&rows);

        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0x1", "0x1_1", "0x2"]);
    }

    #[test]
    fn test_header_only() {
        let rows = vec![row(&["Date"])];
        let result = expand(&rows);
        assert!(result.records.is_empty());
        assert_eq!(result.rows_read, 0);
    }

    #[test]
    fn test_summary() {
        let rows = vec![row(&["Buy Amount"]), row(&["1\n2"])];
        let result = expand(&rows);
        assert_eq!(result.summary(), "Expanded: 1 rows into 2 records, 0 warnings");
    }
}
