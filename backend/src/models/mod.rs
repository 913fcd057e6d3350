//! Domain models for the Ledgerflat pipeline.
//!
//! - [`FieldRule`] - How a canonical field is treated during row expansion
//! - [`CellRender`] - How the grid renders a column
//! - [`ColumnDescriptor`] - One interpreted header column
//! - [`CellValue`] - A single normalized value (text or number)
//! - [`NormalizedRecord`] - One flat output row

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A parsed CSV row: ordered raw cell strings.
pub type RawRow = Vec<String>;

// =============================================================================
// Field Classification
// =============================================================================

/// Canonical name of the date column.
pub const DATE_FIELD: &str = "date";

/// Canonical name of the transaction hash column.
pub const TX_HASH_FIELD: &str = "txHash";

/// Key of the synthesized record identifier. A column whose canonical name
/// is this key is stored under a renamed field.
pub const RECORD_ID_FIELD: &str = "id";

/// Fields that may carry one value per leg, separated by newlines.
pub const SPLITTABLE_FIELDS: [&str; 10] = [
    "buyAmount",
    "buyCurrency",
    "buyCurrencyAddress",
    "buyFiatAmount",
    "buyFiatCurrency",
    "sellAmount",
    "sellCurrency",
    "sellCurrencyAddress",
    "sellFiatAmount",
    "sellFiatCurrency",
];

/// Splittable amounts that are apportioned when given as a single total.
pub const DIVISIBLE_FIELDS: [&str; 4] = ["buyAmount", "buyFiatAmount", "sellAmount", "sellFiatAmount"];

/// Fee fields: kept on the first leg only.
pub const UNDUPLICATABLE_FIELDS: [&str; 4] = ["feeAmount", "feeCurrency", "feeFiatAmount", "feeFiatCurrency"];

/// Fields rendered as hyperlinks.
pub const LINKABLE_FIELDS: [&str; 1] = ["link"];

/// Expansion rule for a canonical field.
///
/// Resolved once per column by [`FieldRule::for_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldRule {
    /// `M/D/Y` reformatted to `Y/M/D`.
    Date,
    /// One value per line; `divisible` amounts are apportioned when single.
    Split { divisible: bool },
    /// Kept on line 0, blank on the following lines.
    Unduplicatable,
    /// Source of the record identifier.
    TxHash,
    /// Copied unchanged.
    Plain,
}

impl FieldRule {
    /// Look up the rule for a canonical field name.
    pub fn for_field(field: &str) -> Self {
        if field == DATE_FIELD {
            FieldRule::Date
        } else if SPLITTABLE_FIELDS.contains(&field) {
            FieldRule::Split {
                divisible: DIVISIBLE_FIELDS.contains(&field),
            }
        } else if UNDUPLICATABLE_FIELDS.contains(&field) {
            FieldRule::Unduplicatable
        } else if field == TX_HASH_FIELD {
            FieldRule::TxHash
        } else {
            FieldRule::Plain
        }
    }

    /// Short label used by `ledgerflat fields`.
    pub fn label(&self) -> &'static str {
        match self {
            FieldRule::Date => "date (M/D/Y -> Y/M/D)",
            FieldRule::Split { divisible: true } => "split per line, divided when single",
            FieldRule::Split { divisible: false } => "split per line, duplicated when single",
            FieldRule::Unduplicatable => "first line only",
            FieldRule::TxHash => "record id (suffixed _N)",
            FieldRule::Plain => "copied",
        }
    }
}

/// Grid rendering directive for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellRender {
    #[default]
    Text,
    /// Value is an URL opened in a new tab.
    Link,
}

impl CellRender {
    pub fn for_field(field: &str) -> Self {
        if LINKABLE_FIELDS.contains(&field) {
            CellRender::Link
        } else {
            CellRender::Text
        }
    }
}

// =============================================================================
// Columns
// =============================================================================

/// One interpreted header column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Canonical (lower camel case) field name.
    pub field: String,
    /// Original header text.
    pub header_name: String,
    /// Display width hint in pixels.
    pub width: f64,
    pub render: CellRender,
    pub rule: FieldRule,
}

// =============================================================================
// Records
// =============================================================================

/// A normalized cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One flat output row.
///
/// Serializes as a flat JSON object: `{ "id": ..., "<field>": ..., ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    #[serde(flatten)]
    pub values: HashMap<String, CellValue>,
}

impl NormalizedRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(field.into(), value.into());
    }
}
