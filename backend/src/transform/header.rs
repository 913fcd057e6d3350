//! Header interpretation: raw labels to column descriptors.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

use crate::models::{CellRender, ColumnDescriptor, FieldRule, RECORD_ID_FIELD};

static SPACE_THEN_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(" (.)").expect("valid regex"));

/// Convert a header label to its canonical field name.
///
/// The first character is lowercased, and every character following a space
/// is uppercased with the space removed.
///
/// ```
/// use ledgerflat::to_camel;
///
/// assert_eq!(to_camel("Buy Amount"), "buyAmount");
/// assert_eq!(to_camel("Tx Hash"), "txHash");
/// ```
pub fn to_camel(label: &str) -> String {
    let mut chars = label.chars();
    let lowered = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };

    SPACE_THEN_CHAR
        .replace_all(&lowered, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Width hint for a column, growing with the label length.
pub fn width_hint(label: &str) -> f64 {
    (label.chars().count() as f64 + 20.0).powf(1.5)
}

/// Field name for a column whose canonical name is the record id key:
/// `id_1`, `id_2`, ... skipping names already used by other columns.
fn rename_reserved(name: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{}_{}", name, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{}_", name))
}

/// Interpret the header row into column descriptors, in order.
///
/// A label whose canonical name is `id` would shadow the record id, so its
/// field is renamed to the first free `id_N`.
pub fn interpret_header(labels: &[String]) -> Vec<ColumnDescriptor> {
    let mut taken: HashSet<String> = labels.iter().map(|l| to_camel(l)).collect();

    labels
        .iter()
        .map(|label| {
            let canonical = to_camel(label);
            let field = if canonical == RECORD_ID_FIELD {
                let renamed = rename_reserved(&canonical, &taken);
                taken.insert(renamed.clone());
                renamed
            } else {
                canonical.clone()
            };
            ColumnDescriptor {
                render: CellRender::for_field(&canonical),
                rule: FieldRule::for_field(&canonical),
                width: width_hint(label),
                header_name: label.clone(),
                field,
            }
        })
        .collect()
}
