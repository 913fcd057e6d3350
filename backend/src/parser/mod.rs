//! CSV tokenizer with encoding auto-detection.
//!
//! Produces raw rows (`Vec<Vec<String>>`) with the header kept as row 0.
//! Quoted cells may span several lines; those embedded newlines are what the
//! row expander later splits on. No ledger-specific logic here.

use encoding_rs::Encoding;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::RawRow;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// All rows, header first
    pub rows: Vec<RawRow>,
    /// Detected encoding label
    pub encoding: String,
}

impl ParsedCsv {
    /// Header labels (first row), empty if the file had no rows.
    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of data rows (excluding the header).
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(UTF8_BOM) {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "shift_jis" | "sjis" | "cp932" => "shift_jis".to_string(),
        "euc-jp" => "euc-jp".to_string(),
        other => {
            if Encoding::for_label(other.as_bytes()).is_some() {
                other.to_string()
            } else {
                "utf-8".to_string()
            }
        }
    }
}

/// Decode bytes to string using the specified encoding label.
///
/// A leading UTF-8 byte-order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        label => {
            let enc = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::EncodingError(encoding.to_string()))?;
            Ok(enc.decode_without_bom_handling(bytes).0.to_string())
        }
    }
}

/// Tokenize comma-separated content into rows.
///
/// Rows may have different lengths. CRLF line endings, including those inside
/// quoted cells, are normalized to `\n`.
pub fn parse_rows(content: &str) -> CsvResult<Vec<RawRow>> {
    let normalized = content.replace("\r\n", "\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(normalized.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Parse CSV bytes with auto-detection of encoding.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParsedCsv> {
    if bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes).is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let rows = parse_rows(&content)?;

    if rows.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    Ok(ParsedCsv { rows, encoding })
}

/// Parse a CSV file with auto-detection of encoding.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<ParsedCsv> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}
