//! Quote-aware CSV tables with a header row.
//!
//! Fields may be quoted to carry commas (`"10 km S of Dallas, TX"`), escaped
//! quotes (`""`) and line breaks. Columns are looked up by header name,
//! case-insensitively.

/// Split one logical CSV record respecting quoted fields.
pub fn csv_split(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Group physical lines into logical records; a record continues while a
/// quoted field is still open.
fn split_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut pending = String::new();
    let mut open_quotes = false;

    for line in text.lines() {
        if open_quotes {
            pending.push('\n');
        }
        pending.push_str(line);
        if line.matches('"').count() % 2 == 1 {
            open_quotes = !open_quotes;
        }
        if !open_quotes {
            records.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        records.push(pending);
    }
    records
}

/// Values treated as missing, compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["", "na", "nan", "n/a", "#n/a", "null", "none"];

/// A parsed table: header names plus string rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text. Returns `None` when there is no header row.
    ///
    /// Blank lines are skipped; short rows read as missing trailing fields.
    pub fn parse(text: &str) -> Option<Self> {
        let mut records = split_records(text)
            .into_iter()
            .filter(|r| !r.trim().is_empty());

        let header = records.next()?;
        let headers = csv_split(strip_bom(&header))
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let rows = records.map(|r| csv_split(&r)).collect();

        Some(Self { headers, rows })
    }

    /// Index of the first header matching any candidate (case-insensitive).
    pub fn column_index(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|candidate| {
            self.headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(candidate))
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trimmed field value, `None` when absent or a missing-value marker.
pub fn field(row: &[String], index: Option<usize>) -> Option<&str> {
    let value = row.get(index?)?.trim();
    if MISSING_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m)) {
        None
    } else {
        Some(value)
    }
}

/// Numeric field; unparseable or non-finite values read as missing.
pub fn numeric_field(row: &[String], index: Option<usize>) -> Option<f64> {
    field(row, index)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Drop a UTF-8 byte-order mark, whether decoded as UTF-8 or as cp1252.
fn strip_bom(header: &str) -> &str {
    header
        .strip_prefix('\u{FEFF}')
        .or_else(|| header.strip_prefix("\u{EF}\u{BB}\u{BF}"))
        .unwrap_or(header)
}
