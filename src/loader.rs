use crate::types::PaperRecord;
use crate::util::parse_count;
use std::error::Error;
use std::fs;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Read the usage sheet from disk and parse it.
///
/// The read itself is the only step that can fail; parsing is best-effort
/// and never errors (malformed rows are recovered or dropped per row).
pub fn load_from_path(path: &str) -> Result<(Vec<PaperRecord>, LoadReport), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_csv(&text))
}

/// Normalize a header cell into a stable field key, independent of the exact
/// header text in the source spreadsheet: trim, lower-case, collapse
/// whitespace/slash runs into a single underscore, drop everything outside
/// `[a-z0-9_]`. "Sheet Used" and "sheet  used" both map to `sheet_used`.
fn normalize_header(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '/' {
            pending_sep = true;
            continue;
        }
        if pending_sep {
            key.push('_');
            pending_sep = false;
        }
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '_' {
            key.push(c);
        }
    }
    if pending_sep {
        key.push('_');
    }
    key
}

/// Trim a raw field, then strip one layer of wrapping double-quotes if both
/// ends are quoted. No escaped-comma handling; commas always split fields.
fn clean_field(raw: &str) -> &str {
    let v = raw.trim();
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

/// Parse the full text of the published CSV into typed records.
///
/// Tolerates a leading BOM, any OS line endings, blank lines, inconsistent
/// column counts and unparsable numeric cells. A row is kept only if it has
/// a non-empty date or department; everything else is silently dropped.
/// Header-only or empty input yields an empty record set, not an error.
pub fn parse_csv(text: &str) -> (Vec<PaperRecord>, LoadReport) {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        let report = LoadReport {
            total_rows: 0,
            kept_rows: 0,
            dropped_rows: 0,
        };
        return (Vec::new(), report);
    }

    let headers: Vec<String> = lines[0].split(',').map(normalize_header).collect();

    let mut records: Vec<PaperRecord> = Vec::new();
    let mut dropped_rows = 0usize;
    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(',').map(clean_field).collect();

        let mut rec = PaperRecord {
            date: String::new(),
            user_type: String::new(),
            department: String::new(),
            pages_per_sheet: 0,
            total_pages: 0,
            copies: 0,
            sheet_used: 0,
        };
        for (idx, key) in headers.iter().enumerate() {
            // Rows shorter than the header read as empty fields rather than
            // failing on the column-count mismatch; extra trailing fields
            // and unknown columns are ignored.
            let value = fields.get(idx).copied().unwrap_or("");
            match key.as_str() {
                "date" => rec.date = value.to_string(),
                "user_type" => rec.user_type = value.to_string(),
                "department" => rec.department = value.to_string(),
                "pages_per_sheet" => rec.pages_per_sheet = parse_count(value),
                "total_pages" => rec.total_pages = parse_count(value),
                "copies" => rec.copies = parse_count(value),
                "sheet_used" => rec.sheet_used = parse_count(value),
                _ => {}
            }
        }

        if rec.date.is_empty() && rec.department.is_empty() {
            dropped_rows += 1;
            continue;
        }
        records.push(rec);
    }

    let report = LoadReport {
        total_rows: lines.len() - 1,
        kept_rows: records.len(),
        dropped_rows,
    };
    (records, report)
}
