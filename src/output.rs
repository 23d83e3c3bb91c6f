use crate::types::PaperRecord;
use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print the first `max_rows` rows as a markdown table.
pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Header of the record re-export. Fixed 7 columns regardless of what the
/// source sheet's headers looked like.
pub const EXPORT_HEADER: &str =
    "Date,Department,User Type,Pages/Sheet,Total Pages,Copies,Sheets Used";

// Free-text fields are always wrapped and embedded quotes doubled. The
// export is one-way; the parser's naive comma split would not read it back.
fn quote_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Serialize the filtered record set back to comma-separated text.
pub fn render_export(records: &[PaperRecord]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    for r in records {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{},{},{},{}",
            r.date,
            quote_field(&r.department),
            quote_field(&r.user_type),
            r.pages_per_sheet,
            r.total_pages,
            r.copies,
            r.sheet_used
        ));
    }
    out
}

pub fn export_records(path: &str, records: &[PaperRecord]) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, render_export(records))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, dept: &str, user: &str) -> PaperRecord {
        PaperRecord {
            date: date.to_string(),
            user_type: user.to_string(),
            department: dept.to_string(),
            pages_per_sheet: 2,
            total_pages: 20,
            copies: 1,
            sheet_used: 10,
        }
    }

    #[test]
    fn export_starts_with_the_fixed_header() {
        let out = render_export(&[]);
        assert_eq!(out, EXPORT_HEADER);
    }

    #[test]
    fn export_wraps_text_fields_and_doubles_quotes() {
        let out = render_export(&[record("2023-01-15", "R\"D", "Staff")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], EXPORT_HEADER);
        assert_eq!(lines[1], "2023-01-15,\"R\"\"D\",\"Staff\",2,20,1,10");
    }
}
