// Entry point and high-level console flow.
//
// The console binary is the presentation layer:
// - Option [1] loads and parses the usage CSV, printing diagnostics.
// - Option [2] prompts for year/department filters, prints the dashboard
//   views, and writes the report/export files.
// The data-processing core (loader, util, analytics) stays free of any UI
// concerns; filtering and view selection live here.
mod analytics;
mod loader;
mod output;
mod types;
mod util;

use chrono::Local;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{DepartmentUsageRow, EfficiencyRow, PaperRecord, TrendRow};

const DATA_PATH: &str = "paper_usage.csv";

// Simple in-memory app state so we only load/parse the CSV once but can
// view the dashboard with different filters in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<PaperRecord>>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the main menu after viewing the
/// dashboard. Returns `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Main Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Offer a numbered choice over `options` with `[0]` meaning "All".
/// Returns `None` when no specific value was selected.
fn prompt_filter(label: &str, options: &[String]) -> Option<String> {
    println!("{}:", label);
    println!("[0] All");
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx + 1, opt);
    }
    loop {
        let choice = read_choice();
        if choice.is_empty() || choice == "0" {
            return None;
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1].clone()),
            _ => println!("Invalid choice. Please enter 0-{}.", options.len()),
        }
    }
}

/// Filter predicate: the year filter matches via the cheap year extraction
/// (the same path that populated the year choices), the department filter
/// matches exactly.
fn apply_filters(
    data: &[PaperRecord],
    year: Option<&str>,
    department: Option<&str>,
) -> Vec<PaperRecord> {
    data.iter()
        .filter(|r| {
            let matches_year = match year {
                Some(y) => util::year_of(&r.date) == y,
                None => true,
            };
            let matches_dept = match department {
                Some(d) => r.department == d,
                None => true,
            };
            matches_year && matches_dept
        })
        .cloned()
        .collect()
}

/// Handle option [1]: load and parse the usage CSV file.
///
/// On success the records are stored in `APP_STATE` and a short summary of
/// the load is printed. A read failure is the one fatal condition; it is
/// reported as a single message and no partial data is kept.
fn handle_load() {
    match loader::load_from_path(DATA_PATH) {
        Ok((data, report)) => {
            println!(
                "Processing usage data... ({} rows read, {} records kept)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.kept_rows as i64)
            );
            if report.dropped_rows > 0 {
                println!(
                    "Note: {} rows dropped (no date or department).",
                    util::format_int(report.dropped_rows as i64)
                );
            }
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Unable to load usage data: {}\n", e);
        }
    }
}

fn print_stats(stats: &types::DashboardStats) {
    println!("Overall Usage");
    println!(
        "  Total Sheets Used:     {}",
        util::format_int(stats.total_sheets)
    );
    println!(
        "  Total Requests:        {}",
        util::format_int(stats.total_requests)
    );
    println!(
        "  Sheets Saved (duplex): {}",
        util::format_int(stats.total_saved_sheets)
    );
    println!("Environmental Impact (Est.)");
    println!(
        "  Trees Consumed: {} trees",
        util::format_number(stats.trees_consumed, 2)
    );
    println!(
        "  CO2 Emissions:  {} kg",
        util::format_number(stats.co2_kg, 1)
    );
    println!(
        "  Water Usage:    {} liters\n",
        util::format_number(stats.water_liters, 0)
    );
}

/// Handle option [2]: prompt for filters, print the dashboard views and
/// write the report/export files for the filtered set.
fn handle_dashboard() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    // Filter choices, the console analogue of the dashboard dropdowns. The
    // year list comes from the cheap year extraction and may include
    // "Unknown"; departments are the distinct non-empty values.
    let years: Vec<String> = data
        .iter()
        .map(|r| util::year_of(&r.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let departments: Vec<String> = data
        .iter()
        .filter(|r| !r.department.is_empty())
        .map(|r| r.department.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let year_filter = prompt_filter("Filter by year", &years);
    let dept_filter = prompt_filter("Filter by department", &departments);
    let filtered = apply_filters(&data, year_filter.as_deref(), dept_filter.as_deref());

    println!(
        "\nShowing usage for {} / {}\n",
        year_filter.as_deref().unwrap_or("All Years"),
        dept_filter.as_deref().unwrap_or("All Departments")
    );

    match analytics::overall_stats(&filtered) {
        Some(stats) => {
            print_stats(&stats);
            if let Err(e) = output::write_json("summary.json", &stats) {
                eprintln!("Write error: {}", e);
            }
            println!("(Stats exported to summary.json)\n");
        }
        None => {
            println!("No records match the current filters.\n");
        }
    }

    let dept_points = analytics::usage_by_department(&filtered);
    let dept_rows: Vec<DepartmentUsageRow> = dept_points
        .iter()
        .map(|p| DepartmentUsageRow {
            department: p.name.clone(),
            sheets_used: util::format_int(p.value),
        })
        .collect();
    let dept_file = "report_department_usage.csv";
    if let Err(e) = output::write_csv(dept_file, &dept_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Sheet Usage by Department\n");
    output::preview_table(&dept_rows, 5);
    println!("(Full table exported to {})\n", dept_file);

    let ratio = analytics::efficiency_ratio(&filtered);
    let total_requests: i64 = ratio.iter().map(|p| p.value).sum();
    let ratio_rows: Vec<EfficiencyRow> = ratio
        .iter()
        .map(|p| {
            let share = if total_requests == 0 {
                0.0
            } else {
                (p.value as f64 / total_requests as f64) * 100.0
            };
            EfficiencyRow {
                category: p.name.clone(),
                requests: p.value,
                share: format!("{}%", util::format_number(share, 1)),
            }
        })
        .collect();
    let ratio_file = "report_efficiency_ratio.csv";
    if let Err(e) = output::write_csv(ratio_file, &ratio_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Print Efficiency Ratio\n");
    output::preview_table(&ratio_rows, 2);
    println!("(Full table exported to {})\n", ratio_file);

    // Trend selection policy: with no year filter the yearly view is the
    // useful one; within a selected year, show the months.
    let (trend_title, trend) = match year_filter {
        None => ("Yearly Sheet Usage Trend", analytics::yearly_trend(&filtered)),
        Some(_) => (
            "Monthly Sheet Usage Trend",
            analytics::monthly_trend(&filtered),
        ),
    };
    let trend_rows: Vec<TrendRow> = trend
        .iter()
        .map(|p| TrendRow {
            period: p.date.clone(),
            sheets_used: util::format_int(p.sheets),
        })
        .collect();
    let trend_file = "report_usage_trend.csv";
    if let Err(e) = output::write_csv(trend_file, &trend_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("{}\n", trend_title);
    output::preview_table(&trend_rows, 6);
    println!("(Full table exported to {})\n", trend_file);

    if filtered.is_empty() {
        println!("(No records to export.)\n");
    } else {
        let export_file = format!(
            "ecoprint_export_{}.csv",
            Local::now().format("%Y-%m-%d")
        );
        if let Err(e) = output::export_records(&export_file, &filtered) {
            eprintln!("Write error: {}", e);
        }
        println!(
            "({} records exported to {})\n",
            util::format_int(filtered.len()),
            export_file
        );
    }
}

fn main() {
    loop {
        println!("EcoPrint Analytics");
        println!("[1] Load usage data");
        println!("[2] View dashboard\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_dashboard();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, dept: &str) -> PaperRecord {
        PaperRecord {
            date: date.to_string(),
            user_type: String::new(),
            department: dept.to_string(),
            pages_per_sheet: 1,
            total_pages: 0,
            copies: 0,
            sheet_used: 1,
        }
    }

    #[test]
    fn filters_match_year_via_cheap_extraction_and_department_exactly() {
        let data = vec![
            record("2023-01-15", "HR"),
            record("15/01/2022", "HR"),
            record("2023-03-01", "IT"),
            record("garbled", "IT"),
        ];
        assert_eq!(apply_filters(&data, None, None).len(), 4);
        assert_eq!(apply_filters(&data, Some("2023"), None).len(), 2);
        assert_eq!(apply_filters(&data, Some("2022"), None).len(), 1);
        assert_eq!(apply_filters(&data, Some("Unknown"), None).len(), 1);
        assert_eq!(apply_filters(&data, None, Some("IT")).len(), 2);
        assert_eq!(apply_filters(&data, Some("2023"), Some("IT")).len(), 1);
        assert_eq!(apply_filters(&data, Some("2023"), Some("Legal")).len(), 0);
    }
}
