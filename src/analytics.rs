//! Pure aggregation functions over the parsed record set.
//!
//! Every function here takes the already-filtered records as a slice and
//! returns a freshly allocated derived view; nothing is mutated or shared,
//! so the caller can recompute on every filter change.
use crate::types::{ChartDataPoint, DashboardStats, PaperRecord, TrendPoint};
use crate::util::resolve_date;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

// Environmental conversion factors (Environmental Paper Network and generic
// industry averages): one tree yields ~8,333 sheets of standard copy paper;
// one sheet costs ~4.5g of CO2 and ~0.3 liters of water over its lifecycle.
pub const SHEETS_PER_TREE: f64 = 8333.0;
pub const CO2_KG_PER_SHEET: f64 = 0.0045;
pub const WATER_LITERS_PER_SHEET: f64 = 0.3;

const SIMPLEX_COLOR: &str = "#f87171";
const DUPLEX_COLOR: &str = "#34d399";

/// Overall usage and environmental-impact snapshot.
///
/// Returns `None` for an empty record set: an empty filter result means
/// "no stats", not a zero-filled snapshot. Duplex savings count only
/// records with `pages_per_sheet` exactly 2.
pub fn overall_stats(data: &[PaperRecord]) -> Option<DashboardStats> {
    if data.is_empty() {
        return None;
    }
    let mut total_sheets = 0i64;
    let mut total_saved_sheets = 0i64;
    for r in data {
        total_sheets += r.sheet_used;
        if r.pages_per_sheet == 2 {
            total_saved_sheets += r.sheet_used;
        }
    }
    Some(DashboardStats {
        total_sheets,
        total_requests: data.len(),
        total_saved_sheets,
        trees_consumed: total_sheets as f64 / SHEETS_PER_TREE,
        co2_kg: total_sheets as f64 * CO2_KG_PER_SHEET,
        water_liters: total_sheets as f64 * WATER_LITERS_PER_SHEET,
    })
}

/// Sheets used per department, sorted descending by usage.
///
/// Records without a department land under the "Unknown" label. Ties keep
/// department-name order (the BTreeMap grouping plus a stable sort), so the
/// output is deterministic.
pub fn usage_by_department(data: &[PaperRecord]) -> Vec<ChartDataPoint> {
    let mut map: BTreeMap<&str, i64> = BTreeMap::new();
    for r in data {
        let dept = if r.department.is_empty() {
            "Unknown"
        } else {
            r.department.as_str()
        };
        *map.entry(dept).or_insert(0) += r.sheet_used;
    }
    let mut points: Vec<ChartDataPoint> = map
        .into_iter()
        .map(|(name, value)| ChartDataPoint {
            name: name.to_string(),
            value,
            color: None,
        })
        .collect();
    points.sort_by(|a, b| b.value.cmp(&a.value));
    points
}

/// Two-bucket duplex-vs-simplex split of the record count.
///
/// Always returns exactly two points in fixed order, single-page first.
/// Records with a missing or zero `pages_per_sheet` count as single-page.
pub fn efficiency_ratio(data: &[PaperRecord]) -> Vec<ChartDataPoint> {
    let mut single = 0i64;
    let mut multi = 0i64;
    for r in data {
        if r.pages_per_sheet > 1 {
            multi += 1;
        } else {
            single += 1;
        }
    }
    vec![
        ChartDataPoint {
            name: "1 Page/Sheet".to_string(),
            value: single,
            color: Some(SIMPLEX_COLOR),
        },
        ChartDataPoint {
            name: "2+ Pages/Sheet".to_string(),
            value: multi,
            color: Some(DUPLEX_COLOR),
        },
    ]
}

/// Sheets used per (year, month) bucket, chronologically ascending.
///
/// Records whose date cannot be resolved are excluded. Labels render as
/// abbreviated month plus 2-digit year ("Jan 23"); ordering follows the
/// underlying (year, month) key, never the label string.
pub fn monthly_trend(data: &[PaperRecord]) -> Vec<TrendPoint> {
    let mut map: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for r in data {
        if let Some(d) = resolve_date(&r.date) {
            *map.entry((d.year(), d.month())).or_insert(0) += r.sheet_used;
        }
    }
    map.into_iter()
        .map(|((year, month), sheets)| {
            let date = match NaiveDate::from_ymd_opt(year, month, 1) {
                Some(d) => d.format("%b %y").to_string(),
                None => format!("{:02}/{}", month, year),
            };
            TrendPoint { date, sheets }
        })
        .collect()
}

/// Sheets used per year bucket, chronologically ascending; labels are the
/// plain 4-digit year. Uses the same date resolution (and therefore the
/// same exclusions) as [`monthly_trend`].
pub fn yearly_trend(data: &[PaperRecord]) -> Vec<TrendPoint> {
    let mut map: BTreeMap<i32, i64> = BTreeMap::new();
    for r in data {
        if let Some(d) = resolve_date(&r.date) {
            *map.entry(d.year()).or_insert(0) += r.sheet_used;
        }
    }
    map.into_iter()
        .map(|(year, sheets)| TrendPoint {
            date: year.to_string(),
            sheets,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_csv;

    fn record(date: &str, dept: &str, pages_per_sheet: i64, sheet_used: i64) -> PaperRecord {
        PaperRecord {
            date: date.to_string(),
            user_type: String::new(),
            department: dept.to_string(),
            pages_per_sheet,
            total_pages: 0,
            copies: 0,
            sheet_used,
        }
    }

    #[test]
    fn stats_sum_sheets_and_duplex_savings_exactly() {
        let data = vec![record("2023-01-15", "HR", 2, 8), record("2023-01-16", "IT", 1, 4)];
        let stats = overall_stats(&data).unwrap();
        assert_eq!(stats.total_sheets, 12);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.total_saved_sheets, 8);
    }

    #[test]
    fn duplex_savings_require_exactly_two_pages_per_sheet() {
        // 4-up printing does not count toward savings; the check is strict
        // equality, not a threshold.
        let data = vec![
            record("2023-01-15", "HR", 2, 8),
            record("2023-01-16", "HR", 4, 6),
            record("2023-01-17", "HR", 0, 3),
        ];
        let stats = overall_stats(&data).unwrap();
        assert_eq!(stats.total_sheets, 17);
        assert_eq!(stats.total_saved_sheets, 8);
    }

    #[test]
    fn stats_are_absent_for_empty_input() {
        assert!(overall_stats(&[]).is_none());
    }

    #[test]
    fn environmental_figures_are_linear_in_total_sheets() {
        let data = vec![record("2023-01-15", "HR", 1, 8333)];
        let stats = overall_stats(&data).unwrap();
        assert!((stats.trees_consumed - 1.0).abs() < 1e-9);
        assert!((stats.co2_kg - 8333.0 * 0.0045).abs() < 1e-9);
        assert!((stats.water_liters - 8333.0 * 0.3).abs() < 1e-9);
    }

    #[test]
    fn department_usage_sorts_descending_with_unknown_bucket() {
        let data = vec![
            record("2023-01-15", "HR", 1, 5),
            record("2023-01-16", "", 1, 20),
            record("2023-01-17", "IT", 1, 10),
            record("2023-01-18", "HR", 1, 2),
        ];
        let points = usage_by_department(&data);
        let named: Vec<(&str, i64)> = points.iter().map(|p| (p.name.as_str(), p.value)).collect();
        assert_eq!(named, vec![("Unknown", 20), ("IT", 10), ("HR", 7)]);
    }

    #[test]
    fn department_ties_keep_name_order() {
        let data = vec![
            record("2023-01-15", "Legal", 1, 5),
            record("2023-01-16", "Admin", 1, 5),
        ];
        let points = usage_by_department(&data);
        assert_eq!(points[0].name, "Admin");
        assert_eq!(points[1].name, "Legal");
    }

    #[test]
    fn efficiency_ratio_counts_sum_to_record_count() {
        let data = vec![
            record("2023-01-15", "HR", 2, 8),
            record("2023-01-16", "IT", 1, 4),
            record("2023-01-17", "IT", 0, 4),
            record("2023-01-18", "IT", 4, 4),
        ];
        let ratio = efficiency_ratio(&data);
        assert_eq!(ratio.len(), 2);
        assert_eq!(ratio[0].name, "1 Page/Sheet");
        assert_eq!(ratio[0].value, 2);
        assert_eq!(ratio[1].name, "2+ Pages/Sheet");
        assert_eq!(ratio[1].value, 2);
        assert_eq!(
            (ratio[0].value + ratio[1].value) as usize,
            data.len()
        );
        assert!(ratio[0].color.is_some() && ratio[1].color.is_some());
    }

    #[test]
    fn efficiency_ratio_on_empty_input_is_two_zero_buckets() {
        let ratio = efficiency_ratio(&[]);
        assert_eq!(ratio.len(), 2);
        assert_eq!(ratio[0].value, 0);
        assert_eq!(ratio[1].value, 0);
    }

    #[test]
    fn trend_scenario_from_parsed_csv() {
        let text = "Date,Department,Sheet Used\n2023-01-15,HR,10\n2023-02-20,HR,5\n";
        let (records, _) = parse_csv(text);

        let yearly = yearly_trend(&records);
        assert_eq!(
            yearly,
            vec![TrendPoint {
                date: "2023".to_string(),
                sheets: 15
            }]
        );

        let monthly = monthly_trend(&records);
        assert_eq!(
            monthly,
            vec![
                TrendPoint {
                    date: "Jan 23".to_string(),
                    sheets: 10
                },
                TrendPoint {
                    date: "Feb 23".to_string(),
                    sheets: 5
                },
            ]
        );
    }

    #[test]
    fn trends_exclude_unresolvable_dates_identically() {
        let data = vec![
            record("2023-01-15", "HR", 1, 10),
            record("not a date", "HR", 1, 99),
            record("2022-12-01", "IT", 1, 7),
        ];
        let resolvable_total = 17;
        let monthly_sum: i64 = monthly_trend(&data).iter().map(|p| p.sheets).sum();
        let yearly_sum: i64 = yearly_trend(&data).iter().map(|p| p.sheets).sum();
        assert_eq!(monthly_sum, resolvable_total);
        assert_eq!(yearly_sum, resolvable_total);
    }

    #[test]
    fn monthly_buckets_order_by_key_not_label() {
        // "Dec 22" sorts after "Jan 23" as a string; chronologically it
        // comes first.
        let data = vec![
            record("2023-01-15", "HR", 1, 10),
            record("2022-12-01", "HR", 1, 7),
        ];
        let monthly = monthly_trend(&data);
        assert_eq!(monthly[0].date, "Dec 22");
        assert_eq!(monthly[1].date, "Jan 23");

        let yearly = yearly_trend(&data);
        assert_eq!(yearly[0].date, "2022");
        assert_eq!(yearly[1].date, "2023");
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(usage_by_department(&[]).is_empty());
        assert!(monthly_trend(&[]).is_empty());
        assert!(yearly_trend(&[]).is_empty());
    }
}
