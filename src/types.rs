use serde::Serialize;
use tabled::Tabled;

/// One print/photocopy event parsed from the published usage sheet.
///
/// Numeric fields default to 0 when the source cell cannot be parsed; string
/// fields keep whatever the sheet contained after trimming and unquoting.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub date: String,
    pub user_type: String,
    pub department: String,
    pub pages_per_sheet: i64,
    pub total_pages: i64,
    pub copies: i64,
    pub sheet_used: i64,
}

/// Aggregate usage snapshot for the currently filtered record set.
///
/// Recomputed from scratch on every filter change; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_sheets: i64,
    pub total_requests: usize,
    /// Sheets attributed to 2-pages-per-sheet printing, i.e. the estimated
    /// savings versus a simplex baseline.
    pub total_saved_sheets: i64,
    pub trees_consumed: f64,
    pub co2_kg: f64,
    pub water_liters: f64,
}

/// One category's aggregate value, with an optional suggested display color.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: i64,
    pub color: Option<&'static str>,
}

/// One time bucket's aggregate sheet usage. `date` is the rendered bucket
/// label ("Jan 23" or "2023"); ordering is by the underlying bucket key.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub sheets: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentUsageRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "SheetsUsed")]
    #[tabled(rename = "SheetsUsed")]
    pub sheets_used: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EfficiencyRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Requests")]
    #[tabled(rename = "Requests")]
    pub requests: i64,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "SheetsUsed")]
    #[tabled(rename = "SheetsUsed")]
    pub sheets_used: String,
}
