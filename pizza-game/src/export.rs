//! History export.
use serde::{Deserialize, Serialize};

use crate::state::{DayRecord, History};

/// One exported day with money given in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedDay {
    pub day: u32,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub fulfillment: f64,
    pub satisfaction: i32,
    pub price: f64,
}

impl From<&DayRecord> for ExportedDay {
    fn from(record: &DayRecord) -> Self {
        Self {
            day: record.day,
            revenue: record.revenue.as_dollars(),
            costs: record.costs.as_dollars(),
            profit: record.profit.as_dollars(),
            fulfillment: record.fulfillment,
            satisfaction: record.satisfaction,
            price: record.price.as_dollars(),
        }
    }
}

/// Render the history as a pretty JSON array of days, oldest first.
/// The persisted blob keeps cents; only the export converts to dollars.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn export_history(history: &History) -> Result<String, serde_json::Error> {
    let rows: Vec<ExportedDay> = history.iter().map(ExportedDay::from).collect();
    serde_json::to_string_pretty(&rows)
}
