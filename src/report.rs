use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::admission::RunningCounters;
use crate::domain::ledger::LedgerSnapshot;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourLoad {
    pub hour: i64,
    pub count: i64,
    /// Booked share of the capacity cap, in whole percent.
    pub percent: i64,
}

/// The end-of-run summary, a pure reduction over the final ledger snapshot
/// and the running counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    /// Hours tying the maximum occupancy. Empty when nobody was admitted.
    pub peak_hours: Vec<HourCount>,
    /// Hours tying the minimum occupancy.
    pub valley_hours: Vec<HourCount>,
    pub counters: RunningCounters,
    /// Occupancy of every hour of the operating window, in order.
    pub per_hour: Vec<HourLoad>,
}

/// Builds the final report. Pure and idempotent: the same snapshot and
/// counters always yield the same report.
pub fn build_report(snapshot: &LedgerSnapshot, counters: RunningCounters, capacity: i64) -> FinalReport {
    let max = snapshot.occupancy.iter().map(|&(_, count)| count).max().unwrap_or(0);
    let min = snapshot.occupancy.iter().map(|&(_, count)| count).min().unwrap_or(0);

    let peak_hours = if max > 0 {
        snapshot.occupancy.iter().filter(|&&(_, count)| count == max).map(|&(hour, count)| HourCount { hour, count }).collect()
    } else {
        Vec::new()
    };

    let valley_hours = snapshot.occupancy.iter().filter(|&&(_, count)| count == min).map(|&(hour, count)| HourCount { hour, count }).collect();

    let per_hour = snapshot.occupancy.iter().map(|&(hour, count)| HourLoad { hour, count, percent: count * 100 / capacity }).collect();

    FinalReport { peak_hours, valley_hours, counters, per_hour }
}

/// Persists the report as JSON.
pub fn write_json(report: &FinalReport, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(())
}

/// Exports the per-hour occupancy table as a `;`-delimited CSV.
pub fn write_csv(report: &FinalReport, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path).map_err(into_io)?;

    writer.write_record(["Hour", "People", "Percent"]).map_err(into_io)?;
    for load in &report.per_hour {
        writer.write_record([load.hour.to_string(), load.count.to_string(), load.percent.to_string()]).map_err(into_io)?;
    }
    writer.flush()?;
    Ok(())
}

fn into_io(e: csv::Error) -> crate::error::Error {
    crate::error::Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
