use crate::metrics::beats::BeatReport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One single-key object of the exported report.
///
/// The report is an array of these in a fixed order; consumers index it by
/// position, so the order and the float-typed beat count are part of the
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportEntry {
    #[serde(rename = "Average Heart Rate")]
    AverageHeartRate(f64),
    #[serde(rename = "Voltage Extrema")]
    VoltageExtrema([f64; 2]),
    #[serde(rename = "ECG Duration")]
    EcgDuration(f64),
    #[serde(rename = "Number of Beats")]
    NumberOfBeats(f64),
    #[serde(rename = "Beat Times")]
    BeatTimes(Vec<f64>),
}

pub fn report_entries(report: &BeatReport) -> Vec<ReportEntry> {
    let (max, min) = report.voltage_extremes;
    vec![
        ReportEntry::AverageHeartRate(report.heart_rate),
        ReportEntry::VoltageExtrema([max, min]),
        ReportEntry::EcgDuration(report.duration),
        ReportEntry::NumberOfBeats(report.beat_count as f64),
        ReportEntry::BeatTimes(report.beat_times.clone()),
    ]
}

pub fn report_to_string(report: &BeatReport) -> Result<String> {
    Ok(serde_json::to_string(&report_entries(report))?)
}

pub fn write_report<W: Write>(writer: W, report: &BeatReport) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, &report_entries(report))?;
    writer.flush()?;
    Ok(())
}

pub fn save_report(path: &Path, report: &BeatReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_report(file, report).with_context(|| format!("writing {}", path.display()))
}

/// `recordings/a.csv` → `recordings/a.json`.
pub fn report_path_for(input: &Path) -> PathBuf {
    input.with_extension("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_report() -> BeatReport {
        BeatReport {
            heart_rate: 34.0 / 27.775,
            voltage_extremes: (1.05, -0.68),
            duration: 27.775,
            beat_count: 3,
            beat_times: vec![0.722, 1.522, 2.342],
        }
    }

    #[test]
    fn entries_keep_order_and_types() {
        let text = report_to_string(&sample_report()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!([
                {"Average Heart Rate": 1.2241224122412242},
                {"Voltage Extrema": [1.05, -0.68]},
                {"ECG Duration": 27.775},
                {"Number of Beats": 3.0},
                {"Beat Times": [0.722, 1.522, 2.342]}
            ])
        );
        assert!(text.contains("\"Number of Beats\":3.0"), "{text}");
    }

    #[test]
    fn saved_report_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = report_path_for(&dir.path().join("test_data1.csv"));
        assert_eq!(path.file_name().unwrap(), "test_data1.json");
        save_report(&path, &sample_report()).unwrap();
        let entries: Vec<ReportEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries[0], ReportEntry::AverageHeartRate(1.2241224122412242));
        assert_eq!(entries[3], ReportEntry::NumberOfBeats(3.0));
    }
}
