use crate::signal::SampleSeries;
use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Parse a two-column `time,voltage` table.
///
/// Lines starting with `#` are skipped. A first row whose fields are not both
/// numeric is taken to be a header. Every other row must carry two finite
/// numbers; extra columns are ignored.
pub fn parse_series_csv<R: Read>(reader: R, delimiter: u8) -> Result<SampleSeries> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut times = Vec::new();
    let mut voltages = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.context("reading record")?;
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());
        match parse_row(&record) {
            Some((t, v)) => {
                if !t.is_finite() || !v.is_finite() {
                    bail!("line {}: non-finite sample ({}, {})", line, t, v);
                }
                times.push(t);
                voltages.push(v);
            }
            None if idx == 0 => continue,
            None => bail!(
                "line {} is not a numeric time/voltage pair: {:?}",
                line,
                record.iter().collect::<Vec<_>>()
            ),
        }
    }
    if times.is_empty() {
        bail!("no numeric samples found");
    }
    SampleSeries::new(times, voltages).map_err(|e| anyhow!(e))
}

fn parse_row(record: &StringRecord) -> Option<(f64, f64)> {
    let time = record.get(0)?.parse::<f64>().ok()?;
    let voltage = record.get(1)?.parse::<f64>().ok()?;
    Some((time, voltage))
}

/// Load a recording from disk.
pub fn read_series_csv(path: &Path, delimiter: u8) -> Result<SampleSeries> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_series_csv(file, delimiter).with_context(|| format!("loading {}", path.display()))
}

/// Write a recording with a `time,voltage` header.
pub fn write_series_csv<W: Write>(writer: W, samples: &SampleSeries) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["time", "voltage"])?;
    for (t, v) in samples.times().iter().zip(samples.voltages()) {
        writer.write_record([t.to_string(), v.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_series_csv(path: &Path, samples: &SampleSeries) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_series_csv(file, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_detected_and_skipped() {
        let text = "time,voltage\n0.0,-0.1\n0.5,0.2\n1.0,0.05\n";
        let series = parse_series_csv(text.as_bytes(), b',').unwrap();
        assert_eq!(series.times(), &[0.0, 0.5, 1.0]);
        assert_eq!(series.voltages(), &[-0.1, 0.2, 0.05]);
    }

    #[test]
    fn headerless_and_tab_separated() {
        let text = "# exported\n0.000\t-0.145\n0.003\t-0.145\n";
        let series = parse_series_csv(text.as_bytes(), b'\t').unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.times()[1], 0.003);
    }

    #[test]
    fn bad_row_names_its_line() {
        let text = "time,voltage\n0.0,0.1\n0.1,oops\n";
        let err = parse_series_csv(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_column_is_rejected() {
        let text = "0.0,0.1\n0.1\n";
        assert!(parse_series_csv(text.as_bytes(), b',').is_err());
    }

    #[test]
    fn unordered_time_is_rejected() {
        let text = "0.0,0.1\n0.2,0.1\n0.1,0.3\n";
        let err = parse_series_csv(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("strictly increasing"), "{err}");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_series_csv("time,voltage\n".as_bytes(), b',').is_err());
    }

    #[test]
    fn written_file_loads_back() {
        let series = SampleSeries::new(vec![0.0, 0.004, 0.008], vec![0.1, -0.25, 1.05]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.csv");
        save_series_csv(&path, &series).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,voltage\n0,0.1\n"));
        assert_eq!(read_series_csv(&path, b',').unwrap(), series);
    }
}
