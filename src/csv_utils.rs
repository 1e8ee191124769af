//! Trace file I/O.
//!
//! Instrument exports are tab-separated `Index<TAB>Intensity` lines with no
//! header. Results are written as a headed two-column CSV of time and
//! denoised intensity.

use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Header of the time column in result files
pub const TIME_HEADER: &str = "Time (s)";
/// Header of the intensity column in result files
pub const DENOISED_HEADER: &str = "Denoised Intensity";

/// Reads the intensity column of a tab-separated, header-less trace file.
///
/// Lines whose intensity field is missing or not a number are skipped.
pub fn read_intensity_trace<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let mut values = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if let Some(field) = record.get(1) {
            if let Ok(val) = field.parse::<f64>() {
                values.push(val);
            }
        }
    }
    Ok(values)
}

/// Writes values as a tab-separated, header-less trace file.
pub fn write_intensity_trace<P: AsRef<Path>>(path: P, values: &[f64]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;

    for (i, value) in values.iter().enumerate() {
        wtr.write_record([i.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a column of f64 values from a CSV file by column name, skipping invalid/missing values.
pub fn read_csv_column<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut values = Vec::new();

    let headers = rdr.headers()?.clone();
    let col_index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| format!("column '{}' not found", column))?;

    for result in rdr.records() {
        let record = result?;
        if let Some(field) = record.get(col_index) {
            if let Ok(val) = field.parse::<f64>() {
                values.push(val);
            }
        }
    }
    Ok(values)
}

/// Writes the two-column `Time (s)`, `Denoised Intensity` result CSV.
pub fn write_denoised_csv<P: AsRef<Path>>(
    path: P,
    time: &[f64],
    denoised: &[f64],
) -> Result<(), Box<dyn Error>> {
    if time.len() != denoised.len() {
        return Err(format!(
            "time axis has {} samples but signal has {}",
            time.len(),
            denoised.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([TIME_HEADER, DENOISED_HEADER])?;
    for (t, value) in time.iter().zip(denoised) {
        wtr.write_record([t.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
