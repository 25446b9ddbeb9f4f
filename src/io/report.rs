//! Per-shape result tables.
//!
//! The CSV form has one header line and one row per input shape:
//!
//! ```text
//! ObjectName,Compactness,PositiveVoxels,TotalWork,Status
//! cube.obj,3.4,0,0,reference
//! sphere.obj,2.1,12,17.5,ok
//! dot.obj,undefined,0,0,ok
//! broken.obj,,,,failed: load: failed to load mesh from broken.obj: ...
//! ```
//!
//! Fields containing a comma, quote or newline are quoted.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::algo::batch::{BatchReport, ShapeOutcome};
use crate::error::Result;

/// Header line of the CSV report.
pub const CSV_HEADER: &str = "ObjectName,Compactness,PositiveVoxels,TotalWork,Status";

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write `report` as CSV.
pub fn write_csv<W: Write>(writer: &mut W, report: &BatchReport) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for outcome in &report.outcomes {
        match outcome {
            ShapeOutcome::Compared(r) => {
                let status = if r.is_reference { "reference" } else { "ok" };
                writeln!(
                    writer,
                    "{},{},{},{},{}",
                    escape(&r.name),
                    r.compactness,
                    r.positive_voxels,
                    r.total_work,
                    status
                )?;
            }
            ShapeOutcome::Failed(f) => {
                let status = format!("failed: {}: {}", f.stage, f.reason);
                writeln!(writer, "{},,,,{}", escape(&f.name), escape(&status))?;
            }
        }
    }
    Ok(())
}

/// Save `report` as CSV to `path`.
pub fn save_csv<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_csv(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}

/// Save `report` as pretty-printed JSON to `path`.
pub fn save_json<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
