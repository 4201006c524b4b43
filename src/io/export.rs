//! CSV export for sizing and autonomy results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::autonomy::AutonomyTable;
use crate::sizing::MpptResult;

/// Column header for the per-MPPT CSV table.
pub const MPPT_HEADER: &str = "mppt,string_voc_v,string_vmp_v,string_imp_a,string_isc_a,\
                               dc_power_w,compliant,issues";

/// Exports per-MPPT results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_mppt_csv(results: &[MpptResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_mppt_csv(results, io::BufWriter::new(file))
}

/// Writes per-MPPT results as CSV to any writer.
///
/// Issues are joined with `;` using their machine names; the column is empty
/// for a layout within every limit.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_mppt_csv(results: &[MpptResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(MPPT_HEADER.split(',').map(str::trim))?;

    for r in results {
        let issues: Vec<&str> = r.issues.iter().map(|i| i.code()).collect();
        wtr.write_record(&[
            r.mppt.to_string(),
            format!("{:.4}", r.string_voc),
            format!("{:.4}", r.string_vmp),
            format!("{:.4}", r.string_imp),
            format!("{:.4}", r.string_isc),
            format!("{:.1}", r.dc_power),
            r.compliant.to_string(),
            issues.join(";"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports an autonomy table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_autonomy_csv(table: &AutonomyTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_autonomy_csv(table, io::BufWriter::new(file))
}

/// Writes an autonomy table as CSV: one row per battery, one column per load.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_autonomy_csv(table: &AutonomyTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["battery".to_string()];
    header.extend(table.loads_w.iter().map(|l| format!("{l}W")));
    wtr.write_record(&header)?;

    for (name, row) in table.rows() {
        let mut record = vec![name.to_string()];
        record.extend(row.iter().map(|h| format!("{h:.4}")));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
