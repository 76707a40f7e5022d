// src/gradle/report.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::errors::{ImpactError, Result};
use crate::types::Module;

/// Number of fields in every report row: name, path, dependents.
const FIELDS_PER_ROW: usize = 3;

/// Read the CSV report written by the sidecar task.
pub fn parse(path: &Path) -> Result<Vec<Module>> {
    let file = File::open(path).map_err(|e| {
        ImpactError::ReportParseError(format!("opening {}: {e}", path.display()))
    })?;
    let modules = parse_reader(file)
        .map_err(|e| ImpactError::ReportParseError(format!("{}: {e}", path.display())))?;

    debug!(path = %path.display(), modules = modules.len(), "parsed dependency report");
    Ok(modules)
}

/// Parse report rows from any reader, in row order.
///
/// The dependents field is split on `,` as-is, so an empty field gives
/// `[""]`.
pub fn parse_reader<R: Read>(reader: R) -> std::result::Result<Vec<Module>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut modules = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record.map_err(|e| format!("row {row}: {e}"))?;

        if record.len() != FIELDS_PER_ROW {
            return Err(format!(
                "row {row}: expected {FIELDS_PER_ROW} fields, found {}",
                record.len()
            ));
        }

        modules.push(Module {
            name: record[0].to_string(),
            path: record[1].to_string(),
            dependents: record[2].split(',').map(str::to_string).collect(),
        });
    }

    Ok(modules)
}
