//! Source loaders: the only I/O in the crate.
//!
//! Both loaders normalize their source into a [`YearTable`], coerce every
//! value cell to numeric (non-numeric content becomes missing, never an
//! error) and run the imputer over each row. Structural problems — absent
//! file, absent sheet, layout narrower than the schema — fail loudly
//! before any table is produced.

use crate::error::{ReconcileError, Result};
use crate::schema::{is_year_label, normalize_year_label, FxSourceSchema, NfaSourceSchema};
use crate::table::YearTable;
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{debug, info};
use std::path::Path;

/// Loads the NFA spreadsheet into a normalized, imputed table.
pub fn load_nfa_table(path: &Path, schema: &NfaSourceSchema) -> Result<YearTable> {
    if !path.exists() {
        return Err(ReconcileError::SourceUnavailable {
            path: path.to_path_buf(),
        });
    }

    info!("Loading NFA source from {}", path.display());

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range(&schema.sheet_name)
        .map_err(|_| ReconcileError::SheetNotFound {
            sheet: schema.sheet_name.clone(),
        })?;

    let table = nfa_table_from_rows(range.rows().skip(schema.skip_rows), schema)?;
    debug!(
        "NFA table: {} countries x {} years",
        table.len(),
        table.years().len()
    );

    Ok(table)
}

/// Builds the NFA table from raw sheet rows, header row first. Split out
/// from the workbook I/O so the layout handling is testable on its own.
fn nfa_table_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
    schema: &NfaSourceSchema,
) -> Result<YearTable> {
    let header = rows.next().ok_or_else(|| ReconcileError::SchemaMismatch {
        details: format!(
            "sheet '{}' has no header row after skipping {} rows",
            schema.sheet_name, schema.skip_rows
        ),
    })?;

    if header.len() < schema.year_col_end || header.len() <= schema.country_col {
        return Err(ReconcileError::SchemaMismatch {
            details: format!(
                "header row has {} columns, schema expects country at {} and years at {}..{}",
                header.len(),
                schema.country_col,
                schema.year_col_start,
                schema.year_col_end
            ),
        });
    }

    let years: Vec<String> = schema
        .year_cols()
        .map(|col| normalize_year_label(&cell_to_string(&header[col])))
        .collect();

    let mut table = YearTable::new(years);
    for row in rows {
        let country = row
            .get(schema.country_col)
            .map(cell_to_string)
            .unwrap_or_default();
        if country.is_empty() {
            // Spacer and footnote rows in the workbook have no country key.
            continue;
        }

        let values = schema
            .year_cols()
            .map(|col| row.get(col).and_then(coerce_numeric))
            .collect();
        table.push_row(country, values);
    }

    table.impute();
    Ok(table)
}

/// Loads the FX-rate CSV into a normalized, imputed table sorted by
/// country. Year columns are discovered by header shape, not position.
pub fn load_fx_table(path: &Path, schema: &FxSourceSchema) -> Result<YearTable> {
    if !path.exists() {
        return Err(ReconcileError::SourceUnavailable {
            path: path.to_path_buf(),
        });
    }

    info!("Loading FX source from {}", path.display());

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let country_idx = headers
        .iter()
        .position(|h| h == schema.country_header)
        .ok_or_else(|| ReconcileError::MissingColumn {
            column: schema.country_header.clone(),
        })?;

    let year_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_year_label(h))
        .map(|(idx, h)| (idx, h.to_string()))
        .collect();

    let mut table = YearTable::new(year_cols.iter().map(|(_, year)| year.clone()).collect());
    for record in reader.records() {
        let record = record?;
        let country = record.get(country_idx).unwrap_or("").trim();
        if country.is_empty() {
            continue;
        }

        let values = year_cols
            .iter()
            .map(|(idx, _)| record.get(*idx).and_then(parse_numeric))
            .collect();
        table.push_row(country.to_string(), values);
    }

    table.sort_by_country();
    table.impute();
    debug!(
        "FX table: {} countries x {} years",
        table.len(),
        table.years().len()
    );

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        _ => String::new(),
    }
}

fn coerce_numeric(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
