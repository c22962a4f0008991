//! Cross-conversion of the NFA-local table into USD via the FX table.

use crate::table::YearTable;
use log::debug;

/// Derives the NFA-USD table from the (already imputed) NFA-local and
/// FX-rate tables.
///
/// A USD cell is `nfa / rate` only when the country exists in the FX
/// table, the year is one of its columns, both operands are present and
/// the rate is non-zero; in every other case the cell starts out missing.
/// Each row is then imputed, and rows still missing across the whole year
/// range are dropped.
///
/// The output's countries are a subset of the NFA table's countries and
/// its year columns are exactly the NFA table's year columns.
pub fn convert_to_usd(nfa: &YearTable, fx: &YearTable) -> YearTable {
    let mut usd = YearTable::new(nfa.years().to_vec());

    for row in nfa.rows() {
        let fx_row = fx.row(&row.country);

        let values = nfa
            .years()
            .iter()
            .enumerate()
            .map(|(idx, year)| -> Option<f64> {
                let nfa_value = row.values[idx]?;
                let rate = fx_row?.values[fx.year_index(year)?]?;
                if rate == 0.0 {
                    return None;
                }
                Some(nfa_value / rate).filter(|v| v.is_finite())
            })
            .collect();

        usd.push_row(row.country.clone(), values);
    }

    usd.impute();
    let before = usd.len();
    usd.retain_non_empty();
    if usd.len() < before {
        debug!(
            "Dropped {} countries with no convertible values",
            before - usd.len()
        );
    }

    usd
}
