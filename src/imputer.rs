//! Directional average imputation for a single country row.
//!
//! A missing slot is filled from the values that were present in the
//! *original* row, never from values imputed earlier in the same pass:
//!
//! - nothing present before the slot, something present after it:
//!   mean of the present values after it (leading gaps look forward);
//! - something present before it: mean of the present values before it;
//! - nothing present anywhere: the slot stays missing.
//!
//! The before-branch deliberately wins whenever any earlier value exists,
//! even if later values also exist. Downstream behavior depends on this
//! asymmetry, so it must not be "improved".

/// Returns a copy of `row` with every fillable missing slot replaced
/// according to the directional-average policy. Never fails; a row with
/// no usable data comes back unchanged.
pub fn fill_directional_average(row: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = row.to_vec();

    for i in 0..row.len() {
        if row[i].is_some() {
            continue;
        }

        let before: Vec<f64> = row[..i].iter().filter_map(|v| *v).collect();
        let after: Vec<f64> = row[i + 1..].iter().filter_map(|v| *v).collect();

        if before.is_empty() && !after.is_empty() {
            filled[i] = Some(mean(&after));
        } else if !before.is_empty() {
            filled[i] = Some(mean(&before));
        }
    }

    filled
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
