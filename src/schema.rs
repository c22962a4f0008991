use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Layout contract for the NFA spreadsheet source.
///
/// The source is a fixed-format statistical workbook: a named sheet, a
/// block of title rows to skip, the country name at a fixed column and a
/// contiguous run of year columns. The loader fails loudly when the file
/// does not match this descriptor instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NfaSourceSchema {
    #[schemars(description = "Name of the worksheet holding the annual series")]
    pub sheet_name: String,

    #[schemars(description = "Number of leading title/metadata rows before the header row")]
    pub skip_rows: usize,

    #[schemars(description = "Zero-based column index of the country name")]
    pub country_col: usize,

    #[schemars(description = "Zero-based column index of the first year column (inclusive)")]
    pub year_col_start: usize,

    #[schemars(description = "Zero-based column index one past the last year column (exclusive)")]
    pub year_col_end: usize,
}

impl NfaSourceSchema {
    pub fn year_cols(&self) -> Range<usize> {
        self.year_col_start..self.year_col_end
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(NfaSourceSchema))
    }
}

/// The IMF depository-corporations survey layout the dashboard ships with.
impl Default for NfaSourceSchema {
    fn default() -> Self {
        Self {
            sheet_name: "Annual".to_string(),
            skip_rows: 6,
            country_col: 1,
            year_col_start: 4,
            year_col_end: 14,
        }
    }
}

/// Layout contract for the FX-rate CSV source. Year columns are not
/// enumerated here: any header that is exactly four ASCII digits is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FxSourceSchema {
    #[schemars(description = "Header of the column holding the country name")]
    pub country_header: String,
}

impl FxSourceSchema {
    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(FxSourceSchema))
    }
}

impl Default for FxSourceSchema {
    fn default() -> Self {
        Self {
            country_header: "COUNTRY".to_string(),
        }
    }
}

/// True for headers that name a year column: exactly four ASCII digits.
pub fn is_year_label(label: &str) -> bool {
    label.len() == 4 && label.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical 4-character year key from a raw header label, so that
/// "2015", "2015.0" and "2015-01-01" all land on "2015".
pub fn normalize_year_label(label: &str) -> String {
    label.trim().chars().take(4).collect()
}
