//! The shared tabular shape of all three reconciled datasets: one row per
//! country, one optional numeric cell per year column. Missing is `None`,
//! never zero.

use crate::error::Result;
use crate::imputer::fill_directional_average;
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    pub country: String,
    pub values: Vec<Option<f64>>,
}

/// A (Country x Year) table with a fixed, ordered set of year columns.
///
/// Row order is whatever the source produced unless [`sort_by_country`]
/// is called; consumers must treat the table as immutable once built.
///
/// [`sort_by_country`]: YearTable::sort_by_country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTable {
    years: Vec<String>,
    rows: Vec<CountryRow>,
}

impl YearTable {
    pub fn new(years: Vec<String>) -> Self {
        Self {
            years,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating `values` to the year count.
    pub fn push_row(&mut self, country: String, mut values: Vec<Option<f64>>) {
        values.resize(self.years.len(), None);
        self.rows.push(CountryRow { country, values });
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn year_index(&self, year: &str) -> Option<usize> {
        self.years.iter().position(|y| y == year)
    }

    pub fn row(&self, country: &str) -> Option<&CountryRow> {
        self.rows.iter().find(|r| r.country == country)
    }

    /// Single cell lookup; `None` for an unknown country, unknown year,
    /// or a missing value.
    pub fn cell(&self, country: &str, year: &str) -> Option<f64> {
        let idx = self.year_index(year)?;
        self.row(country)?.values[idx]
    }

    pub fn sort_by_country(&mut self) {
        self.rows.sort_by(|a, b| a.country.cmp(&b.country));
    }

    /// Runs the directional-average imputer over every row independently.
    pub fn impute(&mut self) {
        for row in &mut self.rows {
            row.values = fill_directional_average(&row.values);
        }
    }

    /// Drops rows where every year cell is still missing.
    pub fn retain_non_empty(&mut self) {
        self.rows.retain(|r| r.values.iter().any(Option::is_some));
    }

    /// The aligned (year, value) series for one country, missing cells
    /// included. `None` if the country is not in the table.
    pub fn country_series(&self, country: &str) -> Option<Vec<(&str, Option<f64>)>> {
        let row = self.row(country)?;
        Some(
            self.years
                .iter()
                .map(String::as_str)
                .zip(row.values.iter().copied())
                .collect(),
        )
    }

    /// The present (year, value) points for one country with year labels
    /// parsed to integers, the shape forecasting consumers train on.
    pub fn present_points(&self, country: &str) -> Option<Vec<(i32, f64)>> {
        let row = self.row(country)?;
        Some(
            self.years
                .iter()
                .zip(&row.values)
                .filter_map(|(year, value)| Some((year.parse::<i32>().ok()?, (*value)?)))
                .collect(),
        )
    }

    /// Countries ranked by descending value for one year column, missing
    /// cells excluded. Empty when the year is not a column of this table.
    pub fn ranked(&self, year: &str, limit: usize) -> Vec<(&str, f64)> {
        let Some(idx) = self.year_index(year) else {
            return Vec::new();
        };

        let mut entries: Vec<(&str, f64)> = self
            .rows
            .iter()
            .filter_map(|r| r.values[idx].map(|v| (r.country.as_str(), v)))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(limit);
        entries
    }

    /// Writes the table as CSV: a `Country` column followed by the year
    /// columns, missing cells left empty.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.years.len() + 1);
        header.push("Country".to_string());
        header.extend(self.years.iter().cloned());
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(header.len());
            record.push(row.country.clone());
            for value in &row.values {
                record.push(value.map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|y| y.to_string()).collect()
    }

    fn sample_table() -> YearTable {
        let mut table = YearTable::new(years(&["2020", "2021", "2022"]));
        table.push_row("Bland".to_string(), vec![Some(5.0), None, Some(9.0)]);
        table.push_row("Aland".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)]);
        table.push_row("Cland".to_string(), vec![None, None, None]);
        table
    }

    #[test]
    fn test_cell_lookup() {
        let table = sample_table();
        assert_eq!(table.cell("Aland", "2021"), Some(2.0));
        assert_eq!(table.cell("Bland", "2021"), None);
        assert_eq!(table.cell("Aland", "1999"), None);
        assert_eq!(table.cell("Nowhere", "2020"), None);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = YearTable::new(years(&["2020", "2021"]));
        table.push_row("Aland".to_string(), vec![Some(1.0)]);
        assert_eq!(table.row("Aland").unwrap().values, vec![Some(1.0), None]);
    }

    #[test]
    fn test_sort_by_country() {
        let mut table = sample_table();
        table.sort_by_country();
        let order: Vec<&str> = table.rows().iter().map(|r| r.country.as_str()).collect();
        assert_eq!(order, vec!["Aland", "Bland", "Cland"]);
    }

    #[test]
    fn test_impute_and_retain_non_empty() {
        let mut table = sample_table();
        table.impute();
        assert_eq!(table.cell("Bland", "2021"), Some(5.0));
        // The all-missing row survives imputation but not the cleanup.
        assert_eq!(table.len(), 3);
        table.retain_non_empty();
        assert_eq!(table.len(), 2);
        assert!(table.row("Cland").is_none());
    }

    #[test]
    fn test_country_series_alignment() {
        let table = sample_table();
        let series = table.country_series("Bland").unwrap();
        assert_eq!(
            series,
            vec![("2020", Some(5.0)), ("2021", None), ("2022", Some(9.0))]
        );
        assert!(table.country_series("Nowhere").is_none());
    }

    #[test]
    fn test_present_points_skips_missing() {
        let table = sample_table();
        let points = table.present_points("Bland").unwrap();
        assert_eq!(points, vec![(2020, 5.0), (2022, 9.0)]);
    }

    #[test]
    fn test_ranked_descending_with_limit() {
        let table = sample_table();
        let top = table.ranked("2020", 5);
        assert_eq!(top, vec![("Bland", 5.0), ("Aland", 1.0)]);

        let top_one = table.ranked("2020", 1);
        assert_eq!(top_one, vec![("Bland", 5.0)]);

        assert!(table.ranked("1999", 5).is_empty());
    }

    #[test]
    fn test_write_csv_blanks_missing_cells() {
        let table = sample_table();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Country,2020,2021,2022"));
        assert_eq!(lines.next(), Some("Bland,5,,9"));
        assert_eq!(lines.next(), Some("Aland,1,2,3"));
        assert_eq!(lines.next(), Some("Cland,,,"));
    }
}
