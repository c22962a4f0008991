//! # NFA Reconciler
//!
//! A library for reconciling Net Foreign Assets (NFA) statistics and
//! foreign-exchange rates into aligned, USD-denominated country time
//! series.
//!
//! ## Core Concepts
//!
//! - **NFA-local table**: per-country, per-year net foreign assets in
//!   domestic currency, parsed from a fixed-layout statistical workbook
//! - **FX-rate table**: per-country, per-year units of domestic currency
//!   per USD, parsed from a CSV export
//! - **NFA-USD table**: derived by safe division (NFA / rate) with zero
//!   and lookup guards, imputed, and stripped of all-missing rows
//! - **Directional average imputation**: a missing cell is filled from
//!   the mean of the values present before it in the same row, or after
//!   it when nothing comes before
//!
//! All three tables share the NFA table's year columns and are built at
//! most once per [`DataContext`]; consumers read them as immutable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nfa_reconciler::{DataContext, PipelineConfig};
//!
//! let ctx = DataContext::new(PipelineConfig::new(
//!     "./data/nfa_by_country.xlsx",
//!     "./data/fx_rates.csv",
//! ));
//!
//! let data = ctx.datasets()?;
//! let series = data.nfa_usd.country_series("Australia");
//! ```

pub mod engine;
pub mod error;
pub mod imputer;
pub mod ingestion;
pub mod reconciler;
pub mod risk;
pub mod schema;
pub mod table;

pub use engine::{build_datasets, DataContext, PipelineConfig, ReconciledData};
pub use error::{ReconcileError, Result};
pub use imputer::fill_directional_average;
pub use ingestion::{load_fx_table, load_nfa_table};
pub use reconciler::convert_to_usd;
pub use risk::{pct_changes, risk_metrics, RiskMetrics};
pub use schema::{FxSourceSchema, NfaSourceSchema};
pub use table::{CountryRow, YearTable};

#[cfg(test)]
mod tests {
    use super::*;

    fn years(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|y| y.to_string()).collect()
    }

    #[test]
    fn test_xland_reconciliation_scenario() {
        let mut nfa = YearTable::new(years(&["2020", "2021", "2022"]));
        nfa.push_row("Xland".to_string(), vec![Some(100.0), None, Some(300.0)]);

        let mut fx = YearTable::new(years(&["2020", "2021", "2022"]));
        fx.push_row("Xland".to_string(), vec![Some(2.0), Some(2.0), Some(3.0)]);

        let usd = convert_to_usd(&nfa, &fx);

        assert_eq!(usd.cell("Xland", "2020"), Some(50.0));
        // 2021 starts missing and is imputed from the value before it.
        assert_eq!(usd.cell("Xland", "2021"), Some(50.0));
        assert_eq!(usd.cell("Xland", "2022"), Some(100.0));
    }

    #[test]
    fn test_reconciled_tables_feed_risk_metrics() {
        let mut nfa = YearTable::new(years(&["2019", "2020", "2021", "2022"]));
        nfa.push_row(
            "Xland".to_string(),
            vec![Some(100.0), Some(110.0), Some(55.0), Some(120.0)],
        );

        let mut fx = YearTable::new(years(&["2019", "2020", "2021", "2022"]));
        fx.push_row(
            "Xland".to_string(),
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
        );

        let usd = convert_to_usd(&nfa, &fx);
        let series: Vec<Option<f64>> = usd
            .country_series("Xland")
            .unwrap()
            .into_iter()
            .map(|(_, v)| v)
            .collect();

        let metrics = risk_metrics(&series);
        assert_eq!(metrics.exposure, Some(120.0));
        assert!(metrics.volatility.is_some());
        // One negative move out of three.
        assert!((metrics.loss_probability.unwrap() - 100.0 / 3.0).abs() < 1e-9);
    }
}
