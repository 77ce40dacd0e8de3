//! # Sales Dashboard
//!
//! Workspace facade over the sales pipeline crates.
//!
//! ## Example
//!
//! ```
//! use sales_dashboard_workspace::Month;
//!
//! assert_eq!(Month::repair("Fevreiro"), Some(Month::Fevereiro));
//! ```

pub use sales_core::*;

/// Forecasting models used behind the `forecast` feature of `sales_core`
pub use sales_forecast as forecast_models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_reexports() {
        let record = CanonicalRecord::new(Month::Maio, Some(2023), 10, true);
        assert!(record.has_advertising());
        assert_eq!(NAME, "sales_core");
        assert!(forecast_models::MonthlySeries::new(Vec::new()).is_err());
    }
}
