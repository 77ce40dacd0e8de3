//! Monthly aggregation and selection over a canonical table
//!
//! Everything here is a pure function of the table; input order never
//! affects the result.

use crate::month::Month;
use crate::records::{CanonicalRecord, CanonicalTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Total sales of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregatedPoint {
    pub data: NaiveDate,
    pub vendas_total: u64,
}

/// Total sales of one (year, advertising flag) group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisingGroup {
    pub ano: i32,
    pub publicidade: u8,
    pub vendas_total: u64,
}

/// Sum sales per synthesized date, ascending. Rows without a date are skipped.
pub fn monthly_series(table: &CanonicalTable) -> Vec<AggregatedPoint> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in table {
        if let Some(date) = record.data {
            let total = totals.entry(date).or_default();
            *total = total.saturating_add(record.vendas);
        }
    }

    totals
        .into_iter()
        .map(|(data, vendas_total)| AggregatedPoint { data, vendas_total })
        .collect()
}

fn group_by_year_and_flag<'a, I>(records: I) -> Vec<AdvertisingGroup>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut totals: BTreeMap<(i32, u8), u64> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.ano {
            let total = totals.entry((year, record.publicidade)).or_default();
            *total = total.saturating_add(record.vendas);
        }
    }

    totals
        .into_iter()
        .map(|((ano, publicidade), vendas_total)| AdvertisingGroup {
            ano,
            publicidade,
            vendas_total,
        })
        .collect()
}

/// Sales with and without advertising for a single year and month
pub fn advertising_split(table: &CanonicalTable, year: i32, month: Month) -> Vec<AdvertisingGroup> {
    group_by_year_and_flag(select_period(table, year, month))
}

/// Sales with and without advertising for one month, across every year present
pub fn advertising_by_year(table: &CanonicalTable, month: Month) -> Vec<AdvertisingGroup> {
    group_by_year_and_flag(select_month(table, month))
}

/// Rows of a single year and month
pub fn select_period(table: &CanonicalTable, year: i32, month: Month) -> Vec<&CanonicalRecord> {
    table
        .iter()
        .filter(|r| r.ano == Some(year) && r.mes == month)
        .collect()
}

/// Rows of a single month across all years
pub fn select_month(table: &CanonicalTable, month: Month) -> Vec<&CanonicalRecord> {
    table.iter().filter(|r| r.mes == month).collect()
}

/// Distinct years present, ascending
pub fn available_years(table: &CanonicalTable) -> Vec<i32> {
    table
        .iter()
        .filter_map(|r| r.ano)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct months present, in calendar order
pub fn available_months(table: &CanonicalTable) -> Vec<Month> {
    table
        .iter()
        .map(|r| r.mes)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
