//! Canonical sales records

use crate::month::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned sales row
///
/// Field names on disk follow the source schema (`Mes`, `Ano`, `Vendas`,
/// `Publicidade`, `Data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "Mes")]
    pub mes: Month,
    /// Absent when the raw year is not an integer
    #[serde(rename = "Ano")]
    pub ano: Option<i32>,
    #[serde(rename = "Vendas")]
    pub vendas: u64,
    /// Always 0 or 1
    #[serde(rename = "Publicidade")]
    pub publicidade: u8,
    /// First day of (`ano`, `mes`); absent when that date cannot be built
    #[serde(rename = "Data")]
    pub data: Option<NaiveDate>,
}

impl CanonicalRecord {
    /// Build a record, deriving `data` from `ano` and `mes`
    pub fn new(mes: Month, ano: Option<i32>, vendas: u64, publicidade: bool) -> Self {
        Self {
            mes,
            ano,
            vendas,
            publicidade: u8::from(publicidade),
            data: ano.and_then(|year| first_of_month(year, mes)),
        }
    }

    pub fn has_advertising(&self) -> bool {
        self.publicidade == 1
    }
}

/// Earliest and latest years accepted when synthesizing a date
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// First day of the given year and month, limited to four-digit years
pub fn first_of_month(year: i32, month: Month) -> Option<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.index(), 1)
}

/// A cleaned batch of sales rows, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a CanonicalTable {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<CanonicalRecord> for CanonicalTable {
    fn from_iter<I: IntoIterator<Item = CanonicalRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
